pub mod conflict;
pub mod recurrence;

pub use conflict::is_slot_available;
pub use recurrence::{expand, expand_until, expansion_horizon, RECURRING_TITLE_SUFFIX};
