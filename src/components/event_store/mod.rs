mod actor;
mod handle;
pub mod models;

pub use actor::{EventStoreActor, EventStoreActorHandle};
pub use handle::EventStoreHandle;
pub use models::{Event, EventId, NewEvent, OwnerId, RecurrenceKind};
