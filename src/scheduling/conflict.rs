use crate::components::event_store::{EventId, EventStoreHandle, OwnerId};
use crate::error::AppResult;
use chrono::NaiveDateTime;

/// Check whether the candidate range [start, end) is free for the owner.
///
/// Two ranges conflict iff `s1 < e2 && s2 < e1`, so an event ending exactly
/// when another starts does not count as a conflict, and a zero-duration
/// candidate never conflicts with anything. `exclude_id` omits one event from
/// the check, for edits validated against themselves. Read-only.
pub async fn is_slot_available(
    store: &EventStoreHandle,
    owner: OwnerId,
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_id: Option<EventId>,
) -> AppResult<bool> {
    let overlapping = store.query_range(owner, start, end, exclude_id).await?;
    Ok(overlapping.is_empty())
}
