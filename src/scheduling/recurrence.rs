use crate::components::event_store::{Event, NewEvent};
use crate::config::DEFAULT_EXPANSION_HORIZON_DAYS;
use crate::error::{AppResult, Error};
use chrono::{Duration, NaiveDateTime};

/// Suffix appended to generated instance titles so they can be told apart
/// from their template in listings
pub const RECURRING_TITLE_SUFFIX: &str = " (Recurring)";

/// Resolve the horizon up to which instances are generated.
///
/// A recurrence end bounds generation inclusively through the end of its
/// calendar day, since it is submitted as a bare date. Without one, the
/// horizon is the given number of days past the generation time.
pub fn expansion_horizon(
    template: &Event,
    generated_at: NaiveDateTime,
    default_horizon_days: i64,
) -> NaiveDateTime {
    match template.recurrence_end {
        Some(end) => end.date().and_hms_opt(23, 59, 59).unwrap_or(end),
        None => generated_at + Duration::days(default_horizon_days),
    }
}

/// Expand a recurring template into concrete instances up to the default
/// one-year horizon
pub fn expand(template: &Event, generated_at: NaiveDateTime) -> AppResult<Vec<NewEvent>> {
    let horizon = expansion_horizon(template, generated_at, DEFAULT_EXPANSION_HORIZON_DAYS);
    expand_until(template, horizon)
}

/// Expand a recurring template into concrete instances whose start times are
/// at or before the horizon.
///
/// The template itself is not part of the output; callers persist it
/// separately. Each instance inherits the owner and description, carries the
/// title suffix, and is non-recurring so it can never be re-expanded.
pub fn expand_until(template: &Event, horizon: NaiveDateTime) -> AppResult<Vec<NewEvent>> {
    let mut instances = Vec::new();

    if !template.is_recurring {
        return Ok(instances);
    }
    let Some(kind) = template.recurrence_type else {
        return Ok(instances);
    };

    let step = kind.step();
    // A non-advancing step would never reach the horizon
    if step <= Duration::zero() {
        return Err(Error::UnsupportedRecurrence(format!(
            "{} does not advance the schedule",
            kind
        )));
    }

    let mut start = template.start_time;
    let mut end = template.end_time;

    loop {
        start += step;
        end += step;
        if start > horizon {
            break;
        }

        instances.push(NewEvent {
            owner: template.owner,
            title: format!("{}{}", template.title, RECURRING_TITLE_SUFFIX),
            description: template.description.clone(),
            start_time: start,
            end_time: end,
            is_recurring: false,
            recurrence_type: None,
            recurrence_end: None,
        });
    }

    Ok(instances)
}
