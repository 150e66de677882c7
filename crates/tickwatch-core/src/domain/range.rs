use serde::{Deserialize, Serialize};

use crate::CalendarDate;

/// Date span for a history fetch.
///
/// The dashboard offers start/end pickers but tolerates degenerate input:
/// only a strictly increasing pair selects the window form, anything else
/// falls back to the default trailing year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchRange {
    Window {
        start: CalendarDate,
        end: CalendarDate,
    },
    TrailingYear,
}

impl FetchRange {
    /// Resolve picker input into a fetch range.
    ///
    /// `start >= end` is not an error; it degrades to [`Self::TrailingYear`]
    /// and the returned warning is surfaced to the user without blocking the
    /// fetch.
    pub fn resolve(start: CalendarDate, end: CalendarDate) -> (Self, Option<String>) {
        if start < end {
            (Self::Window { start, end }, None)
        } else {
            let warning = format!(
                "start date {start} is not before end date {end}; using the trailing one-year window instead"
            );
            (Self::TrailingYear, Some(warning))
        }
    }
}
