use chrono::{DateTime, TimeDelta, Utc};

/// Format a timestamp for the time axis using UTC components, picking the
/// granularity from the span the axis covers.
///
/// - `span < 1 day` -> `HH:MM`
/// - `span < 60 days` -> `DD.MM`
/// - otherwise -> `MM.YYYY`
pub fn format_time_label(timestamp: DateTime<Utc>, span: TimeDelta) -> String {
    if span < TimeDelta::days(1) {
        timestamp.format("%H:%M").to_string()
    } else if span < TimeDelta::days(60) {
        timestamp.format("%d.%m").to_string()
    } else {
        timestamp.format("%m.%Y").to_string()
    }
}
