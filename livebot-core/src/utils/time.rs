use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = MINUTE * 60;
const DAY: u64 = HOUR * 24;
const WEEK: u64 = DAY * 7;
const MONTH: u64 = DAY * 30;
const YEAR: u64 = MONTH * 12;

fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Human readable duration using only the largest whole unit,
/// e.g. "5 hours", "24 μs". Anything under a microsecond is "now".
pub fn pretty_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let units: [(u64, &str); 6] = [
        (YEAR, "year"),
        (MONTH, "month"),
        (WEEK, "week"),
        (DAY, "day"),
        (HOUR, "hour"),
        (MINUTE, "minute"),
    ];
    for (size, name) in units {
        if secs >= size {
            let n = secs / size;
            return format!("{} {}{}", n, name, plural(n));
        }
    }
    if secs >= 1 {
        return format!("{} second{}", secs, plural(secs));
    }
    let millis = d.as_millis();
    if millis >= 1 {
        return format!("{} ms", millis);
    }
    let micros = d.as_micros();
    if micros >= 1 {
        return format!("{} μs", micros);
    }
    "now".to_string()
}

/// Splits a live duration into whole hours and the remaining minutes.
pub fn hours_minutes(d: chrono::Duration) -> (i64, i64) {
    let minutes = d.num_minutes().max(0);
    (minutes / 60, minutes % 60)
}
