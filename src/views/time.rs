use chrono::{DateTime, Utc};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// "5 minutes", "about 3 hours", "over 1 year": distance between `then` and `now`
/// in words, for "Posted ... ago" lines. Future times read as zero distance.
pub fn distance_in_words(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = (seconds as f64 / 60.0).round() as i64;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        m if m < 45 => format!("{m} minutes"),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_IN_DAY => plural("about ", (m as f64 / 60.0).round() as i64, "hour"),
        m if m < 2520 => "1 day".to_string(),
        m if m < MINUTES_IN_MONTH => {
            plural("", (m as f64 / MINUTES_IN_DAY as f64).round() as i64, "day")
        }
        m if m < MINUTES_IN_TWO_MONTHS => plural(
            "about ",
            (m as f64 / MINUTES_IN_MONTH as f64).round() as i64,
            "month",
        ),
        m => {
            let months = m / MINUTES_IN_MONTH;
            if months < 12 {
                plural("", (m as f64 / MINUTES_IN_MONTH as f64).round() as i64, "month")
            } else {
                let years = months / 12;
                match months % 12 {
                    r if r < 3 => plural("about ", years, "year"),
                    r if r < 9 => plural("over ", years, "year"),
                    _ => plural("almost ", years + 1, "year"),
                }
            }
        }
    }
}

pub fn time_ago(then: DateTime<Utc>) -> String {
    distance_in_words(then, Utc::now())
}

fn plural(prefix: &str, n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{prefix}1 {unit}")
    } else {
        format!("{prefix}{n} {unit}s")
    }
}
