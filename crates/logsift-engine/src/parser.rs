use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use logsift_types::{Level, LogEvent};
use once_cell::sync::Lazy;
use regex::Regex;

// `2024-01-01 10:00:00`, `2024-01-01T10:00:00.123Z`, `2024-01-01 10:00:00+02:00`
static TS_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2})(?:[.,](\d{1,6}))?(Z|[+-]\d{2}:?\d{2})?\s*",
    )
    .unwrap()
});

// Syslog-style `Jan  5 10:00:00` (year-less, resolved to the current year)
static TS_SYSLOG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-z]{2}) +(\d{1,2}) (\d{2}:\d{2}:\d{2})\s+").unwrap());

static LEVEL_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(TRACE|DEBUG|INFO|WARNING|WARN|ERROR|ERR|FATAL|SEVERE)\b").unwrap()
});

// A level keyword further into the line than this is message content,
// not a line prefix.
const LEVEL_SCAN_WINDOW: usize = 16;

/// Parse one raw line into a structured event.
///
/// Extraction order: timestamp prefix (best-effort), then the first level
/// keyword near the start of the remainder (UNKNOWN when absent), then the
/// rest as the message. Returns None for lines with no recognizable
/// structure; a skipped line is never fatal to the run.
pub fn parse_line(line: &str) -> Option<LogEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (timestamp, rest) = extract_timestamp(trimmed);
    let (level, message) = extract_level(rest);

    // Without either anchor the line is noise (stack frames, banners, ...).
    if timestamp.is_none() && level == Level::Unknown {
        return None;
    }
    if message.is_empty() {
        return None;
    }

    Some(LogEvent {
        timestamp,
        level,
        message,
        raw_line: line.trim_end().to_string(),
    })
}

fn extract_timestamp(line: &str) -> (Option<DateTime<Utc>>, &str) {
    if let Some(caps) = TS_DATETIME.captures(line) {
        let rest = &line[caps.get(0).unwrap().end()..];
        let parsed = parse_datetime(
            &caps[1],
            &caps[2],
            caps.get(3).map(|m| m.as_str()),
            caps.get(4).map(|m| m.as_str()),
        );
        return (parsed, rest);
    }

    if let Some(caps) = TS_SYSLOG.captures(line) {
        let rest = &line[caps.get(0).unwrap().end()..];
        let parsed = parse_syslog(&caps[1], &caps[2], &caps[3]);
        return (parsed, rest);
    }

    (None, line)
}

fn parse_datetime(
    date: &str,
    time: &str,
    fraction: Option<&str>,
    offset: Option<&str>,
) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
    let mut naive = date.and_time(time);

    if let Some(frac) = fraction {
        let digits: u32 = frac.parse().ok()?;
        let nanos = digits * 10u32.pow(9 - frac.len() as u32);
        naive = date.and_time(time.with_nanosecond(nanos)?);
    }

    let offset_seconds = match offset {
        None | Some("Z") => 0,
        Some(o) => parse_offset_seconds(o)?,
    };

    Some(Utc.from_utc_datetime(&(naive - chrono::Duration::seconds(offset_seconds))))
}

fn parse_offset_seconds(offset: &str) -> Option<i64> {
    let (sign, rest) = match offset.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let rest = rest.replace(':', "");
    if rest.len() != 4 {
        return None;
    }
    let hours: i64 = rest[..2].parse().ok()?;
    let minutes: i64 = rest[2..].parse().ok()?;
    Some(sign * (hours * 3600 + minutes * 60))
}

fn parse_syslog(month: &str, day: &str, time: &str) -> Option<DateTime<Utc>> {
    let month = match month {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    let day: u32 = day.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(Utc::now().year(), month, day)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

fn extract_level(rest: &str) -> (Level, String) {
    if let Some(m) = LEVEL_TOKEN.find(rest)
        && m.start() <= LEVEL_SCAN_WINDOW
        && let Some(level) = Level::parse_token(m.as_str())
    {
        let before = rest[..m.start()]
            .trim_end_matches(['[', '(', '<'])
            .trim();
        let after = rest[m.end()..]
            .trim_start_matches([']', ')', '>', ':', '-'])
            .trim_start();
        let message = if before.is_empty() {
            after.to_string()
        } else if after.is_empty() {
            before.to_string()
        } else {
            format!("{before} {after}")
        };
        return (level, message.trim().to_string());
    }
    (Level::Unknown, rest.trim().to_string())
}
