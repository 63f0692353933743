//! Tolerant parsing of free-text weight/rep/rest input.
//!
//! Set entries keep whatever the user typed; every consumer goes
//! through these helpers and treats an unparseable value as "no data"
//! rather than an error.

/// Rest duration used when nothing valid can be derived from the input
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// Normalized exercise identity: case-insensitive, whitespace-trimmed
pub fn norm_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a decimal accepting either `.` or `,` as separator
fn to_num(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Parse a load in kg. Zero or negative loads are never valid.
pub fn parse_load(text: &str) -> Option<f64> {
    to_num(text).filter(|n| *n > 0.0)
}

/// Parse a rep count. Zero is accepted (a failed attempt), negative is
/// not. A blank field coerces to zero; only garbage like `"x"` is
/// treated as unparseable.
pub fn parse_reps(text: &str) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    to_num(s).filter(|n| *n >= 0.0)
}

/// Parse a rest specification into whole seconds.
///
/// `"1:30"` is read as mm:ss; anything else is stripped to its digits
/// and read as plain seconds. Zero or unparseable input falls back to
/// [`DEFAULT_REST_SECONDS`]. Note that an explicit `"0:00"` is honored:
/// the mm:ss form is taken at face value.
pub fn parse_rest_seconds(text: &str) -> u32 {
    let s = text.trim();
    if s.is_empty() {
        return DEFAULT_REST_SECONDS;
    }

    if let Some((m, sec)) = s.split_once(':') {
        if let (Some(mm), Some(ss)) = (to_num(m), to_num(sec)) {
            let total = mm * 60.0 + ss;
            return total.max(0.0).floor() as u32;
        }
    }

    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_REST_SECONDS,
    }
}

/// Render whole seconds as zero-padded `MM:SS` (minutes unbounded)
pub fn fmt_mmss(seconds: i64) -> String {
    let secs = seconds.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render a value with one decimal, trimming a trailing `.0`
/// (100.0 -> "100", 102.5 -> "102.5")
pub fn fmt_num(value: f64) -> String {
    let s = format!("{:.1}", value);
    s.strip_suffix(".0").map(str::to_owned).unwrap_or(s)
}

/// Shorten an ISO `YYYY-MM-DD` date to `DD/MM` for axis labels
pub fn short_date(date: &str) -> String {
    if date.len() >= 10 {
        format!("{}/{}", &date[8..10], &date[5..7])
    } else {
        date.to_string()
    }
}
