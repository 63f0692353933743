//! Per-session time series for the exercise progress chart.
//!
//! One row per session that holds at least one valid set for the
//! exercise; sessions with none are omitted entirely (no zero-filled
//! gaps). The chart collaborator consumes rows, tick values, tooltip
//! labels and the summary line; pixel rendering is out of scope here.

use crate::parse::{fmt_num, norm_name, parse_load, parse_reps};
use crate::types::{SeriesMode, Session};

/// One charted session for a given exercise
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesRow {
    pub ts: i64,
    pub date: String,
    /// Max parsed load among matching sets
    pub best: f64,
    /// Mean of parsed loads (reps not required)
    pub avg: f64,
    /// Sum of load x reps over sets where both parse
    pub volume: f64,
}

impl SeriesRow {
    pub fn value(&self, mode: SeriesMode) -> f64 {
        match mode {
            SeriesMode::Best => self.best,
            SeriesMode::Avg => self.avg,
            SeriesMode::Volume => self.volume,
        }
    }
}

/// Build the chronologically ascending series for an exercise.
pub fn build_series(sessions: &[Session], exercise: &str) -> Vec<SeriesRow> {
    let name = norm_name(exercise);
    let mut rows: Vec<SeriesRow> = Vec::new();

    for session in sessions {
        let mut best = 0.0_f64;
        let mut sum = 0.0;
        let mut count = 0u32;
        let mut volume = 0.0;

        for item in &session.items {
            if norm_name(&item.exercise) != name {
                continue;
            }
            for set in &item.sets {
                let Some(kg) = parse_load(&set.kg) else {
                    continue;
                };
                best = best.max(kg);
                sum += kg;
                count += 1;
                // Sets with unparseable reps still count for best/avg
                if let Some(reps) = parse_reps(&set.reps) {
                    volume += kg * reps;
                }
            }
        }

        if count == 0 {
            continue;
        }

        rows.push(SeriesRow {
            ts: session.ts,
            date: session.date.clone(),
            best,
            avg: sum / count as f64,
            volume,
        });
    }

    rows.sort_by_key(|r| r.ts);
    rows
}

/// "Nice" axis tick values over `[min, max]` using the standard
/// 1/2/5/10 x 10^k step selection, aiming for roughly `count` ticks.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || min == max {
        return vec![min, max];
    }

    let span = max - min;
    let step0 = span / (count.saturating_sub(1)).max(1) as f64;
    let pow = 10f64.powf(step0.log10().floor());
    let n = step0 / pow;
    let nice_n = if n <= 1.0 {
        1.0
    } else if n <= 2.0 {
        2.0
    } else if n <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = nice_n * pow;

    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;

    let mut ticks = Vec::new();
    let mut v = start;
    while v <= end + 1e-9 {
        ticks.push(v);
        v += step;
    }
    ticks
}

/// Summary statistics for a plotted series
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSummary {
    pub sessions: usize,
    /// Signed first-vs-last delta
    pub delta: f64,
    pub min: f64,
    pub max: f64,
    pub last: f64,
}

/// Compute the summary for one mode; `None` for an empty series.
pub fn summarize(rows: &[SeriesRow], mode: SeriesMode) -> Option<SeriesSummary> {
    let first = rows.first()?.value(mode);
    let last = rows.last()?.value(mode);

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in rows {
        let v = row.value(mode);
        min = min.min(v);
        max = max.max(v);
    }

    Some(SeriesSummary {
        sessions: rows.len(),
        delta: last - first,
        min,
        max,
        last,
    })
}

/// Format a series value per mode: volume as a whole number, load/avg
/// with one decimal (trailing `.0` trimmed).
pub fn fmt_value(mode: SeriesMode, value: f64) -> String {
    match mode {
        SeriesMode::Volume => format!("{}", value.round() as i64),
        _ => fmt_num(value),
    }
}

/// Tooltip label handed to the chart collaborator
pub fn tooltip_label(row: &SeriesRow, mode: SeriesMode) -> String {
    format!("{} • {}: {}", row.date, mode.label(), fmt_value(mode, row.value(mode)))
}

/// Human summary line, e.g.
/// `"8 sessions • Δ +12.5 • Min 80 • Max 95 • Last 92.5"`
pub fn summary_line(rows: &[SeriesRow], mode: SeriesMode) -> String {
    match summarize(rows, mode) {
        None => "No data for this exercise yet.".to_string(),
        Some(s) => {
            let sign = if s.delta >= 0.0 { "+" } else { "" };
            format!(
                "{} sessions • Δ {}{} • Min {} • Max {} • Last {}",
                s.sessions,
                sign,
                fmt_value(mode, s.delta),
                fmt_value(mode, s.min),
                fmt_value(mode, s.max),
                fmt_value(mode, s.last)
            )
        }
    }
}
