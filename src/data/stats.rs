use thiserror::Error;

use super::filter::JumpEntry;

// ---------------------------------------------------------------------------
// Jump kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    CounterMovement,
    Squat,
}

impl JumpKind {
    pub const ALL: [JumpKind; 2] = [JumpKind::CounterMovement, JumpKind::Squat];

    pub fn label(self) -> &'static str {
        match self {
            JumpKind::CounterMovement => "Counter Movement Jump",
            JumpKind::Squat => "Squat Jump",
        }
    }

    pub fn value(self, entry: &JumpEntry) -> f64 {
        match self {
            JumpKind::CounterMovement => entry.cm_jump,
            JumpKind::Squat => entry.squat_jump,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Aggregates over zero values are undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data")]
pub struct EmptyAggregate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
}

pub fn summarize(values: impl IntoIterator<Item = f64>) -> Result<JumpStats, EmptyAggregate> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for v in values {
        count += 1;
        sum += v;
        max = max.max(v);
        min = min.min(v);
    }
    if count == 0 {
        return Err(EmptyAggregate);
    }
    Ok(JumpStats {
        max,
        min,
        mean: sum / count as f64,
    })
}

/// Statistics for one jump type over the valid subset.
pub fn jump_stats(kind: JumpKind, entries: &[JumpEntry]) -> Result<JumpStats, EmptyAggregate> {
    summarize(entries.iter().map(|e| kind.value(e)))
}

/// Round half away from zero to one decimal.
pub fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// `27.65` → `"27.7 cm"`.
pub fn format_cm(v: f64) -> String {
    format!("{:.1} cm", round_tenth(v))
}
