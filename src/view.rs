use crate::data::filter::{SelectError, select_athlete, valid_jump_subset};
use crate::data::model::AssessmentTable;
use crate::data::stats::{EmptyAggregate, JumpKind, JumpStats, format_cm, jump_stats};
use crate::ui::bars::JumpBarChart;
use crate::ui::radar::RadarTrace;

// ---------------------------------------------------------------------------
// DashboardView – everything one frame draws
// ---------------------------------------------------------------------------

/// Derived views for one (table, selected athlete) pair.
///
/// Each part carries its own outcome so a failure in one panel does not
/// blank the others.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selected: String,
    pub radar: Result<RadarTrace, SelectError>,
    pub jumps: JumpBarChart,
    pub stats: Vec<JumpSummary>,
}

/// Statistics block column for one jump type.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpSummary {
    pub kind: JumpKind,
    pub stats: Result<JumpStats, EmptyAggregate>,
}

impl JumpSummary {
    /// `(label, value)` rows as displayed, e.g. `("Average", "27.7 cm")`.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let value = |pick: fn(&JumpStats) -> f64| match &self.stats {
            Ok(stats) => format_cm(pick(stats)),
            Err(e) => e.to_string(),
        };
        vec![
            ("Maximum", value(|s| s.max)),
            ("Minimum", value(|s| s.min)),
            ("Average", value(|s| s.mean)),
        ]
    }
}

impl DashboardView {
    pub fn build(table: &AssessmentTable, selected: &str) -> Self {
        let radar = select_athlete(table, selected).map(|sel| {
            if sel.rows.len() > 1 {
                log::debug!("'{}' matches {} rows; charting the first", sel.name, sel.rows.len());
            }
            RadarTrace::from_record(sel.primary())
        });

        let entries = valid_jump_subset(table);
        let stats = JumpKind::ALL
            .iter()
            .map(|&kind| JumpSummary {
                kind,
                stats: jump_stats(kind, &entries),
            })
            .collect();

        Self {
            selected: selected.to_string(),
            radar,
            jumps: JumpBarChart::from_entries(&entries),
            stats,
        }
    }
}
