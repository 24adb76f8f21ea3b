use thiserror::Error;

use super::model::{AssessmentTable, AthleteRecord, CM_JUMP_COLUMN, SQUAT_JUMP_COLUMN};

// ---------------------------------------------------------------------------
// Athlete selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("athlete '{0}' is not in the assessment table")]
pub struct SelectError(pub String);

/// Every row carrying the selected identifier, in file order (never empty).
#[derive(Debug, Clone)]
pub struct AthleteSelection<'a> {
    pub name: &'a str,
    pub rows: Vec<&'a AthleteRecord>,
}

impl<'a> AthleteSelection<'a> {
    /// First matching row; this is the one that gets charted.
    pub fn primary(&self) -> &'a AthleteRecord {
        self.rows[0]
    }
}

/// Rows whose identifier equals `name` exactly.
pub fn select_athlete<'a>(
    table: &'a AssessmentTable,
    name: &str,
) -> Result<AthleteSelection<'a>, SelectError> {
    let rows: Vec<&'a AthleteRecord> = table.rows.iter().filter(|r| r.name == name).collect();
    let first: &'a AthleteRecord = match rows.first() {
        Some(&first) => first,
        None => return Err(SelectError(name.to_string())),
    };
    Ok(AthleteSelection {
        name: first.name.as_str(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// Valid jump subset
// ---------------------------------------------------------------------------

/// An athlete with numeric values in both jump columns.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpEntry {
    pub name: String,
    pub cm_jump: f64,
    pub squat_jump: f64,
}

/// Rows where both jump heights are numeric, in table order.
///
/// Sentinel codes, free text and blank cells all exclude the row.
pub fn valid_jump_subset(table: &AssessmentTable) -> Vec<JumpEntry> {
    table
        .rows
        .iter()
        .filter_map(|r| {
            Some(JumpEntry {
                name: r.name.clone(),
                cm_jump: r.number(CM_JUMP_COLUMN)?,
                squat_jump: r.number(SQUAT_JUMP_COLUMN)?,
            })
        })
        .collect()
}
