use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use super::filter::valid_jump_subset;
use super::loader::{LoadError, load_table};
use super::model::AssessmentTable;

// ---------------------------------------------------------------------------
// TableCache – memoized load of one assessment file
// ---------------------------------------------------------------------------

/// Owns the single in-memory copy of an assessment file.
///
/// The file is read on first access; the outcome (table or error) is kept
/// for the rest of the process.
#[derive(Debug)]
pub struct TableCache {
    path: PathBuf,
    table: OnceCell<Result<AssessmentTable, LoadError>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached table, reading the file if this is the first access.
    pub fn get(&self) -> Result<&AssessmentTable, &LoadError> {
        self.table
            .get_or_init(|| {
                let outcome = load_table(&self.path);
                match &outcome {
                    Ok(table) => log::info!("{}", load_summary(table, &self.path)),
                    Err(e) => log::error!("Failed to load assessment file: {e}"),
                }
                outcome
            })
            .as_ref()
    }
}

/// One-line description of a freshly loaded table.
fn load_summary(table: &AssessmentTable, path: &Path) -> String {
    format!(
        "Loaded {} athletes ({} with valid jumps) with columns {:?} from {}",
        table.len(),
        valid_jump_subset(table).len(),
        table.columns,
        path.display()
    )
}
