use std::path::PathBuf;

use crate::data::cache::TableCache;
use crate::data::loader::LoadError;
use crate::data::model::AssessmentTable;
use crate::view::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The assessment file and its memoized contents.
    pub cache: TableCache,

    /// Athlete picked in the side panel (None → first athlete in the file).
    pub selected: Option<String>,
}

impl AppState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            cache: TableCache::new(path),
            selected: None,
        }
    }

    pub fn table(&self) -> Result<&AssessmentTable, &LoadError> {
        self.cache.get()
    }

    /// The athlete being charted: the explicit pick, else the first in file order.
    pub fn selected_name(&self) -> Option<&str> {
        match &self.selected {
            Some(name) => Some(name.as_str()),
            None => self.table().ok()?.rows.first().map(|r| r.name.as_str()),
        }
    }

    pub fn select(&mut self, name: &str) {
        if self.selected_name() != Some(name) {
            log::debug!("Selected athlete '{name}'");
            self.selected = Some(name.to_string());
        }
    }

    /// Everything the central panel draws this frame.
    pub fn view(&self) -> Result<DashboardView, &LoadError> {
        let table = self.table()?;
        let selected = self.selected_name().unwrap_or_default();
        Ok(DashboardView::build(table, selected))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/physical_tests.xlsx")
    }

    #[test]
    fn test_defaults_to_first_athlete() {
        let state = AppState::new(fixture());
        assert_eq!(state.selected_name(), Some("Ana"));
        let view = state.view().unwrap();
        assert_eq!(view.selected, "Ana");
        assert_eq!(view.radar.unwrap().name, "Ana");
    }

    #[test]
    fn test_select_changes_radar_only() {
        let mut state = AppState::new(fixture());
        let before = state.view().unwrap();
        state.select("Carla");
        let after = state.view().unwrap();

        assert_eq!(after.radar.as_ref().unwrap().name, "Carla");
        assert_eq!(before.jumps, after.jumps);
        assert_eq!(after.jumps.athletes, vec!["Ana", "Carla"]);
    }

    #[test]
    fn test_load_error_blocks_view() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().join("physical_tests.xlsx"));
        assert!(state.view().is_err());
        assert_eq!(state.selected_name(), None);
    }

    #[test]
    fn test_missing_column_blocks_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.csv");
        std::fs::write(&path, ",Deep Squat\nAna,2\n").unwrap();
        let state = AppState::new(&path);
        assert!(matches!(state.view(), Err(LoadError::MissingColumn { .. })));
    }

    #[test]
    fn test_file_is_read_once_per_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physical_tests.xlsx");
        std::fs::copy(fixture(), &path).unwrap();

        let mut state = AppState::new(&path);
        assert_eq!(state.view().unwrap().selected, "Ana");

        // Later frames and selection changes keep serving the first read.
        std::fs::remove_file(&path).unwrap();
        state.select("Bia");
        let view = state.view().unwrap();
        assert_eq!(view.selected, "Bia");
        assert_eq!(state.cache.path(), path.as_path());
    }
}
