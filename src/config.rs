use std::path::PathBuf;

/// Compile-time settings for the dashboard window and its data source.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    /// Spreadsheet read at start-up, relative to the working directory.
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub side_panel_width: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Physical Tests Analysis".to_string(),
            data_path: PathBuf::from("physical_tests.xlsx"),
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
            side_panel_width: 220.0,
        }
    }
}
