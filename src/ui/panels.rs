use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::{bars, radar};
use crate::data::loader::LoadError;
use crate::data::model::SentinelCode;
use crate::state::AppState;
use crate::view::{DashboardView, JumpSummary};

// ---------------------------------------------------------------------------
// Left side panel – athlete selector
// ---------------------------------------------------------------------------

/// Render the left selector panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Athlete");
    ui.separator();

    let table = match state.table() {
        Ok(table) => table,
        Err(_) => {
            ui.label("No assessment data loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the combo box.
    let names: Vec<String> = table.athlete_names().into_iter().map(String::from).collect();
    let current = state.selected_name().unwrap_or_default().to_string();

    egui::ComboBox::from_id_salt("athlete_selector")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for name in &names {
                    if ui.selectable_label(current == *name, name).clicked() {
                        state.select(name);
                    }
                }
            });
        });

    ui.add_space(8.0);
    ui.weak(format!("{} athletes", names.len()));
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the title, both charts, the statistics block and the legend note.
pub fn dashboard(ui: &mut Ui, title: &str, view: &DashboardView) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(title).size(26.0).strong());
            ui.add_space(8.0);

            ui.columns(2, |cols| {
                cols[0].heading("Mobility & Stability Tests");
                cols[0].weak(format!("Athlete: {}", view.selected));
                match &view.radar {
                    Ok(trace) => radar::radar_chart(&mut cols[0], trace),
                    Err(e) => radar::radar_unavailable(&mut cols[0], &e.to_string()),
                }

                cols[1].heading("Jump Performance");
                bars::jump_chart(&mut cols[1], &view.jumps);
            });

            ui.separator();
            ui.heading("Jump Performance Statistics");
            ui.columns(view.stats.len().max(1), |cols| {
                for (col, summary) in cols.iter_mut().zip(&view.stats) {
                    stats_block(col, summary);
                }
            });

            ui.add_space(12.0);
            legend_note(ui);
        });
}

/// Max / min / average for one jump type.
fn stats_block(ui: &mut Ui, summary: &JumpSummary) {
    ui.strong(summary.kind.label());
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .body(|mut body| {
            for (label, value) in summary.rows() {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(format!("{label}:"));
                    });
                    row.col(|ui| {
                        ui.label(value);
                    });
                });
            }
        });
}

/// Text of the static note explaining the sentinel codes.
pub fn legend_text() -> String {
    let codes: Vec<String> = SentinelCode::ALL
        .iter()
        .map(|c| format!("'{}' ({})", c.code(), c.description()))
        .collect();
    format!("Legend: {}", codes.join(", "))
}

fn legend_note(ui: &mut Ui) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().faint_bg_color)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            let color = ui.visuals().hyperlink_color;
            ui.label(RichText::new(legend_text()).color(color));
        });
}

/// Replaces the whole dashboard when the assessment file cannot be used.
pub fn load_error(ui: &mut Ui, error: &LoadError) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading(RichText::new("Could not load assessment data").color(Color32::RED));
        ui.add_space(8.0);
        ui.label(error.to_string());
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the status line: data file and athlete count, or the load error.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        match state.table() {
            Ok(table) => {
                ui.label(format!(
                    "{}: {} athletes",
                    state.cache.path().display(),
                    table.len()
                ));
            }
            Err(e) => {
                ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_text_names_both_codes() {
        let text = legend_text();
        assert_eq!(text, "Legend: 'L' (injured), 'NP' (did not participate)");
    }
}
