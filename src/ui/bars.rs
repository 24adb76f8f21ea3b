use std::f32::consts::FRAC_PI_4;

use eframe::egui::{self, FontId, Sense, Ui, epaint::TextShape, vec2};
use egui_plot::{Bar, BarChart, Corner, Legend, Plot, PlotPoint, PlotTransform};

use super::radar::CHART_HEIGHT;
use crate::color::jump_color;
use crate::data::filter::JumpEntry;
use crate::data::stats::JumpKind;

/// Width of a single bar; two of them fill 0.8 of a category slot.
pub const BAR_WIDTH: f64 = 0.4;

/// Athlete labels under the bars are tilted by 45°.
const LABEL_ANGLE: f32 = -FRAC_PI_4;

// ---------------------------------------------------------------------------
// JumpBarChart – chart model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct JumpSeries {
    pub kind: JumpKind,
    /// One height per athlete, aligned with [`JumpBarChart::athletes`].
    pub values: Vec<f64>,
}

/// Grouped bars: one slot per athlete, one bar per jump type.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpBarChart {
    pub athletes: Vec<String>,
    pub series: Vec<JumpSeries>,
}

impl JumpBarChart {
    pub fn from_entries(entries: &[JumpEntry]) -> Self {
        Self {
            athletes: entries.iter().map(|e| e.name.clone()).collect(),
            series: JumpKind::ALL
                .iter()
                .map(|&kind| JumpSeries {
                    kind,
                    values: entries.iter().map(|e| kind.value(e)).collect(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    /// Centre of the bar for `series` in the slot of athlete `athlete`.
    /// Series sit side by side, centred on the athlete's integer position.
    pub fn bar_position(&self, series: usize, athlete: usize) -> f64 {
        let n = self.series.len() as f64;
        athlete as f64 + (series as f64 - (n - 1.0) / 2.0) * BAR_WIDTH
    }
}

// ---------------------------------------------------------------------------
// Jump chart (right column)
// ---------------------------------------------------------------------------

pub fn jump_chart(ui: &mut Ui, chart: &JumpBarChart) {
    if chart.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No valid jump data");
        });
        return;
    }

    ui.weak("Jump Type");

    let last = chart.athletes.len() as f64 - 1.0;
    let response = Plot::new("jump_bars")
        .legend(Legend::default().position(Corner::RightTop))
        .height(CHART_HEIGHT)
        .show_axes([false, true])
        .y_axis_label("Height (cm)")
        .include_x(-0.6)
        .include_x(last + 0.6)
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (s, series) in chart.series.iter().enumerate() {
                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &height)| {
                        Bar::new(chart.bar_position(s, i), height)
                            .width(BAR_WIDTH)
                            .name(&chart.athletes[i])
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(series.kind.label())
                        .color(jump_color(series.kind)),
                );
            }
        });

    category_labels(ui, &response.transform, &chart.athletes);
}

/// Paint tilted athlete names under their bar groups.
fn category_labels(ui: &mut Ui, transform: &PlotTransform, names: &[String]) {
    let font = FontId::proportional(12.0);
    let color = ui.visuals().text_color();
    let galleys: Vec<_> = names
        .iter()
        .map(|n| ui.painter().layout_no_wrap(n.clone(), font.clone(), color))
        .collect();

    let (cos, sin) = (LABEL_ANGLE.cos(), LABEL_ANGLE.sin());
    let longest = galleys.iter().map(|g| g.size().x).fold(0.0, f32::max);
    let line_height = galleys.first().map_or(0.0, |g| g.size().y);
    let band = longest * sin.abs() + line_height + 8.0;
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), band), Sense::hover());

    let painter = ui.painter();
    for (i, galley) in galleys.into_iter().enumerate() {
        let tick = transform.position_from_point(&PlotPoint::new(i as f64, 0.0));
        // The end of the rotated text meets the tick mark.
        let w = galley.size().x;
        let pos = egui::pos2(tick.x - w * cos, rect.top() + 4.0 - w * sin);
        painter.add(TextShape::new(pos, galley, color).with_angle(LABEL_ANGLE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, cm_jump: f64, squat_jump: f64) -> JumpEntry {
        JumpEntry {
            name: name.into(),
            cm_jump,
            squat_jump,
        }
    }

    #[test]
    fn test_two_series_aligned_with_athletes() {
        let chart = JumpBarChart::from_entries(&[entry("A", 25.3, 24.1), entry("C", 30.0, 28.5)]);
        assert_eq!(chart.athletes, vec!["A", "C"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].kind, JumpKind::CounterMovement);
        assert_eq!(chart.series[0].values, vec![25.3, 30.0]);
        assert_eq!(chart.series[1].kind, JumpKind::Squat);
        assert_eq!(chart.series[1].values, vec![24.1, 28.5]);
    }

    #[test]
    fn test_bars_are_grouped_side_by_side() {
        let chart = JumpBarChart::from_entries(&[entry("A", 1.0, 1.0), entry("B", 1.0, 1.0)]);
        let left = chart.bar_position(0, 1);
        let right = chart.bar_position(1, 1);
        assert!((left - 0.8).abs() < 1e-9);
        assert!((right - 1.2).abs() < 1e-9);
        // Adjacent, not overlapping, and centred on the athlete slot.
        assert!((right - left - BAR_WIDTH).abs() < 1e-9);
        assert!(((left + right) / 2.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_chart() {
        assert!(JumpBarChart::from_entries(&[]).is_empty());
    }
}
