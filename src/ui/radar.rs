use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::{fill_tint, radar_color};
use crate::data::model::{AthleteRecord, MOBILITY_METRICS};

/// Mobility scores run from 0 to 3.
pub const RADIAL_RANGE: (f64, f64) = (0.0, 3.0);

/// Screen height shared by both dashboard charts.
pub const CHART_HEIGHT: f32 = 380.0;

const RING_SEGMENTS: usize = 96;

// ---------------------------------------------------------------------------
// RadarTrace – chart model
// ---------------------------------------------------------------------------

/// One closed radar polygon: a radius per mobility metric.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarTrace {
    /// Legend label (the athlete identifier).
    pub name: String,
    pub categories: Vec<&'static str>,
    pub radii: Vec<f64>,
    pub radial_range: (f64, f64),
}

impl RadarTrace {
    /// Build the trace from the metric columns of `record`, in radar order.
    pub fn from_record(record: &AthleteRecord) -> Self {
        let radii = MOBILITY_METRICS
            .iter()
            .map(|metric| {
                record.number(metric).unwrap_or_else(|| {
                    log::warn!(
                        "'{}' has no numeric '{metric}' score; plotting 0",
                        record.name
                    );
                    0.0
                })
            })
            .collect();

        Self {
            name: record.name.clone(),
            categories: MOBILITY_METRICS.to_vec(),
            radii,
            radial_range: RADIAL_RANGE,
        }
    }

    /// Unit vector for axis `i`: first axis points up, the rest follow clockwise.
    pub fn axis_direction(&self, i: usize) -> [f64; 2] {
        let angle = FRAC_PI_2 - TAU * i as f64 / self.categories.len() as f64;
        [angle.cos(), angle.sin()]
    }

    /// Polygon corners in plot coordinates, one per category.
    pub fn vertices(&self) -> Vec<[f64; 2]> {
        let (lo, hi) = self.radial_range;
        self.radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let r = r.clamp(lo, hi) - lo;
                let [dx, dy] = self.axis_direction(i);
                [r * dx, r * dy]
            })
            .collect()
    }

    /// Whole-number grid rings inside the radial range.
    pub fn ring_levels(&self) -> Vec<f64> {
        let (lo, hi) = self.radial_range;
        let first = lo.floor() as i64 + 1;
        (first..=hi.ceil() as i64).map(|v| v as f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Radar chart (left column)
// ---------------------------------------------------------------------------

pub fn radar_chart(ui: &mut Ui, trace: &RadarTrace) {
    let color = radar_color();
    let grid = ui.visuals().weak_text_color().gamma_multiply(0.5);
    let (lo, hi) = trace.radial_range;
    let outer = hi - lo;
    // Room around the outer ring for category labels.
    let extent = outer * 1.45;

    Plot::new("mobility_radar")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .include_x(-extent)
        .include_x(extent)
        .include_y(-extent)
        .include_y(extent)
        .show(ui, |plot_ui| {
            for level in trace.ring_levels() {
                let r = level - lo;
                let ring: PlotPoints = (0..=RING_SEGMENTS)
                    .map(|k| {
                        let a = TAU * k as f64 / RING_SEGMENTS as f64;
                        [r * a.cos(), r * a.sin()]
                    })
                    .collect();
                plot_ui.line(Line::new(ring).color(grid).width(1.0));
                plot_ui.text(
                    Text::new(PlotPoint::new(0.05 * outer, r), RichText::new(format!("{level}")).small())
                        .color(grid)
                        .anchor(Align2::LEFT_BOTTOM),
                );
            }

            for (i, category) in trace.categories.iter().enumerate() {
                let [dx, dy] = trace.axis_direction(i);
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[0.0, 0.0], [outer * dx, outer * dy]]))
                        .color(grid)
                        .width(1.0),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(outer * 1.12 * dx, outer * 1.12 * dy),
                        RichText::new(*category).small(),
                    )
                    .anchor(label_anchor(dx, dy)),
                );
            }

            plot_ui.polygon(
                Polygon::new(PlotPoints::from(trace.vertices()))
                    .name(&trace.name)
                    .stroke(Stroke::new(2.0, color))
                    .fill_color(fill_tint(color)),
            );
        });
}

/// Anchor labels away from the centre so they never overlap the rings.
fn label_anchor(dx: f64, dy: f64) -> Align2 {
    const EPS: f64 = 0.2;
    match (dx > EPS, dx < -EPS, dy > EPS, dy < -EPS) {
        (true, _, _, _) => Align2::LEFT_CENTER,
        (_, true, _, _) => Align2::RIGHT_CENTER,
        (_, _, true, _) => Align2::CENTER_BOTTOM,
        (_, _, _, true) => Align2::CENTER_TOP,
        _ => Align2::CENTER_CENTER,
    }
}

/// Shown in place of the radar when the selection cannot be resolved.
pub fn radar_unavailable(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(message).color(Color32::RED));
    });
}
