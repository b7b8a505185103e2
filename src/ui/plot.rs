use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::charts::{GaugeSpec, GeoDatum, GeoHeatmapSpec, ScatterSpec};
use crate::config::Theme;
use crate::ui::gazetteer::Gazetteer;

// ---------------------------------------------------------------------------
// Choropleth (central column)
// ---------------------------------------------------------------------------

/// Hover text for one country, mirroring the map's auxiliary fields.
fn geo_hover(d: &GeoDatum) -> String {
    fn num(v: Option<f64>) -> String {
        v.map(|v| format!("{v}")).unwrap_or_else(|| "–".to_string())
    }
    format!(
        "{}\nRegion: {}\nHappiness Rank: {}\nHappiness Score: {}\nGDP per capita: {}\n\
         Social support: {}\nHealthy life expectancy: {}\nGenerosity: {}\nDystopia Residual: {}",
        d.country,
        d.region.as_deref().unwrap_or("–"),
        d.happiness_rank.map(|r| r.to_string()).unwrap_or_else(|| "–".to_string()),
        num(d.happiness_score),
        num(d.gdp_per_capita),
        num(d.social_support),
        num(d.healthy_life_expectancy),
        num(d.generosity),
        num(d.dystopia_residual),
    )
}

/// Render the heatmap: every country the gazetteer knows is a filled disc
/// at its centroid; the rest are listed underneath.
pub fn geo_heatmap(ui: &mut Ui, spec: &GeoHeatmapSpec, gazetteer: &Gazetteer, theme: &Theme) {
    let join = gazetteer.join(spec);
    let hover: HashMap<String, String> = join
        .matched
        .iter()
        .map(|(d, _)| (d.country.clone(), geo_hover(d)))
        .collect();

    Plot::new("geo_heatmap")
        .height(360.0)
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-60.0)
        .include_y(80.0)
        .show_grid(false)
        .allow_scroll(false)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(move |name: &str, _: &PlotPoint| hover.get(name).cloned().unwrap_or_default())
        .show(ui, |plot_ui| {
            for (datum, centroid) in &join.matched {
                let points: PlotPoints = vec![[centroid.lon, centroid.lat]].into();
                let marker = Points::new(points)
                    .name(&datum.country)
                    .shape(MarkerShape::Circle)
                    .radius(6.0);
                // Countries without a score stay hollow.
                let marker = match datum.fill {
                    Some(fill) => marker.color(Color32::from(fill)).filled(true),
                    None => marker.color(Color32::from(theme.muted_text)).filled(false),
                };
                plot_ui.points(marker);
            }
        });

    color_bar(ui, spec, theme);

    if !join.unmatched.is_empty() {
        ui.label(
            RichText::new(format!("Not on map: {}", join.unmatched.join(", ")))
                .small()
                .color(Color32::from(theme.muted_text)),
        );
    }
}

/// Horizontal legend for the sequential colour scale.
fn color_bar(ui: &mut Ui, spec: &GeoHeatmapSpec, theme: &Theme) {
    let [lo, hi] = spec.color_domain;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{} {lo:.2}", spec.color_metric.header()));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, 12.0), Sense::hover());
        let steps = 32;
        let width = rect.width() / steps as f32;
        for i in 0..steps {
            let t = i as f64 / (steps - 1) as f64;
            let x = rect.left() + i as f32 * width;
            let cell = egui::Rect::from_min_size(egui::pos2(x, rect.top()), egui::vec2(width + 0.5, rect.height()));
            ui.painter()
                .rect_filled(cell, 0.0, Color32::from(spec.color_scale.sample(t)));
        }
        ui.label(RichText::new(format!("{hi:.2}")).color(Color32::from(theme.text)));
    });
}

// ---------------------------------------------------------------------------
// Correlation scatter
// ---------------------------------------------------------------------------

/// Marker radius for a `size` value on the score scale.
fn marker_radius(size: f64) -> f32 {
    2.0 + 1.2 * size.max(0.0) as f32
}

pub fn correlation_scatter(ui: &mut Ui, spec: &ScatterSpec, theme: &Theme) {
    let colors: HashMap<&str, Color32> = spec
        .groups
        .iter()
        .flatten()
        .map(|g| (g.name.as_str(), Color32::from(g.color)))
        .collect();
    let ungrouped = Color32::from(theme.accent);

    let lookup: Vec<(f64, f64, String)> = spec
        .points
        .iter()
        .map(|p| (p.x, p.y, p.country.clone()))
        .collect();

    Plot::new("correlation_scatter")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .label_formatter(move |name: &str, value: &PlotPoint| {
            let nearest = lookup
                .iter()
                .find(|(x, y, _)| *x == value.x && *y == value.y)
                .map(|(_, _, country)| country.as_str());
            match nearest {
                Some(country) if name.is_empty() => format!("{country}\nx = {:.2}\ny = {:.3}", value.x, value.y),
                Some(country) => format!("{country} ({name})\nx = {:.2}\ny = {:.3}", value.x, value.y),
                None => format!("x = {:.2}\ny = {:.3}", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            for point in &spec.points {
                let (name, color) = match &point.group {
                    Some(group) => (
                        group.as_str(),
                        colors.get(group.as_str()).copied().unwrap_or(ungrouped),
                    ),
                    None => ("", ungrouped),
                };
                let points: PlotPoints = vec![[point.x, point.y]].into();
                plot_ui.points(
                    Points::new(points)
                        .name(name)
                        .color(color)
                        .filled(true)
                        .shape(MarkerShape::Circle)
                        .radius(marker_radius(point.size)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Gauge
// ---------------------------------------------------------------------------

/// Position of `value` along the gauge axis, clamped to `[0, 1]`.
pub fn gauge_fraction(value: f64, axis: [f64; 2]) -> f32 {
    let span = axis[1] - axis[0];
    if span <= 0.0 || value.is_nan() {
        return 0.0;
    }
    ((value - axis[0]) / span).clamp(0.0, 1.0) as f32
}

/// Points along the upper half circle between two axis fractions.
fn arc(center: Pos2, radius: f32, from: f32, to: f32) -> Vec<Pos2> {
    let segments = ((to - from) * 48.0).ceil().max(1.0) as usize;
    (0..=segments)
        .map(|i| {
            let t = from + (to - from) * i as f32 / segments as f32;
            let angle = PI * (1.0 - t);
            Pos2::new(
                center.x + radius * angle.cos(),
                center.y - radius * angle.sin(),
            )
        })
        .collect()
}

/// Paint a semicircular gauge with severity bands and the value bar.
pub fn gauge(ui: &mut Ui, spec: &GaugeSpec, theme: &Theme) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&spec.title).strong().color(Color32::from(theme.heading)));

        let width = ui.available_width().clamp(120.0, 320.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, width * 0.62), Sense::hover());
        let painter = ui.painter_at(rect);
        let radius = width * 0.42;
        let center = Pos2::new(rect.center().x, rect.top() + radius + 8.0);
        let band_width = radius * 0.22;

        for band in &spec.bands {
            let from = gauge_fraction(band.from, spec.axis);
            let to = gauge_fraction(band.to, spec.axis);
            painter.add(Shape::line(
                arc(center, radius, from, to),
                Stroke::new(band_width, Color32::from(band.color)),
            ));
        }

        let fill = gauge_fraction(spec.value, spec.axis);
        if fill > 0.0 {
            painter.add(Shape::line(
                arc(center, radius, 0.0, fill),
                Stroke::new(band_width * 0.45, Color32::from(spec.bar_color)),
            ));
        }

        let text = Color32::from(theme.text);
        painter.text(
            center - egui::vec2(0.0, radius * 0.25),
            Align2::CENTER_CENTER,
            format_gauge_value(spec.value),
            FontId::proportional(22.0),
            text,
        );
        painter.text(
            Pos2::new(center.x - radius, center.y + 10.0),
            Align2::CENTER_CENTER,
            format_gauge_value(spec.axis[0]),
            FontId::proportional(11.0),
            text,
        );
        painter.text(
            Pos2::new(center.x + radius, center.y + 10.0),
            Align2::CENTER_CENTER,
            format_gauge_value(spec.axis[1]),
            FontId::proportional(11.0),
            text,
        );
    });
}

/// Display rounding; the gauge value itself keeps full precision.
fn format_gauge_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else if v.abs() >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_clamps_to_axis() {
        assert_eq!(gauge_fraction(5.0, [0.0, 10.0]), 0.5);
        assert_eq!(gauge_fraction(12.0, [0.0, 10.0]), 1.0);
        assert_eq!(gauge_fraction(-1.0, [0.0, 10.0]), 0.0);
        assert_eq!(gauge_fraction(3.0, [0.0, 0.0]), 0.0);
    }

    #[test]
    fn arc_spans_half_circle() {
        let pts = arc(Pos2::ZERO, 10.0, 0.0, 1.0);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!((first.x + 10.0).abs() < 1e-4 && first.y.abs() < 1e-4);
        assert!((last.x - 10.0).abs() < 1e-4 && last.y.abs() < 1e-3);
    }

    #[test]
    fn gauge_value_formatting() {
        assert_eq!(format_gauge_value(21666.666), "21667");
        assert_eq!(format_gauge_value(54.21), "54.2");
        assert_eq!(format_gauge_value(5.3754), "5.375");
    }
}
