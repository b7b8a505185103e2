use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::charts::{ChartSpec, GaugeSpec};
use crate::config::Theme;
use crate::data::catalog::YearKey;
use crate::data::model::RawDataset;
use crate::ui::gazetteer::Gazetteer;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// RenderSurface – what the controller draws through
// ---------------------------------------------------------------------------

/// Anything that can present one render cycle and report year selections.
pub trait RenderSurface {
    /// Offer `years` for selection; returns a year when the user picks one.
    fn selected_year(&mut self, years: &[YearKey], current: Option<&YearKey>) -> Option<YearKey>;
    fn render_heading(&mut self, text: &str);
    fn render_table(&mut self, dataset: &RawDataset, max_rows: usize);
    fn render_chart(&mut self, chart: &ChartSpec);
    fn render_error(&mut self, message: &str);
    /// `ratio` may fall outside `[0, 1]`; the surface clamps it.
    fn render_progress_bar(&mut self, label: &str, ratio: f64);
    fn render_gauge(&mut self, gauge: &GaugeSpec);
    fn render_no_data(&mut self, title: &str, reason: &str);
}

/// Fill fraction actually drawn for a progress indicator.
pub fn indicator_fill(ratio: f64) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0) as f32
    }
}

// ---------------------------------------------------------------------------
// EguiSurface
// ---------------------------------------------------------------------------

/// Draws into one egui `Ui` for the current frame.
pub struct EguiSurface<'a> {
    pub ui: &'a mut Ui,
    pub theme: &'a Theme,
    pub gazetteer: &'a Gazetteer,
}

impl RenderSurface for EguiSurface<'_> {
    fn selected_year(&mut self, years: &[YearKey], current: Option<&YearKey>) -> Option<YearKey> {
        let mut picked = None;
        let shown = current.map(YearKey::to_string).unwrap_or_else(|| "–".to_string());
        self.ui.label("Select a year:");
        egui::ComboBox::from_id_salt("year_select")
            .selected_text(shown)
            .width(self.ui.available_width())
            .show_ui(self.ui, |ui: &mut Ui| {
                for year in years {
                    if ui
                        .selectable_label(current == Some(year), year.as_str())
                        .clicked()
                    {
                        picked = Some(year.clone());
                    }
                }
            });
        picked
    }

    fn render_heading(&mut self, text: &str) {
        self.ui.add_space(6.0);
        self.ui
            .heading(RichText::new(text).color(Color32::from(self.theme.heading)));
    }

    fn render_table(&mut self, dataset: &RawDataset, max_rows: usize) {
        self.render_heading(&format!("Data for the year {}:", dataset.year));
        if dataset.is_empty() {
            self.ui.label(
                RichText::new("The file has no rows.")
                    .italics()
                    .color(Color32::from(self.theme.muted_text)),
            );
            return;
        }
        let shown = dataset.len().min(max_rows);
        egui::ScrollArea::horizontal()
            .id_salt("preview_table")
            .show(self.ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .columns(Column::auto().at_least(60.0), dataset.columns.len())
                    .header(20.0, |mut header| {
                        for name in &dataset.columns {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|mut body| {
                        for row in dataset.rows.iter().take(shown) {
                            body.row(18.0, |mut table_row| {
                                for cell in row {
                                    table_row.col(|ui: &mut Ui| {
                                        ui.label(cell.to_string());
                                    });
                                }
                            });
                        }
                    });
            });
    }

    fn render_chart(&mut self, chart: &ChartSpec) {
        match chart {
            ChartSpec::GeoHeatmap(spec) => {
                self.render_heading(&spec.title);
                plot::geo_heatmap(self.ui, spec, self.gazetteer, self.theme);
            }
            ChartSpec::CorrelationScatter(spec) => {
                self.render_heading(&spec.title);
                plot::correlation_scatter(self.ui, spec, self.theme);
            }
            ChartSpec::TopRanking(spec) => {
                self.render_heading(&spec.title);
                for entry in &spec.entries {
                    self.render_progress_bar(&entry.label, entry.ratio);
                }
            }
        }
    }

    fn render_error(&mut self, message: &str) {
        egui::Frame::group(self.ui.style())
            .fill(Color32::from(self.theme.error).linear_multiply(0.25))
            .show(self.ui, |ui: &mut Ui| {
                ui.label(RichText::new(message).color(Color32::from(self.theme.text)));
            });
    }

    fn render_progress_bar(&mut self, label: &str, ratio: f64) {
        self.ui.label(label);
        self.ui.add(
            egui::ProgressBar::new(indicator_fill(ratio))
                .fill(Color32::from(self.theme.accent)),
        );
    }

    fn render_gauge(&mut self, gauge: &GaugeSpec) {
        plot::gauge(self.ui, gauge, self.theme);
    }

    fn render_no_data(&mut self, title: &str, reason: &str) {
        self.render_heading(title);
        self.ui.label(
            RichText::new(format!("No data: {reason}"))
                .italics()
                .color(Color32::from(self.theme.muted_text)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fill_is_clamped() {
        assert_eq!(indicator_fill(0.75), 0.75);
        assert_eq!(indicator_fill(1.25), 1.0);
        assert_eq!(indicator_fill(-0.5), 0.0);
        assert_eq!(indicator_fill(f64::NAN), 0.0);
    }
}
