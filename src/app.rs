use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::{DashboardConfig, Theme};
use crate::state::{present_chart, present_gauge, CycleOutcome, DashboardController, DashboardPhase};
use crate::ui::gazetteer::Gazetteer;
use crate::ui::panels;
use crate::ui::surface::{EguiSurface, RenderSurface};

const INTRO: &str = "Welcome to the World Happiness Dashboard. This dashboard provides insights \
                     into global happiness rankings based on various factors.";
const DATA_SOURCE_URL: &str = "https://www.kaggle.com/datasets/unsdsn/world-happiness/data";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HappinessDashboardApp {
    pub controller: DashboardController,
    theme: Theme,
    gazetteer: Gazetteer,
    /// Result of the last menu action, shown in the top bar.
    status: Option<String>,
}

impl HappinessDashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let theme = config.theme.clone();
        let mut controller = DashboardController::new(config);

        // The selector starts on the earliest year.
        let first = controller.years().ok().and_then(|years| years.first()).cloned();
        if let Some(year) = first {
            controller.select_year(year);
        }

        Self {
            controller,
            theme,
            gazetteer: Gazetteer::default(),
            status: None,
        }
    }

    fn surface<'a>(&'a self, ui: &'a mut Ui) -> EguiSurface<'a> {
        EguiSurface {
            ui,
            theme: &self.theme,
            gazetteer: &self.gazetteer,
        }
    }

    /// Lay out the current cycle: map and ranking side by side, the scatter
    /// below, then a row of gauges.
    fn dashboard(&self, ui: &mut Ui) {
        let DashboardPhase::Rendered(cycle) = self.controller.phase() else {
            ui.label("Select a year in the side panel.");
            return;
        };
        let CycleOutcome::Charts { preview, specs } = &cycle.outcome else {
            self.controller.present(&mut self.surface(ui));
            return;
        };

        self.surface(ui)
            .render_table(preview, self.controller.config().preview_rows);
        ui.add_space(12.0);

        let (row, rest) = specs.charts.split_at(specs.charts.len().min(2));
        ui.columns(row.len().max(1), |cols: &mut [Ui]| {
            for (col, chart) in cols.iter_mut().zip(row) {
                present_chart(&mut self.surface(col), chart);
            }
        });
        for chart in rest {
            ui.add_space(12.0);
            present_chart(&mut self.surface(ui), chart);
        }

        ui.add_space(12.0);
        ui.columns(specs.gauges.len().max(1), |cols: &mut [Ui]| {
            for (col, gauge) in cols.iter_mut().zip(&specs.gauges) {
                present_gauge(&mut self.surface(col), gauge);
            }
        });
    }
}

impl eframe::App for HappinessDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.controller, &mut self.status);
        });

        // ---- Left side panel: year selector ----
        egui::SidePanel::left("year_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.controller, &self.theme, &self.gazetteer);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.label(RichText::new(INTRO).size(16.0));
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label(
                            RichText::new("Data source:").color(Color32::from(self.theme.muted_text)),
                        );
                        ui.hyperlink_to("World Happiness Report Dataset", DATA_SOURCE_URL);
                    });
                    ui.separator();
                    self.dashboard(ui);
                });
        });
    }
}
