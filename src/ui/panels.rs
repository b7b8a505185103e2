use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::charts::DashboardSpecs;
use crate::config::Theme;
use crate::state::DashboardController;
use crate::ui::gazetteer::Gazetteer;
use crate::ui::surface::EguiSurface;

pub const DASHBOARD_TITLE: &str = "🌍 World Happiness Dashboard";

// ---------------------------------------------------------------------------
// Left side panel – year selector
// ---------------------------------------------------------------------------

/// Render the side panel: title, year selector and the active data folder.
pub fn side_panel(
    ui: &mut Ui,
    controller: &mut DashboardController,
    theme: &Theme,
    gazetteer: &Gazetteer,
) {
    ui.add_space(4.0);
    ui.heading(RichText::new(DASHBOARD_TITLE).color(Color32::from(theme.heading)));
    ui.separator();

    let mut surface = EguiSurface {
        ui: &mut *ui,
        theme,
        gazetteer,
    };
    controller.poll_selection(&mut surface);

    ui.add_space(8.0);
    ui.label(
        RichText::new(format!(
            "Data folder: {}",
            controller.config().data_dir.display()
        ))
        .small()
        .color(Color32::from(theme.muted_text)),
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, controller: &mut DashboardController, status: &mut Option<String>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(controller);
                *status = None;
                ui.close_menu();
            }
            let specs = controller.current_specs();
            if ui
                .add_enabled(specs.is_some(), egui::Button::new("Export chart specs…"))
                .clicked()
            {
                if let Some(specs) = specs {
                    *status = export_dialog(specs);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(year) = controller.selected_year() {
            ui.label(format!("Showing {year}"));
        }

        if let Some(msg) = status.as_deref() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::LIGHT_YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(controller: &mut DashboardController) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder with cleaned_<year> files")
        .set_directory(&controller.config().data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        controller.set_data_dir(dir);
    }
}

/// Ask for a destination and write the specs; returns the status line.
fn export_dialog(specs: &DashboardSpecs) -> Option<String> {
    let path = rfd::FileDialog::new()
        .set_title("Export chart specs")
        .add_filter("JSON", &["json"])
        .set_file_name(format!("happiness_{}.json", specs.year))
        .save_file()?;

    match export_specs(specs, &path) {
        Ok(()) => {
            log::info!("Exported chart specs to {}", path.display());
            Some(format!("Exported to {}", path.display()))
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    }
}

/// Write the specs of one render cycle as pretty JSON.
pub fn export_specs(specs: &DashboardSpecs, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(specs).context("serializing chart specs")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
