use eframe::egui::{self, Color32, Stroke, Visuals};

use crate::config::Theme;

/// Apply the dashboard theme to the egui context. Called once at startup.
pub fn apply(ctx: &egui::Context, theme: &Theme) {
    ctx.set_visuals(visuals(theme));
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}

fn visuals(theme: &Theme) -> Visuals {
    let canvas = Color32::from(theme.canvas);
    let background = Color32::from(theme.background);
    let panel = Color32::from(theme.panel);
    let text = Color32::from(theme.text);
    let accent = Color32::from(theme.accent);

    let mut visuals = Visuals::dark();

    visuals.panel_fill = background;
    visuals.window_fill = panel;
    visuals.extreme_bg_color = canvas;
    visuals.faint_bg_color = panel;
    visuals.override_text_color = Some(text);

    visuals.widgets.noninteractive.bg_fill = panel;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text);
    visuals.widgets.inactive.bg_fill = panel;
    visuals.widgets.inactive.weak_bg_fill = panel;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    visuals.selection.bg_fill = accent.linear_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;
    visuals.error_fg_color = Color32::from(theme.error);

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visuals_follow_theme() {
        let theme = Theme::default();
        let v = visuals(&theme);
        assert!(v.dark_mode);
        assert_eq!(v.panel_fill, Color32::from_rgb(0x2e, 0x3b, 0x4e));
        assert_eq!(v.extreme_bg_color, Color32::from_rgb(0x0e, 0x11, 0x17));
        assert_eq!(v.hyperlink_color, Color32::from_rgb(0x1a, 0xbc, 0x9c));
        assert_eq!(v.override_text_color, Some(Color32::from_rgb(0xf0, 0xf0, 0xf0)));
    }
}
