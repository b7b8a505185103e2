/// Chart layer: declarative, renderer-agnostic chart descriptions.
///
/// ```text
///   HappinessDataset + Aggregates
///        │
///        ▼
///   ┌──────────────────┐
///   │ ChartSpecBuilder │  one independent Panel per visual
///   └──────────────────┘
///        │
///        ▼
///   DashboardSpecs ──► RenderSurface (egui, JSON export, tests)
/// ```
pub mod builder;

use serde::Serialize;

use crate::color::{ColorScale, HexColor};
use crate::data::catalog::YearKey;
use crate::data::model::Metric;

pub use builder::ChartSpecBuilder;

// ---------------------------------------------------------------------------
// Panel – a chart that is either ready or explicitly has no data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "spec", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    NoData { title: String, reason: String },
}

impl<T> Panel<T> {
    #[cfg(test)]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(spec) => Some(spec),
            Panel::NoData { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }
}

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    GeoHeatmap(GeoHeatmapSpec),
    TopRanking(TopRankingSpec),
    CorrelationScatter(ScatterSpec),
}

/// Choropleth keyed by country name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoHeatmapSpec {
    pub title: String,
    /// How `country` is matched against the map: by exact country name.
    pub location_mode: &'static str,
    pub color_metric: Metric,
    pub color_scale: ColorScale,
    /// Score range the colour scale is stretched over.
    pub color_domain: [f64; 2],
    pub data: Vec<GeoDatum>,
}

/// One country on the map plus the fields shown on hover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoDatum {
    pub country: String,
    /// `None` when the row has no score; such countries are drawn unfilled.
    pub fill: Option<HexColor>,
    pub happiness_score: Option<f64>,
    pub happiness_rank: Option<u32>,
    pub region: Option<String>,
    pub gdp_per_capita: Option<f64>,
    pub social_support: Option<f64>,
    pub healthy_life_expectancy: Option<f64>,
    pub generosity: Option<f64>,
    pub dystopia_residual: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRankingSpec {
    pub title: String,
    pub entries: Vec<ProgressDatum>,
}

/// A progress indicator for one ranked country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressDatum {
    pub country: String,
    pub score: f64,
    /// `score / 10`, not clamped; the surface clamps when drawing.
    pub ratio: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterDatum>,
    /// Colour per region; `None` when the scatter is ungrouped.
    pub groups: Option<Vec<SeriesGroup>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterDatum {
    pub country: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesGroup {
    pub name: String,
    pub color: HexColor,
}

// ---------------------------------------------------------------------------
// Gauges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSpec {
    pub title: String,
    pub value: f64,
    pub axis: [f64; 2],
    pub bar_color: HexColor,
    pub bands: Vec<GaugeBand>,
}

/// A severity band, half-open except for the last one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: HexColor,
}

// ---------------------------------------------------------------------------
// DashboardSpecs – everything one render cycle draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSpecs {
    pub year: YearKey,
    pub charts: Vec<Panel<ChartSpec>>,
    pub gauges: Vec<Panel<GaugeSpec>>,
}

impl DashboardSpecs {
    /// Panels that could not be drawn, as `(title, reason)`.
    pub fn no_data(&self) -> Vec<(&str, &str)> {
        let charts = self.charts.iter().filter_map(no_data_entry);
        let gauges = self.gauges.iter().filter_map(no_data_entry);
        charts.chain(gauges).collect()
    }
}

#[cfg(test)]
impl DashboardSpecs {
    fn find<T>(&self, pick: impl Fn(&ChartSpec) -> Option<&T>) -> Option<&T> {
        self.charts.iter().filter_map(Panel::ready).find_map(pick)
    }

    pub fn geo_heatmap(&self) -> Option<&GeoHeatmapSpec> {
        self.find(|c| match c {
            ChartSpec::GeoHeatmap(spec) => Some(spec),
            _ => None,
        })
    }

    pub fn top_ranking(&self) -> Option<&TopRankingSpec> {
        self.find(|c| match c {
            ChartSpec::TopRanking(spec) => Some(spec),
            _ => None,
        })
    }

    pub fn correlation_scatter(&self) -> Option<&ScatterSpec> {
        self.find(|c| match c {
            ChartSpec::CorrelationScatter(spec) => Some(spec),
            _ => None,
        })
    }
}

fn no_data_entry<T>(panel: &Panel<T>) -> Option<(&str, &str)> {
    match panel {
        Panel::NoData { title, reason } => Some((title.as_str(), reason.as_str())),
        Panel::Ready(_) => None,
    }
}
