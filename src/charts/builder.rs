use super::{
    ChartSpec, DashboardSpecs, GaugeBand, GaugeSpec, GeoDatum, GeoHeatmapSpec, Panel,
    ProgressDatum, ScatterDatum, ScatterSpec, SeriesGroup, TopRankingSpec,
};
use crate::color::{self, generate_palette, ColorScale, HexColor};
use crate::data::aggregate::Aggregates;
use crate::data::model::{HappinessDataset, Metric};
use crate::error::DashboardError;

/// Scores are reported out of ten.
const SCORE_SCALE: f64 = 10.0;

const HAPPINESS_BANDS: [(f64, f64, HexColor); 3] = [
    (0.0, 3.0, color::BAND_LOW),
    (3.0, 6.0, color::BAND_MEDIUM),
    (6.0, 10.0, color::BAND_HIGH),
];

const GDP_BANDS: [(f64, f64, HexColor); 3] = [
    (0.0, 10_000.0, color::BAND_LOW),
    (10_000.0, 30_000.0, color::BAND_MEDIUM),
    (30_000.0, f64::INFINITY, color::BAND_HIGH),
];

const SOCIAL_SUPPORT_BANDS: [(f64, f64, HexColor); 3] = [
    (0.0, 0.3, color::BAND_LOW),
    (0.3, 0.6, color::BAND_MEDIUM),
    (0.6, 1.0, color::BAND_HIGH),
];

/// Turns a validated dataset and its aggregates into chart specifications.
///
/// Every visual is built on its own: a column with no usable values only
/// turns the visuals that read it into [`Panel::NoData`].
pub struct ChartSpecBuilder<'a> {
    dataset: &'a HappinessDataset,
    aggregates: &'a Aggregates,
}

impl<'a> ChartSpecBuilder<'a> {
    pub fn new(dataset: &'a HappinessDataset, aggregates: &'a Aggregates) -> Self {
        Self {
            dataset,
            aggregates,
        }
    }

    pub fn build(&self) -> DashboardSpecs {
        if self.dataset.is_empty() {
            log::warn!("{}: partition has no rows", self.dataset.year);
        }
        let specs = DashboardSpecs {
            year: self.dataset.year.clone(),
            charts: vec![
                self.geo_heatmap(),
                self.top_ranking(),
                self.correlation_scatter(),
            ],
            gauges: self.gauges(),
        };
        for (title, reason) in specs.no_data() {
            log::warn!("{}: skipping '{title}': {reason}", self.dataset.year);
        }
        specs
    }

    // -- Map -----------------------------------------------------------------

    pub fn geo_heatmap(&self) -> Panel<ChartSpec> {
        let title = format!("World Happiness Heatmap for {}", self.dataset.year);
        let (lo, hi) = match &self.aggregates.happiness_range {
            Ok(range) => *range,
            Err(e) => return no_data(title, e),
        };
        let scale = ColorScale::Plasma;

        let data = self
            .dataset
            .records()
            .map(|rec| GeoDatum {
                country: rec.country.to_string(),
                fill: rec.happiness_score.map(|s| scale.color_for(s, lo, hi)),
                happiness_score: rec.happiness_score,
                happiness_rank: rec.happiness_rank,
                region: rec.region.map(str::to_string),
                gdp_per_capita: rec.gdp_per_capita,
                social_support: rec.social_support,
                healthy_life_expectancy: rec.healthy_life_expectancy,
                generosity: rec.generosity,
                dystopia_residual: rec.dystopia_residual,
            })
            .collect();

        Panel::Ready(ChartSpec::GeoHeatmap(GeoHeatmapSpec {
            title,
            location_mode: "country names",
            color_metric: Metric::HappinessScore,
            color_scale: scale,
            color_domain: [lo, hi],
            data,
        }))
    }

    // -- Ranking -------------------------------------------------------------

    pub fn top_ranking(&self) -> Panel<ChartSpec> {
        let title = format!("Happiest Countries in {}", self.dataset.year);
        if self.aggregates.top_happiness.is_empty() {
            return no_data(title, &DashboardError::EmptyColumn(Metric::HappinessScore));
        }
        let entries = self
            .aggregates
            .top_happiness
            .iter()
            .map(|entry| ProgressDatum {
                country: entry.country.clone(),
                score: entry.value,
                ratio: entry.value / SCORE_SCALE,
                label: format!("{} - {}", entry.country, entry.value),
            })
            .collect();
        Panel::Ready(ChartSpec::TopRanking(TopRankingSpec { title, entries }))
    }

    // -- Scatter -------------------------------------------------------------

    pub fn correlation_scatter(&self) -> Panel<ChartSpec> {
        let title = format!("GDP per capita vs Happiness Score ({})", self.dataset.year);
        for metric in [Metric::GdpPerCapita, Metric::HappinessScore] {
            if self.dataset.numeric(metric).is_none() {
                return no_data(title, &DashboardError::EmptyColumn(metric));
            }
        }

        let points: Vec<ScatterDatum> = self
            .dataset
            .records()
            .filter_map(|rec| {
                let x = rec.gdp_per_capita?;
                let y = rec.happiness_score?;
                Some(ScatterDatum {
                    country: rec.country.to_string(),
                    x,
                    y,
                    size: y,
                    group: rec.region.map(str::to_string),
                })
            })
            .collect();

        let groups = self.dataset.region.as_ref().map(|region| {
            let mut names: Vec<&String> = Vec::new();
            for name in region.present() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            names
                .iter()
                .zip(generate_palette(names.len()))
                .map(|(name, color)| SeriesGroup {
                    name: name.to_string(),
                    color,
                })
                .collect::<Vec<_>>()
        });

        Panel::Ready(ChartSpec::CorrelationScatter(ScatterSpec {
            title,
            x_label: Metric::GdpPerCapita.header().to_string(),
            y_label: Metric::HappinessScore.header().to_string(),
            points,
            groups,
        }))
    }

    // -- Gauges --------------------------------------------------------------

    pub fn gauges(&self) -> Vec<Panel<GaugeSpec>> {
        let agg = self.aggregates;
        vec![
            gauge(
                "Average Happiness Score",
                agg.happiness_mean.as_ref().copied(),
                Ok(SCORE_SCALE),
                &HAPPINESS_BANDS,
                color::BAR_HAPPINESS,
            ),
            gauge(
                "Average GDP per capita (USD)",
                agg.gdp_mean.as_ref().copied(),
                agg.gdp_max.as_ref().copied(),
                &GDP_BANDS,
                color::BAR_GDP,
            ),
            gauge(
                "Average Social Support",
                agg.social_support_mean.as_ref().copied(),
                Ok(1.0),
                &SOCIAL_SUPPORT_BANDS,
                color::BAR_SOCIAL_SUPPORT,
            ),
        ]
    }
}

fn no_data<T>(title: String, reason: &DashboardError) -> Panel<T> {
    Panel::NoData {
        title,
        reason: reason.to_string(),
    }
}

fn gauge(
    title: &str,
    value: Result<f64, &DashboardError>,
    axis_max: Result<f64, &DashboardError>,
    bands: &[(f64, f64, HexColor)],
    bar_color: HexColor,
) -> Panel<GaugeSpec> {
    let (value, max) = match (value, axis_max) {
        (Ok(value), Ok(max)) => (value, max),
        (Err(e), _) | (_, Err(e)) => return no_data(title.to_string(), e),
    };
    Panel::Ready(GaugeSpec {
        title: title.to_string(),
        value,
        axis: [0.0, max],
        bar_color,
        bands: clip_bands(bands, max),
    })
}

/// Clip bands to `[0, max]`, dropping any that end up empty.
fn clip_bands(bands: &[(f64, f64, HexColor)], max: f64) -> Vec<GaugeBand> {
    bands
        .iter()
        .filter_map(|&(from, to, color)| {
            let to = to.min(max);
            (from < to).then_some(GaugeBand { from, to, color })
        })
        .collect()
}
