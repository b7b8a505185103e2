use serde::Serialize;

use super::model::{HappinessDataset, Metric};
use crate::error::{DashboardError, DashboardResult};

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// One row of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub country: String,
    pub value: f64,
}

/// The `n` rows with the largest `metric`, largest first.
///
/// Rows without a value are skipped. Equal values keep their original row
/// order (the sort is stable).
pub fn top_n(dataset: &HappinessDataset, metric: Metric, n: usize) -> Vec<RankedEntry> {
    let Some(column) = dataset.numeric(metric) else {
        return Vec::new();
    };
    let mut ranked: Vec<RankedEntry> = dataset
        .country
        .iter()
        .zip(column.values())
        .filter_map(|(country, value)| {
            value.map(|value| RankedEntry {
                country: country.clone(),
                value,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Column statistics
// ---------------------------------------------------------------------------

fn present_values(dataset: &HappinessDataset, metric: Metric) -> DashboardResult<Vec<f64>> {
    let values: Vec<f64> = dataset
        .numeric(metric)
        .map(|c| c.present().copied().collect())
        .unwrap_or_default();
    if values.is_empty() {
        Err(DashboardError::EmptyColumn(metric))
    } else {
        Ok(values)
    }
}

/// Arithmetic mean over the rows that carry a value.
pub fn mean(dataset: &HappinessDataset, metric: Metric) -> DashboardResult<f64> {
    let values = present_values(dataset, metric)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max(dataset: &HappinessDataset, metric: Metric) -> DashboardResult<f64> {
    let values = present_values(dataset, metric)?;
    Ok(values.into_iter().fold(f64::NEG_INFINITY, f64::max))
}

pub fn min(dataset: &HappinessDataset, metric: Metric) -> DashboardResult<f64> {
    let values = present_values(dataset, metric)?;
    Ok(values.into_iter().fold(f64::INFINITY, f64::min))
}

// ---------------------------------------------------------------------------
// Aggregates – everything the chart builder consumes, computed per selection
// ---------------------------------------------------------------------------

/// Derived numbers for one render cycle.
///
/// Each field fails on its own, so an empty column only takes down the
/// visual that needs it.
#[derive(Debug)]
pub struct Aggregates {
    pub top_happiness: Vec<RankedEntry>,
    pub happiness_range: DashboardResult<(f64, f64)>,
    pub happiness_mean: DashboardResult<f64>,
    pub gdp_mean: DashboardResult<f64>,
    pub gdp_max: DashboardResult<f64>,
    pub social_support_mean: DashboardResult<f64>,
}

impl Aggregates {
    pub fn compute(dataset: &HappinessDataset, top: usize) -> Self {
        let happiness_range = min(dataset, Metric::HappinessScore)
            .and_then(|lo| Ok((lo, max(dataset, Metric::HappinessScore)?)));
        Aggregates {
            top_happiness: top_n(dataset, Metric::HappinessScore, top),
            happiness_range,
            happiness_mean: mean(dataset, Metric::HappinessScore),
            gdp_mean: mean(dataset, Metric::GdpPerCapita),
            gdp_max: max(dataset, Metric::GdpPerCapita),
            social_support_mean: mean(dataset, Metric::SocialSupport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::tests::{full_row, happiness};

    fn scores(values: &[(&'static str, &'static str)]) -> HappinessDataset {
        happiness(
            &values
                .iter()
                .map(|(country, score)| full_row(country, score, "1000"))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn ties_keep_original_row_order() {
        let ds = scores(&[("X", "7.2"), ("Y", "5.1"), ("Z", "7.2")]);
        let top = top_n(&ds, Metric::HappinessScore, 2);
        assert_eq!(
            top,
            vec![
                RankedEntry { country: "X".into(), value: 7.2 },
                RankedEntry { country: "Z".into(), value: 7.2 },
            ]
        );
    }

    #[test]
    fn top_n_is_sorted_and_truncated() {
        let ds = scores(&[
            ("A", "3.0"),
            ("B", "9.1"),
            ("C", "6.5"),
            ("D", "6.5"),
            ("E", "1.2"),
            ("F", "8.8"),
        ]);
        for n in 0..8 {
            let top = top_n(&ds, Metric::HappinessScore, n);
            assert_eq!(top.len(), n.min(ds.len()));
            assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
        }
        let names: Vec<String> = top_n(&ds, Metric::HappinessScore, 4)
            .into_iter()
            .map(|e| e.country)
            .collect();
        assert_eq!(names, vec!["B", "F", "C", "D"]);
    }

    #[test]
    fn rows_without_value_are_not_ranked() {
        let ds = scores(&[("A", ""), ("B", "4")]);
        let top = top_n(&ds, Metric::HappinessScore, 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].country, "B");
    }

    #[test]
    fn mean_lies_within_bounds() {
        let ds = scores(&[("A", "2.5"), ("B", "9.75"), ("C", "4"), ("D", "")]);
        let m = mean(&ds, Metric::HappinessScore).unwrap();
        let lo = min(&ds, Metric::HappinessScore).unwrap();
        let hi = max(&ds, Metric::HappinessScore).unwrap();
        assert!(lo <= m && m <= hi);
        assert!((m - 16.25 / 3.0).abs() < 1e-12);
        assert_eq!(hi, 9.75);
    }

    #[test]
    fn gdp_mean_and_max() {
        let ds = happiness(&[
            full_row("A", "5", "12000"),
            full_row("B", "6", "45000"),
            full_row("C", "7", "8000"),
        ]);
        assert!((mean(&ds, Metric::GdpPerCapita).unwrap() - 21666.67).abs() < 1e-2);
        assert_eq!(max(&ds, Metric::GdpPerCapita).unwrap(), 45000.0);
    }

    #[test]
    fn empty_column_is_an_error() {
        let ds = happiness(&[full_row("A", "5", ""), full_row("B", "6", "")]);
        assert!(matches!(
            mean(&ds, Metric::GdpPerCapita),
            Err(DashboardError::EmptyColumn(Metric::GdpPerCapita))
        ));
        assert!(max(&ds, Metric::GdpPerCapita).is_err());

        let agg = Aggregates::compute(&ds, 5);
        assert!(agg.gdp_mean.is_err());
        assert!(agg.happiness_mean.is_ok());
        assert_eq!(agg.top_happiness.len(), 2);
    }

    #[test]
    fn empty_dataset_has_no_statistics() {
        let ds = happiness(&[]);
        assert!(ds.is_empty());
        assert!(mean(&ds, Metric::HappinessScore).is_err());
        assert!(top_n(&ds, Metric::HappinessScore, 5).is_empty());
    }
}
