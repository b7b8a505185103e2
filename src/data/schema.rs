use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use super::model::{CellValue, Column, HappinessDataset, Metric, RawDataset};
use crate::error::{DashboardError, DashboardResult};

// ── Column headers ──────────────────────────────────────────────────────────
pub const COUNTRY: &str = "Country";
pub const REGION: &str = "Region";
pub const HAPPINESS_RANK: &str = "Happiness Rank";

/// Columns every partition must carry before any chart is drawn.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COUNTRY,
    "Happiness Score",
    HAPPINESS_RANK,
    REGION,
    "GDP per capita",
    "Social support",
    "Healthy life expectancy",
    "Generosity",
    "Dystopia Residual",
];

// ---------------------------------------------------------------------------
// Schema check
// ---------------------------------------------------------------------------

/// Outcome of comparing a partition's header with the required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCheckResult {
    pub required: Vec<String>,
    pub present: BTreeSet<String>,
    /// Missing required columns, in required order.
    pub missing: Vec<String>,
}

impl SchemaCheckResult {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn into_result(self) -> DashboardResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::MissingColumns(self.missing))
        }
    }
}

/// Compare the dataset's header against `required`. Pure; calling it twice
/// on the same dataset gives the same answer.
pub fn validate(dataset: &RawDataset, required: &[&str]) -> SchemaCheckResult {
    let present: BTreeSet<String> = dataset.columns.iter().cloned().collect();
    let mut missing: Vec<String> = Vec::new();
    for col in required {
        if !present.contains(*col) && !missing.iter().any(|m| m == col) {
            missing.push(col.to_string());
        }
    }
    SchemaCheckResult {
        required: required.iter().map(|c| c.to_string()).collect(),
        present,
        missing,
    }
}

// ---------------------------------------------------------------------------
// Resolution: RawDataset → HappinessDataset
// ---------------------------------------------------------------------------

impl HappinessDataset {
    /// Type the columns of a partition that passed [`validate`].
    ///
    /// Blank cells become missing values. A non-numeric cell in a numeric
    /// column, a blank or repeated country, or a rank that is not a positive
    /// integer rejects the whole partition.
    pub fn resolve(raw: &RawDataset) -> DashboardResult<Self> {
        validate(raw, &REQUIRED_COLUMNS).into_result()?;
        let source = raw.source.as_path();

        let country_idx = index(raw, COUNTRY)?;
        let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
        let mut country = Vec::with_capacity(raw.len());
        for (row_no, row) in raw.rows.iter().enumerate() {
            let name = match &row[country_idx] {
                CellValue::Null => {
                    return Err(DashboardError::parse(
                        source,
                        format!("row {}: empty Country", row_no + 1),
                    ))
                }
                other => other.to_string(),
            };
            if !seen.insert(name.clone()) {
                return Err(DashboardError::parse(
                    source,
                    format!("row {}: duplicate Country '{name}'", row_no + 1),
                ));
            }
            country.push(name);
        }

        let region_idx = index(raw, REGION)?;
        let region = Column::from_values(
            raw.rows
                .iter()
                .map(|row| match &row[region_idx] {
                    CellValue::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
        );

        let happiness_rank = Column::from_values(rank_column(raw, source)?);

        let numeric = |metric: Metric| -> DashboardResult<Option<Column<f64>>> {
            Ok(Column::from_values(numeric_column(raw, metric, source)?))
        };

        let dataset = HappinessDataset {
            year: raw.year.clone(),
            country,
            region,
            happiness_rank,
            happiness_score: numeric(Metric::HappinessScore)?,
            gdp_per_capita: numeric(Metric::GdpPerCapita)?,
            social_support: numeric(Metric::SocialSupport)?,
            healthy_life_expectancy: numeric(Metric::HealthyLifeExpectancy)?,
            generosity: numeric(Metric::Generosity)?,
            dystopia_residual: numeric(Metric::DystopiaResidual)?,
        };
        warn_out_of_domain(&dataset);
        Ok(dataset)
    }
}

fn index(raw: &RawDataset, name: &str) -> DashboardResult<usize> {
    raw.column_index(name)
        .ok_or_else(|| DashboardError::MissingColumns(vec![name.to_string()]))
}

fn numeric_column(
    raw: &RawDataset,
    metric: Metric,
    source: &Path,
) -> DashboardResult<Vec<Option<f64>>> {
    let idx = index(raw, metric.header())?;
    raw.rows
        .iter()
        .enumerate()
        .map(|(row_no, row)| {
            row[idx].as_f64().map_err(|why| {
                DashboardError::parse(
                    source,
                    format!("row {}, column '{}': {why}", row_no + 1, metric.header()),
                )
            })
        })
        .collect()
}

fn rank_column(raw: &RawDataset, source: &Path) -> DashboardResult<Vec<Option<u32>>> {
    let idx = index(raw, HAPPINESS_RANK)?;
    raw.rows
        .iter()
        .enumerate()
        .map(|(row_no, row)| {
            let bad = |what: String| {
                DashboardError::parse(
                    source,
                    format!("row {}, column '{HAPPINESS_RANK}': {what}", row_no + 1),
                )
            };
            let Some(v) = row[idx].as_f64().map_err(bad)? else {
                return Ok(None);
            };
            if v >= 1.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
                Ok(Some(v as u32))
            } else {
                Err(bad(format!("{v} is not a positive integer rank")))
            }
        })
        .collect()
}

fn warn_out_of_domain(dataset: &HappinessDataset) {
    let checks: [(Metric, f64, f64); 3] = [
        (Metric::HappinessScore, 0.0, 10.0),
        (Metric::GdpPerCapita, 0.0, f64::INFINITY),
        (Metric::SocialSupport, 0.0, 1.0),
    ];
    for (metric, lo, hi) in checks {
        let Some(col) = dataset.numeric(metric) else {
            continue;
        };
        let outside = col.present().filter(|v| **v < lo || **v > hi).count();
        if outside > 0 {
            log::warn!(
                "{}: {outside} value(s) of '{}' outside [{lo}, {hi}]",
                dataset.year,
                metric.header()
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::data::catalog::YearKey;

    /// Build a raw partition from CSV-like text, the way the loader does.
    pub(crate) fn raw(header: &[&str], rows: &[&[&str]]) -> RawDataset {
        RawDataset {
            year: YearKey::new("2015").unwrap(),
            source: PathBuf::from("cleaned_2015.csv"),
            columns: header.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| CellValue::infer(c)).collect())
                .collect(),
        }
    }

    pub(crate) fn full_row<'a>(country: &'a str, score: &'a str, gdp: &'a str) -> Vec<&'a str> {
        vec![country, score, "1", "Europe", gdp, "0.9", "70", "0.2", "2.1"]
    }

    pub(crate) fn happiness(rows: &[Vec<&str>]) -> HappinessDataset {
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        HappinessDataset::resolve(&raw(&REQUIRED_COLUMNS, &rows)).unwrap()
    }

    #[test]
    fn reports_missing_columns_in_required_order() {
        let ds = raw(&["Country", "Happiness Score", "Region"], &[]);
        let result = validate(&ds, &REQUIRED_COLUMNS);
        assert!(!result.is_valid());
        assert_eq!(
            result.missing,
            vec![
                "Happiness Rank",
                "GDP per capita",
                "Social support",
                "Healthy life expectancy",
                "Generosity",
                "Dystopia Residual"
            ]
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let ds = raw(&["Country", "Generosity"], &[&["X", "0.1"]]);
        assert_eq!(
            validate(&ds, &REQUIRED_COLUMNS),
            validate(&ds, &REQUIRED_COLUMNS)
        );
    }

    #[test]
    fn single_missing_column() {
        let header: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "Social support")
            .collect();
        let err = validate(&raw(&header, &[]), &REQUIRED_COLUMNS)
            .into_result()
            .unwrap_err();
        match err {
            DashboardError::MissingColumns(cols) => assert_eq!(cols, vec!["Social support"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn resolves_typed_columns() {
        let ds = happiness(&[
            full_row("Switzerland", "7.587", "95000"),
            full_row("Iceland", "7.561", ""),
        ]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.happiness_rank.as_ref().unwrap().get(0), Some(&1));
        let rec = ds.record(1).unwrap();
        assert_eq!(rec.country, "Iceland");
        assert_eq!(rec.region, Some("Europe"));
        assert_eq!(rec.gdp_per_capita, None);
        assert_eq!(rec.happiness_score, Some(7.561));
    }

    #[test]
    fn blank_column_resolves_to_absent() {
        let ds = happiness(&[full_row("A", "5", ""), full_row("B", "6", "NA")]);
        assert!(ds.gdp_per_capita.is_none());
        assert!(ds.happiness_score.is_some());
    }

    #[test]
    fn junk_numeric_fails_whole_partition() {
        let rows = [full_row("A", "five", "1000")];
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let err = HappinessDataset::resolve(&raw(&REQUIRED_COLUMNS, &rows))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
        assert!(err.to_string().contains("Happiness Score"));
    }

    #[test]
    fn duplicate_or_blank_country_is_rejected() {
        for rows in [
            vec![full_row("A", "5", "1"), full_row("A", "6", "2")],
            vec![full_row("", "5", "1")],
        ] {
            let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
            let result =
                HappinessDataset::resolve(&raw(&REQUIRED_COLUMNS, &rows));
            assert!(matches!(result, Err(DashboardError::Parse { .. })));
        }
    }

    #[test]
    fn rank_must_be_positive_integer() {
        let mut row = full_row("A", "5", "1");
        row[2] = "0";
        let rows: Vec<&[&str]> = vec![row.as_slice()];
        assert!(
            HappinessDataset::resolve(&raw(&REQUIRED_COLUMNS, &rows)).is_err()
        );
    }
}
