use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::catalog::YearKey;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a raw partition
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes pandas would infer.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Spellings pandas reads as NA by default.
const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "-nan"];

impl CellValue {
    /// Infer a cell from text without any cleaning beyond NA detection.
    pub fn infer(s: &str) -> CellValue {
        let trimmed = s.trim();
        if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
            return CellValue::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        match trimmed {
            "true" | "True" => CellValue::Bool(true),
            "false" | "False" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Interpret the value as an `f64`; `Ok(None)` for a missing cell.
    pub fn as_f64(&self) -> Result<Option<f64>, String> {
        match self {
            CellValue::Float(v) if v.is_finite() => Ok(Some(*v)),
            CellValue::Float(_) | CellValue::Null => Ok(None),
            CellValue::Integer(i) => Ok(Some(*i as f64)),
            other => Err(format!("'{other}' is not a number")),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

// ---------------------------------------------------------------------------
// RawDataset – one partition as parsed, before schema validation
// ---------------------------------------------------------------------------

/// A partition exactly as the file store holds it.
///
/// Every row has one cell per entry in `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    pub year: YearKey,
    /// File the rows were read from.
    pub source: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawDataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Metric – the numeric columns aggregates and charts can address
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    HappinessScore,
    GdpPerCapita,
    SocialSupport,
    HealthyLifeExpectancy,
    Generosity,
    DystopiaResidual,
}

impl Metric {
    /// Header of this column in the partition files.
    pub fn header(self) -> &'static str {
        match self {
            Metric::HappinessScore => "Happiness Score",
            Metric::GdpPerCapita => "GDP per capita",
            Metric::SocialSupport => "Social support",
            Metric::HealthyLifeExpectancy => "Healthy life expectancy",
            Metric::Generosity => "Generosity",
            Metric::DystopiaResidual => "Dystopia Residual",
        }
    }
}

// ---------------------------------------------------------------------------
// Column / HappinessDataset – the validated, typed view
// ---------------------------------------------------------------------------

/// One column of a validated dataset; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    values: Vec<Option<T>>,
}

impl<T> Column<T> {
    /// Wrap the values, or `None` when not a single value is present.
    pub fn from_values(values: Vec<Option<T>>) -> Option<Self> {
        if values.iter().any(Option::is_some) {
            Some(Column { values })
        } else {
            None
        }
    }

    pub fn get(&self, row: usize) -> Option<&T> {
        self.values.get(row).and_then(Option::as_ref)
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Present values in row order.
    pub fn present(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter().flatten()
    }
}

/// A validated partition: country names plus explicitly optional columns.
///
/// An optional column is `None` when no row carries a usable value for it.
/// Presence is settled once, when the dataset is resolved; nothing
/// downstream looks at the raw header again.
#[derive(Debug, Clone, PartialEq)]
pub struct HappinessDataset {
    pub year: YearKey,
    pub country: Vec<String>,
    pub region: Option<Column<String>>,
    pub happiness_rank: Option<Column<u32>>,
    pub happiness_score: Option<Column<f64>>,
    pub gdp_per_capita: Option<Column<f64>>,
    pub social_support: Option<Column<f64>>,
    pub healthy_life_expectancy: Option<Column<f64>>,
    pub generosity: Option<Column<f64>>,
    pub dystopia_residual: Option<Column<f64>>,
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HappinessRecord<'a> {
    pub country: &'a str,
    pub region: Option<&'a str>,
    pub happiness_rank: Option<u32>,
    pub happiness_score: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub social_support: Option<f64>,
    pub healthy_life_expectancy: Option<f64>,
    pub generosity: Option<f64>,
    pub dystopia_residual: Option<f64>,
}

impl HappinessDataset {
    pub fn len(&self) -> usize {
        self.country.len()
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_empty()
    }

    pub fn numeric(&self, metric: Metric) -> Option<&Column<f64>> {
        match metric {
            Metric::HappinessScore => self.happiness_score.as_ref(),
            Metric::GdpPerCapita => self.gdp_per_capita.as_ref(),
            Metric::SocialSupport => self.social_support.as_ref(),
            Metric::HealthyLifeExpectancy => self.healthy_life_expectancy.as_ref(),
            Metric::Generosity => self.generosity.as_ref(),
            Metric::DystopiaResidual => self.dystopia_residual.as_ref(),
        }
    }

    pub fn value(&self, metric: Metric, row: usize) -> Option<f64> {
        self.numeric(metric).and_then(|c| c.get(row)).copied()
    }

    pub fn record(&self, row: usize) -> Option<HappinessRecord<'_>> {
        let country = self.country.get(row)?;
        Some(HappinessRecord {
            country,
            region: self
                .region
                .as_ref()
                .and_then(|c| c.get(row))
                .map(String::as_str),
            happiness_rank: self.happiness_rank.as_ref().and_then(|c| c.get(row)).copied(),
            happiness_score: self.value(Metric::HappinessScore, row),
            gdp_per_capita: self.value(Metric::GdpPerCapita, row),
            social_support: self.value(Metric::SocialSupport, row),
            healthy_life_expectancy: self.value(Metric::HealthyLifeExpectancy, row),
            generosity: self.value(Metric::Generosity, row),
            dystopia_residual: self.value(Metric::DystopiaResidual, row),
        })
    }

    /// All rows in their original order.
    pub fn records(&self) -> impl Iterator<Item = HappinessRecord<'_>> + '_ {
        (0..self.len()).filter_map(move |row| self.record(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cells_like_pandas() {
        assert_eq!(CellValue::infer(""), CellValue::Null);
        assert_eq!(CellValue::infer("NaN"), CellValue::Null);
        assert_eq!(CellValue::infer("N/A"), CellValue::Null);
        assert_eq!(CellValue::infer("12"), CellValue::Integer(12));
        assert_eq!(CellValue::infer(" 7.5 "), CellValue::Float(7.5));
        assert_eq!(
            CellValue::infer("Western Europe"),
            CellValue::String("Western Europe".into())
        );
    }

    #[test]
    fn numeric_interpretation() {
        assert_eq!(CellValue::Integer(3).as_f64(), Ok(Some(3.0)));
        assert_eq!(CellValue::Null.as_f64(), Ok(None));
        assert!(CellValue::String("abc".into()).as_f64().is_err());
    }

    #[test]
    fn column_with_no_values_is_absent() {
        assert!(Column::<f64>::from_values(vec![None, None]).is_none());
        let col = Column::from_values(vec![None, Some(2.0)]).unwrap();
        assert_eq!(col.get(0), None);
        assert_eq!(col.present().copied().collect::<Vec<_>>(), vec![2.0]);
    }
}
