use std::path::PathBuf;

use thiserror::Error;

use crate::data::catalog::YearKey;
use crate::data::model::Metric;

/// Everything that can go wrong between the file store and the charts.
///
/// None of these are fatal to the process: the controller turns each one
/// into visible dashboard state.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("no year partitions (cleaned_<year>.<ext>) found in {}", dir.display())]
    CatalogEmpty { dir: PathBuf },

    #[error("no dataset for year {year} in {}", dir.display())]
    DatasetNotFound { year: YearKey, dir: PathBuf },

    #[error("could not parse {}: {detail}", path.display())]
    Parse { path: PathBuf, detail: String },

    #[error("The following required columns are missing in the dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no data in column '{}'", .0.header())]
    EmptyColumn(Metric),

    #[error("'{0}' is not a valid year key")]
    InvalidYearKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn parse(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        DashboardError::Parse {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
