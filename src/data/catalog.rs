use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};

/// Filename prefix shared by every year partition.
pub const PARTITION_PREFIX: &str = "cleaned_";

/// Extensions the loader understands, in lookup preference order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "json", "parquet", "pq"];

// ---------------------------------------------------------------------------
// YearKey – addresses one partition of the file store
// ---------------------------------------------------------------------------

/// Opaque partition identifier, usually a four-digit year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct YearKey(String);

impl YearKey {
    /// Accept a key only if it maps back onto exactly one file name.
    pub fn new(key: impl Into<String>) -> DashboardResult<Self> {
        let key = key.into();
        let valid = !key.is_empty()
            && !key
                .chars()
                .any(|c| c == '.' || c == '/' || c == '\\' || c.is_whitespace());
        if valid {
            Ok(YearKey(key))
        } else {
            Err(DashboardError::InvalidYearKey(key))
        }
    }

    /// Extract the key from a `cleaned_<key>.<ext>` file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        parse_partition_name(name).map(|(key, _)| key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Split a `cleaned_<key>.<ext>` file name into its key and the position of
/// its extension in [`SUPPORTED_EXTENSIONS`]. Extensions match in any case.
pub fn parse_partition_name(name: &str) -> Option<(YearKey, usize)> {
    let rest = name.strip_prefix(PARTITION_PREFIX)?;
    let (key, ext) = rest.split_once('.')?;
    let ext = ext.to_ascii_lowercase();
    let preference = SUPPORTED_EXTENSIONS.iter().position(|e| *e == ext)?;
    Some((YearKey::new(key).ok()?, preference))
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// YearCatalog – discovers partitions in a directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct YearCatalog {
    dir: PathBuf,
}

impl YearCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List year keys in discovery order.
    ///
    /// Discovery order is whatever the file system hands back; use
    /// [`sorted_chronologically`] when presenting keys to people.
    pub fn list_years(&self) -> DashboardResult<Vec<YearKey>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("data directory {} does not exist", self.dir.display());
                return Err(DashboardError::CatalogEmpty {
                    dir: self.dir.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut years: Vec<YearKey> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match YearKey::from_file_name(name) {
                Some(key) if !years.contains(&key) => {
                    log::debug!("catalog: {name} -> year {key}");
                    years.push(key);
                }
                Some(_) => log::debug!("catalog: {name} duplicates an earlier partition"),
                None => log::debug!("catalog: skipping {name}"),
            }
        }

        if years.is_empty() {
            return Err(DashboardError::CatalogEmpty {
                dir: self.dir.clone(),
            });
        }
        Ok(years)
    }
}

/// Sort keys chronologically: numeric keys by value, then the rest lexically.
pub fn sorted_chronologically(mut keys: Vec<YearKey>) -> Vec<YearKey> {
    keys.sort_by(|a, b| {
        match (a.as_str().parse::<i64>(), b.as_str().parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        }
    });
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "Country\n").unwrap();
    }

    #[test]
    fn extracts_key_from_partition_names() {
        assert_eq!(
            YearKey::from_file_name("cleaned_2015.csv").unwrap().as_str(),
            "2015"
        );
        assert_eq!(
            YearKey::from_file_name("cleaned_2020.parquet").unwrap().as_str(),
            "2020"
        );
        assert!(YearKey::from_file_name("raw_2015.csv").is_none());
        assert!(YearKey::from_file_name("cleaned_2015.xlsx").is_none());
        assert!(YearKey::from_file_name("cleaned_.csv").is_none());
        assert!(YearKey::from_file_name("cleaned_2015").is_none());
    }

    #[test]
    fn extension_case_and_preference() {
        let (key, csv) = parse_partition_name("cleaned_2017.CSV").unwrap();
        assert_eq!(key.as_str(), "2017");
        let (_, pq) = parse_partition_name("cleaned_2017.Pq").unwrap();
        assert!(csv < pq);
        assert!(YearKey::new("../etc").is_err());
        assert!(YearKey::new("").is_err());
    }

    #[test]
    fn lists_matching_partitions_once() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "cleaned_2016.csv");
        touch(tmp.path(), "cleaned_2015.csv");
        touch(tmp.path(), "cleaned_2015.json");
        touch(tmp.path(), "notes.txt");

        let years = YearCatalog::new(tmp.path()).list_years().unwrap();
        let mut names: Vec<&str> = years.iter().map(YearKey::as_str).collect();
        names.sort();
        assert_eq!(names, vec!["2015", "2016"]);
    }

    #[test]
    fn empty_or_missing_directory_is_catalog_empty() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "readme.md");
        assert!(matches!(
            YearCatalog::new(tmp.path()).list_years(),
            Err(DashboardError::CatalogEmpty { .. })
        ));
        assert!(matches!(
            YearCatalog::new(tmp.path().join("nope")).list_years(),
            Err(DashboardError::CatalogEmpty { .. })
        ));
    }

    #[test]
    fn chronological_sort_is_numeric() {
        let keys = ["2019", "2015", "latest", "2017"]
            .into_iter()
            .map(|k| YearKey::new(k).unwrap())
            .collect();
        let sorted: Vec<String> = sorted_chronologically(keys)
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(sorted, vec!["2015", "2017", "2019", "latest"]);
    }
}
