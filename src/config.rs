use std::path::PathBuf;

use crate::color::HexColor;

pub const ENV_DATA_DIR: &str = "HAPPINESS_DATA_DIR";
pub const ENV_TOP_N: &str = "HAPPINESS_TOP_N";
pub const ENV_PREVIEW_ROWS: &str = "HAPPINESS_PREVIEW_ROWS";

const DEFAULT_DATA_DIR: &str = "data/cleaned";
const DEFAULT_TOP_N: usize = 5;
const DEFAULT_PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Theme – applied once to the rendering surface at startup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Plot and map background.
    pub canvas: HexColor,
    pub background: HexColor,
    pub panel: HexColor,
    pub text: HexColor,
    pub heading: HexColor,
    pub muted_text: HexColor,
    pub accent: HexColor,
    pub error: HexColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            canvas: HexColor::rgb(0x0e, 0x11, 0x17),
            background: HexColor::rgb(0x2e, 0x3b, 0x4e),
            panel: HexColor::rgb(0x34, 0x49, 0x5e),
            text: HexColor::rgb(0xf0, 0xf0, 0xf0),
            heading: HexColor::rgb(0xec, 0xf0, 0xf1),
            muted_text: HexColor::rgb(0xbd, 0xc3, 0xc7),
            accent: HexColor::rgb(0x1a, 0xbc, 0x9c),
            error: HexColor::rgb(0xe7, 0x4c, 0x3c),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Snapshot of the settings the dashboard runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Directory holding the `cleaned_<year>.<ext>` partitions.
    pub data_dir: PathBuf,
    /// Length of the happiest-countries ranking.
    pub top_n: usize,
    /// Rows shown in the data preview table.
    pub preview_rows: usize,
    pub theme: Theme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            top_n: DEFAULT_TOP_N,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            theme: Theme::default(),
        }
    }
}

impl DashboardConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unparsable numbers fall back to
    /// the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let count = |key: &str, default: usize| match lookup(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    log::warn!("{key}={raw:?} is not a count, using {default}");
                    default
                }
            },
        };

        Self {
            data_dir: lookup(ENV_DATA_DIR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            top_n: count(ENV_TOP_N, defaults.top_n),
            preview_rows: count(ENV_PREVIEW_ROWS, defaults.preview_rows),
            theme: defaults.theme,
        }
    }
}
