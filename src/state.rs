use std::path::PathBuf;

use crate::charts::{ChartSpec, ChartSpecBuilder, DashboardSpecs, GaugeSpec, Panel};
use crate::config::DashboardConfig;
use crate::data::aggregate::Aggregates;
use crate::data::catalog::{sorted_chronologically, YearCatalog, YearKey};
use crate::data::loader::DatasetLoader;
use crate::data::model::{HappinessDataset, RawDataset};
use crate::data::schema::{validate, REQUIRED_COLUMNS};
use crate::error::{DashboardError, DashboardResult};
use crate::ui::surface::RenderSurface;

// ---------------------------------------------------------------------------
// Render cycles
// ---------------------------------------------------------------------------

/// What a selection produced.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Charts {
        preview: RawDataset,
        specs: DashboardSpecs,
    },
    /// The partition loaded but lacks required columns: the preview and an
    /// error are shown, no charts.
    MissingColumns {
        preview: RawDataset,
        missing: Vec<String>,
    },
    /// Not found or unreadable.
    Failed { message: String },
}

/// One selection, from load to specs.
#[derive(Debug, Clone)]
pub struct RenderCycle {
    pub year: YearKey,
    pub outcome: CycleOutcome,
}

#[derive(Debug, Clone, Default)]
pub enum DashboardPhase {
    #[default]
    AwaitingSelection,
    Rendered(RenderCycle),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Dashboard state, independent of rendering.
///
/// Each year selection replaces the previous render cycle wholesale; nothing
/// is cached between selections.
pub struct DashboardController {
    config: DashboardConfig,
    catalog: YearCatalog,
    loader: DatasetLoader,
    /// Sorted year keys, or the message shown instead of a selector.
    years: Result<Vec<YearKey>, String>,
    phase: DashboardPhase,
}

impl DashboardController {
    pub fn new(config: DashboardConfig) -> Self {
        let mut controller = Self {
            catalog: YearCatalog::new(&config.data_dir),
            loader: DatasetLoader::new(&config.data_dir),
            config,
            years: Ok(Vec::new()),
            phase: DashboardPhase::AwaitingSelection,
        };
        controller.refresh_catalog();
        controller
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn phase(&self) -> &DashboardPhase {
        &self.phase
    }

    /// Available years, or why there are none.
    pub fn years(&self) -> Result<&[YearKey], &str> {
        self.years.as_deref().map_err(String::as_str)
    }

    pub fn selected_year(&self) -> Option<&YearKey> {
        match &self.phase {
            DashboardPhase::Rendered(cycle) => Some(&cycle.year),
            DashboardPhase::AwaitingSelection => None,
        }
    }

    /// Specs of the current cycle, if it got that far.
    pub fn current_specs(&self) -> Option<&DashboardSpecs> {
        match &self.phase {
            DashboardPhase::Rendered(RenderCycle {
                outcome: CycleOutcome::Charts { specs, .. },
                ..
            }) => Some(specs),
            _ => None,
        }
    }

    /// Re-list the data directory.
    pub fn refresh_catalog(&mut self) {
        self.years = match self.catalog.list_years() {
            Ok(years) => {
                let years = sorted_chronologically(years);
                log::info!(
                    "{} year(s) available in {}",
                    years.len(),
                    self.catalog.dir().display()
                );
                Ok(years)
            }
            Err(e) => {
                log::warn!("{e}");
                Err(e.to_string())
            }
        };
    }

    /// Point the dashboard at another directory; the current cycle is dropped.
    pub fn set_data_dir(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        log::info!("Switching data directory to {}", dir.display());
        self.catalog = YearCatalog::new(&dir);
        self.loader = DatasetLoader::new(&dir);
        self.config.data_dir = dir;
        self.phase = DashboardPhase::AwaitingSelection;
        self.refresh_catalog();
    }

    /// Run the whole pipeline for `year`. Never fails: every error becomes
    /// part of the new cycle.
    pub fn select_year(&mut self, year: YearKey) {
        self.phase = DashboardPhase::AwaitingSelection;
        let outcome = match self.run(&year) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Failed to load {year}: {e}");
                CycleOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        self.phase = DashboardPhase::Rendered(RenderCycle { year, outcome });
    }

    fn run(&self, year: &YearKey) -> DashboardResult<CycleOutcome> {
        let preview = self.loader.load(year)?;

        let check = validate(&preview, &REQUIRED_COLUMNS);
        if !check.is_valid() {
            log::warn!("{year}: {}", DashboardError::MissingColumns(check.missing.clone()));
            return Ok(CycleOutcome::MissingColumns {
                preview,
                missing: check.missing,
            });
        }

        let dataset = HappinessDataset::resolve(&preview)?;
        let aggregates = Aggregates::compute(&dataset, self.config.top_n);
        let specs = ChartSpecBuilder::new(&dataset, &aggregates).build();
        log::info!(
            "Rendered {year}: {} chart(s), {} gauge(s), {} without data",
            specs.charts.iter().filter(|c| c.is_ready()).count(),
            specs.gauges.iter().filter(|g| g.is_ready()).count(),
            specs.no_data().len()
        );
        Ok(CycleOutcome::Charts { preview, specs })
    }

    /// Offer the year selector (or the empty-catalog message) and run the
    /// pipeline if the user picked a year.
    pub fn poll_selection(&mut self, surface: &mut dyn RenderSurface) {
        let picked = match &self.years {
            Ok(years) => surface.selected_year(years, self.selected_year()),
            Err(message) => {
                surface.render_error(message);
                None
            }
        };
        if let Some(year) = picked {
            self.select_year(year);
        }
    }

    /// Replay the current cycle into `surface`.
    pub fn present(&self, surface: &mut dyn RenderSurface) {
        let DashboardPhase::Rendered(cycle) = &self.phase else {
            return;
        };
        match &cycle.outcome {
            CycleOutcome::Charts { preview, specs } => {
                surface.render_table(preview, self.config.preview_rows);
                for chart in &specs.charts {
                    present_chart(surface, chart);
                }
                for gauge in &specs.gauges {
                    present_gauge(surface, gauge);
                }
            }
            CycleOutcome::MissingColumns { preview, missing } => {
                surface.render_table(preview, self.config.preview_rows);
                surface.render_error(&DashboardError::MissingColumns(missing.clone()).to_string());
            }
            CycleOutcome::Failed { message } => surface.render_error(message),
        }
    }
}

/// Draw one chart panel. The ranking is drawn as progress bars.
pub fn present_chart(surface: &mut dyn RenderSurface, panel: &Panel<ChartSpec>) {
    match panel {
        Panel::Ready(ChartSpec::TopRanking(ranking)) => {
            surface.render_heading(&ranking.title);
            for entry in &ranking.entries {
                surface.render_progress_bar(&entry.label, entry.ratio);
            }
        }
        Panel::Ready(chart) => surface.render_chart(chart),
        Panel::NoData { title, reason } => surface.render_no_data(title, reason),
    }
}

pub fn present_gauge(surface: &mut dyn RenderSurface, panel: &Panel<GaugeSpec>) {
    match panel {
        Panel::Ready(gauge) => surface.render_gauge(gauge),
        Panel::NoData { title, reason } => surface.render_no_data(title, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const HEADER: &str = "Country,Region,Happiness Rank,Happiness Score,GDP per capita,\
                          Social support,Healthy life expectancy,Generosity,Dystopia Residual";

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Heading(String),
        Table(usize),
        Chart(&'static str),
        Error(String),
        Progress(String, f64),
        Gauge(String),
        NoData(String),
    }

    /// Records calls and answers the selector with a scripted pick.
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
        offered: Vec<YearKey>,
        pick: Option<YearKey>,
    }

    impl RecordingSurface {
        fn charts(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Chart(_) | Call::Progress(..) | Call::Gauge(_)))
                .count()
        }

        fn errors(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Error(m) => Some(m.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn selected_year(&mut self, years: &[YearKey], _: Option<&YearKey>) -> Option<YearKey> {
            self.offered = years.to_vec();
            self.pick.take()
        }
        fn render_heading(&mut self, text: &str) {
            self.calls.push(Call::Heading(text.to_string()));
        }
        fn render_table(&mut self, dataset: &RawDataset, max_rows: usize) {
            self.calls.push(Call::Table(dataset.len().min(max_rows)));
        }
        fn render_chart(&mut self, chart: &ChartSpec) {
            self.calls.push(Call::Chart(match chart {
                ChartSpec::GeoHeatmap(_) => "geo_heatmap",
                ChartSpec::TopRanking(_) => "top_ranking",
                ChartSpec::CorrelationScatter(_) => "correlation_scatter",
            }));
        }
        fn render_error(&mut self, message: &str) {
            self.calls.push(Call::Error(message.to_string()));
        }
        fn render_progress_bar(&mut self, label: &str, ratio: f64) {
            self.calls.push(Call::Progress(label.to_string(), ratio));
        }
        fn render_gauge(&mut self, gauge: &GaugeSpec) {
            self.calls.push(Call::Gauge(gauge.title.clone()));
        }
        fn render_no_data(&mut self, title: &str, _reason: &str) {
            self.calls.push(Call::NoData(title.to_string()));
        }
    }

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn full_partition() -> String {
        format!(
            "{HEADER}\n\
             Denmark,Western Europe,1,7.5,45000,0.95,72,0.3,2.4\n\
             Norway,Western Europe,2,7.4,12000,0.94,71,0.35,2.3\n\
             Togo,Sub-Saharan Africa,3,3.3,8000,0.3,50,0.2,1.9\n"
        )
    }

    fn controller(dir: &Path) -> DashboardController {
        DashboardController::new(DashboardConfig {
            data_dir: dir.to_path_buf(),
            ..DashboardConfig::default()
        })
    }

    fn year(key: &str) -> YearKey {
        YearKey::new(key).unwrap()
    }

    #[test]
    fn starts_awaiting_with_sorted_years() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "cleaned_2016.csv", &full_partition());
        write(tmp.path(), "cleaned_2015.csv", &full_partition());
        let c = controller(tmp.path());

        assert!(matches!(c.phase(), DashboardPhase::AwaitingSelection));
        assert_eq!(c.years().unwrap(), &[year("2015"), year("2016")]);

        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn selection_renders_full_dashboard() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "cleaned_2019.csv", &full_partition());
        let mut c = controller(tmp.path());

        let mut surface = RecordingSurface {
            pick: Some(year("2019")),
            ..Default::default()
        };
        c.poll_selection(&mut surface);
        assert_eq!(surface.offered, vec![year("2019")]);
        assert_eq!(c.selected_year(), Some(&year("2019")));

        c.present(&mut surface);
        assert_eq!(surface.calls[0], Call::Table(3));
        assert!(surface.errors().is_empty());
        assert!(surface.calls.contains(&Call::Chart("geo_heatmap")));
        assert!(surface.calls.contains(&Call::Chart("correlation_scatter")));
        assert!(surface
            .calls
            .contains(&Call::Heading("Happiest Countries in 2019".to_string())));
        assert!(surface
            .calls
            .contains(&Call::Progress("Denmark - 7.5".to_string(), 0.75)));
        let gauges = surface
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Gauge(_)))
            .count();
        assert_eq!(gauges, 3);

        let specs = c.current_specs().unwrap();
        assert_eq!(specs.year, year("2019"));
        assert!(specs.no_data().is_empty());
    }

    #[test]
    fn missing_column_shows_error_then_recovers() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "cleaned_2017.csv",
            "Country,Region,Happiness Rank,Happiness Score,GDP per capita,\
             Healthy life expectancy,Generosity,Dystopia Residual\n\
             Denmark,Western Europe,1,7.5,45000,72,0.3,2.4\n",
        );
        write(tmp.path(), "cleaned_2018.csv", &full_partition());
        let mut c = controller(tmp.path());

        c.select_year(year("2017"));
        let DashboardPhase::Rendered(cycle) = c.phase() else {
            panic!("expected a rendered cycle");
        };
        let CycleOutcome::MissingColumns { missing, .. } = &cycle.outcome else {
            panic!("expected missing columns, got {:?}", cycle.outcome);
        };
        assert_eq!(missing, &vec!["Social support".to_string()]);
        assert!(c.current_specs().is_none());

        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert_eq!(surface.charts(), 0);
        assert_eq!(
            surface.errors(),
            vec!["The following required columns are missing in the dataset: Social support"]
        );

        c.select_year(year("2018"));
        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert!(surface.errors().is_empty());
        assert!(surface.charts() > 0);
    }

    #[test]
    fn unreadable_or_absent_years_fail_visibly() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "cleaned_2015.csv",
            &format!("{HEADER}\nDenmark,Western Europe,1,lots,45000,0.95,72,0.3,2.4\n"),
        );
        let mut c = controller(tmp.path());

        c.select_year(year("2015"));
        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert_eq!(surface.errors().len(), 1);
        assert!(surface.errors()[0].contains("could not parse"));

        c.select_year(year("1999"));
        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert_eq!(surface.errors().len(), 1);
        assert!(surface.errors()[0].contains("no dataset for year 1999"));
        assert_eq!(c.selected_year(), Some(&year("1999")));
    }

    #[test]
    fn empty_column_degrades_only_its_visuals() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "cleaned_2020.csv",
            &format!(
                "{HEADER}\n\
                 Denmark,Western Europe,1,7.5,,0.95,72,0.3,2.4\n\
                 Togo,Sub-Saharan Africa,2,3.3,,0.3,50,0.2,1.9\n"
            ),
        );
        let mut c = controller(tmp.path());
        c.select_year(year("2020"));

        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert!(surface.errors().is_empty());
        assert!(surface.calls.contains(&Call::Chart("geo_heatmap")));
        assert!(!surface.calls.contains(&Call::Chart("correlation_scatter")));
        assert!(surface
            .calls
            .contains(&Call::NoData("Average GDP per capita (USD)".to_string())));
        assert!(surface
            .calls
            .contains(&Call::Gauge("Average Happiness Score".to_string())));
    }

    #[test]
    fn empty_catalog_replaces_selector_with_message() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = controller(tmp.path());
        assert!(c.years().is_err());

        let mut surface = RecordingSurface {
            pick: Some(year("2015")),
            ..Default::default()
        };
        c.poll_selection(&mut surface);
        assert!(surface.offered.is_empty());
        assert_eq!(surface.errors().len(), 1);
        assert!(matches!(c.phase(), DashboardPhase::AwaitingSelection));
    }

    #[test]
    fn listed_years_always_load() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "cleaned_2015.CSV", &full_partition());
        write(tmp.path(), "cleaned_2016.Parquet", "not parquet");
        let mut c = controller(tmp.path());

        let years = c.years().unwrap().to_vec();
        assert_eq!(years, vec![year("2015"), year("2016")]);

        c.select_year(years[0].clone());
        assert!(c.current_specs().is_some());

        // Found and read, so the failure is a parse error, not a missing file.
        c.select_year(years[1].clone());
        let mut surface = RecordingSurface::default();
        c.present(&mut surface);
        assert_eq!(surface.errors().len(), 1);
        assert!(surface.errors()[0].contains("could not parse"));
    }

    #[test]
    fn switching_directory_drops_cycle_and_relists() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "cleaned_2015.csv", &full_partition());
        write(second.path(), "cleaned_2021.csv", &full_partition());

        let mut c = controller(first.path());
        c.select_year(year("2015"));
        assert!(c.current_specs().is_some());

        c.set_data_dir(second.path());
        assert!(matches!(c.phase(), DashboardPhase::AwaitingSelection));
        assert_eq!(c.years().unwrap(), &[year("2021")]);
        assert_eq!(c.config().data_dir, second.path());
    }
}
