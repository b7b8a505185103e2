use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

const HEADER: [&str; 9] = [
    "Country",
    "Region",
    "Happiness Rank",
    "Happiness Score",
    "GDP per capita",
    "Social support",
    "Healthy life expectancy",
    "Generosity",
    "Dystopia Residual",
];

/// (country, region, happiness score, GDP per capita in USD)
const COUNTRIES: &[(&str, &str, f64, f64)] = &[
    ("Finland", "Western Europe", 7.6, 48000.0),
    ("Denmark", "Western Europe", 7.55, 60000.0),
    ("Norway", "Western Europe", 7.5, 75000.0),
    ("Iceland", "Western Europe", 7.49, 68000.0),
    ("Netherlands", "Western Europe", 7.45, 52000.0),
    ("Switzerland", "Western Europe", 7.48, 82000.0),
    ("Canada", "North America", 7.28, 46000.0),
    ("New Zealand", "Australia and New Zealand", 7.3, 42000.0),
    ("Australia", "Australia and New Zealand", 7.23, 55000.0),
    ("United States", "North America", 6.9, 62000.0),
    ("Costa Rica", "Latin America and Caribbean", 7.1, 12000.0),
    ("Mexico", "Latin America and Caribbean", 6.5, 9800.0),
    ("Brazil", "Latin America and Caribbean", 6.3, 8900.0),
    ("Japan", "Eastern Asia", 5.9, 40000.0),
    ("China", "Eastern Asia", 5.2, 9700.0),
    ("Thailand", "Southeastern Asia", 6.0, 7200.0),
    ("India", "Southern Asia", 4.0, 2000.0),
    ("Nigeria", "Sub-Saharan Africa", 5.2, 2200.0),
    ("Kenya", "Sub-Saharan Africa", 4.5, 1700.0),
    ("Togo", "Sub-Saharan Africa", 3.4, 680.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    country: &'static str,
    region: &'static str,
    rank: i64,
    score: f64,
    gdp: f64,
    social_support: f64,
    life_expectancy: f64,
    generosity: f64,
    dystopia_residual: f64,
}

fn round(v: f64, digits: i32) -> f64 {
    let f = 10f64.powi(digits);
    (v * f).round() / f
}

/// One year of survey rows, ranked by score.
fn generate_year(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows: Vec<Row> = COUNTRIES
        .iter()
        .map(|&(country, region, score, gdp)| {
            let score = (score + rng.gauss(0.0, 0.12)).clamp(0.0, 10.0);
            Row {
                country,
                region,
                rank: 0,
                score: round(score, 3),
                gdp: round(gdp * (1.0 + rng.gauss(0.02, 0.03)), 0),
                social_support: round((0.45 + score * 0.065 + rng.gauss(0.0, 0.03)).clamp(0.0, 1.0), 3),
                life_expectancy: round(48.0 + score * 3.3 + rng.gauss(0.0, 1.5), 1),
                generosity: round((0.15 + rng.gauss(0.0, 0.08)).max(0.0), 3),
                dystopia_residual: round(1.2 + score * 0.15 + rng.gauss(0.0, 0.2), 3),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as i64 + 1;
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADER)?;
    for r in rows {
        writer.write_record([
            r.country.to_string(),
            r.region.to_string(),
            r.rank.to_string(),
            r.score.to_string(),
            r.gdp.to_string(),
            r.social_support.to_string(),
            r.life_expectancy.to_string(),
            r.generosity.to_string(),
            r.dystopia_residual.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> anyhow::Result<RecordBatch> {
    let floats = |pick: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(pick).collect::<Vec<_>>()))
    };

    let mut fields = vec![
        Field::new(HEADER[0], DataType::Utf8, false),
        Field::new(HEADER[1], DataType::Utf8, false),
        Field::new(HEADER[2], DataType::Int64, false),
    ];
    fields.extend(HEADER[3..].iter().map(|name| Field::new(*name, DataType::Float64, false)));
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.country).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.region).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.rank).collect::<Vec<_>>())),
            floats(|r| r.score),
            floats(|r| r.gdp),
            floats(|r| r.social_support),
            floats(|r| r.life_expectancy),
            floats(|r| r.generosity),
            floats(|r| r.dystopia_residual),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(batch)
}

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/cleaned"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    for year in 2015..=2019 {
        let rows = generate_year(&mut rng);
        let path = out_dir.join(format!("cleaned_{year}.csv"));
        write_csv(&path, &rows)?;
        println!("Wrote {} countries to {}", rows.len(), path.display());
    }

    let rows = generate_year(&mut rng);
    let path = out_dir.join("cleaned_2020.parquet");
    let batch = write_parquet(&path, &rows)?;
    println!("Wrote {} countries to {}", rows.len(), path.display());
    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);

    Ok(())
}
