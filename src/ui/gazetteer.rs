use std::collections::HashMap;

use crate::charts::{GeoDatum, GeoHeatmapSpec};

/// Approximate centroid (latitude, longitude) per country name, spelled the
/// way the World Happiness Report spells them.
const CENTROIDS: &[(&str, f64, f64)] = &[
    ("Afghanistan", 33.9, 67.7),
    ("Albania", 41.2, 20.2),
    ("Algeria", 28.0, 1.7),
    ("Angola", -11.2, 17.9),
    ("Argentina", -38.4, -63.6),
    ("Armenia", 40.1, 45.0),
    ("Australia", -25.3, 133.8),
    ("Austria", 47.5, 14.6),
    ("Azerbaijan", 40.1, 47.6),
    ("Bahrain", 26.0, 50.6),
    ("Bangladesh", 23.7, 90.4),
    ("Belarus", 53.7, 27.9),
    ("Belgium", 50.5, 4.5),
    ("Belize", 17.2, -88.5),
    ("Benin", 9.3, 2.3),
    ("Bhutan", 27.5, 90.4),
    ("Bolivia", -16.3, -63.6),
    ("Bosnia and Herzegovina", 43.9, 17.7),
    ("Botswana", -22.3, 24.7),
    ("Brazil", -14.2, -51.9),
    ("Bulgaria", 42.7, 25.5),
    ("Burkina Faso", 12.2, -1.6),
    ("Burundi", -3.4, 29.9),
    ("Cambodia", 12.6, 104.9),
    ("Cameroon", 7.4, 12.4),
    ("Canada", 56.1, -106.3),
    ("Central African Republic", 6.6, 20.9),
    ("Chad", 15.5, 18.7),
    ("Chile", -35.7, -71.5),
    ("China", 35.9, 104.2),
    ("Colombia", 4.6, -74.3),
    ("Comoros", -11.9, 43.9),
    ("Congo (Brazzaville)", -0.2, 15.8),
    ("Congo (Kinshasa)", -4.0, 21.8),
    ("Costa Rica", 9.7, -83.8),
    ("Croatia", 45.1, 15.2),
    ("Cyprus", 35.1, 33.4),
    ("Czech Republic", 49.8, 15.5),
    ("Denmark", 56.3, 9.5),
    ("Djibouti", 11.8, 42.6),
    ("Dominican Republic", 18.7, -70.2),
    ("Ecuador", -1.8, -78.2),
    ("Egypt", 26.8, 30.8),
    ("El Salvador", 13.8, -88.9),
    ("Estonia", 58.6, 25.0),
    ("Ethiopia", 9.1, 40.5),
    ("Finland", 61.9, 25.7),
    ("France", 46.2, 2.2),
    ("Gabon", -0.8, 11.6),
    ("Gambia", 13.4, -15.3),
    ("Georgia", 42.3, 43.4),
    ("Germany", 51.2, 10.5),
    ("Ghana", 7.9, -1.0),
    ("Greece", 39.1, 21.8),
    ("Guatemala", 15.8, -90.2),
    ("Guinea", 9.9, -9.7),
    ("Haiti", 19.0, -72.3),
    ("Honduras", 15.2, -86.2),
    ("Hong Kong", 22.3, 114.2),
    ("Hungary", 47.2, 19.5),
    ("Iceland", 65.0, -19.0),
    ("India", 20.6, 79.0),
    ("Indonesia", -0.8, 113.9),
    ("Iran", 32.4, 53.7),
    ("Iraq", 33.2, 43.7),
    ("Ireland", 53.4, -8.2),
    ("Israel", 31.0, 34.9),
    ("Italy", 41.9, 12.6),
    ("Ivory Coast", 7.5, -5.5),
    ("Jamaica", 18.1, -77.3),
    ("Japan", 36.2, 138.3),
    ("Jordan", 30.6, 36.2),
    ("Kazakhstan", 48.0, 66.9),
    ("Kenya", 0.0, 37.9),
    ("Kosovo", 42.6, 20.9),
    ("Kuwait", 29.3, 47.5),
    ("Kyrgyzstan", 41.2, 74.8),
    ("Laos", 19.9, 102.5),
    ("Latvia", 56.9, 24.6),
    ("Lebanon", 33.9, 35.9),
    ("Lesotho", -29.6, 28.2),
    ("Liberia", 6.4, -9.4),
    ("Libya", 26.3, 17.2),
    ("Lithuania", 55.2, 23.9),
    ("Luxembourg", 49.8, 6.1),
    ("Macedonia", 41.6, 21.7),
    ("Madagascar", -18.8, 46.9),
    ("Malawi", -13.3, 34.3),
    ("Malaysia", 4.2, 102.0),
    ("Mali", 17.6, -4.0),
    ("Malta", 35.9, 14.4),
    ("Mauritania", 21.0, -10.9),
    ("Mauritius", -20.3, 57.6),
    ("Mexico", 23.6, -102.6),
    ("Moldova", 47.4, 28.4),
    ("Mongolia", 46.9, 103.8),
    ("Montenegro", 42.7, 19.4),
    ("Morocco", 31.8, -7.1),
    ("Mozambique", -18.7, 35.5),
    ("Myanmar", 21.9, 95.96),
    ("Namibia", -22.96, 18.5),
    ("Nepal", 28.4, 84.1),
    ("Netherlands", 52.1, 5.3),
    ("New Zealand", -40.9, 174.9),
    ("Nicaragua", 12.9, -85.2),
    ("Niger", 17.6, 8.1),
    ("Nigeria", 9.1, 8.7),
    ("North Cyprus", 35.3, 33.6),
    ("Norway", 60.5, 8.5),
    ("Oman", 21.5, 55.9),
    ("Pakistan", 30.4, 69.3),
    ("Palestinian Territories", 31.9, 35.2),
    ("Panama", 8.5, -80.8),
    ("Paraguay", -23.4, -58.4),
    ("Peru", -9.2, -75.0),
    ("Philippines", 12.9, 121.8),
    ("Poland", 51.9, 19.1),
    ("Portugal", 39.4, -8.2),
    ("Qatar", 25.4, 51.2),
    ("Romania", 45.9, 25.0),
    ("Russia", 61.5, 105.3),
    ("Rwanda", -1.9, 29.9),
    ("Saudi Arabia", 23.9, 45.1),
    ("Senegal", 14.5, -14.5),
    ("Serbia", 44.0, 21.0),
    ("Sierra Leone", 8.5, -11.8),
    ("Singapore", 1.35, 103.8),
    ("Slovakia", 48.7, 19.7),
    ("Slovenia", 46.2, 15.0),
    ("Somalia", 5.2, 46.2),
    ("South Africa", -30.6, 22.9),
    ("South Korea", 35.9, 127.8),
    ("South Sudan", 6.9, 31.3),
    ("Spain", 40.5, -3.7),
    ("Sri Lanka", 7.9, 80.8),
    ("Sudan", 12.9, 30.2),
    ("Suriname", 3.9, -56.0),
    ("Swaziland", -26.5, 31.5),
    ("Sweden", 60.1, 18.6),
    ("Switzerland", 46.8, 8.2),
    ("Syria", 34.8, 39.0),
    ("Taiwan", 23.7, 121.0),
    ("Tajikistan", 38.9, 71.3),
    ("Tanzania", -6.4, 34.9),
    ("Thailand", 15.9, 100.99),
    ("Togo", 8.6, 0.8),
    ("Trinidad and Tobago", 10.7, -61.2),
    ("Tunisia", 33.9, 9.5),
    ("Turkey", 38.96, 35.2),
    ("Turkmenistan", 38.97, 59.6),
    ("Uganda", 1.4, 32.3),
    ("Ukraine", 48.4, 31.2),
    ("United Arab Emirates", 23.4, 53.8),
    ("United Kingdom", 55.4, -3.4),
    ("United States", 37.1, -95.7),
    ("Uruguay", -32.5, -55.8),
    ("Uzbekistan", 41.4, 64.6),
    ("Venezuela", 6.4, -66.6),
    ("Vietnam", 14.1, 108.3),
    ("Yemen", 15.6, 48.5),
    ("Zambia", -13.1, 27.8),
    ("Zimbabwe", -19.0, 29.2),
];

/// Map position of a country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

/// Outcome of joining heatmap data against the gazetteer. Countries that
/// are not found are listed, not treated as errors.
#[derive(Debug, Default)]
pub struct GeoJoin<'a> {
    pub matched: Vec<(&'a GeoDatum, Centroid)>,
    pub unmatched: Vec<&'a str>,
}

/// The map's built-in country-name lookup.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    centroids: HashMap<&'static str, Centroid>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        let centroids = CENTROIDS
            .iter()
            .map(|&(name, lat, lon)| (name, Centroid { lat, lon }))
            .collect();
        Self { centroids }
    }
}

impl Gazetteer {
    /// Exact, case-sensitive lookup.
    pub fn locate(&self, country: &str) -> Option<Centroid> {
        self.centroids.get(country).copied()
    }

    pub fn join<'a>(&self, spec: &'a GeoHeatmapSpec) -> GeoJoin<'a> {
        let mut join = GeoJoin::default();
        for datum in &spec.data {
            match self.locate(&datum.country) {
                Some(centroid) => join.matched.push((datum, centroid)),
                None => join.unmatched.push(datum.country.as_str()),
            }
        }
        if !join.unmatched.is_empty() {
            log::debug!(
                "{} countries not on the map: {:?}",
                join.unmatched.len(),
                join.unmatched
            );
        }
        join
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSpec;
    use crate::charts::ChartSpecBuilder;
    use crate::data::aggregate::Aggregates;
    use crate::data::schema::tests::{full_row, happiness};

    #[test]
    fn unknown_country_is_unmatched_not_an_error() {
        let ds = happiness(&[
            full_row("Denmark", "7.5", "50000"),
            full_row("Atlantis", "6.0", "20000"),
            full_row("Norway", "7.4", "70000"),
        ]);
        let agg = Aggregates::compute(&ds, 5);
        let ChartSpec::GeoHeatmap(spec) = ChartSpecBuilder::new(&ds, &agg)
            .geo_heatmap()
            .ready()
            .cloned()
            .unwrap()
        else {
            panic!("expected a heatmap");
        };

        let join = Gazetteer::default().join(&spec);
        assert_eq!(join.unmatched, vec!["Atlantis"]);
        let matched: Vec<&str> = join.matched.iter().map(|(d, _)| d.country.as_str()).collect();
        assert_eq!(matched, vec!["Denmark", "Norway"]);
        assert!(join.matched.iter().all(|(d, _)| d.fill.is_some()));
    }

    #[test]
    fn lookup_is_exact() {
        let g = Gazetteer::default();
        assert!(g.locate("Finland").is_some());
        assert!(g.locate("finland").is_none());
        assert!(g.locate("Finland ").is_none());
    }

    #[test]
    fn names_are_unique() {
        assert_eq!(Gazetteer::default().centroids.len(), CENTROIDS.len());
    }
}
