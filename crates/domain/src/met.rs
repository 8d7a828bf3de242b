use chrono::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::{ExerciseDescriptor, KeywordTable, text};

pub const MIN_MET: f64 = 1.0;
pub const DEFAULT_DURATION_MET: f64 = 8.0;
pub const DEFAULT_REP_MET: f64 = 5.0;

/// Alias keywords sharing one MET value, as stored in the MET resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetEntry {
    pub keywords: Vec<String>,
    pub met: f64,
}

impl MetEntry {
    pub fn new(keywords: &[&str], met: f64) -> Result<Self, MetError> {
        let keywords = keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !text::fold(k).is_empty())
            .collect::<Vec<_>>();

        if keywords.is_empty() {
            return Err(MetError::NoKeywords);
        }

        if !met.is_finite() || met <= 0. {
            return Err(MetError::InvalidValue(met));
        }

        Ok(Self { keywords, met })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MetError {
    #[error("At least one keyword is required")]
    NoKeywords,
    #[error("MET value must be a positive number ({0})")]
    InvalidValue(f64),
    #[error("Invalid MET table: {0}")]
    InvalidTable(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetDefaults {
    pub duration_based: f64,
    pub rep_based: f64,
}

impl Default for MetDefaults {
    fn default() -> Self {
        Self {
            duration_based: DEFAULT_DURATION_MET,
            rep_based: DEFAULT_REP_MET,
        }
    }
}

/// MET lookup for free-text exercise names.
///
/// Custom entries are checked first (newest first), then the built-in table
/// in order, then the caller's default. Results never drop below `MIN_MET`.
#[derive(Debug, Clone)]
pub struct MetProvider {
    table: KeywordTable<f64>,
    custom: KeywordTable<f64>,
    custom_entries: Vec<MetEntry>,
    body_parts: KeywordTable<BodyPart>,
    defaults: MetDefaults,
}

impl MetProvider {
    #[must_use]
    pub fn new(table: KeywordTable<f64>, defaults: MetDefaults) -> Self {
        Self {
            table,
            custom: KeywordTable::default(),
            custom_entries: vec![],
            body_parts: KeywordTable::from_static(BODY_PARTS),
            defaults,
        }
    }

    /// Uses the table from a JSON resource, or the built-in table if the
    /// resource is missing or malformed.
    #[must_use]
    pub fn load(resource: Option<&str>) -> Self {
        let table = match resource.map(parse_table) {
            Some(Ok(table)) => {
                debug!("loaded MET table with {} entries", table.len());
                table
            }
            Some(Err(err)) => {
                warn!("failed to load MET table, using built-in table: {err}");
                builtin_table()
            }
            None => builtin_table(),
        };
        Self::new(table, MetDefaults::default())
    }

    #[must_use]
    pub fn lookup(&self, name: &str, default: f64) -> f64 {
        let met = self
            .custom
            .classify_newest(name)
            .or_else(|| self.table.classify(name))
            .copied()
            .unwrap_or(default);
        if met.is_finite() {
            met.max(MIN_MET)
        } else {
            MIN_MET
        }
    }

    #[must_use]
    pub fn lookup_exercise(&self, exercise: &ExerciseDescriptor) -> f64 {
        self.lookup(
            &exercise.name,
            if exercise.is_duration_based() {
                self.defaults.duration_based
            } else {
                self.defaults.rep_based
            },
        )
    }

    pub fn register(&mut self, entry: MetEntry) {
        self.custom.push(entry.met, &entry.keywords);
        self.custom_entries.push(entry);
    }

    #[must_use]
    pub fn custom_entries(&self) -> &[MetEntry] {
        &self.custom_entries
    }

    pub fn clear_custom_entries(&mut self) {
        self.custom = KeywordTable::default();
        self.custom_entries.clear();
    }

    #[must_use]
    pub fn body_part(&self, name: &str) -> BodyPart {
        self.body_parts
            .classify(name)
            .copied()
            .unwrap_or(BodyPart::Other)
    }
}

impl Default for MetProvider {
    fn default() -> Self {
        Self::new(builtin_table(), MetDefaults::default())
    }
}

/// Energy expenditure in kcal: MET x body weight (kg) x hours.
#[must_use]
pub fn estimate_calories(met: f64, body_weight_kg: f32, duration: Duration) -> f64 {
    if !met.is_finite() || !body_weight_kg.is_finite() || body_weight_kg <= 0. {
        return 0.;
    }
    #[allow(clippy::cast_precision_loss)]
    let hours = duration.num_seconds().max(0) as f64 / 3600.;
    met.max(MIN_MET) * f64::from(body_weight_kg) * hours
}

fn parse_table(json: &str) -> Result<KeywordTable<f64>, MetError> {
    let entries = serde_json::from_str::<Vec<MetEntry>>(json)
        .map_err(|err| MetError::InvalidTable(err.to_string()))?;
    if entries.is_empty() {
        return Err(MetError::InvalidTable("no entries".to_string()));
    }
    entries
        .into_iter()
        .map(|e| {
            let keywords = e.keywords.iter().map(String::as_str).collect::<Vec<_>>();
            MetEntry::new(&keywords, e.met).map(|e| (e.met, e.keywords))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|rows| KeywordTable::new(rows))
}

#[must_use]
pub fn builtin_table() -> KeywordTable<f64> {
    KeywordTable::from_static(BUILTIN_MET_TABLE)
}

// Highest intensity first.
const BUILTIN_MET_TABLE: &[(f64, &[&str])] = &[
    (12.3, &["jump rope", "skipping", "double under", "comba"]),
    (10.0, &["sprint", "battle rope", "high knees"]),
    (9.8, &["running", "jogging", "jog", "treadmill", "correr"]),
    (9.8, &["kettlebell", "thruster", "snatch", "clean and"]),
    (8.0, &["burpee"]),
    (8.0, &["mountain climber", "escalador"]),
    (8.0, &["jumping jack", "star jump", "tijeras"]),
    (8.0, &["jump", "salto", "hop"]),
    (8.0, &["hiit", "tabata", "circuit", "circuito"]),
    (
        8.0,
        &["pull-up", "pull up", "pullup", "chin-up", "chin up", "dominada"],
    ),
    (7.5, &["cycling", "bike", "spinning", "bicicleta"]),
    (7.0, &["rowing machine", "ergometer"]),
    (6.0, &["dip", "fondos"]),
    (
        5.0,
        &["squat", "lunge", "deadlift", "sentadilla", "zancada", "peso muerto"],
    ),
    (5.0, &["hip thrust", "step-up", "step up", "bridge", "puente"]),
    (
        3.8,
        &["push-up", "push up", "pushup", "press-up", "flexion", "lagartija"],
    ),
    (
        3.8,
        &["plank", "crunch", "sit-up", "sit up", "abdominal", "plancha"],
    ),
    (3.8, &["leg raise", "twist", "dead bug", "hollow", "superman"]),
    (3.5, &["walk", "caminar", "march"]),
    (
        3.5,
        &["press", "row", "curl", "extension", "raise", "fly", "pulldown", "remo"],
    ),
    (2.5, &["stretch", "yoga", "mobility", "estiramiento", "foam roll"]),
];

#[derive(Serialize, Deserialize, AsRefStr, EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BodyPart {
    FullBody,
    Cardio,
    Legs,
    Arms,
    Glutes,
    Back,
    Chest,
    Shoulders,
    Core,
    Other,
}

const BODY_PARTS: &[(BodyPart, &[&str])] = &[
    (
        BodyPart::FullBody,
        &["thruster", "clean and", "snatch", "kettlebell swing", "turkish", "bear crawl"],
    ),
    (
        BodyPart::Cardio,
        &[
            "running",
            "jog",
            "jump rope",
            "skipping",
            "cycling",
            "bike",
            "rowing machine",
            "jumping jack",
            "burpee",
            "mountain climber",
            "high knees",
            "sprint",
        ],
    ),
    (
        BodyPart::Legs,
        &[
            "squat",
            "lunge",
            "leg press",
            "leg curl",
            "leg extension",
            "calf",
            "step-up",
            "step up",
            "wall sit",
            "sentadilla",
            "zancada",
        ],
    ),
    (
        BodyPart::Arms,
        &["curl", "tricep", "bicep", "skull crusher", "pushdown"],
    ),
    (
        BodyPart::Glutes,
        &["hip thrust", "glute", "bridge", "kickback", "donkey"],
    ),
    (
        BodyPart::Back,
        &[
            "deadlift", "row", "pull-up", "pull up", "pullup", "chin-up", "chin up", "pulldown",
            "superman", "back extension", "dominada",
        ],
    ),
    (
        BodyPart::Chest,
        &["bench", "push-up", "push up", "pushup", "chest", "fly", "dip", "pecho"],
    ),
    (
        BodyPart::Shoulders,
        &[
            "overhead",
            "shoulder",
            "military",
            "lateral raise",
            "front raise",
            "arnold",
            "pike",
            "hombro",
        ],
    ),
    (
        BodyPart::Core,
        &[
            "plank", "crunch", "sit-up", "sit up", "abs", "abdominal", "leg raise", "twist",
            "hollow", "dead bug", "core",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::Sets;

    use super::*;

    #[rstest]
    #[case("Jump Rope", 12.3)]
    #[case("Jump Squat", 8.0)]
    #[case("Burpee Pull-Up", 8.0)]
    #[case("Walking Lunge", 5.0)]
    #[case("Crunch", 3.8)]
    #[case("Bench Press", 3.5)]
    #[case("Sentadilla búlgara", 5.0)]
    #[case("Flexión diamante", 3.8)]
    #[case("Cat-Cow Stretch", 2.5)]
    fn test_lookup_builtin(#[case] name: &str, #[case] expected: f64) {
        assert_approx_eq!(MetProvider::default().lookup(name, 4.0), expected);
    }

    #[test]
    fn test_lookup_default_and_floor() {
        let met = MetProvider::default();
        assert_approx_eq!(met.lookup("Zercher carry", 4.5), 4.5);
        assert_approx_eq!(met.lookup("Zercher carry", 0.2), MIN_MET);
        assert_approx_eq!(met.lookup("Zercher carry", f64::NAN), MIN_MET);
    }

    #[test]
    fn test_lookup_custom_overrides_builtin() {
        let mut met = MetProvider::default();
        met.register(MetEntry::new(&["squat"], 6.5).unwrap());

        assert_approx_eq!(met.lookup("Goblet Squat", 1.0), 6.5);
        assert_approx_eq!(met.lookup("Jump Squat", 1.0), 6.5);
        assert_approx_eq!(met.lookup("Plank", 1.0), 3.8);
    }

    #[test]
    fn test_lookup_newest_custom_entry_wins() {
        let mut met = MetProvider::default();
        met.register(MetEntry::new(&["zercher"], 6.0).unwrap());
        met.register(MetEntry::new(&["Zércher carry"], 7.0).unwrap());

        assert_approx_eq!(met.lookup("zercher carry", 1.0), 7.0);
        assert_approx_eq!(met.lookup("zercher squat", 1.0), 6.0);
        assert_eq!(met.custom_entries().len(), 2);

        met.clear_custom_entries();

        assert_approx_eq!(met.lookup("zercher squat", 1.0), 5.0);
    }

    #[test]
    fn test_lookup_exercise_default_by_kind() {
        let met = MetProvider::default();
        let rep_based = ExerciseDescriptor::new("Zercher carry", Sets::ONE).with_reps("10");
        let duration_based = rep_based.clone().with_duration("30s");

        assert_approx_eq!(met.lookup_exercise(&rep_based), DEFAULT_REP_MET);
        assert_approx_eq!(met.lookup_exercise(&duration_based), DEFAULT_DURATION_MET);
    }

    #[rstest]
    #[case(&[], 5.0, Err(MetError::NoKeywords))]
    #[case(&[" ", ""], 5.0, Err(MetError::NoKeywords))]
    #[case(&["row"], 0.0, Err(MetError::InvalidValue(0.0)))]
    #[case(&["row"], -1.0, Err(MetError::InvalidValue(-1.0)))]
    #[case(&[" row "], 4.0, Ok(MetEntry { keywords: vec!["row".to_string()], met: 4.0 }))]
    fn test_met_entry_new(
        #[case] keywords: &[&str],
        #[case] met: f64,
        #[case] expected: Result<MetEntry, MetError>,
    ) {
        assert_eq!(MetEntry::new(keywords, met), expected);
    }

    #[test]
    fn test_load_resource() {
        let met = MetProvider::load(Some(
            r#"[{"keywords": ["zercher"], "met": 6.0}, {"keywords": ["squat"], "met": 5.5}]"#,
        ));
        assert_approx_eq!(met.lookup("Zercher squat", 1.0), 6.0);
        assert_approx_eq!(met.lookup("Back squat", 1.0), 5.5);
        assert_approx_eq!(met.lookup("Burpee", 1.0), 1.0);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("{"))]
    #[case(Some("[]"))]
    #[case(Some(r#"[{"keywords": [], "met": 6.0}]"#))]
    fn test_load_resource_fallback(#[case] resource: Option<&str>) {
        let met = MetProvider::load(resource);
        assert_approx_eq!(met.lookup("Burpee", 1.0), 8.0);
    }

    #[rstest]
    #[case("Barbell Thruster", BodyPart::FullBody)]
    #[case("Burpee", BodyPart::Cardio)]
    #[case("Back Squat", BodyPart::Legs)]
    #[case("Leg Curl", BodyPart::Legs)]
    #[case("Tricep Kickback", BodyPart::Arms)]
    #[case("Glute Kickback", BodyPart::Glutes)]
    #[case("Lat Pulldown", BodyPart::Back)]
    #[case("Machine Chest Press", BodyPart::Chest)]
    #[case("Lateral Raise", BodyPart::Shoulders)]
    #[case("Leg Raise", BodyPart::Core)]
    #[case("Farmer's carry", BodyPart::Other)]
    fn test_body_part(#[case] name: &str, #[case] expected: BodyPart) {
        assert_eq!(MetProvider::default().body_part(name), expected);
    }

    #[rstest]
    #[case(8.0, 70.0, 1800, 280.0)]
    #[case(3.5, 80.0, 3600, 280.0)]
    #[case(0.5, 60.0, 3600, 60.0)]
    #[case(5.0, 0.0, 3600, 0.0)]
    #[case(5.0, 70.0, -10, 0.0)]
    fn test_estimate_calories(
        #[case] met: f64,
        #[case] body_weight: f32,
        #[case] seconds: i64,
        #[case] expected: f64,
    ) {
        assert_approx_eq!(
            estimate_calories(met, body_weight, Duration::seconds(seconds)),
            expected
        );
    }
}
