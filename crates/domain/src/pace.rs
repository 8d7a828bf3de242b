use std::{collections::BTreeMap, str::FromStr};

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{ExerciseDescriptor, KEY_LEARNED_PACE, KeyValueStore, KeywordTable, SetLog};

pub const SMOOTHING_FACTOR: f64 = 0.30;
pub const MIN_SECONDS_PER_REP: f64 = 0.6;
pub const MAX_SECONDS_PER_REP: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceProfile {
    pub seconds_per_rep: f64,
    pub rest_seconds: f64,
}

#[derive(
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Squat,
    Lunge,
    Deadlift,
    HipThrust,
    LegPress,
    CalfRaise,
    BenchPress,
    PushUp,
    Dip,
    OverheadPress,
    LateralRaise,
    Row,
    PullUp,
    Pulldown,
    Curl,
    TricepExtension,
    Crunch,
    LegRaise,
    Twist,
    Plank,
    Burpee,
    JumpingJack,
    Jump,
    MountainClimber,
    KettlebellSwing,
    Other,
}

impl Category {
    #[must_use]
    pub fn base_profile(self) -> PaceProfile {
        let (seconds_per_rep, rest_seconds) = match self {
            Category::Squat | Category::LegPress | Category::OverheadPress => (3.0, 75.),
            Category::Deadlift => (3.5, 90.),
            Category::BenchPress | Category::PullUp => (3.0, 90.),
            Category::Row | Category::Pulldown => (3.0, 60.),
            Category::Lunge
            | Category::HipThrust
            | Category::Dip
            | Category::LateralRaise
            | Category::Curl
            | Category::TricepExtension
            | Category::Other => (2.5, 45.),
            Category::PushUp | Category::LegRaise => (2.0, 45.),
            Category::Jump => (2.0, 60.),
            Category::Burpee => (3.0, 60.),
            Category::KettlebellSwing => (1.5, 60.),
            Category::CalfRaise | Category::Crunch => (1.5, 30.),
            Category::Twist | Category::Plank => (1.0, 30.),
            Category::JumpingJack => (0.8, 30.),
            Category::MountainClimber => (0.7, 30.),
        };
        PaceProfile {
            seconds_per_rep,
            rest_seconds,
        }
    }
}

#[derive(Serialize, Deserialize, AsRefStr, EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn pace_multiplier(self) -> f64 {
        match self {
            Difficulty::Beginner => 1.15,
            Difficulty::Intermediate => 1.0,
            Difficulty::Advanced => 0.9,
        }
    }

    #[must_use]
    pub fn rest_multiplier(self) -> f64 {
        match self {
            Difficulty::Beginner => 1.25,
            Difficulty::Intermediate => 1.0,
            Difficulty::Advanced => 0.8,
        }
    }
}

#[derive(Serialize, Deserialize, AsRefStr, EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Equipment {
    #[default]
    Bodyweight,
    Dumbbell,
    Barbell,
    Kettlebell,
    Machine,
    Cable,
    Band,
}

impl Equipment {
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Equipment::Bodyweight | Equipment::Band => 0.95,
            Equipment::Dumbbell | Equipment::Kettlebell | Equipment::Cable => 1.0,
            Equipment::Machine => 1.05,
            Equipment::Barbell => 1.1,
        }
    }
}

#[derive(Serialize, Deserialize, AsRefStr, EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tempo {
    Slow,
    #[default]
    Normal,
    Fast,
    Explosive,
}

impl Tempo {
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Tempo::Slow => 1.5,
            Tempo::Normal => 1.0,
            Tempo::Fast => 0.8,
            Tempo::Explosive => 0.65,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CategoryKeywords {
    category: Category,
    keywords: Vec<String>,
}

/// Parses an ordered `[{"category": ..., "keywords": [...]}]` list.
pub fn parse_category_table(json: &str) -> Result<KeywordTable<Category>, serde_json::Error> {
    Ok(KeywordTable::new(
        serde_json::from_str::<Vec<CategoryKeywords>>(json)?
            .into_iter()
            .map(|c| (c.category, c.keywords)),
    ))
}

#[must_use]
pub fn builtin_category_table() -> KeywordTable<Category> {
    KeywordTable::from_static(CATEGORY_KEYWORDS)
}

/// Per-category pace estimates, refined from observed sets.
///
/// Learned seconds-per-rep values replace the category's base value and are
/// written to the key-value store after every update. Storage failures are
/// logged and otherwise ignored.
pub struct PaceProvider<S> {
    store: S,
    categories: KeywordTable<Category>,
    learned: BTreeMap<Category, f64>,
}

impl<S: KeyValueStore> PaceProvider<S> {
    pub fn new(store: S) -> Self {
        Self::with_categories(store, builtin_category_table())
    }

    pub fn with_categories(store: S, categories: KeywordTable<Category>) -> Self {
        let learned = load_learned(&store);
        Self {
            store,
            categories,
            learned,
        }
    }

    #[must_use]
    pub fn category(&self, exercise_name: &str) -> Category {
        self.categories
            .classify(exercise_name)
            .copied()
            .unwrap_or(Category::Other)
    }

    #[must_use]
    pub fn learned(&self, category: Category) -> Option<f64> {
        self.learned.get(&category).copied()
    }

    #[must_use]
    pub fn pace(
        &self,
        exercise_name: &str,
        difficulty: Difficulty,
        equipment: Equipment,
        tempo: Tempo,
    ) -> PaceProfile {
        let category = self.category(exercise_name);
        let base = category.base_profile();
        let seconds_per_rep = self.learned(category).unwrap_or(base.seconds_per_rep)
            * tempo.multiplier()
            * difficulty.pace_multiplier()
            * equipment.multiplier();
        PaceProfile {
            seconds_per_rep: seconds_per_rep.max(0.),
            rest_seconds: (base.rest_seconds * difficulty.rest_multiplier()).max(0.),
        }
    }

    /// Folds an observed set into the learned pace of the exercise's category
    /// and returns the new value. Sets without reps are ignored.
    pub fn record(
        &mut self,
        exercise_name: &str,
        reps: u32,
        elapsed_seconds: f64,
        rest_seconds: f64,
    ) -> Option<f64> {
        if reps == 0 || !elapsed_seconds.is_finite() || !rest_seconds.is_finite() {
            return None;
        }

        let category = self.category(exercise_name);
        let observed = (elapsed_seconds - rest_seconds) / f64::from(reps);
        let previous = self
            .learned(category)
            .unwrap_or(category.base_profile().seconds_per_rep);
        let value = (SMOOTHING_FACTOR * observed + (1. - SMOOTHING_FACTOR) * previous)
            .clamp(MIN_SECONDS_PER_REP, MAX_SECONDS_PER_REP);

        debug!(
            "learned pace of {}: {previous:.2} -> {value:.2} s/rep",
            category.as_ref()
        );
        self.learned.insert(category, value);
        self.save();
        Some(value)
    }

    pub fn record_set(&mut self, exercise: &ExerciseDescriptor, set: &SetLog) -> Option<f64> {
        if exercise.is_duration_based() {
            return None;
        }
        self.record(&exercise.name, set.reps, f64::from(set.seconds), 0.)
    }

    /// Total seconds of all sets of an exercise including the rests between
    /// them.
    #[must_use]
    pub fn estimate_seconds(
        &self,
        exercise: &ExerciseDescriptor,
        difficulty: Difficulty,
        equipment: Equipment,
        tempo: Tempo,
    ) -> f64 {
        let pace = self.pace(&exercise.name, difficulty, equipment, tempo);
        let work = match exercise.duration_seconds() {
            Some(seconds) => f64::from(seconds),
            None => f64::from(exercise.target_reps().max(1)) * pace.seconds_per_rep,
        };
        let sets = f64::from(u32::from(exercise.sets));
        sets * work + (sets - 1.) * pace.rest_seconds
    }

    pub fn forget(&mut self, category: Category) {
        if self.learned.remove(&category).is_some() {
            self.save();
        }
    }

    pub fn reset(&mut self) {
        self.learned.clear();
        if let Err(err) = self.store.remove(KEY_LEARNED_PACE) {
            error!("failed to reset learned pace: {err}");
        }
    }

    fn save(&self) {
        let entries = self
            .learned
            .iter()
            .map(|(category, value)| (category.as_ref().to_string(), *value))
            .collect::<BTreeMap<_, _>>();
        if let Err(err) = self.store.write_json(KEY_LEARNED_PACE, &entries) {
            error!("failed to save learned pace: {err}");
        }
    }
}

fn load_learned(store: &impl KeyValueStore) -> BTreeMap<Category, f64> {
    match store.read_json::<BTreeMap<String, f64>>(KEY_LEARNED_PACE) {
        Ok(Some(entries)) => entries
            .into_iter()
            .filter_map(|(key, value)| {
                let category = Category::from_str(&key).ok()?;
                value
                    .is_finite()
                    .then(|| (category, value.clamp(MIN_SECONDS_PER_REP, MAX_SECONDS_PER_REP)))
            })
            .collect(),
        Ok(None) => BTreeMap::new(),
        Err(err) => {
            warn!("failed to load learned pace, using defaults: {err}");
            BTreeMap::new()
        }
    }
}

// More specific keywords first.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::LegPress, &["leg press", "prensa"]),
    (Category::HipThrust, &["hip thrust", "glute bridge", "bridge", "puente"]),
    (
        Category::Deadlift,
        &["deadlift", "rdl", "good morning", "peso muerto"],
    ),
    (Category::Burpee, &["burpee"]),
    (Category::MountainClimber, &["mountain climber", "escalador"]),
    (Category::JumpingJack, &["jumping jack", "star jump"]),
    (Category::KettlebellSwing, &["kettlebell swing", "swing"]),
    (Category::Jump, &["jump", "hop", "salto"]),
    (
        Category::Lunge,
        &["lunge", "split squat", "step-up", "step up", "zancada"],
    ),
    (Category::Squat, &["squat", "sentadilla", "wall sit"]),
    (Category::CalfRaise, &["calf"]),
    (
        Category::BenchPress,
        &["bench press", "chest press", "floor press", "incline press"],
    ),
    (
        Category::PushUp,
        &["push-up", "push up", "pushup", "press-up", "flexion"],
    ),
    (Category::Dip, &["dip", "fondos"]),
    (
        Category::OverheadPress,
        &["overhead press", "shoulder press", "military press", "arnold", "pike"],
    ),
    (
        Category::LateralRaise,
        &["lateral raise", "front raise", "rear delt"],
    ),
    (
        Category::PullUp,
        &["pull-up", "pull up", "pullup", "chin-up", "chin up", "dominada"],
    ),
    (Category::Pulldown, &["pulldown", "pull-down", "lat pull"]),
    (Category::Row, &["row", "remo"]),
    (Category::Curl, &["curl"]),
    (
        Category::TricepExtension,
        &["tricep", "skull crusher", "pushdown"],
    ),
    (
        Category::Crunch,
        &["crunch", "sit-up", "sit up", "situp", "abdominal"],
    ),
    (
        Category::LegRaise,
        &["leg raise", "knee raise", "flutter kick", "scissor"],
    ),
    (Category::Twist, &["twist", "woodchop", "russian"]),
    (Category::Plank, &["plank", "plancha", "hollow", "dead bug"]),
];

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use crate::{Sets, key_value::tests::TestStore};

    use super::*;

    #[rstest]
    #[case("Leg Press", Category::LegPress)]
    #[case("Barbell Hip Thrust", Category::HipThrust)]
    #[case("Romanian Deadlift", Category::Deadlift)]
    #[case("Jump Squat", Category::Jump)]
    #[case("Bulgarian Split Squat", Category::Lunge)]
    #[case("Goblet Squat", Category::Squat)]
    #[case("Incline Bench Press", Category::BenchPress)]
    #[case("Pike Push-Up", Category::PushUp)]
    #[case("Seated Shoulder Press", Category::OverheadPress)]
    #[case("Lat Pulldown", Category::Pulldown)]
    #[case("Bent Over Row", Category::Row)]
    #[case("Hammer Curl", Category::Curl)]
    #[case("Hanging Leg Raise", Category::LegRaise)]
    #[case("Russian Twist", Category::Twist)]
    #[case("Side Plank", Category::Plank)]
    #[case("Kettlebell Swing", Category::KettlebellSwing)]
    #[case("Farmer's Carry", Category::Other)]
    fn test_category(#[case] name: &str, #[case] expected: Category) {
        assert_eq!(PaceProvider::new(TestStore::default()).category(name), expected);
    }

    #[test]
    fn test_builtin_category_table_covers_all_categories() {
        let table = builtin_category_table();
        for category in Category::iter().filter(|c| *c != Category::Other) {
            assert!(
                table.iter().any(|(c, _)| *c == category),
                "{category:?} has no keywords"
            );
        }
    }

    #[rstest]
    #[case(Difficulty::Intermediate, Equipment::Dumbbell, Tempo::Normal, 3.0, 75.0)]
    #[case(Difficulty::Beginner, Equipment::Dumbbell, Tempo::Normal, 3.45, 93.75)]
    #[case(Difficulty::Advanced, Equipment::Barbell, Tempo::Slow, 4.455, 60.0)]
    #[case(Difficulty::Intermediate, Equipment::Bodyweight, Tempo::Explosive, 1.8525, 75.0)]
    fn test_pace_multipliers(
        #[case] difficulty: Difficulty,
        #[case] equipment: Equipment,
        #[case] tempo: Tempo,
        #[case] seconds_per_rep: f64,
        #[case] rest_seconds: f64,
    ) {
        let pace = PaceProvider::new(TestStore::default()).pace(
            "Back Squat",
            difficulty,
            equipment,
            tempo,
        );
        assert_approx_eq!(pace.seconds_per_rep, seconds_per_rep);
        assert_approx_eq!(pace.rest_seconds, rest_seconds);
    }

    #[test]
    fn test_pace_is_never_negative() {
        let pace = PaceProvider::new(TestStore::default());
        for category in Category::iter() {
            assert!(category.base_profile().seconds_per_rep > 0.);
        }
        for difficulty in Difficulty::iter() {
            for equipment in Equipment::iter() {
                for tempo in Tempo::iter() {
                    let profile = pace.pace("Burpee", difficulty, equipment, tempo);
                    assert!(profile.seconds_per_rep >= 0.);
                    assert!(profile.rest_seconds >= 0.);
                }
            }
        }
    }

    #[test]
    fn test_record() {
        let mut pace = PaceProvider::new(TestStore::default());

        let value = pace.record("Goblet Squat", 10, 45.0, 5.0).unwrap();

        assert_approx_eq!(value, 0.3 * 4.0 + 0.7 * 3.0);
        assert_eq!(pace.learned(Category::Squat), Some(value));

        let value = pace.record("Back Squat", 10, 20.0, 0.0).unwrap();

        assert_approx_eq!(value, 0.3 * 2.0 + 0.7 * 3.3);
        assert_approx_eq!(
            pace.pace("Squat", Difficulty::Intermediate, Equipment::Dumbbell, Tempo::Normal)
                .seconds_per_rep,
            value
        );
    }

    #[test]
    fn test_record_without_reps() {
        let store = TestStore::default();
        let mut pace = PaceProvider::new(&store);

        assert_eq!(pace.record("Push-Up", 0, 30.0, 0.0), None);
        assert_eq!(pace.learned(Category::PushUp), None);
        assert_eq!(store.read(KEY_LEARNED_PACE).unwrap(), None);
    }

    #[rstest]
    #[case(1000.0, MAX_SECONDS_PER_REP)]
    #[case(0.0, MIN_SECONDS_PER_REP)]
    fn test_record_converges_within_bounds(#[case] elapsed: f64, #[case] limit: f64) {
        let mut pace = PaceProvider::new(TestStore::default());
        let mut value = 0.;
        for _ in 0..50 {
            value = pace.record("Push-Up", 10, elapsed, 0.0).unwrap();
            assert!((MIN_SECONDS_PER_REP..=MAX_SECONDS_PER_REP).contains(&value));
        }
        assert_approx_eq!(value, limit, 1e-6);
    }

    #[test]
    fn test_record_converges_to_observed_pace() {
        let mut pace = PaceProvider::new(TestStore::default());
        let mut previous_error = f64::MAX;
        for _ in 0..30 {
            let value = pace.record("Pull-Up", 8, 40.0, 0.0).unwrap();
            let error = (value - 5.0).abs();
            assert!(error < previous_error);
            previous_error = error;
        }
        assert!(previous_error < 0.01);
    }

    #[test]
    fn test_learned_pace_is_persisted() {
        let store = TestStore::default();
        let value = {
            let mut pace = PaceProvider::new(&store);
            pace.record("Bench Press", 5, 25.0, 0.0).unwrap()
        };

        assert_eq!(
            store.read_json::<BTreeMap<String, f64>>(KEY_LEARNED_PACE).unwrap(),
            Some(BTreeMap::from([("bench_press".to_string(), value)]))
        );
        assert_eq!(
            PaceProvider::new(&store).learned(Category::BenchPress),
            Some(value)
        );
    }

    #[test]
    fn test_load_ignores_invalid_entries() {
        let store = TestStore::default();
        store
            .write(
                KEY_LEARNED_PACE,
                r#"{"squat": 12.0, "curl": 0.1, "unknown": 2.0}"#,
            )
            .unwrap();

        let pace = PaceProvider::new(&store);

        assert_eq!(pace.learned(Category::Squat), Some(MAX_SECONDS_PER_REP));
        assert_eq!(pace.learned(Category::Curl), Some(MIN_SECONDS_PER_REP));
        assert_eq!(pace.learned(Category::Other), None);
    }

    #[test]
    fn test_load_corrupt_data_uses_defaults() {
        let store = TestStore::default();
        store.write(KEY_LEARNED_PACE, "[1, 2").unwrap();

        let pace = PaceProvider::new(&store);

        assert_eq!(pace.learned(Category::Squat), None);
    }

    #[test]
    fn test_record_with_failing_store() {
        let mut pace = PaceProvider::new(TestStore::failing());

        assert!(pace.record("Curl", 10, 30.0, 0.0).is_some());
        assert!(pace.learned(Category::Curl).is_some());
    }

    #[test]
    fn test_forget_and_reset() {
        let store = TestStore::default();
        let mut pace = PaceProvider::new(&store);
        pace.record("Curl", 10, 30.0, 0.0);
        pace.record("Row", 10, 30.0, 0.0);

        pace.forget(Category::Curl);

        assert_eq!(pace.learned(Category::Curl), None);
        assert!(pace.learned(Category::Row).is_some());

        pace.reset();

        assert_eq!(pace.learned(Category::Row), None);
        assert_eq!(store.read(KEY_LEARNED_PACE).unwrap(), None);
    }

    #[test]
    fn test_record_set() {
        let mut pace = PaceProvider::new(TestStore::default());
        let squat = ExerciseDescriptor::new("Squat", Sets::ONE).with_reps("10");
        let plank = ExerciseDescriptor::new("Plank", Sets::ONE).with_duration("30s");
        let set = SetLog {
            exercise_idx: 0,
            set: 1,
            weight: 0.,
            reps: 10,
            seconds: 30,
        };

        assert_eq!(pace.record_set(&plank, &set), None);
        assert_approx_eq!(pace.record_set(&squat, &set).unwrap(), 3.0);
    }

    #[test]
    fn test_estimate_seconds() {
        let pace = PaceProvider::new(TestStore::default());
        let squat = ExerciseDescriptor::new("Squat", Sets::new(3).unwrap()).with_reps("10");
        let plank = ExerciseDescriptor::new("Plank", Sets::new(2).unwrap()).with_duration("45s");

        assert_approx_eq!(
            pace.estimate_seconds(&squat, Difficulty::Intermediate, Equipment::Dumbbell, Tempo::Normal),
            3. * 30. + 2. * 75.
        );
        assert_approx_eq!(
            pace.estimate_seconds(&plank, Difficulty::Intermediate, Equipment::Dumbbell, Tempo::Normal),
            2. * 45. + 30.
        );
    }

    #[test]
    fn test_custom_category_table() {
        let categories =
            parse_category_table(r#"[{"category": "curl", "keywords": ["squat"]}]"#).unwrap();
        let pace = PaceProvider::with_categories(TestStore::default(), categories);

        assert_eq!(pace.category("Back Squat"), Category::Curl);
        assert_eq!(pace.category("Hammer Curl"), Category::Other);
        assert!(parse_category_table(r#"[{"category": "yoga", "keywords": []}]"#).is_err());
    }
}
