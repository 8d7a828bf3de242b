use log::warn;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{
    KEY_BODY_WEIGHT, KEY_FAVORITE_EXERCISES, KEY_GOAL, KEY_SETTINGS, KeyValueStore, Settings,
    StorageError, ValidationError, text,
};

pub const MIN_BODY_WEIGHT: f32 = 20.0;
pub const MAX_BODY_WEIGHT: f32 = 400.0;
pub const DEFAULT_BODY_WEIGHT: f32 = 70.0;

#[derive(
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    BuildMuscle,
    Endurance,
    #[default]
    Maintain,
}

/// Personal data kept in the key-value store.
///
/// Reads never fail: missing or unreadable values fall back to defaults and
/// the problem is logged.
pub struct ProfileService<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Favorite exercise names in the order they were added.
    #[must_use]
    pub fn favorites(&self) -> Vec<String> {
        self.read_or_default(KEY_FAVORITE_EXERCISES)
    }

    #[must_use]
    pub fn is_favorite(&self, exercise_name: &str) -> bool {
        let folded = text::fold(exercise_name);
        self.favorites().iter().any(|f| text::fold(f) == folded)
    }

    /// Adds or removes the exercise and returns whether it is a favorite
    /// afterwards.
    pub fn toggle_favorite(&self, exercise_name: &str) -> Result<bool, StorageError> {
        let folded = text::fold(exercise_name);
        if folded.is_empty() {
            return Ok(false);
        }

        let mut favorites = self.favorites();
        let len = favorites.len();
        favorites.retain(|f| text::fold(f) != folded);
        let added = favorites.len() == len;
        if added {
            favorites.push(exercise_name.trim().to_string());
        }

        self.store.write_json(KEY_FAVORITE_EXERCISES, &favorites)?;
        Ok(added)
    }

    #[must_use]
    pub fn goal(&self) -> Goal {
        self.read_or_default(KEY_GOAL)
    }

    pub fn set_goal(&self, goal: Goal) -> Result<(), StorageError> {
        self.store.write_json(KEY_GOAL, &goal)
    }

    #[must_use]
    pub fn body_weight(&self) -> f32 {
        self.store
            .read_json::<f32>(KEY_BODY_WEIGHT)
            .unwrap_or_else(|err| {
                warn!("failed to read body weight: {err}");
                None
            })
            .filter(|w| (MIN_BODY_WEIGHT..=MAX_BODY_WEIGHT).contains(w))
            .unwrap_or(DEFAULT_BODY_WEIGHT)
    }

    /// Stores the body weight if it lies within the accepted range.
    pub fn set_body_weight(&self, kg: f32) -> Result<(), ValidationError> {
        let kg = check_body_weight_range(kg)?;
        self.store
            .write_json(KEY_BODY_WEIGHT, &kg)
            .map_err(|err| ValidationError::Other(err.into()))
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.read_or_default(KEY_SETTINGS)
    }

    pub fn set_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.store.write_json(KEY_SETTINGS, settings)
    }

    fn read_or_default<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.read_json::<T>(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                warn!("failed to read {key}: {err}");
                T::default()
            }
        }
    }
}

pub fn validate_body_weight(weight: &str) -> Result<f32, ValidationError> {
    match weight.replace(',', ".").trim().parse::<f32>() {
        Ok(parsed_weight) => check_body_weight_range(parsed_weight),
        Err(_) => Err(ValidationError::Other(
            "Body weight must be a decimal number".into(),
        )),
    }
}

fn check_body_weight_range(kg: f32) -> Result<f32, ValidationError> {
    if (MIN_BODY_WEIGHT..=MAX_BODY_WEIGHT).contains(&kg) {
        Ok(kg)
    } else {
        Err(ValidationError::Other(
            format!("Body weight must be between {MIN_BODY_WEIGHT} and {MAX_BODY_WEIGHT} kg")
                .into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{WeightUnit, key_value::tests::TestStore};

    use super::*;

    #[test]
    fn test_defaults() {
        let profile = ProfileService::new(TestStore::default());

        assert!(profile.favorites().is_empty());
        assert_eq!(profile.goal(), Goal::Maintain);
        assert_eq!(profile.body_weight(), DEFAULT_BODY_WEIGHT);
        assert_eq!(profile.settings(), Settings::default());
    }

    #[test]
    fn test_toggle_favorite() {
        let store = TestStore::default();
        let profile = ProfileService::new(&store);

        assert!(profile.toggle_favorite(" Goblet Squat ").unwrap());
        assert!(profile.toggle_favorite("Plank").unwrap());
        assert!(profile.is_favorite("goblet squat"));
        assert_eq!(profile.favorites(), vec!["Goblet Squat", "Plank"]);

        assert!(!profile.toggle_favorite("GOBLET SQUAT").unwrap());
        assert!(!profile.is_favorite("Goblet Squat"));
        assert_eq!(profile.favorites(), vec!["Plank"]);

        assert!(!profile.toggle_favorite("  ").unwrap());
        assert_eq!(
            store.entries.borrow().get(KEY_FAVORITE_EXERCISES).unwrap(),
            r#"["Plank"]"#
        );
    }

    #[test]
    fn test_toggle_favorite_write_failure() {
        let profile = ProfileService::new(TestStore::failing());

        assert!(matches!(
            profile.toggle_favorite("Plank"),
            Err(StorageError::Other(_))
        ));
        assert!(profile.favorites().is_empty());
    }

    #[test]
    fn test_goal_and_settings() {
        let profile = ProfileService::new(TestStore::default());
        let settings = Settings {
            rest_seconds: 60,
            weight_unit: WeightUnit::Lb,
            ..Settings::default()
        };

        profile.set_goal(Goal::BuildMuscle).unwrap();
        profile.set_settings(&settings).unwrap();

        assert_eq!(profile.goal(), Goal::BuildMuscle);
        assert_eq!(profile.settings(), settings);
    }

    #[test]
    fn test_corrupt_values_fall_back_to_defaults() {
        let store = TestStore::default();
        store
            .entries
            .borrow_mut()
            .insert(KEY_GOAL.to_string(), "\"bulk\"".to_string());
        store
            .entries
            .borrow_mut()
            .insert(KEY_BODY_WEIGHT.to_string(), "5000".to_string());
        let profile = ProfileService::new(&store);

        assert_eq!(profile.goal(), Goal::Maintain);
        assert_eq!(profile.body_weight(), DEFAULT_BODY_WEIGHT);

        profile.set_body_weight(82.5).unwrap();
        assert_eq!(profile.body_weight(), 82.5);
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(-72.0)]
    #[case(19.9)]
    #[case(1000.0)]
    fn test_set_body_weight_out_of_range(#[case] kg: f32) {
        let store = TestStore::default();
        let profile = ProfileService::new(&store);
        profile.set_body_weight(82.5).unwrap();

        assert_eq!(
            profile.set_body_weight(kg).map_err(|err| err.to_string()),
            Err("Body weight must be between 20 and 400 kg".to_string())
        );
        assert_eq!(profile.body_weight(), 82.5);
        assert_eq!(
            store.entries.borrow().get(KEY_BODY_WEIGHT).unwrap(),
            "82.5"
        );
    }

    #[test]
    fn test_set_body_weight_write_failure() {
        let profile = ProfileService::new(TestStore::failing());

        assert_eq!(
            profile.set_body_weight(82.5).map_err(|err| err.to_string()),
            Err("disk full".to_string())
        );
    }

    #[rstest]
    #[case("72.5", Ok(72.5))]
    #[case(" 80,0 ", Ok(80.0))]
    #[case("10", Err("Body weight must be between 20 and 400 kg"))]
    #[case("heavy", Err("Body weight must be a decimal number"))]
    fn test_validate_body_weight(#[case] weight: &str, #[case] expected: Result<f32, &str>) {
        assert_eq!(
            validate_body_weight(weight).map_err(|err| err.to_string()),
            expected.map_err(str::to_string)
        );
    }
}
