use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::{DEFAULT_REST_SECONDS, Difficulty, Tempo, text::POUND_IN_KG};

/// User preferences, persisted as one JSON value.
///
/// Missing fields take their default values, so settings written by older
/// versions stay readable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub rest_seconds: u32,
    /// Complete timed sets and end rests when their countdown runs out.
    pub auto_advance: bool,
    pub weight_unit: WeightUnit,
    pub difficulty: Difficulty,
    pub tempo: Tempo,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_seconds: DEFAULT_REST_SECONDS,
            auto_advance: true,
            weight_unit: WeightUnit::default(),
            difficulty: Difficulty::default(),
            tempo: Tempo::default(),
        }
    }
}

#[derive(
    Serialize, Deserialize, AsRefStr, EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    #[must_use]
    pub fn convert_kg(self, kg: f32) -> f32 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg / POUND_IN_KG,
        }
    }

    #[must_use]
    pub fn to_kg(self, value: f32) -> f32 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * POUND_IN_KG,
        }
    }
}
