use derive_more::{Deref, Display, Into};

use crate::text;

/// Shortest countdown a duration-based set can have.
pub const MIN_DURATION_SECONDS: u32 = 1;

/// One exercise of a plan day or custom workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDescriptor {
    pub name: String,
    pub sets: Sets,
    pub reps: Option<String>,
    pub duration: Option<String>,
    pub weight: Option<String>,
    pub notes: String,
}

impl ExerciseDescriptor {
    #[must_use]
    pub fn new(name: &str, sets: Sets) -> Self {
        Self {
            name: name.trim().to_string(),
            sets,
            reps: None,
            duration: None,
            weight: None,
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_reps(mut self, reps: &str) -> Self {
        self.reps = Some(reps.to_string());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: &str) -> Self {
        self.duration = Some(duration.to_string());
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: &str) -> Self {
        self.weight = Some(weight.to_string());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    #[must_use]
    pub fn is_duration_based(&self) -> bool {
        self.duration.as_ref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Countdown length of one set, `None` for rep-based exercises.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<u32> {
        if !self.is_duration_based() {
            return None;
        }
        self.duration
            .as_deref()
            .map(|d| text::parse_duration_seconds(d).max(MIN_DURATION_SECONDS))
    }

    #[must_use]
    pub fn target_reps(&self) -> u32 {
        self.reps.as_deref().map_or(0, text::parse_reps)
    }

    #[must_use]
    pub fn weight_kg(&self) -> f32 {
        self.weight.as_deref().map_or(0., text::parse_weight)
    }
}

#[derive(Deref, Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub const ONE: Sets = Sets(1);

    pub fn new(value: u32) -> Result<Self, SetsError> {
        if !(1..100).contains(&value) {
            return Err(SetsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Sets {
    type Error = SetsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Sets::new(parsed_value),
            Err(_) => Err(SetsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetsError {
    #[error("Sets must be in the range 1 to 99")]
    OutOfRange,
    #[error("Sets must be an integer")]
    ParseError,
}
