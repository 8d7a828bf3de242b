use derive_more::{AsRef, Display};

use crate::text;

/// Trimmed, non-empty display name of a workout or exercise.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LEN: usize = 64;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len > Self::MAX_LEN {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name))
    }

    /// Case and diacritic folded form used for lookups and uniqueness checks.
    #[must_use]
    pub fn folded(&self) -> String {
        text::fold(&self.0)
    }

    #[must_use]
    pub fn matches(&self, other: &Name) -> bool {
        self.folded() == other.folded()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
