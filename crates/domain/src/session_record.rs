use chrono::NaiveDate;
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, ReadError};

#[allow(async_fn_in_trait)]
pub trait SessionRecordService {
    async fn get_session_records(&self) -> Result<Vec<SessionRecord>, ReadError>;
    async fn create_session_record(
        &self,
        title: String,
        summary: SessionSummary,
    ) -> Result<SessionRecord, CreateError>;
    async fn delete_session_record(
        &self,
        id: SessionRecordID,
    ) -> Result<SessionRecordID, DeleteError>;

    async fn get_session_records_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<SessionRecord>, ReadError> {
        Ok(self
            .get_session_records()
            .await?
            .into_iter()
            .filter(|r| r.date == date)
            .collect())
    }
}

#[allow(async_fn_in_trait)]
pub trait SessionRecordRepository {
    async fn read_session_records(&self) -> Result<Vec<SessionRecord>, ReadError>;
    async fn create_session_record(
        &self,
        title: String,
        summary: SessionSummary,
    ) -> Result<SessionRecord, CreateError>;
    async fn delete_session_record(
        &self,
        id: SessionRecordID,
    ) -> Result<SessionRecordID, DeleteError>;
}

/// Result of a finished workout, before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub date: NaiveDate,
    pub duration_seconds: u32,
    pub calories: f64,
    pub exercises: Vec<LoggedExercise>,
}

/// A stored workout. Records are never changed after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: SessionRecordID,
    pub title: String,
    pub date: NaiveDate,
    pub duration_seconds: u32,
    pub calories: f64,
    pub exercises: Vec<LoggedExercise>,
}

impl SessionRecord {
    #[must_use]
    pub fn new(id: SessionRecordID, title: String, summary: SessionSummary) -> Self {
        Self {
            id,
            title,
            date: summary.date,
            duration_seconds: summary.duration_seconds,
            calories: summary.calories,
            exercises: summary.exercises,
        }
    }

    #[must_use]
    pub fn sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn reps(&self) -> u32 {
        self.exercises.iter().map(LoggedExercise::reps).sum()
    }

    /// Sum of weight times reps over all sets.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.exercises.iter().map(LoggedExercise::volume).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedExercise {
    pub name: String,
    pub sets: Vec<LoggedSet>,
}

impl LoggedExercise {
    #[must_use]
    pub fn reps(&self) -> u32 {
        self.sets.iter().map(|s| s.reps).sum()
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn volume(&self) -> f32 {
        self.sets.iter().map(|s| s.weight * s.reps as f32).sum()
    }

    #[must_use]
    pub fn max_weight(&self) -> Option<f32> {
        self.sets.iter().map(|s| s.weight).reduce(f32::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggedSet {
    pub set: u32,
    pub weight: f32,
    pub reps: u32,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionRecordID(Uuid);

impl SessionRecordID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for SessionRecordID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SessionRecordID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    fn record() -> SessionRecord {
        SessionRecord::new(
            1.into(),
            "Legs".to_string(),
            SessionSummary {
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                duration_seconds: 1800,
                calories: 175.0,
                exercises: vec![
                    LoggedExercise {
                        name: "Squat".to_string(),
                        sets: vec![
                            LoggedSet {
                                set: 1,
                                weight: 60.0,
                                reps: 10,
                            },
                            LoggedSet {
                                set: 2,
                                weight: 70.0,
                                reps: 8,
                            },
                        ],
                    },
                    LoggedExercise {
                        name: "Plank".to_string(),
                        sets: vec![LoggedSet {
                            set: 1,
                            weight: 0.0,
                            reps: 0,
                        }],
                    },
                ],
            },
        )
    }

    #[test]
    fn test_session_record_id_nil() {
        assert!(SessionRecordID::nil().is_nil());
        assert_eq!(SessionRecordID::nil(), SessionRecordID::default());
    }

    #[test]
    fn test_session_record_totals() {
        let record = record();
        assert_eq!(record.sets(), 3);
        assert_eq!(record.reps(), 18);
        assert_approx_eq!(record.volume(), 1160.0);
        assert_eq!(record.exercises[0].max_weight(), Some(70.0));
        assert_eq!(
            LoggedExercise {
                name: "Row".to_string(),
                sets: vec![]
            }
            .max_weight(),
            None
        );
    }
}
