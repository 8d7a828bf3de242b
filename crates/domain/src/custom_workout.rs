use chrono::NaiveDate;
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseDescriptor, Name, ReadError, UpdateError, ValidationError,
};

#[allow(async_fn_in_trait)]
pub trait CustomWorkoutService {
    async fn get_custom_workouts(&self) -> Result<Vec<CustomWorkout>, ReadError>;
    async fn create_custom_workout(
        &self,
        name: Name,
        exercises: Vec<ExerciseDescriptor>,
    ) -> Result<CustomWorkout, CreateError>;
    async fn replace_custom_workout(
        &self,
        custom_workout: CustomWorkout,
    ) -> Result<CustomWorkout, UpdateError>;
    async fn delete_custom_workout(
        &self,
        id: CustomWorkoutID,
    ) -> Result<CustomWorkoutID, DeleteError>;

    async fn validate_custom_workout_name(
        &self,
        name: &str,
        id: CustomWorkoutID,
    ) -> Result<Name, ValidationError> {
        match Name::new(name) {
            Ok(name) => match self.get_custom_workouts().await {
                Ok(custom_workouts) => {
                    if custom_workouts
                        .iter()
                        .all(|w| w.id == id || !w.name.matches(&name))
                    {
                        Ok(name)
                    } else {
                        Err(ValidationError::Conflict("name".to_string()))
                    }
                }
                Err(err) => Err(ValidationError::Other(err.into())),
            },
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait CustomWorkoutRepository {
    async fn read_custom_workouts(&self) -> Result<Vec<CustomWorkout>, ReadError>;
    async fn create_custom_workout(
        &self,
        name: Name,
        exercises: Vec<ExerciseDescriptor>,
    ) -> Result<CustomWorkout, CreateError>;
    async fn replace_custom_workout(
        &self,
        custom_workout: CustomWorkout,
    ) -> Result<CustomWorkout, UpdateError>;
    async fn delete_custom_workout(
        &self,
        id: CustomWorkoutID,
    ) -> Result<CustomWorkoutID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomWorkout {
    pub id: CustomWorkoutID,
    pub name: Name,
    pub created: NaiveDate,
    pub exercises: Vec<ExerciseDescriptor>,
}

impl CustomWorkout {
    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().map(|e| u32::from(e.sets)).sum()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomWorkoutID(Uuid);

impl CustomWorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for CustomWorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for CustomWorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
