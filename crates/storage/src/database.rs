use std::str::FromStr;

use chrono::{Local, NaiveDate};
use log::debug;
use repwise_domain::{self as domain, KeyValueStore};
use serde::{Serialize, de::DeserializeOwned};
use strum::AsRefStr;
use uuid::Uuid;

/// Record store on top of a key-value store.
///
/// Every object store is kept as one JSON array under its own key.
pub struct Database<S> {
    store: S,
}

impl<S: KeyValueStore> Database<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_all<R, V>(&self, object_store: Store) -> Result<Vec<R>, domain::ReadError>
    where
        R: TryFrom<V>,
        V: DeserializeOwned,
        <R as TryFrom<V>>::Error: std::error::Error + 'static,
    {
        self.store
            .read_json::<Vec<V>>(object_store.as_ref())?
            .unwrap_or_default()
            .into_iter()
            .map(|v| R::try_from(v).map_err(|err| domain::ReadError::Other(Box::new(err))))
            .collect()
    }

    fn write_all<'a, R, V>(
        &self,
        object_store: Store,
        values: &'a [R],
    ) -> Result<(), domain::StorageError>
    where
        V: Serialize + From<&'a R>,
    {
        let values = values.iter().map(V::from).collect::<Vec<_>>();
        debug!("writing {} entries to {}", values.len(), object_store.as_ref());
        self.store.write_json(object_store.as_ref(), &values)
    }

    pub fn clear(&self) -> Result<(), domain::StorageError> {
        for object_store in [
            Store::Plans,
            Store::DayProgress,
            Store::SessionRecords,
            Store::CustomWorkouts,
        ] {
            self.store.remove(object_store.as_ref())?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore> domain::PlanRepository for Database<S> {
    async fn read_plans(&self) -> Result<Vec<domain::Plan>, domain::ReadError> {
        self.read_all::<domain::Plan, Plan>(Store::Plans)
    }

    async fn create_plan(
        &self,
        name: domain::Name,
        goal: domain::Goal,
        days: Vec<domain::PlanDay>,
    ) -> Result<domain::Plan, domain::CreateError> {
        let mut plans = self.read_plans().await?;
        let plan = domain::Plan {
            id: Uuid::new_v4().into(),
            name,
            goal,
            created: Local::now().date_naive(),
            days,
        };
        plans.push(plan.clone());
        self.write_all::<_, Plan>(Store::Plans, &plans)?;
        Ok(plan)
    }

    async fn delete_plan(&self, id: domain::PlanID) -> Result<domain::PlanID, domain::DeleteError> {
        let mut plans = self.read_plans().await?;
        plans.retain(|p| p.id != id);
        self.write_all::<_, Plan>(Store::Plans, &plans)?;

        let mut day_progress = self.read_all::<domain::DayProgress, DayProgress>(Store::DayProgress)?;
        day_progress.retain(|p| p.plan_id != id);
        self.write_all::<_, DayProgress>(Store::DayProgress, &day_progress)?;

        Ok(id)
    }
}

impl<S: KeyValueStore> domain::DayProgressRepository for Database<S> {
    async fn read_day_progress(
        &self,
        plan_id: domain::PlanID,
    ) -> Result<Vec<domain::DayProgress>, domain::ReadError> {
        Ok(self
            .read_all::<domain::DayProgress, DayProgress>(Store::DayProgress)?
            .into_iter()
            .filter(|p| p.plan_id == plan_id)
            .collect())
    }

    async fn create_day_progress(
        &self,
        progress: domain::DayProgress,
    ) -> Result<domain::DayProgress, domain::CreateError> {
        let mut day_progress = self.read_all::<domain::DayProgress, DayProgress>(Store::DayProgress)?;
        day_progress.retain(|p| p.plan_id != progress.plan_id || p.day_id != progress.day_id);
        day_progress.push(progress.clone());
        self.write_all::<_, DayProgress>(Store::DayProgress, &day_progress)?;
        Ok(progress)
    }

    async fn delete_day_progress(
        &self,
        plan_id: domain::PlanID,
        day_id: domain::DayID,
    ) -> Result<domain::DayID, domain::DeleteError> {
        let mut day_progress = self.read_all::<domain::DayProgress, DayProgress>(Store::DayProgress)?;
        day_progress.retain(|p| p.plan_id != plan_id || p.day_id != day_id);
        self.write_all::<_, DayProgress>(Store::DayProgress, &day_progress)?;
        Ok(day_id)
    }
}

impl<S: KeyValueStore> domain::SessionRecordRepository for Database<S> {
    async fn read_session_records(&self) -> Result<Vec<domain::SessionRecord>, domain::ReadError> {
        self.read_all::<domain::SessionRecord, SessionRecord>(Store::SessionRecords)
    }

    async fn create_session_record(
        &self,
        title: String,
        summary: domain::SessionSummary,
    ) -> Result<domain::SessionRecord, domain::CreateError> {
        let mut session_records = self.read_session_records().await?;
        let session_record = domain::SessionRecord::new(Uuid::new_v4().into(), title, summary);
        session_records.push(session_record.clone());
        self.write_all::<_, SessionRecord>(Store::SessionRecords, &session_records)?;
        Ok(session_record)
    }

    async fn delete_session_record(
        &self,
        id: domain::SessionRecordID,
    ) -> Result<domain::SessionRecordID, domain::DeleteError> {
        let mut session_records = self.read_session_records().await?;
        session_records.retain(|r| r.id != id);
        self.write_all::<_, SessionRecord>(Store::SessionRecords, &session_records)?;
        Ok(id)
    }
}

impl<S: KeyValueStore> domain::CustomWorkoutRepository for Database<S> {
    async fn read_custom_workouts(&self) -> Result<Vec<domain::CustomWorkout>, domain::ReadError> {
        self.read_all::<domain::CustomWorkout, CustomWorkout>(Store::CustomWorkouts)
    }

    async fn create_custom_workout(
        &self,
        name: domain::Name,
        exercises: Vec<domain::ExerciseDescriptor>,
    ) -> Result<domain::CustomWorkout, domain::CreateError> {
        let mut custom_workouts = self.read_custom_workouts().await?;
        if custom_workouts.iter().any(|w| w.name.matches(&name)) {
            return Err(domain::CreateError::Conflict);
        }
        let custom_workout = domain::CustomWorkout {
            id: Uuid::new_v4().into(),
            name,
            created: Local::now().date_naive(),
            exercises,
        };
        custom_workouts.push(custom_workout.clone());
        self.write_all::<_, CustomWorkout>(Store::CustomWorkouts, &custom_workouts)?;
        Ok(custom_workout)
    }

    async fn replace_custom_workout(
        &self,
        custom_workout: domain::CustomWorkout,
    ) -> Result<domain::CustomWorkout, domain::UpdateError> {
        let mut custom_workouts = self.read_custom_workouts().await?;
        if custom_workouts
            .iter()
            .any(|w| w.id != custom_workout.id && w.name.matches(&custom_workout.name))
        {
            return Err(domain::UpdateError::Conflict);
        }
        let Some(entry) = custom_workouts
            .iter_mut()
            .find(|w| w.id == custom_workout.id)
        else {
            return Err(domain::StorageError::NotFound.into());
        };
        *entry = custom_workout.clone();
        self.write_all::<_, CustomWorkout>(Store::CustomWorkouts, &custom_workouts)?;
        Ok(custom_workout)
    }

    async fn delete_custom_workout(
        &self,
        id: domain::CustomWorkoutID,
    ) -> Result<domain::CustomWorkoutID, domain::DeleteError> {
        let mut custom_workouts = self.read_custom_workouts().await?;
        custom_workouts.retain(|w| w.id != id);
        self.write_all::<_, CustomWorkout>(Store::CustomWorkouts, &custom_workouts)?;
        Ok(id)
    }
}

#[derive(AsRefStr, Debug, Clone, Copy)]
pub enum Store {
    #[strum(serialize = "plans")]
    Plans,
    #[strum(serialize = "day_progress")]
    DayProgress,
    #[strum(serialize = "session_records")]
    SessionRecords,
    #[strum(serialize = "custom_workouts")]
    CustomWorkouts,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecordError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidSets(#[from] domain::SetsError),
    #[error("invalid goal \"{0}\"")]
    InvalidGoal(String),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseDescriptor {
    pub name: String,
    pub sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl From<&domain::ExerciseDescriptor> for ExerciseDescriptor {
    fn from(value: &domain::ExerciseDescriptor) -> Self {
        Self {
            name: value.name.clone(),
            sets: u32::from(value.sets),
            reps: value.reps.clone(),
            duration: value.duration.clone(),
            weight: value.weight.clone(),
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<ExerciseDescriptor> for domain::ExerciseDescriptor {
    type Error = RecordError;

    fn try_from(value: ExerciseDescriptor) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            sets: domain::Sets::new(value.sets)?,
            reps: value.reps,
            duration: value.duration,
            weight: value.weight,
            notes: value.notes,
        })
    }
}

fn exercises_from_dto(
    exercises: Vec<ExerciseDescriptor>,
) -> Result<Vec<domain::ExerciseDescriptor>, RecordError> {
    exercises
        .into_iter()
        .map(domain::ExerciseDescriptor::try_from)
        .collect()
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub goal: String,
    pub created: NaiveDate,
    pub days: Vec<PlanDay>,
}

impl From<&domain::Plan> for Plan {
    fn from(value: &domain::Plan) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            goal: value.goal.as_ref().to_string(),
            created: value.created,
            days: value.days.iter().map(PlanDay::from).collect(),
        }
    }
}

impl TryFrom<Plan> for domain::Plan {
    type Error = RecordError;

    fn try_from(value: Plan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            goal: domain::Goal::from_str(&value.goal)
                .map_err(|_| RecordError::InvalidGoal(value.goal.clone()))?,
            created: value.created,
            days: value
                .days
                .into_iter()
                .map(domain::PlanDay::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct PlanDay {
    pub id: String,
    pub title: String,
    pub exercises: Vec<ExerciseDescriptor>,
}

impl From<&domain::PlanDay> for PlanDay {
    fn from(value: &domain::PlanDay) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title.clone(),
            exercises: value
                .exercises
                .iter()
                .map(ExerciseDescriptor::from)
                .collect(),
        }
    }
}

impl TryFrom<PlanDay> for domain::PlanDay {
    type Error = RecordError;

    fn try_from(value: PlanDay) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.as_str().into(),
            title: value.title,
            exercises: exercises_from_dto(value.exercises)?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DayProgress {
    pub plan_id: Uuid,
    pub day_id: String,
    pub date: NaiveDate,
}

impl From<&domain::DayProgress> for DayProgress {
    fn from(value: &domain::DayProgress) -> Self {
        Self {
            plan_id: *value.plan_id,
            day_id: value.day_id.to_string(),
            date: value.date,
        }
    }
}

impl From<DayProgress> for domain::DayProgress {
    fn from(value: DayProgress) -> Self {
        Self {
            plan_id: value.plan_id.into(),
            day_id: value.day_id.as_str().into(),
            date: value.date,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub duration_seconds: u32,
    pub calories: f64,
    pub exercises: Vec<LoggedExercise>,
}

impl From<&domain::SessionRecord> for SessionRecord {
    fn from(value: &domain::SessionRecord) -> Self {
        Self {
            id: *value.id,
            title: value.title.clone(),
            date: value.date,
            duration_seconds: value.duration_seconds,
            calories: value.calories,
            exercises: value.exercises.iter().map(LoggedExercise::from).collect(),
        }
    }
}

impl From<SessionRecord> for domain::SessionRecord {
    fn from(value: SessionRecord) -> Self {
        Self {
            id: value.id.into(),
            title: value.title,
            date: value.date,
            duration_seconds: value.duration_seconds,
            calories: value.calories,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::LoggedExercise::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedExercise {
    pub name: String,
    pub sets: Vec<LoggedSet>,
}

impl From<&domain::LoggedExercise> for LoggedExercise {
    fn from(value: &domain::LoggedExercise) -> Self {
        Self {
            name: value.name.clone(),
            sets: value.sets.iter().map(LoggedSet::from).collect(),
        }
    }
}

impl From<LoggedExercise> for domain::LoggedExercise {
    fn from(value: LoggedExercise) -> Self {
        Self {
            name: value.name,
            sets: value.sets.into_iter().map(domain::LoggedSet::from).collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LoggedSet {
    pub set: u32,
    pub weight: f32,
    pub reps: u32,
}

impl From<&domain::LoggedSet> for LoggedSet {
    fn from(value: &domain::LoggedSet) -> Self {
        Self {
            set: value.set,
            weight: value.weight,
            reps: value.reps,
        }
    }
}

impl From<LoggedSet> for domain::LoggedSet {
    fn from(value: LoggedSet) -> Self {
        Self {
            set: value.set,
            weight: value.weight,
            reps: value.reps,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct CustomWorkout {
    pub id: Uuid,
    pub name: String,
    pub created: NaiveDate,
    pub exercises: Vec<ExerciseDescriptor>,
}

impl From<&domain::CustomWorkout> for CustomWorkout {
    fn from(value: &domain::CustomWorkout) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            created: value.created,
            exercises: value
                .exercises
                .iter()
                .map(ExerciseDescriptor::from)
                .collect(),
        }
    }
}

impl TryFrom<CustomWorkout> for domain::CustomWorkout {
    type Error = RecordError;

    fn try_from(value: CustomWorkout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            created: value.created,
            exercises: exercises_from_dto(value.exercises)?,
        })
    }
}
