use chrono::NaiveDate;
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseDescriptor, Goal, Name, ReadError, ValidationError,
};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    async fn get_plans(&self) -> Result<Vec<Plan>, ReadError>;
    async fn create_plan(
        &self,
        name: Name,
        goal: Goal,
        days: Vec<PlanDay>,
    ) -> Result<Plan, CreateError>;
    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;

    async fn get_plan(&self, id: PlanID) -> Result<Option<Plan>, ReadError> {
        Ok(self.get_plans().await?.into_iter().find(|p| p.id == id))
    }

    async fn validate_plan_name(&self, name: &str, id: PlanID) -> Result<Name, ValidationError> {
        match Name::new(name) {
            Ok(name) => match self.get_plans().await {
                Ok(plans) => {
                    if plans.iter().all(|p| p.id == id || !p.name.matches(&name)) {
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
pub trait PlanRepository {
    async fn read_plans(&self) -> Result<Vec<Plan>, ReadError>;
    async fn create_plan(
        &self,
        name: Name,
        goal: Goal,
        days: Vec<PlanDay>,
    ) -> Result<Plan, CreateError>;
    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait DayProgressService {
    async fn get_day_progress(&self, plan_id: PlanID) -> Result<Vec<DayProgress>, ReadError>;
    async fn mark_day_completed(
        &self,
        plan_id: PlanID,
        day_id: DayID,
        date: NaiveDate,
    ) -> Result<DayProgress, CreateError>;
    async fn unmark_day_completed(
        &self,
        plan_id: PlanID,
        day_id: DayID,
    ) -> Result<DayID, DeleteError>;

    async fn is_day_completed(&self, plan_id: PlanID, day_id: &DayID) -> Result<bool, ReadError> {
        Ok(self
            .get_day_progress(plan_id)
            .await?
            .iter()
            .any(|p| &p.day_id == day_id))
    }
}

#[allow(async_fn_in_trait)]
pub trait DayProgressRepository {
    async fn read_day_progress(&self, plan_id: PlanID) -> Result<Vec<DayProgress>, ReadError>;
    /// Replaces an existing entry of the same day.
    async fn create_day_progress(&self, progress: DayProgress)
    -> Result<DayProgress, CreateError>;
    async fn delete_day_progress(
        &self,
        plan_id: PlanID,
        day_id: DayID,
    ) -> Result<DayID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: PlanID,
    pub name: Name,
    pub goal: Goal,
    pub created: NaiveDate,
    pub days: Vec<PlanDay>,
}

impl Plan {
    #[must_use]
    pub fn day(&self, id: &DayID) -> Option<&PlanDay> {
        self.days.iter().find(|d| &d.id == id)
    }

    /// First day without progress entry, `None` if all days are done.
    #[must_use]
    pub fn next_day(&self, progress: &[DayProgress]) -> Option<&PlanDay> {
        self.days.iter().find(|d| {
            !progress
                .iter()
                .any(|p| p.plan_id == self.id && p.day_id == d.id)
        })
    }

    /// Share of completed days in the range 0 to 1.
    #[must_use]
    pub fn completion(&self, progress: &[DayProgress]) -> f32 {
        if self.days.is_empty() {
            return 0.;
        }
        let completed = self
            .days
            .iter()
            .filter(|d| {
                progress
                    .iter()
                    .any(|p| p.plan_id == self.id && p.day_id == d.id)
            })
            .count();
        #[allow(clippy::cast_precision_loss)]
        let ratio = completed as f32 / self.days.len() as f32;
        ratio
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanDay {
    pub id: DayID,
    pub title: String,
    pub exercises: Vec<ExerciseDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayProgress {
    pub plan_id: PlanID,
    pub day_id: DayID,
    pub date: NaiveDate,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanID(Uuid);

impl PlanID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PlanID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PlanID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Identifier of a day inside a plan, e.g. `"week1-day2"`.
#[derive(Deref, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayID(String);

impl From<&str> for DayID {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}
