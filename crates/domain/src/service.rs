use chrono::NaiveDate;
use log::{debug, error};

use crate::{
    CreateError, CustomWorkout, CustomWorkoutID, CustomWorkoutRepository, CustomWorkoutService,
    DayID, DayProgress, DayProgressRepository, DayProgressService, DeleteError,
    ExerciseDescriptor, Goal, Name, Plan, PlanDay, PlanID, PlanRepository, PlanService, ReadError,
    SessionRecord, SessionRecordID, SessionRecordRepository, SessionRecordService,
    SessionSummary, UpdateError,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NotFound) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: PlanRepository> PlanService for Service<R> {
    async fn get_plans(&self) -> Result<Vec<Plan>, ReadError> {
        log_on_error!(self.repository.read_plans(), ReadError, "get", "plans")
    }

    async fn create_plan(
        &self,
        name: Name,
        goal: Goal,
        days: Vec<PlanDay>,
    ) -> Result<Plan, CreateError> {
        log_on_error!(
            self.repository.create_plan(name, goal, days),
            CreateError,
            "create",
            "plan"
        )
    }

    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
        log_on_error!(
            self.repository.delete_plan(id),
            DeleteError,
            "delete",
            "plan"
        )
    }
}

impl<R: DayProgressRepository> DayProgressService for Service<R> {
    async fn get_day_progress(&self, plan_id: PlanID) -> Result<Vec<DayProgress>, ReadError> {
        log_on_error!(
            self.repository.read_day_progress(plan_id),
            ReadError,
            "get",
            "day progress"
        )
    }

    async fn mark_day_completed(
        &self,
        plan_id: PlanID,
        day_id: DayID,
        date: NaiveDate,
    ) -> Result<DayProgress, CreateError> {
        log_on_error!(
            self.repository.create_day_progress(DayProgress {
                plan_id,
                day_id,
                date
            }),
            CreateError,
            "create",
            "day progress"
        )
    }

    async fn unmark_day_completed(
        &self,
        plan_id: PlanID,
        day_id: DayID,
    ) -> Result<DayID, DeleteError> {
        log_on_error!(
            self.repository.delete_day_progress(plan_id, day_id),
            DeleteError,
            "delete",
            "day progress"
        )
    }
}

impl<R: SessionRecordRepository> SessionRecordService for Service<R> {
    async fn get_session_records(&self) -> Result<Vec<SessionRecord>, ReadError> {
        log_on_error!(
            self.repository.read_session_records(),
            ReadError,
            "get",
            "session records"
        )
    }

    async fn create_session_record(
        &self,
        title: String,
        summary: SessionSummary,
    ) -> Result<SessionRecord, CreateError> {
        log_on_error!(
            self.repository.create_session_record(title, summary),
            CreateError,
            "create",
            "session record"
        )
    }

    async fn delete_session_record(
        &self,
        id: SessionRecordID,
    ) -> Result<SessionRecordID, DeleteError> {
        log_on_error!(
            self.repository.delete_session_record(id),
            DeleteError,
            "delete",
            "session record"
        )
    }
}

impl<R: CustomWorkoutRepository> CustomWorkoutService for Service<R> {
    async fn get_custom_workouts(&self) -> Result<Vec<CustomWorkout>, ReadError> {
        log_on_error!(
            self.repository.read_custom_workouts(),
            ReadError,
            "get",
            "custom workouts"
        )
    }

    async fn create_custom_workout(
        &self,
        name: Name,
        exercises: Vec<ExerciseDescriptor>,
    ) -> Result<CustomWorkout, CreateError> {
        log_on_error!(
            self.repository.create_custom_workout(name, exercises),
            CreateError,
            "create",
            "custom workout"
        )
    }

    async fn replace_custom_workout(
        &self,
        custom_workout: CustomWorkout,
    ) -> Result<CustomWorkout, UpdateError> {
        log_on_error!(
            self.repository.replace_custom_workout(custom_workout),
            UpdateError,
            "replace",
            "custom workout"
        )
    }

    async fn delete_custom_workout(
        &self,
        id: CustomWorkoutID,
    ) -> Result<CustomWorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_custom_workout(id),
            DeleteError,
            "delete",
            "custom workout"
        )
    }
}
