use chrono::{Duration, NaiveDate};

use crate::{
    ExerciseDescriptor, LoggedExercise, LoggedSet, MetProvider, SessionSummary, Settings,
    estimate_calories,
};

pub const DEFAULT_REST_SECONDS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutState {
    Active {
        exercise_idx: usize,
        set_idx: usize,
    },
    /// Rest before the set at the cursor.
    Resting {
        exercise_idx: usize,
        set_idx: usize,
        remaining: u32,
    },
    Finished {
        elapsed_seconds: u32,
        completed_exercises: Vec<usize>,
    },
}

/// A performed set. `set` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct SetLog {
    pub exercise_idx: usize,
    pub set: u32,
    pub weight: f32,
    pub reps: u32,
    pub seconds: u32,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorkoutError {
    #[error("Workout must contain at least one exercise")]
    Empty,
}

/// Set and rest sequencing of a running workout.
///
/// The cursor walks through every set of every exercise in order. After a
/// completed set the workout rests before the next set; `tick` drives the
/// countdowns and advances automatically when they run out.
#[derive(Debug, Clone)]
pub struct Workout {
    exercises: Vec<ExerciseDescriptor>,
    state: WorkoutState,
    log: Vec<SetLog>,
    completed_exercises: Vec<usize>,
    elapsed_seconds: u32,
    set_seconds: u32,
    remaining: u32,
    rest_seconds: u32,
    auto_advance: bool,
    running: bool,
}

impl Workout {
    pub fn new(exercises: Vec<ExerciseDescriptor>, rest_seconds: u32) -> Result<Self, WorkoutError> {
        if exercises.is_empty() {
            return Err(WorkoutError::Empty);
        }

        let mut workout = Self {
            exercises,
            state: WorkoutState::Active {
                exercise_idx: 0,
                set_idx: 0,
            },
            log: vec![],
            completed_exercises: vec![],
            elapsed_seconds: 0,
            set_seconds: 0,
            remaining: 0,
            rest_seconds,
            auto_advance: true,
            running: true,
        };
        workout.start_set(0, 0);
        Ok(workout)
    }

    pub fn with_settings(
        exercises: Vec<ExerciseDescriptor>,
        settings: &Settings,
    ) -> Result<Self, WorkoutError> {
        let mut workout = Self::new(exercises, settings.rest_seconds)?;
        workout.auto_advance = settings.auto_advance;
        Ok(workout)
    }

    #[must_use]
    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseDescriptor] {
        &self.exercises
    }

    #[must_use]
    pub fn log(&self) -> &[SetLog] {
        &self.log
    }

    #[must_use]
    pub fn completed_exercises(&self) -> &[usize] {
        &self.completed_exercises
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Seconds since the current set started.
    #[must_use]
    pub fn set_seconds(&self) -> u32 {
        self.set_seconds
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, WorkoutState::Finished { .. })
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(usize, usize)> {
        match self.state {
            WorkoutState::Active {
                exercise_idx,
                set_idx,
            }
            | WorkoutState::Resting {
                exercise_idx,
                set_idx,
                ..
            } => Some((exercise_idx, set_idx)),
            WorkoutState::Finished { .. } => None,
        }
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&ExerciseDescriptor> {
        self.cursor().map(|(exercise_idx, _)| &self.exercises[exercise_idx])
    }

    /// Remaining seconds of the running countdown, `None` during rep-based
    /// sets and after the workout.
    #[must_use]
    pub fn countdown(&self) -> Option<u32> {
        match self.state {
            WorkoutState::Active { exercise_idx, .. } => self.exercises[exercise_idx]
                .is_duration_based()
                .then_some(self.remaining),
            WorkoutState::Resting { remaining, .. } => Some(remaining),
            WorkoutState::Finished { .. } => None,
        }
    }

    #[must_use]
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| u32::from(e.sets)).sum()
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Logs the set at the cursor and moves on to the rest before the next
    /// set, or finishes the workout after the last set. Completing during a
    /// rest skips the rest.
    pub fn complete_set(&mut self, weight: f32, reps: u32) -> &WorkoutState {
        let Some((exercise_idx, set_idx)) = self.cursor() else {
            return &self.state;
        };

        let seconds = if matches!(self.state, WorkoutState::Active { .. }) {
            self.set_seconds
        } else {
            0
        };
        self.log.push(SetLog {
            exercise_idx,
            set: u32::try_from(set_idx + 1).unwrap_or(u32::MAX),
            weight,
            reps,
            seconds,
        });
        self.advance(true)
    }

    /// Leaves the current set without logging it, or ends the current rest.
    pub fn skip(&mut self) -> &WorkoutState {
        match self.state {
            WorkoutState::Active { .. } => self.advance(false),
            WorkoutState::Resting {
                exercise_idx,
                set_idx,
                ..
            } => {
                self.start_set(exercise_idx, set_idx);
                &self.state
            }
            WorkoutState::Finished { .. } => &self.state,
        }
    }

    /// Goes back one set. Does nothing at the first set and after the
    /// workout.
    pub fn previous(&mut self) -> &WorkoutState {
        let Some((exercise_idx, set_idx)) = self.cursor() else {
            return &self.state;
        };

        if set_idx > 0 {
            self.start_set(exercise_idx, set_idx - 1);
        } else if exercise_idx > 0 {
            let last_set = self.sets_of(exercise_idx - 1) - 1;
            self.start_set(exercise_idx - 1, last_set);
        }
        &self.state
    }

    pub fn restart(&mut self) -> &WorkoutState {
        self.log.clear();
        self.completed_exercises.clear();
        self.elapsed_seconds = 0;
        self.running = true;
        self.start_set(0, 0);
        &self.state
    }

    /// Advances all clocks by one second.
    pub fn tick(&mut self) -> &WorkoutState {
        if !self.running || self.is_finished() {
            return &self.state;
        }

        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);

        match self.state {
            WorkoutState::Active { exercise_idx, .. } => {
                self.set_seconds = self.set_seconds.saturating_add(1);
                let exercise = &self.exercises[exercise_idx];
                if exercise.is_duration_based() {
                    self.remaining = self.remaining.saturating_sub(1);
                    if self.remaining == 0 && self.auto_advance {
                        let weight = exercise.weight_kg();
                        let reps = exercise.target_reps();
                        return self.complete_set(weight, reps);
                    }
                }
            }
            WorkoutState::Resting {
                exercise_idx,
                set_idx,
                remaining,
            } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 && self.auto_advance {
                    return self.skip();
                }
                self.state = WorkoutState::Resting {
                    exercise_idx,
                    set_idx,
                    remaining,
                };
            }
            WorkoutState::Finished { .. } => {}
        }

        &self.state
    }

    /// Record of a finished workout, calories are based on the average MET
    /// of all exercises over the whole duration.
    #[must_use]
    pub fn summary(
        &self,
        date: NaiveDate,
        met: &MetProvider,
        body_weight_kg: f32,
    ) -> Option<SessionSummary> {
        let WorkoutState::Finished {
            elapsed_seconds, ..
        } = self.state
        else {
            return None;
        };

        #[allow(clippy::cast_precision_loss)]
        let avg_met = self
            .exercises
            .iter()
            .map(|e| met.lookup_exercise(e))
            .sum::<f64>()
            / self.exercises.len() as f64;

        let exercises = self
            .exercises
            .iter()
            .enumerate()
            .filter_map(|(idx, exercise)| {
                let sets = self
                    .log
                    .iter()
                    .filter(|s| s.exercise_idx == idx)
                    .map(|s| LoggedSet {
                        set: s.set,
                        weight: s.weight,
                        reps: s.reps,
                    })
                    .collect::<Vec<_>>();
                (!sets.is_empty()).then(|| LoggedExercise {
                    name: exercise.name.clone(),
                    sets,
                })
            })
            .collect();

        Some(SessionSummary {
            date,
            duration_seconds: elapsed_seconds,
            calories: estimate_calories(
                avg_met,
                body_weight_kg,
                Duration::seconds(i64::from(elapsed_seconds)),
            ),
            exercises,
        })
    }

    fn sets_of(&self, exercise_idx: usize) -> usize {
        usize::try_from(u32::from(self.exercises[exercise_idx].sets)).unwrap_or(1)
    }

    fn advance(&mut self, rest: bool) -> &WorkoutState {
        let Some((exercise_idx, set_idx)) = self.cursor() else {
            return &self.state;
        };

        let next = if set_idx + 1 < self.sets_of(exercise_idx) {
            Some((exercise_idx, set_idx + 1))
        } else {
            if !self.completed_exercises.contains(&exercise_idx) {
                self.completed_exercises.push(exercise_idx);
            }
            (exercise_idx + 1 < self.exercises.len()).then_some((exercise_idx + 1, 0))
        };

        match next {
            Some((exercise_idx, set_idx)) if rest && self.rest_seconds > 0 => {
                self.set_seconds = 0;
                self.state = WorkoutState::Resting {
                    exercise_idx,
                    set_idx,
                    remaining: self.rest_seconds,
                };
            }
            Some((exercise_idx, set_idx)) => self.start_set(exercise_idx, set_idx),
            None => {
                self.state = WorkoutState::Finished {
                    elapsed_seconds: self.elapsed_seconds,
                    completed_exercises: self.completed_exercises.clone(),
                };
            }
        }

        &self.state
    }

    fn start_set(&mut self, exercise_idx: usize, set_idx: usize) {
        self.set_seconds = 0;
        self.remaining = self.exercises[exercise_idx]
            .duration_seconds()
            .unwrap_or(0);
        self.state = WorkoutState::Active {
            exercise_idx,
            set_idx,
        };
    }
}
