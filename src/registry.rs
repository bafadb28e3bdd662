use crate::dates::today_key;
use crate::errors::{ClientError, RegistryError};
use crate::models::{HabitPayload, SnapshotRow};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, warn};

pub const MOOD_OPTIONS: &[&str] = &[
    "demotivated",
    "sad",
    "frustrated",
    "neutral",
    "chill",
    "happy",
    "balling",
];

pub const DEFAULT_SELECTION: &str = "neutral";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HabitKind {
    Toggle,
    Counter,
    Select,
}

impl HabitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Counter => "number",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for HabitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub kind: HabitKind,
    pub icon: String,
    pub done: bool,
    pub value: u32,
    pub selection: String,
    pub options: &'static [&'static str],
    // display hint, never enforced
    pub soft_limit: Option<u32>,
}

impl Habit {
    fn new(id: i64, name: &str, kind: HabitKind, icon: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            icon: icon.to_string(),
            done: false,
            value: 0,
            selection: DEFAULT_SELECTION.to_string(),
            options: &[],
            soft_limit: None,
        }
    }

    pub fn toggle(id: i64, name: &str, icon: &str) -> Self {
        Self::new(id, name, HabitKind::Toggle, icon)
    }

    pub fn counter(id: i64, name: &str, icon: &str) -> Self {
        Self::new(id, name, HabitKind::Counter, icon)
    }

    pub fn select(id: i64, name: &str, icon: &str, options: &'static [&'static str]) -> Self {
        Self {
            options,
            ..Self::new(id, name, HabitKind::Select, icon)
        }
    }

    pub fn with_soft_limit(mut self, limit: u32) -> Self {
        self.soft_limit = Some(limit);
        self
    }

    pub fn over_soft_limit(&self) -> bool {
        self.soft_limit.is_some_and(|limit| self.value > limit)
    }

    pub fn to_payload(&self) -> HabitPayload {
        let (done, val) = match self.kind {
            HabitKind::Toggle => (self.done, 0),
            HabitKind::Counter => (false, i64::from(self.value)),
            HabitKind::Select => (false, 0),
        };
        HabitPayload {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind.as_str().to_string(),
            done: Some(done),
            val: Some(val),
            icon: Some(self.icon.clone()),
        }
    }
}

pub fn default_habits() -> Vec<Habit> {
    vec![
        Habit::toggle(1, "3.75+ GPA Prep", "book-open"),
        Habit::toggle(2, "Tution", "dollar-sign"),
        Habit::counter(4, "DSA/CP Daily Grind", "flame"),
        Habit::counter(5, "Weight Loss (Target -20kg)", "check-circle"),
        Habit::toggle(6, "Hair Care Routine", "scissors"),
        Habit::toggle(7, "Academic Study (1.5hr)", "book-open"),
        Habit::toggle(8, "Skill Dev (2hr)", "flame"),
        Habit::counter(11, "Save 500 BDT", "dollar-sign"),
        Habit::counter(12, "Cigarettes (Max 4)", "cigarette").with_soft_limit(4),
        Habit::toggle(13, "Sleep > 6hrs", "moon"),
        Habit::select(14, "Mood", "heart", MOOD_OPTIONS),
        Habit::toggle(15, "Inside Campus Study", "book-open"),
    ]
}

pub trait SnapshotApi {
    fn fetch(
        &self,
        date: &str,
    ) -> impl Future<Output = Result<Vec<SnapshotRow>, ClientError>> + Send;

    fn save(
        &self,
        date: &str,
        habits: &[HabitPayload],
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    habits: Vec<Habit>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::initialize()
    }
}

impl Registry {
    pub fn initialize() -> Self {
        Self::from_habits(default_habits())
    }

    pub fn from_habits(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: i64) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    fn habit_mut(&mut self, id: i64, expected: HabitKind) -> Result<&mut Habit, RegistryError> {
        let habit = self
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or(RegistryError::UnknownHabit(id))?;
        if habit.kind != expected {
            return Err(RegistryError::WrongKind {
                id,
                expected,
                actual: habit.kind,
            });
        }
        Ok(habit)
    }

    pub fn toggle(&mut self, id: i64) -> Result<bool, RegistryError> {
        let habit = self.habit_mut(id, HabitKind::Toggle)?;
        habit.done = !habit.done;
        Ok(habit.done)
    }

    pub fn adjust(&mut self, id: i64, delta: i32) -> Result<u32, RegistryError> {
        if delta != 1 && delta != -1 {
            return Err(RegistryError::InvalidDelta(delta));
        }
        let habit = self.habit_mut(id, HabitKind::Counter)?;
        habit.value = if delta > 0 {
            habit.value.saturating_add(1)
        } else {
            habit.value.saturating_sub(1)
        };
        Ok(habit.value)
    }

    pub fn set_selection(&mut self, id: i64, option: &str) -> Result<(), RegistryError> {
        let habit = self.habit_mut(id, HabitKind::Select)?;
        if !habit.options.iter().any(|candidate| *candidate == option) {
            return Err(RegistryError::InvalidOption {
                id,
                option: option.to_string(),
            });
        }
        habit.selection = option.to_string();
        Ok(())
    }

    // Rows for ids this registry does not know are ignored.
    pub fn merge(&mut self, rows: &[SnapshotRow]) -> usize {
        let by_id: HashMap<i64, &SnapshotRow> = rows.iter().map(|row| (row.id, row)).collect();
        let mut merged = 0;
        for habit in &mut self.habits {
            if let Some(row) = by_id.get(&habit.id) {
                habit.done = row.done != 0;
                habit.value = u32::try_from(row.val.max(0)).unwrap_or(u32::MAX);
                merged += 1;
            }
        }
        merged
    }

    pub async fn load<A: SnapshotApi>(&mut self, date: &str, api: &A) -> usize {
        match api.fetch(date).await {
            Ok(rows) => {
                let merged = self.merge(&rows);
                debug!(date, rows = rows.len(), merged, "snapshot loaded");
                merged
            }
            Err(err) => {
                warn!(date, "snapshot unavailable, keeping local state: {err}");
                0
            }
        }
    }

    pub async fn load_today<A: SnapshotApi>(&mut self, api: &A) -> usize {
        self.load(&today_key(), api).await
    }

    pub fn snapshot(&self) -> Vec<HabitPayload> {
        self.habits.iter().map(Habit::to_payload).collect()
    }

    pub async fn save<A: SnapshotApi>(&self, date: &str, api: &A) -> Result<(), ClientError> {
        let habits = self.snapshot();
        api.save(date, &habits).await?;
        info!(date, habits = habits.len(), "snapshot saved");
        Ok(())
    }

    pub async fn save_today<A: SnapshotApi>(&self, api: &A) -> Result<(), ClientError> {
        self.save(&today_key(), api).await
    }
}
