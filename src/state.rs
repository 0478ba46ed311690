use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// Retained history window: only the 30 most recent records survive.
pub const HISTORY_LIMIT: usize = 30;

/// Fixed set offered by the setup surface; an empty love language is valid.
pub const LOVE_LANGUAGES: [&str; 5] = [
    "Words of Affirmation",
    "Acts of Service",
    "Receiving Gifts",
    "Quality Time",
    "Physical Touch",
];

/// One of the two fixed partner roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

impl FromStr for Slot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" => Ok(Slot::A),
            "b" => Ok(Slot::B),
            _ => Err(AppError::Config(format!("Unknown partner slot: {}", s))),
        }
    }
}

/// Current self-reported emotional state of a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mood {
    Happy,
    Tired,
    #[default]
    Neutral,
    Stress,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Tired,
        Mood::Neutral,
        Mood::Stress,
        Mood::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Tired => "Tired",
            Mood::Neutral => "Neutral",
            Mood::Stress => "Stress",
            Mood::Calm => "Calm",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "tired" => Ok(Mood::Tired),
            "neutral" => Ok(Mood::Neutral),
            "stress" => Ok(Mood::Stress),
            "calm" => Ok(Mood::Calm),
            _ => Err(AppError::Config(format!("Unknown mood: {}", s))),
        }
    }
}

/// A timestamped mood check-in, returned when a slot's mood is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSignal {
    pub partner: Slot,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

/// Profile details for one partner slot. Overwritten whenever setup reopens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartnerDetails {
    pub name: String,
    pub personality: String,
    pub love_language: String,
    pub interests: String,
}

/// Current mood per partner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MoodPair {
    pub a: Mood,
    pub b: Mood,
}

impl MoodPair {
    pub fn get(&self, slot: Slot) -> Mood {
        match slot {
            Slot::A => self.a,
            Slot::B => self.b,
        }
    }

    pub fn set(&mut self, slot: Slot, mood: Mood) {
        match slot {
            Slot::A => self.a = mood,
            Slot::B => self.b = mood,
        }
    }
}

/// One completed activity. Immutable once created; only leaves the state by
/// falling outside the retained-history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub activity: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_at_time: Option<MoodPair>,
}

impl TaskRecord {
    /// Build a record for the just-completed activity. The mood pair is
    /// copied, so later check-ins never alter the snapshot.
    pub fn new(activity: &str, feedback: Option<&str>, moods: &MoodPair) -> Self {
        TaskRecord {
            id: Uuid::now_v7().to_string(),
            activity: activity.to_string(),
            date: Local::now().format("%Y-%m-%d").to_string(),
            feedback: feedback.map(|f| f.to_string()),
            mood_at_time: Some(*moods),
        }
    }
}

/// Aggregate root. One instance exists per session, loaded from storage at
/// startup and flushed after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppState {
    pub partner_a: PartnerDetails,
    pub partner_b: PartnerDetails,
    pub history: Vec<TaskRecord>,
    pub current_moods: MoodPair,
}

impl AppState {
    pub fn partner(&self, slot: Slot) -> &PartnerDetails {
        match slot {
            Slot::A => &self.partner_a,
            Slot::B => &self.partner_b,
        }
    }

    pub fn partner_mut(&mut self, slot: Slot) -> &mut PartnerDetails {
        match slot {
            Slot::A => &mut self.partner_a,
            Slot::B => &mut self.partner_b,
        }
    }

    /// Prepend a record and drop everything beyond the retained window.
    pub fn push_record(&mut self, record: TaskRecord) {
        self.history.insert(0, record);
        self.history.truncate(HISTORY_LIMIT);
    }
}
