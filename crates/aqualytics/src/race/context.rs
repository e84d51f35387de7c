//! Race descriptors.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AquaError;

/// Pool configuration a race was swum in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLength {
    /// 25 m pool.
    Short,
    /// 50 m pool.
    Long,
}

impl CourseLength {
    /// Length of one pool length in meters.
    pub fn pool_length(&self) -> u32 {
        match self {
            CourseLength::Short => 25,
            CourseLength::Long => 50,
        }
    }
}

impl FromStr for CourseLength {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" | "corto" | "sc" | "cc" | "25" | "25m" => Ok(CourseLength::Short),
            "long" | "largo" | "lc" | "cl" | "50" | "50m" => Ok(CourseLength::Long),
            other => Err(AquaError::InvalidInput(format!(
                "unknown course length '{}'; use short or long",
                other
            ))),
        }
    }
}

impl fmt::Display for CourseLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseLength::Short => write!(f, "short"),
            CourseLength::Long => write!(f, "long"),
        }
    }
}

/// Immutable description of one race instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceContext {
    /// Swimmer identifier.
    pub swimmer: String,
    /// Date the race was swum.
    pub date: NaiveDate,
    /// Race distance in meters.
    pub distance: u32,
    /// Pool configuration.
    pub course: CourseLength,
    /// Stroke/style (e.g. "libre", "espalda").
    pub style: String,
    /// Competition phase (e.g. "heat", "final").
    pub phase: String,
    /// Competition or event identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl RaceContext {
    /// Create a race context without an event identifier.
    pub fn new(
        swimmer: impl Into<String>,
        date: NaiveDate,
        distance: u32,
        course: CourseLength,
        style: impl Into<String>,
        phase: impl Into<String>,
    ) -> Self {
        Self {
            swimmer: swimmer.into(),
            date,
            distance,
            course,
            style: style.into(),
            phase: phase.into(),
            event: None,
        }
    }

    /// Attach the competition/event identifier.
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Number of segments the race splits into.
    pub fn segment_count(&self) -> usize {
        super::resolver::segment_count(self.distance, self.course)
    }
}
