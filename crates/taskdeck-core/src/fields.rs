use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use time::macros::format_description;
use time::{Date, Time};

use crate::error::ParseError;

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// No priority assigned.
    #[default]
    None,
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// All priorities from lowest to highest rank.
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// Numeric weight used when ordering the list view (high=3 .. none=0).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// String representation used in commands and configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| ParseError::InvalidPriority(s.to_owned()))
    }
}

/// Bucket a task is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Work-related.
    Work,
    /// Personal errands; the default for new tasks.
    #[default]
    Personal,
    /// Shopping list entries.
    Shopping,
    /// Anything else.
    Other,
}

impl Category {
    /// All categories in sidebar order.
    pub const ALL: [Self; 4] = [Self::Work, Self::Personal, Self::Shopping, Self::Other];

    /// String representation used in commands and configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseError::InvalidCategory(s.to_owned()))
    }
}

/// Wall-clock time of day with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(Time);

impl ClockTime {
    /// Build a clock time from hour and minute components.
    ///
    /// # Errors
    /// Returns an error if either component is out of range.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, ParseError> {
        Time::from_hms(hour, minute, 0)
            .map(Self)
            .map_err(|_| ParseError::InvalidClockTime(format!("{hour}:{minute}")))
    }

    /// Hour component (0-23).
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.0.hour()
    }

    /// Minute component (0-59).
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Time::parse(s.trim(), format_description!("[hour]:[minute]"))
            .map(Self)
            .map_err(|_| ParseError::InvalidClockTime(s.to_owned()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns an error if the input is not a valid ISO calendar date.
pub fn parse_date(s: &str) -> Result<Date, ParseError> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ParseError::InvalidDate(s.to_owned()))
}
