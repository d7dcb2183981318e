use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{PlannerError, Result};

/// Identifier of an activity. Stored as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub i64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActivityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(ActivityId)
    }
}

/// A single planned activity, saved as an element of the activities slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// Scheduled start, "HH:MM" on a 24 hour clock.
    pub time: String,
    /// In minutes. Taken as given, including zero and negative values.
    pub duration: i64,
    pub category: Category,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// The scheduled hour (0-23), if `time` can be read.
    pub fn hour(&self) -> Option<u32> {
        parse_hour(&self.time)
    }

    /// Calendar day the activity was created on, in local time.
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }
}

/// The field bag handed over by the command line when adding an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub name: String,
    pub time: String,
    pub duration: i64,
    pub category: Category,
    pub note: Option<String>,
}

impl NewActivity {
    /// Check the required fields. Durations are taken as given.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::Validation("name is required".to_string()));
        }
        if !is_clock_time(&self.time) {
            return Err(PlannerError::Validation(format!(
                "time '{}' is not a zero-padded HH:MM value",
                self.time
            )));
        }
        Ok(())
    }

    pub fn into_activity(self, id: ActivityId, created_at: DateTime<Utc>) -> Activity {
        Activity {
            id,
            name: self.name,
            time: self.time,
            duration: self.duration,
            category: self.category,
            note: self.note.unwrap_or_default(),
            created_at,
        }
    }
}

/// An activity as found in storage, before its category is checked
/// against the category table.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredActivity {
    pub id: ActivityId,
    pub name: String,
    pub time: String,
    pub duration: i64,
    pub category: String,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StoredActivity> for Activity {
    type Error = PlannerError;

    fn try_from(stored: StoredActivity) -> Result<Self> {
        let category = Category::from_key(&stored.category)
            .ok_or_else(|| PlannerError::UnknownCategory(stored.category.clone()))?;
        Ok(Activity {
            id: stored.id,
            name: stored.name,
            time: stored.time,
            duration: stored.duration,
            category,
            note: stored.note,
            created_at: stored.created_at,
        })
    }
}

/// Whether `time` is a zero-padded 24 hour "HH:MM" value. Zero padding
/// keeps lexicographic order equal to chronological order.
pub fn is_clock_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        time.get(range)
            .filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|part| part.parse().ok())
    };
    matches!((digits(0..2), digits(3..5)), (Some(h), Some(m)) if h < 24 && m < 60)
}

/// Hour part of an "HH:MM" value.
pub fn parse_hour(time: &str) -> Option<u32> {
    let (hour, _) = time.split_once(':')?;
    hour.trim().parse::<u32>().ok().filter(|h| *h < 24)
}
