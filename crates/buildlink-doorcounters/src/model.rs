//! Door-counter records and wire types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A counted entrance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrance {
    pub id: String,
    pub name: String,
}

impl Entrance {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Counts of every door at one instant.
///
/// A door is `None` when the platform reported no sample for it at this
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorCount {
    pub timestamp: DateTime<Utc>,
    pub door_a: Option<i32>,
    pub door_b: Option<i32>,
    pub door_c: Option<i32>,
}

impl DoorCount {
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            door_a: None,
            door_b: None,
            door_c: None,
        }
    }

    pub(crate) fn set(&mut self, door: Door, value: i32) {
        match door {
            Door::A => self.door_a = Some(value),
            Door::B => self.door_b = Some(value),
            Door::C => self.door_c = Some(value),
        }
    }
}

/// Door behind a telemetry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Door {
    A,
    B,
    C,
}

impl Door {
    /// Telemetry keys requested from the platform.
    pub(crate) const KEYS: &'static str = "c1,c2,c3";

    /// The platform numbers its counters c1..c3; c2 is door C and c3 is door B.
    pub(crate) fn from_key(key: &str) -> Option<Self> {
        match key {
            "c1" => Some(Self::A),
            "c2" => Some(Self::C),
            "c3" => Some(Self::B),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: String,
}

/// One sample of one key; values arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelemetrySample {
    pub ts: i64,
    pub value: String,
}

/// Timeseries response: key → samples.
pub(crate) type TelemetryResponse = HashMap<String, Vec<TelemetrySample>>;
