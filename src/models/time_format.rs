//! `HH:MM` wire format for times of day.
//!
//! Schedules and slots are entered and displayed without seconds, but a
//! trailing `:SS` is tolerated on input.

use chrono::{NaiveTime, ParseError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn parse_hh_mm(raw: &str) -> Result<NaiveTime, ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

pub fn format_hh_mm(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub mod hh_mm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hh_mm(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_hh_mm(&raw).map_err(serde::de::Error::custom)
    }
}

pub mod hh_mm_list {
    use super::*;

    pub fn serialize<S>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted: Vec<String> = times.iter().map(format_hh_mm).collect();
        formatted.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Vec<String> = Vec::deserialize(deserializer)?;
        raw.iter()
            .map(|s| parse_hh_mm(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
