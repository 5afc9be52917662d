//! Serde helpers for `HH:MM` clock times in request documents.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const SHORT_FORMAT: &str = "%H:%M";
const LONG_FORMAT: &str = "%H:%M:%S";

pub fn parse(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, SHORT_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, LONG_FORMAT))
        .ok()
}

pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(SHORT_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid clock time `{text}`, expected HH:MM"))
            }),
        }
    }
}
