//! SessionId - Session folder identifier
//!
//! Derived from the wall-clock start of a recording, formatted
//! `yyyyMMdd-HHmmss`. The same string names the session folder, the movie
//! file and the motion JSON.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ContractError;

/// chrono format of a session id
pub const SESSION_ID_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Session identifier
///
/// # Examples
/// ```
/// use contracts::SessionId;
///
/// let id = SessionId::parse("20240814-093015").unwrap();
/// assert_eq!(id.display_name(), "2024-08-14 09:30:15");
/// assert_eq!(id.movie_file_name(), "20240814-093015.mov");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    /// Build the id of a session started at `start`
    pub fn from_start<Tz: TimeZone>(start: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(start.format(SESSION_ID_FORMAT).to_string())
    }

    /// Parse and validate an id
    pub fn parse(value: &str) -> Result<Self, ContractError> {
        if Self::is_session_id(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ContractError::InvalidSessionId {
                value: value.to_string(),
            })
        }
    }

    /// Whether `value` follows the `yyyyMMdd-HHmmss` shape
    pub fn is_session_id(value: &str) -> bool {
        value.len() == 15 && NaiveDateTime::parse_from_str(value, SESSION_ID_FORMAT).is_ok()
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Start time encoded in the id (local time, second precision)
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, SESSION_ID_FORMAT).ok()
    }

    /// Human readable `YYYY-MM-DD HH:MM:SS`
    pub fn display_name(&self) -> String {
        display_name(&self.0)
    }

    /// `<id>.mov`
    pub fn movie_file_name(&self) -> String {
        format!("{}.mov", self.0)
    }

    /// `<id>.json`
    pub fn motion_file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

/// Display name for a session folder
///
/// Folders named like a session id are rendered as a date and time; any
/// other name is returned unchanged.
pub fn display_name(folder_name: &str) -> String {
    match NaiveDateTime::parse_from_str(folder_name, SESSION_ID_FORMAT) {
        Ok(start) if folder_name.len() == 15 => start.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => folder_name.to_string(),
    }
}

impl Deref for SessionId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SessionId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for SessionId {
    #[inline]
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl Borrow<str> for SessionId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({:?})", self.0)
    }
}

impl PartialEq<str> for SessionId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
