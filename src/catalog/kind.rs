//! Dataset kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::{
    COURSE_NUMERIC_FIELDS, COURSE_STRING_FIELDS, ROOM_NUMERIC_FIELDS, ROOM_STRING_FIELDS,
};

/// The kind of records a dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// University course sections
    #[serde(rename = "courses", alias = "course-section")]
    CourseSection,
    /// Rooms of campus buildings
    #[serde(rename = "rooms", alias = "room")]
    Room,
}

impl DatasetKind {
    /// Returns the wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::CourseSection => "courses",
            DatasetKind::Room => "rooms",
        }
    }

    /// Numeric (mkey) field names
    pub fn numeric_fields(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::CourseSection => COURSE_NUMERIC_FIELDS,
            DatasetKind::Room => ROOM_NUMERIC_FIELDS,
        }
    }

    /// String (skey) field names
    pub fn string_fields(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::CourseSection => COURSE_STRING_FIELDS,
            DatasetKind::Room => ROOM_STRING_FIELDS,
        }
    }

    /// All field names, numeric first
    pub fn fields(&self) -> impl Iterator<Item = &'static str> {
        self.numeric_fields()
            .iter()
            .chain(self.string_fields().iter())
            .copied()
    }

    /// Number of fields in a complete record
    pub fn field_count(&self) -> usize {
        self.numeric_fields().len() + self.string_fields().len()
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a kind name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(String);

impl ParseKindError {
    /// The rejected input
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown dataset kind '{}'", self.0)
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for DatasetKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "courses" | "course-section" => Ok(DatasetKind::CourseSection),
            "rooms" | "room" => Ok(DatasetKind::Room),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("courses".parse(), Ok(DatasetKind::CourseSection));
        assert_eq!("course-section".parse(), Ok(DatasetKind::CourseSection));
        assert_eq!("rooms".parse(), Ok(DatasetKind::Room));
        assert_eq!("room".parse(), Ok(DatasetKind::Room));
        assert!("buildings".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(DatasetKind::CourseSection.field_count(), 10);
        assert_eq!(DatasetKind::Room.field_count(), 11);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DatasetKind::Room).unwrap();
        assert_eq!(json, "\"rooms\"");

        let kind: DatasetKind = serde_json::from_str("\"course-section\"").unwrap();
        assert_eq!(kind, DatasetKind::CourseSection);
    }
}
