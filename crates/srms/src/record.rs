//! Core record types for srms.
//!
//! This module defines the student record, its identifier, and the set of
//! user-editable fields shared by the add and edit flows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Identifier of a student record.
///
/// Ids are derived from the creation time in milliseconds and are never reused
/// or changed after the record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(Error::invalid_id(s)),
        }
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// A single student's stored data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Unique identifier, fixed at creation.
    pub id: RecordId,
    /// Student name.
    pub name: String,
    /// Roll number as entered.
    #[serde(deserialize_with = "text_or_number")]
    pub roll_no: String,
    /// Class or grade.
    #[serde(deserialize_with = "text_or_number")]
    pub class_grade: String,
    /// Cumulative grade point average, if recorded.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub cgpa: Option<String>,
}

impl StudentRecord {
    /// Build a record from an id and a set of fields.
    #[must_use]
    pub fn new(id: RecordId, fields: StudentFields) -> Self {
        let fields = fields.normalized();
        Self {
            id,
            name: fields.name,
            roll_no: fields.roll_no,
            class_grade: fields.class_grade,
            cgpa: fields.cgpa,
        }
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, fields: StudentFields) {
        let fields = fields.normalized();
        self.name = fields.name;
        self.roll_no = fields.roll_no;
        self.class_grade = fields.class_grade;
        self.cgpa = fields.cgpa;
    }

    /// The editable fields of this record, as used to prefill an edit form.
    #[must_use]
    pub fn fields(&self) -> StudentFields {
        StudentFields {
            name: self.name.clone(),
            roll_no: self.roll_no.clone(),
            class_grade: self.class_grade.clone(),
            cgpa: self.cgpa.clone(),
        }
    }

    /// Case-insensitive substring match on the name.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

/// A stored field that may have been written as a JSON string or number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    String(String),
    Number(serde_json::Number),
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        match text {
            Text::String(s) => s,
            Text::Number(n) => n.to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Text::deserialize(deserializer).map(String::from)
}

/// Accept a missing, `null` or empty `cgpa` as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Text> = Option::deserialize(deserializer)?;
    Ok(value.map(String::from).filter(|s| !s.trim().is_empty()))
}

/// A form field that must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// The student name.
    Name,
    /// The roll number.
    RollNo,
    /// The class or grade.
    ClassGrade,
    /// The CGPA.
    Cgpa,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::RollNo => write!(f, "roll number"),
            Self::ClassGrade => write!(f, "class/grade"),
            Self::Cgpa => write!(f, "CGPA"),
        }
    }
}

/// The user-entered fields of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    /// Student name.
    pub name: String,
    /// Roll number.
    pub roll_no: String,
    /// Class or grade.
    pub class_grade: String,
    /// CGPA. Required by the form check, but records without one are
    /// still stored and displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<String>,
}

impl StudentFields {
    /// Create a new set of fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        roll_no: impl Into<String>,
        class_grade: impl Into<String>,
        cgpa: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            roll_no: roll_no.into(),
            class_grade: class_grade.into(),
            cgpa,
        }
    }

    /// The first form field that is blank, if any.
    ///
    /// All four fields are required; whitespace counts as blank.
    #[must_use]
    pub fn first_missing(&self) -> Option<RequiredField> {
        if self.name.trim().is_empty() {
            Some(RequiredField::Name)
        } else if self.roll_no.trim().is_empty() {
            Some(RequiredField::RollNo)
        } else if self.class_grade.trim().is_empty() {
            Some(RequiredField::ClassGrade)
        } else if self.cgpa.as_deref().unwrap_or_default().trim().is_empty() {
            Some(RequiredField::Cgpa)
        } else {
            None
        }
    }

    /// Drop a blank CGPA so it is stored as absent.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.cgpa.as_deref().is_some_and(|c| c.trim().is_empty()) {
            self.cgpa = None;
        }
        self
    }
}
