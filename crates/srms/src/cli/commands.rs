//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{RecordId, StudentFields};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Student name
    #[arg(short, long)]
    pub name: String,

    /// Roll number
    #[arg(short, long)]
    pub roll_no: String,

    /// Class or grade
    #[arg(short = 'g', long)]
    pub class_grade: String,

    /// CGPA
    #[arg(long)]
    pub cgpa: String,
}

impl AddCommand {
    /// The form fields this command submits.
    #[must_use]
    pub fn fields(&self) -> StudentFields {
        StudentFields::new(
            self.name.clone(),
            self.roll_no.clone(),
            self.class_grade.clone(),
            Some(self.cgpa.clone()),
        )
    }
}

/// Edit command arguments.
///
/// Fields that are not given keep their current value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the record to edit
    #[arg(value_parser = parse_record_id)]
    pub id: RecordId,

    /// New student name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New roll number
    #[arg(short, long)]
    pub roll_no: Option<String>,

    /// New class or grade
    #[arg(short = 'g', long)]
    pub class_grade: Option<String>,

    /// New CGPA
    #[arg(long)]
    pub cgpa: Option<String>,
}

impl EditCommand {
    /// Overlay the given flags on the record's current fields.
    #[must_use]
    pub fn merge_into(&self, mut current: StudentFields) -> StudentFields {
        if let Some(name) = &self.name {
            current.name.clone_from(name);
        }
        if let Some(roll_no) = &self.roll_no {
            current.roll_no.clone_from(roll_no);
        }
        if let Some(class_grade) = &self.class_grade {
            current.class_grade.clone_from(class_grade);
        }
        if let Some(cgpa) = &self.cgpa {
            current.cgpa = Some(cgpa.clone());
        }
        current.normalized()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the record to delete
    #[arg(value_parser = parse_record_id)]
    pub id: RecordId,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in student names (case-insensitive)
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the record to show
    #[arg(value_parser = parse_record_id)]
    pub id: RecordId,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for record lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines
    Plain,
    /// Aligned table with headers
    #[default]
    Table,
    /// JSON output
    Json,
}

fn parse_record_id(s: &str) -> Result<RecordId, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(name: Option<&str>, cgpa: Option<&str>) -> EditCommand {
        EditCommand {
            id: RecordId::new(1),
            name: name.map(str::to_string),
            roll_no: None,
            class_grade: None,
            cgpa: cgpa.map(str::to_string),
        }
    }

    #[test]
    fn test_add_fields() {
        let cmd = AddCommand {
            name: "Asha".to_string(),
            roll_no: "1".to_string(),
            class_grade: "5A".to_string(),
            cgpa: "9.1".to_string(),
        };
        assert_eq!(
            cmd.fields(),
            StudentFields::new("Asha", "1", "5A", Some("9.1".to_string()))
        );
    }

    #[test]
    fn test_edit_keeps_unset_fields() {
        let current = StudentFields::new("Asha", "1", "5A", Some("9.1".to_string()));
        let merged = edit(Some("Asha Rao"), None).merge_into(current);
        assert_eq!(
            merged,
            StudentFields::new("Asha Rao", "1", "5A", Some("9.1".to_string()))
        );
    }

    #[test]
    fn test_edit_empty_cgpa_is_blank() {
        let current = StudentFields::new("Asha", "1", "5A", Some("9.1".to_string()));
        let merged = edit(None, Some("")).merge_into(current);
        assert!(merged.cgpa.is_none());
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("17").unwrap(), RecordId::new(17));
        let err = parse_record_id("seventeen").unwrap_err();
        assert!(err.contains("seventeen"));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
