//! Error kinds and run statistics for the loader pipeline

use thiserror::Error;

/// Errors raised while reading and mapping the posts export
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read posts file: {0}")]
    FileAccess(#[from] std::io::Error),

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Row {row}: missing required attribute '{attribute}'")]
    MissingField { row: String, attribute: &'static str },

    #[error("Row {row}: attribute '{attribute}' has invalid value '{value}'")]
    InvalidField {
        row: String,
        attribute: &'static str,
        value: String,
    },

    #[error("Duplicate question id '{0}'")]
    DuplicateId(String),
}

impl From<quick_xml::Error> for ImportError {
    fn from(e: quick_xml::Error) -> Self {
        ImportError::Xml(e.to_string())
    }
}

/// Statistics for one loader run
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Rows read from the export
    pub rows_read: usize,
    /// Reply rows skipped (rows carrying a parent reference)
    pub replies_skipped: usize,
    /// Records kept after ranking by view count
    pub records_selected: usize,
    /// Documents removed by the collection reset
    pub documents_deleted: u64,
    /// Documents written by the bulk insert
    pub documents_inserted: usize,
    /// Wall-clock time for the whole run
    pub elapsed_seconds: f64,
}

impl LoadStats {
    /// Rows mapped to records (everything read minus skipped replies)
    pub fn records_mapped(&self) -> usize {
        self.rows_read - self.replies_skipped
    }

    /// Print a run summary to stdout
    pub fn print_summary(&self) {
        println!("\nLoad Summary");
        println!("============");
        println!("Rows read:          {}", self.rows_read);
        println!("Replies skipped:    {}", self.replies_skipped);
        println!("Records mapped:     {}", self.records_mapped());
        println!("Records selected:   {}", self.records_selected);
        println!("Documents deleted:  {}", self.documents_deleted);
        println!("Documents inserted: {}", self.documents_inserted);
        println!("Elapsed time:       {:.1}s", self.elapsed_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_mapped_subtracts_skipped_replies() {
        let stats = LoadStats {
            rows_read: 10,
            replies_skipped: 4,
            ..Default::default()
        };
        assert_eq!(stats.records_mapped(), 6);
    }

    #[test]
    fn field_errors_name_the_row_and_attribute() {
        let err = ImportError::MissingField {
            row: "42".to_string(),
            attribute: "Title",
        };
        let message = err.to_string();
        assert!(message.contains("42"));
        assert!(message.contains("Title"));

        let err = ImportError::InvalidField {
            row: "7".to_string(),
            attribute: "Score",
            value: "lots".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Score"));
        assert!(message.contains("lots"));
    }
}
