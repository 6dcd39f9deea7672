//! Status enums mapping to SMALLINT columns.
//!
//! Variant discriminants match the seed order (1-based) used in the
//! migrations; `name()` returns the lowercase label exposed over HTTP.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Lifecycle of a generation job.
///
/// Transitions are monotonic forward: started → processing →
/// {completed | error}. Terminal rows are never updated again; the
/// repository enforces this with a guarded UPDATE.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Started = 1,
    Processing = 2,
    Completed = 3,
    Error = 4,
}

impl JobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Lowercase label used in API responses.
    pub fn name(self) -> &'static str {
        match self {
            JobStatus::Started => "started",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// Parse a database status ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(JobStatus::Started),
            2 => Some(JobStatus::Processing),
            3 => Some(JobStatus::Completed),
            4 => Some(JobStatus::Error),
            _ => None,
        }
    }

    /// Completed and error are terminal; no further transitions occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Dispatch state of a processing queue row.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Pending = 1,
    Processing = 2,
    Completed = 3,
}

impl QueueStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_ids_round_trip() {
        for status in [
            JobStatus::Started,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Error,
        ] {
            assert_eq!(JobStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(JobStatus::from_id(99), None);
    }

    #[test]
    fn only_completed_and_error_are_terminal() {
        assert!(!JobStatus::Started.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn names_match_api_labels() {
        assert_eq!(JobStatus::Started.name(), "started");
        assert_eq!(JobStatus::Processing.name(), "processing");
        assert_eq!(JobStatus::Completed.name(), "completed");
        assert_eq!(JobStatus::Error.name(), "error");
    }
}
