/// Generation jobs are identified by opaque UUIDs (v7, time-ordered).
pub type JobId = uuid::Uuid;

/// Queue rows use a BIGSERIAL primary key.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
