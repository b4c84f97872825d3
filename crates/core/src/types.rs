/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All persisted instants are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stay dates carry no time of day and no zone.
pub type StayDate = chrono::NaiveDate;

/// Property-local wall-clock time, used for precise booking bounds.
pub type LocalDateTime = chrono::NaiveDateTime;
