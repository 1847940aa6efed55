/// PubChem compound identifiers are PostgreSQL INTEGER.
pub type CompoundId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
