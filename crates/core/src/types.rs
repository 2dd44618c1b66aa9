/// A tabular upload: row 0 is the header, rows 1..n are data.
pub type RawGrid = Vec<Vec<String>>;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
