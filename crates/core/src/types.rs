/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A full field-map snapshot of an entity (JSON object, field name -> value).
pub type FieldMap = serde_json::Map<String, serde_json::Value>;
