/// All entity primary keys (rooms, listings, matches, transactions) are UUIDs,
/// generated client-side so paired records can reference each other before
/// either row exists.
pub type DbId = uuid::Uuid;

/// User ids are the identity provider's subject strings, not local keys.
pub type Uid = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
