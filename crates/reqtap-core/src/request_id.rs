//! Request identifier generation.

use uuid::Uuid;

/// Generate a fresh request id.
///
/// Ids are UUIDv7: globally unique and, because the encoding leads with a
/// millisecond timestamp, lexically sortable by creation time. Sortability
/// helps log correlation; correctness never depends on it.
pub fn generate() -> String {
    Uuid::now_v7().to_string()
}
