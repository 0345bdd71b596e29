/// Category model
///
/// Categories are owned by the category collaborator; this core only reads
/// them when joining tasks for display. Names are not guaranteed unique.

use serde::{Deserialize, Serialize};

/// A label tasks can be grouped under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Category id
    pub id: i32,

    /// Display name
    pub name: String,
}
