//! City and district rows

use serde::{Deserialize, Serialize};

/// City row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: i64,
}

/// District row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
}
