use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered draw participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub has_won: bool,
}

impl Participant {
    pub fn new(name: String, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            is_verified: false,
            has_won: false,
        }
    }
}
