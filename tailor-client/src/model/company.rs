use serde::{Deserialize, Serialize};

use super::Entity;

/// A sister concern within the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Entity for Company {
    const RESOURCE: &'static str = "companies";

    fn id(&self) -> &str {
        &self.id
    }
}
