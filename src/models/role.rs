use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of role identities in the catalog. Also the lobby capacity.
pub const CATALOG_SIZE: usize = 5;

const CATALOG_ENTRIES: [(&str, &str, &str); CATALOG_SIZE] = [
    ("오드아이", "./images/cats/cat2.png", "./images/cats/cat2_jail.png"),
    ("삼색이", "./images/cats/cat3.png", "./images/cats/cat3_jail.png"),
    ("샴", "./images/cats/cat5.png", "./images/cats/cat5_jail.png"),
    ("고등어", "./images/cats/cat1.png", "./images/cats/cat1_jail.png"),
    ("치즈", "./images/cats/cat4.png", "./images/cats/cat4_jail.png"),
];

/// Public persona handed to a participant: a display name and its two avatars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleIdentity {
    pub name: String,
    pub active_image: String,
    pub jailed_image: String,
}

impl RoleIdentity {
    pub fn new(name: &str, active_image: &str, jailed_image: &str) -> Self {
        Self {
            name: name.to_string(),
            active_image: active_image.to_string(),
            jailed_image: jailed_image.to_string(),
        }
    }
}

impl fmt::Display for RoleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The fixed catalog, in declaration order.
pub fn default_catalog() -> Vec<RoleIdentity> {
    CATALOG_ENTRIES
        .iter()
        .map(|(name, active, jailed)| RoleIdentity::new(name, active, jailed))
        .collect()
}
