use serde::{Deserialize, Serialize};

use super::role::RoleIdentity;

/// Opaque id of one transport connection.
pub type ConnectionId = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub identity: RoleIdentity,
    pub connection_id: ConnectionId,
}

impl Participant {
    pub fn new(identity: RoleIdentity, connection_id: ConnectionId) -> Self {
        Self {
            identity,
            connection_id,
        }
    }

    pub fn role_name(&self) -> &str {
        &self.identity.name
    }
}
