use log::{info, warn};
use rand::Rng;

use crate::models::player::{ConnectionId, Participant};
use crate::models::role::{RoleIdentity, CATALOG_SIZE};
use crate::services::catalog::RoleCatalog;
use crate::services::game_service::GameError;

/// Connected participants in join order.
#[derive(Debug, Clone)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
    capacity: usize,
}

impl Default for ParticipantRegistry {
    fn default() -> Self {
        Self {
            participants: Vec::with_capacity(CATALOG_SIZE),
            capacity: CATALOG_SIZE,
        }
    }
}

impl ParticipantRegistry {
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        catalog: &mut RoleCatalog,
        rng: &mut R,
        connection_id: ConnectionId,
    ) -> Result<RoleIdentity, GameError> {
        if self.is_full() {
            return Err(GameError::RoomFull);
        }

        let identity = catalog.checkout(rng)?;
        info!("{} joined as {}", connection_id, identity);
        self.participants
            .push(Participant::new(identity.clone(), connection_id));
        Ok(identity)
    }

    /// Removes the participant and frees its identity. Unknown connections are left alone,
    /// so a stale disconnect can never release an identity someone else now holds.
    pub fn leave(
        &mut self,
        catalog: &mut RoleCatalog,
        connection_id: &str,
    ) -> Result<Participant, GameError> {
        let idx = self
            .participants
            .iter()
            .position(|p| p.connection_id == connection_id)
            .ok_or_else(|| GameError::UnknownConnection(connection_id.to_string()))?;

        let participant = self.participants.remove(idx);
        if !catalog.release(participant.role_name()) {
            warn!(
                "identity {} was not in the catalog when {} left",
                participant.identity, connection_id
            );
        }
        Ok(participant)
    }

    pub fn find(&self, connection_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.connection_id == connection_id)
    }

    pub fn all(&self) -> Vec<Participant> {
        self.participants.clone()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity
    }

    pub fn reset_all(&mut self) {
        self.participants.clear();
    }
}
