use rand::Rng;

use crate::models::role::{default_catalog, RoleIdentity};
use crate::services::game_service::GameError;

/// Fixed set of role identities plus which ones are handed out right now.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    entries: Vec<RoleIdentity>,
    checked_out: Vec<bool>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

impl RoleCatalog {
    pub fn new(entries: Vec<RoleIdentity>) -> Self {
        let checked_out = vec![false; entries.len()];
        Self {
            entries,
            checked_out,
        }
    }

    /// Hands out a free identity chosen uniformly at random.
    pub fn checkout<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoleIdentity, GameError> {
        if self.checked_out.iter().all(|taken| *taken) {
            return Err(GameError::CatalogExhausted);
        }

        let mut idx = rng.gen_range(0..self.entries.len());
        while self.checked_out[idx] {
            idx = rng.gen_range(0..self.entries.len());
        }
        self.checked_out[idx] = true;
        Ok(self.entries[idx].clone())
    }

    /// Marks the identity named `name` free again. Returns false for unknown names.
    pub fn release(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.checked_out[idx] = false;
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        self.checked_out.fill(false);
    }

    pub fn find(&self, name: &str) -> Option<&RoleIdentity> {
        self.position(name).map(|idx| &self.entries[idx])
    }

    pub fn checked_out_count(&self) -> usize {
        self.checked_out.iter().filter(|taken| **taken).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn checkout_never_repeats_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut catalog = RoleCatalog::default();
        let mut seen = HashSet::new();

        for _ in 0..catalog.len() {
            let identity = catalog.checkout(&mut rng).unwrap();
            assert!(seen.insert(identity.name));
        }
        assert_eq!(catalog.checked_out_count(), 5);
        assert!(matches!(
            catalog.checkout(&mut rng),
            Err(GameError::CatalogExhausted)
        ));
    }

    #[test]
    fn released_identity_can_be_checked_out_again() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut catalog = RoleCatalog::default();
        let identities: Vec<_> = (0..5).map(|_| catalog.checkout(&mut rng).unwrap()).collect();

        assert!(catalog.release(&identities[2].name));
        assert_eq!(catalog.checked_out_count(), 4);

        let again = catalog.checkout(&mut rng).unwrap();
        assert_eq!(again, identities[2]);
    }

    #[test]
    fn release_of_unknown_name_is_reported() {
        let mut catalog = RoleCatalog::default();
        assert!(!catalog.release("nobody"));
    }

    #[test]
    fn reset_frees_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut catalog = RoleCatalog::default();
        catalog.checkout(&mut rng).unwrap();
        catalog.checkout(&mut rng).unwrap();
        catalog.reset_all();
        assert_eq!(catalog.checked_out_count(), 0);
    }
}
