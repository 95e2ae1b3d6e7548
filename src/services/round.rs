use std::collections::HashMap;

use rand::Rng;

use crate::models::game::Tally;
use crate::models::player::{ConnectionId, Participant};
use crate::services::word_service::SecretWords;

/// Per-round secrets and progress: who is mafia, who is jailed, pending ballots.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    sequence: u64,
    citizens: Vec<Participant>,
    mafia: Option<Participant>,
    jailed: Vec<String>,
    ballots: Vec<Option<String>>,
    voters: Vec<ConnectionId>,
    secret_word: String,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new round from the lobby roster and returns its sequence number.
    pub fn start_round<R: Rng + ?Sized>(
        &mut self,
        participants: &[Participant],
        words: &SecretWords,
        rng: &mut R,
    ) -> u64 {
        debug_assert!(!participants.is_empty());

        self.sequence += 1;
        self.citizens = participants.to_vec();
        let mafia_idx = rng.gen_range(0..self.citizens.len());
        self.mafia = Some(self.citizens.remove(mafia_idx));
        self.secret_word = words.draw(rng).to_string();
        self.jailed.clear();
        self.clear_ballots();
        self.sequence
    }

    pub fn jail(&mut self, role_name: &str) {
        self.jailed.push(role_name.to_string());
    }

    pub fn is_jailed(&self, role_name: &str) -> bool {
        self.jailed.iter().any(|name| name == role_name)
    }

    /// Live participants who still owe a ballot this tally.
    pub fn remaining_voters(&self, total_participants: usize) -> usize {
        total_participants.saturating_sub(self.jailed.len())
    }

    /// Citizens still free to act.
    pub fn free_citizens(&self) -> usize {
        self.citizens.len().saturating_sub(self.jailed.len())
    }

    pub fn record_ballot(&mut self, voter: ConnectionId, vote: Option<String>) {
        self.voters.push(voter);
        self.ballots.push(vote);
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.voters.iter().any(|v| v == voter)
    }

    pub fn clear_ballots(&mut self) {
        self.ballots.clear();
        self.voters.clear();
    }

    pub fn reset(&mut self) {
        self.citizens.clear();
        self.mafia = None;
        self.jailed.clear();
        self.secret_word.clear();
    }

    pub fn is_mafia(&self, connection_id: &str) -> bool {
        self.mafia
            .as_ref()
            .map(|m| m.connection_id == connection_id)
            .unwrap_or(false)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn citizens(&self) -> &[Participant] {
        &self.citizens
    }

    pub fn mafia(&self) -> Option<&Participant> {
        self.mafia.as_ref()
    }

    pub fn jailed(&self) -> &[String] {
        &self.jailed
    }

    pub fn ballots(&self) -> &[Option<String>] {
        &self.ballots
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }
}

/// Counts named votes. A tally is drawn when nobody named anyone or when the
/// top count is shared.
pub fn tally(ballots: &[Option<String>]) -> Tally {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for name in ballots.iter().flatten() {
        let count = counts.entry(name.as_str()).or_insert(0);
        if *count == 0 {
            order.push(name.as_str());
        }
        *count += 1;
    }

    let max = match counts.values().max() {
        Some(max) => *max,
        None => return Tally::Drawn,
    };

    let mut leaders = order.into_iter().filter(|name| counts[name] == max);
    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => Tally::Elected(leader.to_string()),
        _ => Tally::Drawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::default_catalog;
    use rand::{rngs::StdRng, SeedableRng};

    fn votes(names: &[Option<&str>]) -> Vec<Option<String>> {
        names.iter().map(|n| n.map(str::to_string)).collect()
    }

    fn roster() -> Vec<Participant> {
        default_catalog()
            .into_iter()
            .enumerate()
            .map(|(i, identity)| Participant::new(identity, format!("conn-{}", i)))
            .collect()
    }

    #[test]
    fn tie_at_the_top_is_a_draw() {
        let ballots = votes(&[Some("A"), Some("A"), Some("B"), Some("B")]);
        assert_eq!(tally(&ballots), Tally::Drawn);
    }

    #[test]
    fn single_leader_is_elected() {
        let ballots = votes(&[Some("A"), Some("A"), Some("B")]);
        assert_eq!(tally(&ballots), Tally::Elected("A".to_string()));
    }

    #[test]
    fn all_abstentions_are_a_draw() {
        let ballots = votes(&[None, None, None, None, None]);
        assert_eq!(tally(&ballots), Tally::Drawn);
    }

    #[test]
    fn abstentions_do_not_compete_with_named_votes() {
        let ballots = votes(&[None, None, None, Some("B")]);
        assert_eq!(tally(&ballots), Tally::Elected("B".to_string()));
    }

    #[test]
    fn start_round_splits_one_mafia_from_four_citizens() {
        let mut rng = StdRng::seed_from_u64(42);
        let words = SecretWords::builtin();
        let participants = roster();
        let mut round = RoundState::new();

        let seq = round.start_round(&participants, &words, &mut rng);
        assert_eq!(seq, 1);
        assert_eq!(round.citizens().len(), 4);

        let mafia = round.mafia().unwrap();
        assert!(participants.contains(mafia));
        assert!(!round.citizens().contains(mafia));
        assert!(words.contains(round.secret_word()));
    }

    #[test]
    fn remaining_voters_shrink_with_jail() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = RoundState::new();
        round.start_round(&roster(), &SecretWords::builtin(), &mut rng);

        assert_eq!(round.remaining_voters(5), 5);
        round.jail("치즈");
        assert_eq!(round.remaining_voters(5), 4);
        assert_eq!(round.free_citizens(), 3);
    }

    #[test]
    fn reset_keeps_sequence_moving_forward() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut round = RoundState::new();
        let words = SecretWords::builtin();
        round.start_round(&roster(), &words, &mut rng);
        round.jail("샴");
        round.reset();

        assert!(round.mafia().is_none());
        assert!(round.jailed().is_empty());
        assert_eq!(round.start_round(&roster(), &words, &mut rng), 2);
    }
}
