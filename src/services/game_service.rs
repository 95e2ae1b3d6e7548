//! The game state machine.
//!
//! `GameController` owns the catalog, the registry and the round, and is the
//! only place they are mutated. It never touches the network: every handler
//! returns the [`Effect`]s the session task has to carry out.

use log::{error, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::models::chat::{ChatLog, ChatMessage};
use crate::models::event::{ClientEvent, ServerEvent};
use crate::models::game::{GameResult, GameSnapshot, Stage, Tally, MIN_FREE_CITIZENS};
use crate::models::player::ConnectionId;
use crate::services::catalog::RoleCatalog;
use crate::services::registry::ParticipantRegistry;
use crate::services::round::{tally, RoundState};
use crate::services::word_service::SecretWords;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("the room is full")]
    RoomFull,
    #[error("no free role identity left in the catalog")]
    CatalogExhausted,
    #[error("unknown connection: {0}")]
    UnknownConnection(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("{0} is jailed")]
    Jailed(String),
    #[error("{event} is not accepted during the {stage} stage")]
    StageMismatch { event: &'static str, stage: Stage },
}

/// Something the transport has to do on behalf of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Broadcast(ServerEvent),
    Unicast(ConnectionId, ServerEvent),
    /// Deliver `GameController::reveal(round)` after the reveal delay.
    ScheduleReveal { round: u64 },
    Close(ConnectionId),
}

pub struct GameController {
    catalog: RoleCatalog,
    registry: ParticipantRegistry,
    round: RoundState,
    stage: Stage,
    words: SecretWords,
    chat_log: ChatLog,
    rng: StdRng,
}

impl GameController {
    pub fn new(words: SecretWords) -> Self {
        Self::with_rng(words, StdRng::from_entropy())
    }

    pub fn with_seed(words: SecretWords, seed: u64) -> Self {
        Self::with_rng(words, StdRng::seed_from_u64(seed))
    }

    fn with_rng(words: SecretWords, rng: StdRng) -> Self {
        Self {
            catalog: RoleCatalog::default(),
            registry: ParticipantRegistry::default(),
            round: RoundState::new(),
            stage: Stage::Pending,
            words,
            chat_log: ChatLog::new(),
            rng,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn chat_log(&self) -> &ChatLog {
        &self.chat_log
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            stage: self.stage,
            round: self.round.sequence(),
            roster: self.registry.all(),
            jailed: self.round.jailed().to_vec(),
            ballot_count: self.round.ballots().len(),
        }
    }

    /// A new socket opened.
    pub fn connect(&mut self, connection_id: ConnectionId) -> Vec<Effect> {
        let identity =
            match self
                .registry
                .join(&mut self.catalog, &mut self.rng, connection_id.clone())
            {
                Ok(identity) => identity,
                Err(GameError::RoomFull) => {
                    warn!("rejecting {}: room is full", connection_id);
                    return vec![Effect::Unicast(connection_id, ServerEvent::FullRoom)];
                }
                Err(e) => {
                    error!("join of {} failed: {}; resetting the game", connection_id, e);
                    self.full_reset();
                    return vec![Effect::Broadcast(ServerEvent::CurrentUsers(Vec::new()))];
                }
            };

        let mut effects = vec![
            Effect::Unicast(connection_id, ServerEvent::UserUpdate(identity)),
            Effect::Broadcast(ServerEvent::CurrentUsers(self.registry.all())),
        ];

        // Refilling the room mid-round starts over with the new roster.
        if self.registry.is_full() {
            effects.extend(self.start_round());
        }
        effects
    }

    /// A socket closed, for whatever reason.
    pub fn disconnect(&mut self, connection_id: &str) -> Vec<Effect> {
        match self.registry.leave(&mut self.catalog, connection_id) {
            Ok(participant) => {
                info!("{} ({}) disconnected", connection_id, participant.identity);
            }
            Err(e) => {
                warn!("ignoring disconnect: {}", e);
                return Vec::new();
            }
        }

        // Leaving mid-round keeps the round as it is. Only an empty lobby ends it.
        if self.registry.is_empty() && self.stage != Stage::Pending {
            info!("everyone left during the {} stage; resetting", self.stage);
            self.full_reset();
        }

        let mut effects = vec![Effect::Broadcast(ServerEvent::UserDisconnect(
            self.registry.all(),
        ))];

        // the leaver may have been the last ballot the day was waiting for
        if self.stage == Stage::Day && self.day_quorum_reached() {
            effects.extend(self.resolve_day());
        }
        effects
    }

    pub fn handle_event(&mut self, connection_id: &str, event: ClientEvent) -> Vec<Effect> {
        match event {
            ClientEvent::ChatMessage(text) => self.chat(connection_id, text),
            ClientEvent::DayVote(vote) => self.day_vote(connection_id, vote),
            ClientEvent::NightVote(target) => self.night_vote(connection_id, target),
            ClientEvent::ForceDisconnected => vec![Effect::Close(connection_id.to_string())],
        }
    }

    pub fn chat(&mut self, connection_id: &str, text: String) -> Vec<Effect> {
        let Some(sender) = self.registry.find(connection_id) else {
            warn!(
                "dropping chat: {}",
                GameError::UnknownConnection(connection_id.to_string())
            );
            return Vec::new();
        };

        let identity = sender.identity.clone();
        self.chat_log.add_message(ChatMessage::new(
            connection_id.to_string(),
            identity.name.clone(),
            text.clone(),
        ));
        vec![Effect::Broadcast(ServerEvent::ChatMessage {
            identity,
            text,
            connection_id: connection_id.to_string(),
        })]
    }

    pub fn day_vote(&mut self, connection_id: &str, vote: Option<String>) -> Vec<Effect> {
        if let Err(e) = self.check_voter(connection_id, "day vote", Stage::Day) {
            warn!("dropping day vote from {}: {}", connection_id, e);
            return Vec::new();
        }
        if self.round.has_voted(connection_id) {
            warn!("{} already voted this day", connection_id);
            return Vec::new();
        }

        let vote = self.eligible_target(vote);
        self.round.record_ballot(connection_id.to_string(), vote);

        if !self.day_quorum_reached() {
            return Vec::new();
        }
        self.resolve_day()
    }

    pub fn night_vote(&mut self, connection_id: &str, target: Option<String>) -> Vec<Effect> {
        if let Err(e) = self.check_voter(connection_id, "night vote", Stage::Night) {
            warn!("dropping night vote from {}: {}", connection_id, e);
            return Vec::new();
        }
        if !self.round.is_mafia(connection_id) {
            warn!("dropping night vote from {}: not the mafia", connection_id);
            return Vec::new();
        }

        let mut effects = Vec::new();
        if let Some(target) = self.eligible_target(target) {
            info!("{} was jailed at night", target);
            self.round.jail(&target);
            effects.push(self.vote_result(target));
        }

        self.stage = Stage::Day;
        effects.push(Effect::Broadcast(ServerEvent::StageChanged(Stage::Day)));
        effects
    }

    /// Fired by the reveal timer. Does nothing if the round it was scheduled for is gone.
    pub fn reveal(&mut self, round: u64) -> Vec<Effect> {
        if round != self.round.sequence() || self.stage != Stage::Beginning {
            warn!(
                "stale reveal for round {} (current round {}, stage {})",
                round,
                self.round.sequence(),
                self.stage
            );
            return Vec::new();
        }
        let Some(mafia) = self.round.mafia() else {
            warn!("reveal for round {} without a mafia", round);
            return Vec::new();
        };

        let word = self.round.secret_word().to_string();
        let mut effects: Vec<Effect> = self
            .round
            .citizens()
            .iter()
            .map(|c| {
                Effect::Unicast(
                    c.connection_id.clone(),
                    ServerEvent::SecretCode(word.clone()),
                )
            })
            .collect();
        effects.push(Effect::Unicast(
            mafia.connection_id.clone(),
            ServerEvent::MafiaCode,
        ));

        self.stage = Stage::Day;
        effects.push(Effect::Broadcast(ServerEvent::StageChanged(Stage::Day)));
        effects
    }

    /// Clears catalog, registry, round and chat, and returns to `pending`.
    pub fn full_reset(&mut self) {
        self.catalog.reset_all();
        self.registry.reset_all();
        self.round.reset();
        self.round.clear_ballots();
        self.chat_log.clear();
        self.stage = Stage::Pending;
        info!("game reset");
    }

    fn start_round(&mut self) -> Vec<Effect> {
        let roster = self.registry.all();
        let round = self.round.start_round(&roster, &self.words, &mut self.rng);
        self.stage = Stage::Beginning;
        info!(
            "round {} started with {} citizens",
            round,
            self.round.citizens().len()
        );

        vec![
            Effect::Broadcast(ServerEvent::RoundBeginning {
                citizen_count: self.round.citizens().len(),
            }),
            Effect::ScheduleReveal { round },
        ]
    }

    fn day_quorum_reached(&self) -> bool {
        let ballots = self.round.ballots().len();
        ballots > 0 && ballots >= self.round.remaining_voters(self.registry.len())
    }

    fn resolve_day(&mut self) -> Vec<Effect> {
        let outcome = tally(self.round.ballots());
        self.round.clear_ballots();

        let mafia_name = self
            .round
            .mafia()
            .map(|m| m.role_name().to_string())
            .unwrap_or_default();

        match outcome {
            Tally::Elected(name) if name == mafia_name => {
                info!("citizens caught the mafia {}", mafia_name);
                let effects = vec![self.game_over(GameResult::CivilWin, mafia_name)];
                self.full_reset();
                effects
            }
            Tally::Elected(name) => {
                info!("{} was jailed by day vote", name);
                self.round.jail(&name);
                let mut effects = vec![self.vote_result(name)];

                if self.round.free_citizens() < MIN_FREE_CITIZENS {
                    info!("mafia {} outlasted the citizens", mafia_name);
                    effects.push(self.game_over(GameResult::MafiaWin, mafia_name));
                    self.full_reset();
                } else {
                    self.stage = Stage::Night;
                    effects.push(Effect::Broadcast(ServerEvent::StageChanged(Stage::Night)));
                }
                effects
            }
            Tally::Drawn => {
                info!("day vote drawn");
                self.stage = Stage::Night;
                vec![Effect::Broadcast(ServerEvent::StageChanged(Stage::Night))]
            }
        }
    }

    fn check_voter(
        &self,
        connection_id: &str,
        event: &'static str,
        expected: Stage,
    ) -> Result<(), GameError> {
        let voter = self
            .registry
            .find(connection_id)
            .ok_or_else(|| GameError::UnknownConnection(connection_id.to_string()))?;
        if self.stage != expected {
            return Err(GameError::StageMismatch {
                event,
                stage: self.stage,
            });
        }
        if self.round.is_jailed(voter.role_name()) {
            return Err(GameError::Jailed(voter.role_name().to_string()));
        }
        Ok(())
    }

    // Names outside the catalog or already jailed count as no choice.
    fn eligible_target(&self, target: Option<String>) -> Option<String> {
        let target = target?;
        if self.catalog.find(&target).is_none() {
            warn!("{}", GameError::UnknownRole(target));
            return None;
        }
        if self.round.is_jailed(&target) {
            warn!("{} is already jailed", target);
            return None;
        }
        Some(target)
    }

    fn vote_result(&self, role_name: String) -> Effect {
        let jailed_image = self
            .catalog
            .find(&role_name)
            .map(|identity| identity.jailed_image.clone())
            .unwrap_or_default();
        Effect::Broadcast(ServerEvent::VoteResult {
            role_name,
            jailed_image,
        })
    }

    fn game_over(&self, result: GameResult, mafia_name: String) -> Effect {
        Effect::Broadcast(ServerEvent::GameOver { result, mafia_name })
    }
}
