use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::Participant;

/// Number of mafia per round.
pub const MAFIA_COUNT: usize = 1;

/// A round ends in a mafia win once fewer citizens than this are still free.
pub const MIN_FREE_CITIZENS: usize = 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Pending,   // waiting for a full lobby
    Beginning, // roles assigned, reveal scheduled
    Day,
    Night,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Pending => "pending",
            Stage::Beginning => "beginning",
            Stage::Day => "day",
            Stage::Night => "night",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameResult {
    CivilWin,
    MafiaWin,
}

impl GameResult {
    /// Numeric code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            GameResult::CivilWin => 0,
            GameResult::MafiaWin => 1,
        }
    }
}

/// Outcome of counting one set of day ballots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tally {
    Drawn,
    Elected(String),
}

/// Public view of the game, safe to hand to any client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub stage: Stage,
    pub round: u64,
    pub roster: Vec<Participant>,
    pub jailed: Vec<String>,
    pub ballot_count: usize,
}
