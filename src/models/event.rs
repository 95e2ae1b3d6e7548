//! Frames exchanged over the game socket.
//!
//! Every frame is a JSON array shaped like a socket.io event packet:
//! `["<event name>", arg0, arg1, ...]`. Event names are shared with the
//! browser client and must not change.

use serde_json::{json, Value};

use super::game::{GameResult, Stage, MAFIA_COUNT};
use super::player::{ConnectionId, Participant};
use super::role::RoleIdentity;

pub const EV_CHAT_MESSAGE: &str = "chat message";
pub const EV_DAY_VOTE: &str = "day vote";
pub const EV_NIGHT_VOTE: &str = "night vote";
pub const EV_FORCE_DISCONNECTED: &str = "force disconnected";

pub const EV_FULL_ROOM: &str = "fullRoom";
pub const EV_USER_UPDATE: &str = "user update";
pub const EV_CURRENT_USERS: &str = "currentUsers";
pub const EV_CHANGE_GAME_STATE: &str = "change gameState";
pub const EV_SECRET_CODE: &str = "get secret-code";
pub const EV_MAFIA_CODE: &str = "get mafia-code";
pub const EV_VOTE_RESULT: &str = "vote result";
pub const EV_GAME_RESULT: &str = "game result";
pub const EV_USER_DISCONNECT: &str = "user disconnect";

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame is not an event array")]
    NotAnEvent,
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    #[error("bad argument for {event}: {reason}")]
    BadArgument { event: String, reason: String },
}

/// Events a client may send. Connect and disconnect are socket lifecycle, not frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    ChatMessage(String),
    DayVote(Option<String>),
    NightVote(Option<String>),
    ForceDisconnected,
}

impl ClientEvent {
    pub fn from_text(text: &str) -> Result<Self, ProtocolError> {
        let frame: Value = serde_json::from_str(text)?;
        let items = frame.as_array().ok_or(ProtocolError::NotAnEvent)?;
        let (name, args) = items.split_first().ok_or(ProtocolError::NotAnEvent)?;
        let name = name.as_str().ok_or(ProtocolError::NotAnEvent)?;

        match name {
            EV_CHAT_MESSAGE => match args.first() {
                Some(Value::String(text)) => Ok(ClientEvent::ChatMessage(text.clone())),
                _ => Err(ProtocolError::BadArgument {
                    event: name.to_string(),
                    reason: "expected a text argument".to_string(),
                }),
            },
            EV_DAY_VOTE => Ok(ClientEvent::DayVote(vote_argument(name, args.first())?)),
            EV_NIGHT_VOTE => Ok(ClientEvent::NightVote(vote_argument(name, args.first())?)),
            EV_FORCE_DISCONNECTED => Ok(ClientEvent::ForceDisconnected),
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

// null, a missing argument and "" all mean abstain
fn vote_argument(event: &str, arg: Option<&Value>) -> Result<Option<String>, ProtocolError> {
    match arg {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ProtocolError::BadArgument {
            event: event.to_string(),
            reason: "expected a role name or null".to_string(),
        }),
    }
}

/// Events the server sends, either to everyone or to one connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    FullRoom,
    UserUpdate(RoleIdentity),
    CurrentUsers(Vec<Participant>),
    ChatMessage {
        identity: RoleIdentity,
        text: String,
        connection_id: ConnectionId,
    },
    RoundBeginning {
        citizen_count: usize,
    },
    StageChanged(Stage),
    SecretCode(String),
    MafiaCode,
    VoteResult {
        role_name: String,
        jailed_image: String,
    },
    GameOver {
        result: GameResult,
        mafia_name: String,
    },
    UserDisconnect(Vec<Participant>),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::FullRoom => EV_FULL_ROOM,
            ServerEvent::UserUpdate(_) => EV_USER_UPDATE,
            ServerEvent::CurrentUsers(_) => EV_CURRENT_USERS,
            ServerEvent::ChatMessage { .. } => EV_CHAT_MESSAGE,
            ServerEvent::RoundBeginning { .. } | ServerEvent::StageChanged(_) => {
                EV_CHANGE_GAME_STATE
            }
            ServerEvent::SecretCode(_) => EV_SECRET_CODE,
            ServerEvent::MafiaCode => EV_MAFIA_CODE,
            ServerEvent::VoteResult { .. } => EV_VOTE_RESULT,
            ServerEvent::GameOver { .. } => EV_GAME_RESULT,
            ServerEvent::UserDisconnect(_) => EV_USER_DISCONNECT,
        }
    }

    pub fn to_frame(&self) -> Value {
        let name = self.name();
        match self {
            ServerEvent::FullRoom => json!([name]),
            ServerEvent::UserUpdate(identity) => json!([name, identity]),
            ServerEvent::CurrentUsers(roster) | ServerEvent::UserDisconnect(roster) => {
                json!([name, roster])
            }
            ServerEvent::ChatMessage {
                identity,
                text,
                connection_id,
            } => json!([name, identity, text, connection_id]),
            ServerEvent::RoundBeginning { citizen_count } => json!([
                name,
                Stage::Beginning.as_str(),
                citizen_count,
                MAFIA_COUNT
            ]),
            ServerEvent::StageChanged(stage) => json!([name, stage.as_str()]),
            // the flag reads "is citizen"
            ServerEvent::SecretCode(word) => json!([name, word, true]),
            ServerEvent::MafiaCode => json!([name, "", false]),
            ServerEvent::VoteResult {
                role_name,
                jailed_image,
            } => json!([name, role_name, jailed_image]),
            ServerEvent::GameOver { result, mafia_name } => {
                json!([name, result.code(), mafia_name])
            }
        }
    }

    pub fn to_text(&self) -> String {
        self.to_frame().to_string()
    }
}
