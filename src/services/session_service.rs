//! Single task that owns the `GameController`.
//!
//! Sockets, timers and HTTP queries talk to it through `GameHandle`; nothing
//! else ever holds the controller, so every mutation is serialized here.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::models::chat::ChatMessage;
use crate::models::event::{ClientEvent, ServerEvent};
use crate::models::game::GameSnapshot;
use crate::models::player::ConnectionId;
use crate::services::game_service::{Effect, GameController};

/// What a socket's writer half receives.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Event(ServerEvent),
    Close,
}

#[derive(Debug)]
pub enum GameCommand {
    Connect {
        connection_id: ConnectionId,
        sink: mpsc::UnboundedSender<Outbound>,
    },
    Client {
        connection_id: ConnectionId,
        event: ClientEvent,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    RevealDue {
        round: u64,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
    ChatLog {
        reply: oneshot::Sender<Vec<ChatMessage>>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("game session is no longer running")]
    Closed,
}

#[derive(Clone, Debug)]
pub struct GameHandle {
    tx: mpsc::UnboundedSender<GameCommand>,
}

impl GameHandle {
    pub fn connect(
        &self,
        connection_id: ConnectionId,
        sink: mpsc::UnboundedSender<Outbound>,
    ) -> Result<(), SessionError> {
        self.send(GameCommand::Connect {
            connection_id,
            sink,
        })
    }

    pub fn send_event(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), SessionError> {
        self.send(GameCommand::Client {
            connection_id,
            event,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), SessionError> {
        self.send(GameCommand::Disconnect { connection_id })
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(GameCommand::Snapshot { reply })?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn chat_log(&self) -> Result<Vec<ChatMessage>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(GameCommand::ChatLog { reply })?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    fn send(&self, command: GameCommand) -> Result<(), SessionError> {
        self.tx.send(command).map_err(|_| SessionError::Closed)
    }
}

/// Spawns the session task. It runs until every `GameHandle` is dropped.
pub fn spawn_game(controller: GameController, reveal_delay: Duration) -> GameHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = GameSession {
        controller,
        sinks: HashMap::new(),
        reveal_delay,
        reveal_task: None,
        self_tx: tx.downgrade(),
    };
    tokio::spawn(session.run(rx));
    GameHandle { tx }
}

struct GameSession {
    controller: GameController,
    sinks: HashMap<ConnectionId, mpsc::UnboundedSender<Outbound>>,
    reveal_delay: Duration,
    reveal_task: Option<JoinHandle<()>>,
    // weak so the session still stops once all handles are gone
    self_tx: mpsc::WeakUnboundedSender<GameCommand>,
}

impl GameSession {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<GameCommand>) {
        while let Some(command) = rx.recv().await {
            self.handle(command);
        }
        if let Some(task) = self.reveal_task.take() {
            task.abort();
        }
        info!("game session stopped");
    }

    fn handle(&mut self, command: GameCommand) {
        let effects = match command {
            GameCommand::Connect {
                connection_id,
                sink,
            } => {
                self.sinks.insert(connection_id.clone(), sink);
                self.controller.connect(connection_id)
            }
            GameCommand::Client {
                connection_id,
                event,
            } => {
                debug!("{} sent {:?}", connection_id, event);
                self.controller.handle_event(&connection_id, event)
            }
            GameCommand::Disconnect { connection_id } => {
                self.sinks.remove(&connection_id);
                self.controller.disconnect(&connection_id)
            }
            GameCommand::RevealDue { round } => {
                self.reveal_task = None;
                self.controller.reveal(round)
            }
            GameCommand::Snapshot { reply } => {
                let _ = reply.send(self.controller.snapshot());
                Vec::new()
            }
            GameCommand::ChatLog { reply } => {
                let _ = reply.send(self.controller.chat_log().messages.clone());
                Vec::new()
            }
        };

        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Broadcast(event) => {
                for sink in self.sinks.values() {
                    let _ = sink.send(Outbound::Event(event.clone()));
                }
            }
            Effect::Unicast(connection_id, event) => match self.sinks.get(&connection_id) {
                Some(sink) => {
                    let _ = sink.send(Outbound::Event(event));
                }
                None => warn!("no open socket for {}", connection_id),
            },
            Effect::ScheduleReveal { round } => self.schedule_reveal(round),
            Effect::Close(connection_id) => {
                if let Some(sink) = self.sinks.remove(&connection_id) {
                    let _ = sink.send(Outbound::Close);
                }
            }
        }
    }

    fn schedule_reveal(&mut self, round: u64) {
        if let Some(previous) = self.reveal_task.take() {
            previous.abort();
        }

        let tx = self.self_tx.clone();
        let delay = self.reveal_delay;
        self.reveal_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(GameCommand::RevealDue { round });
            }
        }));
    }
}
