//! One-directional skill snapshot replication and command forwarding.
//!
//! The authoritative [`crate::Simulation`] publishes [`SkillDelta`]s through a
//! [`SnapshotPublisher`] whenever a published `(state, cooldown_remaining)`
//! pair changes. Remote views hold a [`SkillMirror`], which applies deltas
//! and never mutates anything locally; input on a mirror is forwarded to the
//! authoritative side as a [`RemoteCommand`]. Despawning a character sends a
//! tombstone delta per published skill so mirrors drop the entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{trace, warn};

use realm_core::{CharacterId, SkillKey, SkillSnapshot, SkillState};

use crate::commands::{Command, RemoteCommand};
use crate::error::{Result, RuntimeError};

/// Replicated change of one skill's observable fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillDelta {
    pub character: CharacterId,
    pub slot: u8,
    pub state: SkillState,
    pub cooldown_remaining: f32,
    /// Set when the skill's owner left the match; the mirror drops the key.
    #[serde(default)]
    pub removed: bool,
}

impl SkillDelta {
    fn new(key: SkillKey, snapshot: SkillSnapshot) -> Self {
        Self {
            character: key.owner,
            slot: key.slot,
            state: snapshot.state,
            cooldown_remaining: snapshot.cooldown_remaining,
            removed: false,
        }
    }

    pub fn key(&self) -> SkillKey {
        SkillKey::new(self.character, self.slot)
    }

    pub fn snapshot(&self) -> SkillSnapshot {
        SkillSnapshot {
            state: self.state,
            cooldown_remaining: self.cooldown_remaining,
        }
    }
}

/// Sends skill deltas to every subscribed mirror.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: broadcast::Sender<SkillDelta>,
    published: BTreeMap<SkillKey, SkillSnapshot>,
}

impl SnapshotPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            published: BTreeMap::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SkillDelta> {
        self.tx.subscribe()
    }

    /// Publishes `snapshot` if it differs from the last value sent for `key`.
    pub fn publish(&mut self, key: SkillKey, snapshot: SkillSnapshot) -> bool {
        if self.published.get(&key) == Some(&snapshot) {
            return false;
        }
        self.published.insert(key, snapshot);
        self.send(SkillDelta::new(key, snapshot));
        true
    }

    /// Forgets everything published for `character` (despawned) and sends a
    /// tombstone for each forgotten key. Returns how many were sent.
    pub fn forget(&mut self, character: CharacterId) -> usize {
        let keys: Vec<SkillKey> = self
            .published
            .keys()
            .filter(|key| key.owner == character)
            .copied()
            .collect();
        for key in &keys {
            if let Some(last) = self.published.remove(key) {
                self.send(SkillDelta {
                    removed: true,
                    ..SkillDelta::new(*key, last)
                });
            }
        }
        keys.len()
    }

    fn send(&self, delta: SkillDelta) {
        if self.tx.send(delta).is_err() {
            // No subscribers - this is normal, not an error
            trace!(target: "runtime::replication", "No mirrors subscribed");
        }
    }

    /// Last value published for `key`.
    pub fn last_published(&self, key: SkillKey) -> Option<SkillSnapshot> {
        self.published.get(&key).copied()
    }
}

/// Sending half of the command channel held by remote views.
#[derive(Debug, Clone)]
pub struct CommandForwarder {
    tx: mpsc::Sender<RemoteCommand>,
}

impl CommandForwarder {
    pub(crate) fn new(tx: mpsc::Sender<RemoteCommand>) -> Self {
        Self { tx }
    }

    /// Queues `command` for the authoritative side without blocking.
    pub fn forward(&self, actor: CharacterId, command: Command) -> Result<()> {
        self.tx
            .try_send(RemoteCommand { actor, command })
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => RuntimeError::CommandChannelFull,
                mpsc::error::TrySendError::Closed(_) => RuntimeError::CommandChannelClosed,
            })
    }
}

/// Read-only remote view of replicated skill state.
#[derive(Debug)]
pub struct SkillMirror {
    rx: broadcast::Receiver<SkillDelta>,
    forwarder: CommandForwarder,
    skills: BTreeMap<SkillKey, SkillSnapshot>,
}

impl SkillMirror {
    pub fn new(rx: broadcast::Receiver<SkillDelta>, forwarder: CommandForwarder) -> Self {
        Self {
            rx,
            forwarder,
            skills: BTreeMap::new(),
        }
    }

    /// Applies every delta received so far. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(delta) if delta.removed => {
                    self.skills.remove(&delta.key());
                    applied += 1;
                }
                Ok(delta) => {
                    self.skills.insert(delta.key(), delta.snapshot());
                    applied += 1;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(
                        target: "runtime::replication",
                        skipped,
                        "Skill mirror lagged behind, deltas dropped"
                    );
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        applied
    }

    pub fn get(&self, character: CharacterId, slot: u8) -> Option<SkillSnapshot> {
        self.skills.get(&SkillKey::new(character, slot)).copied()
    }

    pub fn state(&self, character: CharacterId, slot: u8) -> Option<SkillState> {
        self.get(character, slot).map(|s| s.state)
    }

    pub fn cooldown_remaining(&self, character: CharacterId, slot: u8) -> f32 {
        self.get(character, slot)
            .map(|s| s.cooldown_remaining)
            .unwrap_or(0.0)
    }

    /// Forwards input on this view to the authoritative side.
    pub fn request(&self, actor: CharacterId, command: Command) -> Result<()> {
        self.forwarder.forward(actor, command)
    }
}
