//! Errors surfaced by the runtime API.
//!
//! Command rejections have their own type ([`crate::CommandError`]); this
//! enum covers setup and plumbing failures.

use thiserror::Error;

use realm_core::{CharacterId, SkillSetFull, WorldError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error("character {0} does not exist")]
    UnknownCharacter(CharacterId),

    #[error("cannot grant skill to {owner}")]
    SkillSetFull {
        owner: CharacterId,
        #[source]
        source: SkillSetFull,
    },

    #[error("authoritative command channel closed")]
    CommandChannelClosed,

    #[error("authoritative command channel is full")]
    CommandChannelFull,
}
