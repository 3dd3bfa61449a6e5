//! Logged mod dispatch and the stock mods shipped with the runtime.

mod builtin;
mod dispatcher;

pub use builtin::{FlareOnHit, Lifesteal, Thorns};
pub use dispatcher::ModDispatcher;
