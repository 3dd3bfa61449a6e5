//! Target acquisition: sensing, nearest-enemy selection and ally alerts.
//!
//! The [`TargetingController`] keeps an order-preserving candidate list per
//! controlled character. Candidates enter through [`TargetingController::on_sensed`]
//! and are only pruned when [`TargetingController::reevaluate`] runs; leaving
//! the sensing radius raises no event of its own.

mod alert;
mod controller;
mod sensing;

pub use alert::call_for_help;
pub use controller::TargetingController;
pub use sensing::sense_pawns;
