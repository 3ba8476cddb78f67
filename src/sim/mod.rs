//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (tree pre-order)
//! - No rendering or platform dependencies
//!
//! The presentation layer drives it through two entry points
//! ([`GameEngine::tick`] and [`GameEngine::cell_tapped`]) and hears back
//! through the synchronous [`GameObserver`] callbacks.

pub mod cell;
pub mod engine;

pub use cell::{Cell, CellId, CellTree, Highlight};
pub use engine::{GameEngine, GameObserver, NullObserver};
