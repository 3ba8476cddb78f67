//! Quad Tap - a recursive grid tap-survival game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cell tree, highlight scheduling, taps)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use sim::{CellId, GameEngine, GameObserver, Highlight, NullObserver};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal fixed simulation timestep (60 Hz, the display-link rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of root cells in the fixed top-level row
    pub const ROOT_CELLS: usize = 4;
    /// Children created by every split
    pub const CELL_CHILDREN: usize = 4;
    /// Cells at this depth can no longer split
    pub const MAX_DEPTH: u8 = 2;

    /// Base per-tick, per-candidate highlight probability factor
    pub const LAUNCH_PROBABILITY: f64 = 1.0 / 960.0;
    /// Countdown granted when a cell becomes highlighted (seconds)
    pub const HIGHLIGHT_DURATION: f32 = 1.8;
}
