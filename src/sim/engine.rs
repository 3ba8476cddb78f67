//! Game engine: highlight scheduling, timeouts, tap resolution
//!
//! Single mutator of the cell tree. The external frame driver calls
//! [`GameEngine::tick`] once per frame and the input layer reports resolved
//! taps through [`GameEngine::cell_tapped`]; both entry points run on the
//! same logical thread and never block. Lifecycle changes are pushed
//! synchronously through a [`GameObserver`], in the order they happen.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cell::{CellId, CellTree, Highlight};
use crate::consts::CELL_CHILDREN;
use crate::tuning::Tuning;

/// Presentation-layer listener for cell lifecycle events. Every callback
/// fires synchronously inside the engine call that caused it.
pub trait GameObserver {
    /// `cell` just gained four children.
    fn on_split(&mut self, cell: CellId, children: [CellId; CELL_CHILDREN]) {
        let _ = (cell, children);
    }

    /// `cell` is about to lose its children. `is_merge_root` is true only
    /// for the originally requested cell of a merge cascade, letting a
    /// presentation layer animate the root and silently drop the rest.
    fn on_will_merge(&mut self, cell: CellId, is_merge_root: bool) {
        let _ = (cell, is_merge_root);
    }

    /// `cell` just became highlighted with `kind`.
    fn on_highlight(&mut self, cell: CellId, kind: Highlight) {
        let _ = (cell, kind);
    }

    /// `cell` just lost its highlight.
    fn on_dehighlight(&mut self, cell: CellId) {
        let _ = cell;
    }

    /// A Safe-highlighted root timed out with nothing above it to merge.
    /// The engine is terminal from here on.
    fn on_game_over(&mut self, cell: CellId) {
        let _ = cell;
    }
}

/// Observer that ignores everything, for drivers that only poll state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// Owns the cell tree and advances the game. Starts paused.
#[derive(Debug, Clone)]
pub struct GameEngine {
    tree: CellTree,
    rng: Pcg32,
    seed: u64,
    tuning: Tuning,
    /// The highlight flavor that must be merged, not split
    negative_highlight: Highlight,
    paused: bool,
    game_over: bool,
}

impl GameEngine {
    /// Create an engine with default tuning and the given RNG seed.
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            tree: CellTree::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            tuning,
            negative_highlight: Highlight::Danger,
            paused: true,
            game_over: false,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tree(&self) -> &CellTree {
        &self.tree
    }

    pub fn roots(&self) -> [CellId; crate::consts::ROOT_CELLS] {
        self.tree.roots()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Gate/ungate the scheduler and timeout processing (and taps).
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// True once a root has timed out unmerged. Terminal: the engine
    /// ignores all further ticks and taps.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Advance simulated time by `dt` seconds. A no-op while paused or
    /// terminal, and a true no-op for `dt <= 0` (the RNG is untouched).
    pub fn tick(&mut self, dt: f32, observer: &mut dyn GameObserver) {
        if self.paused || self.game_over || dt <= 0.0 {
            return;
        }
        self.schedule_highlights(observer);
        self.manage_highlight_timeouts(dt, observer);
    }

    /// Resolve a tap on `cell`. Ignored while paused or terminal, on a
    /// stale id, and on a non-highlighted cell.
    pub fn cell_tapped(&mut self, cell: CellId, observer: &mut dyn GameObserver) {
        if self.paused || self.game_over {
            return;
        }
        let Some(tapped) = self.tree.get(cell) else {
            return;
        };
        let Some(kind) = tapped.highlight else {
            return;
        };
        let parent = tapped.parent();
        let can_split = tapped.can_split();

        if kind == self.negative_highlight {
            // Roots have nothing above them to merge
            if let Some(parent) = parent {
                self.merge_cell(parent, true, observer);
            }
        } else if can_split {
            self.split_cell(cell, observer);
        } else {
            self.dehighlight(cell, observer);
        }
    }

    /// Pick a uniformly random cell from the current tree.
    pub fn random_cell(&mut self) -> CellId {
        let ids = self.tree.collect_ids();
        ids[self.rng.random_range(0..ids.len())]
    }

    /// Roll the launch dice for every selectable leaf. The candidate set
    /// and its count are fixed before the loop; each candidate draws
    /// independently, so several cells may light up in one tick.
    fn schedule_highlights(&mut self, observer: &mut dyn GameObserver) {
        let selectable = self.tree.selectable_ids();
        if selectable.is_empty() {
            return;
        }
        let log_score = (1.0 + selectable.len() as f64).ln();
        let threshold = log_score * self.tuning.launch_probability;

        for id in selectable {
            if self.rng.random::<f64>() >= threshold {
                continue;
            }
            let kind = if self.rng.random_bool(0.5) {
                Highlight::Danger
            } else {
                Highlight::Safe
            };
            if let Some(cell) = self.tree.get_mut(id) {
                cell.highlight = Some(kind);
                cell.time_remaining = self.tuning.highlight_duration;
            }
            log::debug!("highlight {id} ({kind:?})");
            observer.on_highlight(id, kind);
        }
    }

    /// Tick every cell's countdown and resolve the ones that just expired.
    /// Iterates a pre-order snapshot; ids consumed by a merge earlier in
    /// the pass miss the arena and are skipped.
    fn manage_highlight_timeouts(&mut self, dt: f32, observer: &mut dyn GameObserver) {
        for id in self.tree.collect_ids() {
            let Some(cell) = self.tree.get_mut(id) else {
                continue;
            };
            if !cell.tick(dt) {
                continue;
            }
            let Some(kind) = cell.highlight else {
                continue;
            };
            let parent = cell.parent();

            if kind == self.negative_highlight {
                // A missed Danger just fizzles
                self.dehighlight(id, observer);
            } else if let Some(parent) = parent {
                self.merge_cell(parent, true, observer);
            } else {
                // A Safe root ran out with nothing above it to merge
                self.dehighlight(id, observer);
                self.game_over = true;
                log::warn!("game over: root cell {id} timed out unmerged");
                observer.on_game_over(id);
                break;
            }
        }
    }

    /// Split a tapped Safe cell: dehighlight, then grow four children.
    fn split_cell(&mut self, cell: CellId, observer: &mut dyn GameObserver) {
        self.dehighlight(cell, observer);
        if let Some(children) = self.tree.split(cell) {
            log::debug!("split {cell}");
            observer.on_split(cell, children);
        }
    }

    /// Collapse `cell` back into a leaf. Descendants are dehighlighted and
    /// merged bottom-up first, each announced with `is_merge_root = false`;
    /// the originally requested cell is announced last with `true`.
    fn merge_cell(&mut self, cell: CellId, is_merge_root: bool, observer: &mut dyn GameObserver) {
        if !self.tree.contains(cell) {
            return;
        }
        self.dehighlight(cell, observer);

        let children = self.tree.get(cell).and_then(|c| c.children().copied());
        if let Some(children) = children {
            for child in children {
                self.merge_cell(child, false, observer);
            }
        }

        if is_merge_root {
            log::debug!("merge {cell}");
        }
        observer.on_will_merge(cell, is_merge_root);
        self.tree.merge(cell);
    }

    /// Clear the highlight and its countdown and notify, whether or not a
    /// highlight was set; the notification is idempotent for observers.
    fn dehighlight(&mut self, cell: CellId, observer: &mut dyn GameObserver) {
        if let Some(cell) = self.tree.get_mut(cell) {
            cell.highlight = None;
            cell.time_remaining = f32::INFINITY;
        }
        observer.on_dehighlight(cell);
    }
}
