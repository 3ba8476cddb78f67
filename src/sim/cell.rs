//! Cell tree arena
//!
//! One `Cell` per grid region, stored in an id-keyed arena. The tree is
//! 4-ary all the way down: a cell either has exactly four children or none.
//! Ids are allocated monotonically and never reused, so a stale id held by
//! a presentation layer after a merge simply misses the arena.

use std::collections::BTreeMap;

use crate::consts::{CELL_CHILDREN, MAX_DEPTH, ROOT_CELLS};

/// Stable handle to a cell in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u32);

impl CellId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Highlight flavor on a cell awaiting player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Must be merged away (tap merges the parent; timeout just fizzles)
    Danger,
    /// Splits when tapped (or dehighlights at max depth); timeout merges the parent
    Safe,
}

/// One node of the grid tree.
#[derive(Debug, Clone)]
pub struct Cell {
    depth: u8,
    parent: Option<CellId>,
    children: Option<[CellId; CELL_CHILDREN]>,
    /// Countdown until auto-timeout; `f32::INFINITY` while idle
    pub time_remaining: f32,
    /// Current highlight, if any
    pub highlight: Option<Highlight>,
}

impl Cell {
    fn new(parent: Option<CellId>, depth: u8) -> Self {
        Self {
            depth,
            parent,
            children: None,
            time_remaining: f32::INFINITY,
            highlight: None,
        }
    }

    /// Distance from the root row; fixed at creation.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Non-owning back-reference; `None` for root cells.
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    pub fn children(&self) -> Option<&[CellId; CELL_CHILDREN]> {
        self.children.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight.is_some()
    }

    pub fn can_split(&self) -> bool {
        self.depth < MAX_DEPTH
    }

    /// Advance the countdown. Returns true iff the timer expired on this
    /// step. An infinite timer never moves; an already-expired timer does
    /// not report again. Clearing the timer on expiry is the caller's call.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.time_remaining <= 0.0 {
            return false;
        }
        self.time_remaining -= dt;
        self.time_remaining <= 0.0
    }
}

/// Arena holding the whole grid tree: a fixed row of roots plus whatever
/// the session has split into existence.
#[derive(Debug, Clone)]
pub struct CellTree {
    cells: BTreeMap<CellId, Cell>,
    roots: [CellId; ROOT_CELLS],
    next_id: u32,
}

impl CellTree {
    /// Build the initial grid: four root leaves, nothing highlighted.
    pub fn new() -> Self {
        let mut tree = Self {
            cells: BTreeMap::new(),
            roots: [CellId(0); ROOT_CELLS],
            next_id: 1,
        };
        for slot in 0..ROOT_CELLS {
            tree.roots[slot] = tree.alloc(None, 0);
        }
        tree
    }

    fn alloc(&mut self, parent: Option<CellId>, depth: u8) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        self.cells.insert(id, Cell::new(parent, depth));
        id
    }

    pub fn roots(&self) -> [CellId; ROOT_CELLS] {
        self.roots
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(&id)
    }

    /// Live cell count (roots included).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True iff this cell or any ancestor is highlighted. Walks the parent
    /// chain upward starting at `id` and stops at the first highlight.
    pub fn is_ancestor_highlighted(&self, id: CellId) -> bool {
        let mut node = Some(id);
        while let Some(current) = node {
            let Some(cell) = self.get(current) else {
                return false;
            };
            if cell.is_highlighted() {
                return true;
            }
            node = cell.parent();
        }
        false
    }

    /// Split a leaf into four fresh child leaves at `depth + 1` and return
    /// their ids. Resets the timer; the highlight is the caller's business.
    /// Refuses (`None`) on a missing cell, a non-leaf, or a max-depth leaf.
    pub fn split(&mut self, id: CellId) -> Option<[CellId; CELL_CHILDREN]> {
        let cell = self.get(id)?;
        if !cell.is_leaf() || !cell.can_split() {
            return None;
        }
        let child_depth = cell.depth() + 1;

        let mut children = [CellId(0); CELL_CHILDREN];
        for child in &mut children {
            *child = self.alloc(Some(id), child_depth);
        }

        let cell = self.get_mut(id).expect("cell checked above");
        cell.time_remaining = f32::INFINITY;
        cell.children = Some(children);
        Some(children)
    }

    /// Collapse a cell back into a leaf, removing its child subtree from
    /// the arena, and reset the timer. Idempotent on leaves. The engine
    /// dehighlights and notifies bottom-up before calling this.
    pub fn merge(&mut self, id: CellId) {
        let Some(cell) = self.get_mut(id) else {
            return;
        };
        cell.time_remaining = f32::INFINITY;
        if let Some(children) = cell.children.take() {
            for child in children {
                self.remove_subtree(child);
            }
        }
    }

    fn remove_subtree(&mut self, id: CellId) {
        if let Some(cell) = self.cells.remove(&id) {
            if let Some(children) = cell.children {
                for child in children {
                    self.remove_subtree(child);
                }
            }
        }
    }

    /// Depth-first pre-order visit: roots in order, parent before children,
    /// children in stored order.
    pub fn visit(&self, visit: &mut impl FnMut(CellId, &Cell)) {
        for root in self.roots {
            self.visit_from(root, visit);
        }
    }

    fn visit_from(&self, id: CellId, visit: &mut impl FnMut(CellId, &Cell)) {
        let Some(cell) = self.get(id) else {
            return;
        };
        visit(id, cell);
        if let Some(children) = cell.children() {
            for child in children {
                self.visit_from(*child, visit);
            }
        }
    }

    /// All cell ids in pre-order.
    pub fn collect_ids(&self) -> Vec<CellId> {
        let mut ids = Vec::with_capacity(self.len());
        self.visit(&mut |id, _| ids.push(id));
        ids
    }

    /// Leaves with no highlighted self-or-ancestor, in pre-order. These are
    /// the only cells eligible for new highlighting.
    pub fn selectable_ids(&self) -> Vec<CellId> {
        let mut ids = Vec::new();
        self.visit(&mut |id, cell| {
            if cell.is_leaf() && !self.is_ancestor_highlighted(id) {
                ids.push(id);
            }
        });
        ids
    }

    /// Test-side structural audit: every cell has four children or none,
    /// child depth/parent links are consistent, and nothing is orphaned.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (&id, cell) in &self.cells {
            if let Some(children) = cell.children() {
                for &child_id in children {
                    let child = self
                        .get(child_id)
                        .unwrap_or_else(|| panic!("{id} references missing child {child_id}"));
                    assert_eq!(child.parent(), Some(id), "bad parent link on {child_id}");
                    assert_eq!(child.depth(), cell.depth() + 1, "bad depth on {child_id}");
                }
            }
            match cell.parent() {
                Some(parent_id) => {
                    let parent = self
                        .get(parent_id)
                        .unwrap_or_else(|| panic!("{id} has missing parent {parent_id}"));
                    let siblings = parent.children().expect("parent of a live cell is split");
                    assert!(siblings.contains(&id), "{id} not among parent's children");
                }
                None => assert!(self.roots.contains(&id), "parentless non-root {id}"),
            }
        }
        for root in self.roots {
            let cell = self.get(root).expect("root missing from arena");
            assert_eq!(cell.depth(), 0);
        }
    }
}

impl Default for CellTree {
    fn default() -> Self {
        Self::new()
    }
}
