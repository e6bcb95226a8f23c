//! Split-pane layout: a binary tree of viewports tiling the terminal.
//!
//! Leaves hold a [`Viewport`]; split nodes divide their rectangle between two
//! children by `ratio` along the split axis. The tree keeps no parent links:
//! structural operations walk down from the root, testing subtree membership
//! by [`WindowId`]. Pane counts stay small, so the extra walks are cheap.
//!
//! Invariants (after every public call):
//! * every node is exactly one of leaf / split,
//! * `active` names a leaf reachable from `root`,
//! * leaf regions tile `(0, 0, total_width, total_height)` without overlap,
//! * each leaf viewport is sized `region.width x max(1, region.height - reserved_rows)`.
//!
//! Geometry is recomputed top-down by [`LayoutTree::calculate_layout`] after
//! every structural change, in time linear in the node count.

use crate::WindowId;
use crate::viewport::Viewport;
use core_text::BufferRef;
use std::rc::Rc;
use tracing::debug;

pub const DEFAULT_SPLIT_RATIO: f32 = 0.5;
pub const MIN_SPLIT_RATIO: f32 = 0.1;
pub const MAX_SPLIT_RATIO: f32 = 0.9;
/// Rows each leaf gives up for its status line and prompt line.
pub const DEFAULT_RESERVED_ROWS: u16 = 2;

/// Absolute rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegion {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Divide along `kind`'s axis. The first part gets `floor(len * ratio)`
    /// cells, the second the remainder.
    pub fn split(&self, kind: SplitKind, ratio: f32) -> (LayoutRegion, LayoutRegion) {
        match kind {
            SplitKind::Vertical => {
                let first = (self.width as f32 * ratio).floor() as u16;
                let first = first.min(self.width);
                (
                    LayoutRegion::new(self.x, self.y, first, self.height),
                    LayoutRegion::new(self.x + first, self.y, self.width - first, self.height),
                )
            }
            SplitKind::Horizontal => {
                let first = (self.height as f32 * ratio).floor() as u16;
                let first = first.min(self.height);
                (
                    LayoutRegion::new(self.x, self.y, self.width, first),
                    LayoutRegion::new(self.x, self.y + first, self.width, self.height - first),
                )
            }
        }
    }
}

/// Orientation of the dividing line.
///
/// `Vertical` places the children side by side (left | right); `Horizontal`
/// stacks them (top over bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Vertical,
    Horizontal,
}

#[derive(Debug)]
pub enum NodeKind {
    Leaf(Viewport),
    Split {
        kind: SplitKind,
        ratio: f32,
        left: Box<LayoutNode>,
        right: Box<LayoutNode>,
    },
}

#[derive(Debug)]
pub struct LayoutNode {
    kind: NodeKind,
    region: LayoutRegion,
}

impl LayoutNode {
    fn leaf(view: Viewport) -> Self {
        Self {
            kind: NodeKind::Leaf(view),
            region: LayoutRegion::default(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Geometry from the last layout pass.
    pub fn region(&self) -> LayoutRegion {
        self.region
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        match &self.kind {
            NodeKind::Leaf(view) => Some(view),
            NodeKind::Split { .. } => None,
        }
    }

    fn leaf_id(&self) -> Option<WindowId> {
        self.viewport().map(Viewport::id)
    }

    fn contains(&self, id: WindowId) -> bool {
        match &self.kind {
            NodeKind::Leaf(view) => view.id() == id,
            NodeKind::Split { left, right, .. } => left.contains(id) || right.contains(id),
        }
    }

    fn first_leaf(&self) -> WindowId {
        match &self.kind {
            NodeKind::Leaf(view) => view.id(),
            NodeKind::Split { left, .. } => left.first_leaf(),
        }
    }

    fn last_leaf(&self) -> WindowId {
        match &self.kind {
            NodeKind::Leaf(view) => view.id(),
            NodeKind::Split { right, .. } => right.last_leaf(),
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LayoutNode>) {
        match &self.kind {
            NodeKind::Leaf(_) => out.push(self),
            NodeKind::Split { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    fn find(&self, id: WindowId) -> Option<&LayoutNode> {
        match &self.kind {
            NodeKind::Leaf(view) => (view.id() == id).then_some(self),
            NodeKind::Split { left, right, .. } => left.find(id).or_else(|| right.find(id)),
        }
    }

    /// Leaf for `id`, or the nearest leaf on the path toward it. Never fails
    /// because every subtree holds at least one leaf.
    fn locate(&self, id: WindowId) -> &Viewport {
        match &self.kind {
            NodeKind::Leaf(view) => view,
            NodeKind::Split { left, right, .. } => {
                if right.contains(id) {
                    right.locate(id)
                } else {
                    left.locate(id)
                }
            }
        }
    }

    fn locate_mut(&mut self, id: WindowId) -> &mut Viewport {
        match &mut self.kind {
            NodeKind::Leaf(view) => view,
            NodeKind::Split { left, right, .. } => {
                if right.contains(id) {
                    right.locate_mut(id)
                } else {
                    left.locate_mut(id)
                }
            }
        }
    }

    fn for_each_viewport_mut(&mut self, f: &mut impl FnMut(&mut Viewport)) {
        match &mut self.kind {
            NodeKind::Leaf(view) => f(view),
            NodeKind::Split { left, right, .. } => {
                left.for_each_viewport_mut(f);
                right.for_each_viewport_mut(f);
            }
        }
    }

    /// Turn leaf `id` into a split whose left child keeps the existing view
    /// and whose right child holds `new_view`.
    fn split_leaf(&mut self, id: WindowId, kind: SplitKind, new_view: Viewport) -> bool {
        if let NodeKind::Split { left, right, .. } = &mut self.kind {
            let target = if left.contains(id) { left } else { right };
            return target.split_leaf(id, kind, new_view);
        }
        if self.leaf_id() != Some(id) {
            return false;
        }
        let old = std::mem::replace(&mut self.kind, NodeKind::Leaf(new_view.clone()));
        self.kind = NodeKind::Split {
            kind,
            ratio: DEFAULT_SPLIT_RATIO,
            left: Box::new(LayoutNode {
                kind: old,
                region: self.region,
            }),
            right: Box::new(LayoutNode::leaf(new_view)),
        };
        true
    }

    /// Remove leaf `id` and splice its sibling up into the parent. Returns the
    /// removed viewport and the leaf of the promoted subtree nearest to it.
    fn remove_leaf(&mut self, id: WindowId) -> Option<(Viewport, WindowId)> {
        let NodeKind::Split { left, right, .. } = &mut self.kind else {
            return None;
        };
        let was_left = left.leaf_id() == Some(id);
        if !was_left && right.leaf_id() != Some(id) {
            let target = if left.contains(id) { left } else { right };
            return target.remove_leaf(id);
        }
        let removed_view = if was_left { left.viewport() } else { right.viewport() };
        let placeholder = removed_view.cloned()?;
        let NodeKind::Split { left, right, .. } =
            std::mem::replace(&mut self.kind, NodeKind::Leaf(placeholder))
        else {
            return None;
        };
        let (removed, sibling) = if was_left { (left, right) } else { (right, left) };
        self.kind = sibling.kind;
        let next = if was_left {
            self.first_leaf()
        } else {
            self.last_leaf()
        };
        match removed.kind {
            NodeKind::Leaf(view) => Some((view, next)),
            NodeKind::Split { .. } => None,
        }
    }

    /// Move the divider of the split directly above leaf `id` so that the
    /// leaf gains `delta` of the parent's extent.
    fn adjust_parent_ratio(&mut self, id: WindowId, delta: f32) -> bool {
        let NodeKind::Split {
            left, right, ratio, ..
        } = &mut self.kind
        else {
            return false;
        };
        if left.leaf_id() == Some(id) {
            *ratio = (*ratio + delta).clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
            true
        } else if right.leaf_id() == Some(id) {
            *ratio = (*ratio - delta).clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
            true
        } else if left.contains(id) {
            left.adjust_parent_ratio(id, delta)
        } else {
            right.adjust_parent_ratio(id, delta)
        }
    }

    fn layout(&mut self, region: LayoutRegion, reserved_rows: u16) {
        self.region = region;
        match &mut self.kind {
            NodeKind::Leaf(view) => {
                let height = region.height.saturating_sub(reserved_rows).max(1);
                view.set_size(region.width as usize, height as usize);
            }
            NodeKind::Split {
                kind,
                ratio,
                left,
                right,
            } => {
                let (first, second) = region.split(*kind, *ratio);
                left.layout(first, reserved_rows);
                right.layout(second, reserved_rows);
            }
        }
    }

    fn node_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Split { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

#[derive(Debug)]
pub struct LayoutTree {
    root: LayoutNode,
    active: WindowId,
    total_width: u16,
    total_height: u16,
    reserved_rows: u16,
    next_id: usize,
}

impl LayoutTree {
    /// Single full-screen leaf viewing `buffer`.
    pub fn new(buffer: BufferRef, width: u16, height: u16, reserved_rows: u16) -> Self {
        let id = WindowId(0);
        let view = Viewport::new(id, buffer, width as usize, height as usize);
        let mut tree = Self {
            root: LayoutNode::leaf(view),
            active: id,
            total_width: width,
            total_height: height,
            reserved_rows,
            next_id: 1,
        };
        tree.calculate_layout();
        tree
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    pub fn active(&self) -> WindowId {
        self.active
    }

    pub fn total_width(&self) -> u16 {
        self.total_width
    }

    pub fn total_height(&self) -> u16 {
        self.total_height
    }

    pub fn reserved_rows(&self) -> u16 {
        self.reserved_rows
    }

    pub fn active_viewport(&self) -> &Viewport {
        self.root.locate(self.active)
    }

    pub fn active_viewport_mut(&mut self) -> &mut Viewport {
        self.root.locate_mut(self.active)
    }

    pub fn viewport(&self, id: WindowId) -> Option<&Viewport> {
        self.root.find(id).and_then(LayoutNode::viewport)
    }

    pub fn viewport_mut(&mut self, id: WindowId) -> Option<&mut Viewport> {
        if !self.root.contains(id) {
            return None;
        }
        Some(self.root.locate_mut(id))
    }

    /// Region of leaf `id` from the last layout pass.
    pub fn region(&self, id: WindowId) -> Option<LayoutRegion> {
        self.root.find(id).map(LayoutNode::region)
    }

    /// Leaves in left-to-right depth-first order.
    pub fn leaves(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    pub fn leaf_ids(&self) -> Vec<WindowId> {
        self.leaves().into_iter().filter_map(LayoutNode::leaf_id).collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn for_each_viewport_mut(&mut self, mut f: impl FnMut(&mut Viewport)) {
        self.root.for_each_viewport_mut(&mut f);
    }

    /// Focus leaf `id`. Returns false (no change) when no such leaf exists.
    pub fn set_active(&mut self, id: WindowId) -> bool {
        if !self.root.contains(id) {
            return false;
        }
        self.active = id;
        true
    }

    /// Split the active leaf in two. The existing view stays on the left (or
    /// top); a new view of `buffer` takes the other half and becomes active.
    ///
    /// The new view inherits the wrap mode, and the scroll position when it
    /// shows the same buffer. Returns the new window's id.
    pub fn split_active(&mut self, kind: SplitKind, buffer: BufferRef) -> Option<WindowId> {
        let id = WindowId(self.next_id);
        let (line_wrap, scroll_top) = {
            let active = self.active_viewport();
            let scroll_top = Rc::ptr_eq(active.buffer(), &buffer).then_some(active.scroll_top());
            (active.line_wrap(), scroll_top)
        };
        let mut view = Viewport::new(id, buffer, 0, 0);
        view.set_line_wrap(line_wrap);
        if let Some(top) = scroll_top {
            view.set_scroll_raw(top, 0);
        }
        if !self.root.split_leaf(self.active, kind, view) {
            return None;
        }
        self.next_id += 1;
        debug!(target: "model.layout", from = self.active.0, to = id.0, ?kind, "split");
        self.active = id;
        self.calculate_layout();
        Some(id)
    }

    /// Remove the active leaf, promoting its sibling into the parent's place.
    ///
    /// Returns false and leaves the tree untouched when the active leaf is
    /// the only window.
    pub fn delete_active(&mut self) -> bool {
        let Some((removed, next)) = self.root.remove_leaf(self.active) else {
            return false;
        };
        debug!(target: "model.layout", removed = removed.id().0, active = next.0, "delete");
        self.active = next;
        self.calculate_layout();
        true
    }

    /// Collapse the tree to the active leaf. Returns false when it already was
    /// the only window.
    pub fn delete_others(&mut self) -> bool {
        if self.root.is_leaf() {
            return false;
        }
        let view = self.active_viewport().clone();
        self.root = LayoutNode::leaf(view);
        debug!(target: "model.layout", active = self.active.0, "delete_others");
        self.calculate_layout();
        true
    }

    /// Focus the next leaf in traversal order, wrapping at the end.
    pub fn next_window(&mut self) -> WindowId {
        self.cycle(1)
    }

    /// Focus the previous leaf in traversal order, wrapping at the start.
    pub fn previous_window(&mut self) -> WindowId {
        self.cycle(-1)
    }

    fn cycle(&mut self, step: isize) -> WindowId {
        let ids = self.leaf_ids();
        let pos = ids.iter().position(|id| *id == self.active).unwrap_or(0);
        let next = (pos as isize + step).rem_euclid(ids.len() as isize) as usize;
        self.active = ids[next];
        self.active
    }

    /// Grow (positive `delta`) or shrink the active leaf inside its parent
    /// split. The ratio stays within `[MIN_SPLIT_RATIO, MAX_SPLIT_RATIO]`.
    /// Returns false when the active leaf is the root.
    pub fn adjust_active_ratio(&mut self, delta: f32) -> bool {
        if !self.root.adjust_parent_ratio(self.active, delta) {
            return false;
        }
        self.calculate_layout();
        true
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.total_width = width;
        self.total_height = height;
        debug!(target: "model.layout", width, height, "resize");
        self.calculate_layout();
    }

    pub fn set_reserved_rows(&mut self, rows: u16) {
        self.reserved_rows = rows;
        self.calculate_layout();
    }

    /// Recompute every node's region from the root's total size.
    pub fn calculate_layout(&mut self) {
        let region = LayoutRegion::new(0, 0, self.total_width, self.total_height);
        self.root.layout(region, self.reserved_rows);
    }
}
