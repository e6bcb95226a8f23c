//! Windowing model: viewports onto shared buffers, the cursor visibility
//! rule, and the split-pane layout tree.
//!
//! Everything here is single-threaded and owned by the editor session; the
//! buffers themselves are shared through [`core_text::BufferRef`] handles so
//! several windows can show one document.
//!
//! Invariants (after every public call on [`LayoutTree`]):
//! * at least one window exists and exactly one is active,
//! * every viewport satisfies the scroll invariant documented in [`scroll`].

pub mod layout;
pub mod scroll;
pub mod viewport;

pub use layout::{
    DEFAULT_RESERVED_ROWS, DEFAULT_SPLIT_RATIO, LayoutNode, LayoutRegion, LayoutTree,
    MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, NodeKind, SplitKind,
};
pub use scroll::{compute_hscroll_intent, compute_scroll_intent, ensure_cursor_visible};
pub use viewport::{ScreenPosition, Viewport};

/// Stable identifier for a window (layout leaf).
///
/// Ids are handed out monotonically by [`LayoutTree`] and never reused within
/// one tree, so a stale id simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub usize);
