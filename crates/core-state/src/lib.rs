//! Editor state: the session-owned buffer list, the window layout, options,
//! and transient status.
//!
//! Ownership:
//! - `buffers` holds one shared handle per open document. Viewports inside
//!   the layout hold further clones of the same handles, so edits through any
//!   window are visible in every window showing that document.
//! - A buffer lives as long as the session lists it. After window deletion
//!   [`EditorState::prune_buffers`] drops documents no window shows anymore.
//!
//! Split policy (see [`EditorOptions::share_buffer`]): a new pane either shows
//! the active document or a fresh `untitled-N` buffer registered here.
//!
//! Invariants (after every public call):
//! - `buffers` is never empty and every viewport's buffer is listed in it.
//! - Exactly one window is active (maintained by [`LayoutTree`]).

use core_model::{LayoutTree, SplitKind, Viewport, WindowId};
use core_text::{BufferRef, TextBuffer};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default lifetime of a status message.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Session options, usually derived from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Rows each window reserves for status and prompt lines.
    pub reserved_rows: u16,
    /// Wrap mode of the first window; later splits inherit from the active one.
    pub line_wrap: bool,
    /// New panes show the active document instead of a fresh buffer.
    pub share_buffer: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            reserved_rows: core_model::DEFAULT_RESERVED_ROWS,
            line_wrap: false,
            share_buffer: true,
        }
    }
}

/// Ephemeral status message container.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct EditorState {
    pub buffers: Vec<BufferRef>,
    pub layout: LayoutTree,
    pub options: EditorOptions,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub quit_requested: bool,
    untitled_seq: usize,
}

impl EditorState {
    /// Create a session showing `buffer` in one full-screen window.
    pub fn new(buffer: TextBuffer, width: u16, height: u16, options: EditorOptions) -> Self {
        let shared = buffer.into_shared();
        let mut layout = LayoutTree::new(shared.clone(), width, height, options.reserved_rows);
        if options.line_wrap {
            layout.active_viewport_mut().set_line_wrap(true);
        }
        Self {
            buffers: vec![shared],
            layout,
            options,
            ephemeral_status: None,
            quit_requested: false,
            untitled_seq: 0,
        }
    }

    pub fn active_window(&self) -> WindowId {
        self.layout.active()
    }

    pub fn active_viewport(&self) -> &Viewport {
        self.layout.active_viewport()
    }

    pub fn active_viewport_mut(&mut self) -> &mut Viewport {
        self.layout.active_viewport_mut()
    }

    /// Shared handle of the document in the active window.
    pub fn active_buffer(&self) -> BufferRef {
        self.layout.active_viewport().buffer().clone()
    }

    /// Index of `buffer` in the session list.
    pub fn buffer_index(&self, buffer: &BufferRef) -> Option<usize> {
        self.buffers.iter().position(|b| Rc::ptr_eq(b, buffer))
    }

    /// Register a new empty buffer named `untitled-N`.
    pub fn new_untitled_buffer(&mut self) -> BufferRef {
        self.untitled_seq += 1;
        let name = format!("untitled-{}", self.untitled_seq);
        let buffer = TextBuffer::new(name.clone()).into_shared();
        self.buffers.push(buffer.clone());
        debug!(target: "state", name, buffers = self.buffers.len(), "buffer_created");
        buffer
    }

    /// Split the active window according to the split policy. Returns the
    /// new window, which is now active.
    pub fn split(&mut self, kind: SplitKind) -> Option<WindowId> {
        let buffer = if self.options.share_buffer {
            self.active_buffer()
        } else {
            self.new_untitled_buffer()
        };
        let id = self.layout.split_active(kind, buffer);
        if id.is_none() {
            self.prune_buffers();
        }
        id
    }

    /// Close the active window. Returns false when it is the only one.
    pub fn delete_window(&mut self) -> bool {
        let deleted = self.layout.delete_active();
        if deleted {
            self.prune_buffers();
        }
        deleted
    }

    /// Close every window except the active one.
    pub fn delete_other_windows(&mut self) -> bool {
        let deleted = self.layout.delete_others();
        if deleted {
            self.prune_buffers();
        }
        deleted
    }

    /// Drop buffers no window references. Returns how many were removed.
    pub fn prune_buffers(&mut self) -> usize {
        let before = self.buffers.len();
        // the session's own handle accounts for one strong reference
        self.buffers.retain(|b| Rc::strong_count(b) > 1);
        let removed = before - self.buffers.len();
        if removed > 0 {
            debug!(target: "state", removed, remaining = self.buffers.len(), "buffers_pruned");
        }
        removed
    }

    /// Propagate a terminal resize to the layout.
    pub fn resize(&mut self, width: u16, height: u16) {
        info!(target: "state", width, height, "resize");
        self.layout.resize(width, height);
    }

    /// Toggle wrap mode of the active window; returns the new mode.
    pub fn toggle_wrap(&mut self) -> bool {
        let view = self.layout.active_viewport_mut();
        let on = !view.line_wrap();
        view.set_line_wrap(on);
        on
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Set a status message with the default lifetime.
    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.set_ephemeral(msg, STATUS_TTL);
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    pub fn status_text(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }
}
