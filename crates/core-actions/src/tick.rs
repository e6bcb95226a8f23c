//! One step of the editor loop: drain the input queue and apply every event
//! in arrival order. Rendering happens after, once per tick, in the caller.

use crate::dispatch::{DispatchResult, apply};
use crate::key_handler::{KeyHandler, KeyOutcome};
use core_events::{Event, EventReceiver};
use core_state::EditorState;
use tracing::{debug, trace};

/// Apply a single event. A quit stops nothing by itself; the caller decides
/// when to leave the loop.
pub fn apply_event(event: Event, state: &mut EditorState, keys: &mut KeyHandler) -> DispatchResult {
    match event {
        Event::Key(key) => match keys.handle(&key) {
            KeyOutcome::Action(action) => apply(action, state),
            KeyOutcome::Pending => DispatchResult::dirty(),
            KeyOutcome::Unbound => DispatchResult::clean(),
        },
        Event::Resize { width, height } => {
            state.resize(width, height);
            DispatchResult::dirty()
        }
        Event::Quit => {
            state.request_quit();
            DispatchResult::quit()
        }
    }
}

/// Drain everything queued and apply it. Events after a quit in the same
/// batch are still applied; the loop stops after this tick's render.
pub fn run_tick(
    state: &mut EditorState,
    events: &EventReceiver,
    keys: &mut KeyHandler,
) -> DispatchResult {
    let mut result = DispatchResult::clean();
    let batch = events.drain();
    if !batch.is_empty() {
        trace!(target: "runtime", count = batch.len(), "tick_drain");
    }
    for event in batch {
        result.merge(apply_event(event, state, keys));
    }
    if state.tick_ephemeral() {
        result.dirty = true;
    }
    if result.quit {
        debug!(target: "runtime", "quit_requested");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyEvent, event_queue};
    use core_state::EditorOptions;
    use core_text::TextBuffer;

    fn setup() -> (EditorState, KeyHandler) {
        let st = EditorState::new(TextBuffer::new("scratch"), 80, 24, EditorOptions::default());
        (st, KeyHandler::with_defaults())
    }

    #[test]
    fn drains_in_arrival_order() {
        let (mut st, mut keys) = setup();
        let (tx, rx) = event_queue(64);
        for c in "hi".chars() {
            tx.push(Event::Key(KeyEvent::from_char(c)));
        }
        tx.push(Event::Key(KeyEvent::from_byte(13)));
        tx.push(Event::Key(KeyEvent::from_char('!')));
        let r = run_tick(&mut st, &rx, &mut keys);
        assert!(r.dirty);
        assert!(!r.quit);
        assert_eq!(st.active_buffer().borrow().text(), "hi\n!");
        assert!(rx.is_empty());
    }

    #[test]
    fn empty_tick_is_clean() {
        let (mut st, mut keys) = setup();
        let (_tx, rx) = event_queue(4);
        assert_eq!(run_tick(&mut st, &rx, &mut keys), DispatchResult::clean());
    }

    #[test]
    fn resize_event_reaches_layout() {
        let (mut st, mut keys) = setup();
        let (tx, rx) = event_queue(4);
        tx.push(Event::Resize {
            width: 100,
            height: 40,
        });
        run_tick(&mut st, &rx, &mut keys);
        assert_eq!(st.layout.total_width(), 100);
        assert_eq!(st.active_viewport().height(), 38);
    }

    #[test]
    fn quit_event_and_quit_chord() {
        let (mut st, mut keys) = setup();
        let (tx, rx) = event_queue(4);
        tx.push(Event::Quit);
        assert!(run_tick(&mut st, &rx, &mut keys).quit);

        let (mut st, mut keys) = setup();
        tx.push(Event::Key(KeyEvent::from_byte(24)));
        tx.push(Event::Key(KeyEvent::from_byte(3)));
        assert!(run_tick(&mut st, &rx, &mut keys).quit);
        assert!(st.quit_requested);
    }

    #[test]
    fn chord_prefix_spans_ticks() {
        let (mut st, mut keys) = setup();
        let (tx, rx) = event_queue(4);
        tx.push(Event::Key(KeyEvent::from_byte(24)));
        run_tick(&mut st, &rx, &mut keys);
        assert!(keys.is_pending());
        tx.push(Event::Key(KeyEvent::from_char('3')));
        run_tick(&mut st, &rx, &mut keys);
        assert_eq!(st.layout.leaf_count(), 2);
    }
}
