//! Tessel entrypoint: CLI, logging, terminal setup and the fixed-rate loop.
//!
//! Threads: the terminal reader and the resize watcher produce events; this
//! thread is the only consumer and the only one touching editor state.
use anyhow::Result;
use clap::Parser;
use core_actions::{KeyHandler, bindings_from_config, run_tick};
use core_config::{Config, load_from};
use core_events::{EVENTS_DROPPED, EventSourceRegistry, Shutdown, event_queue};
use core_input::TerminalReader;
use core_render::{compose, write_frame};
use core_state::{EditorOptions, EditorState, STATUS_TTL};
use core_terminal::{CrosstermBackend, ResizeWatcher, TerminalBackend};
use core_text::TextBuffer;
use std::io::{BufWriter, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "tessel.log";
const DEFAULT_BUFFER_NAME: &str = "scratch";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tessel", version, about = "Tessel split-window text editor")]
struct Args {
    /// Configuration file (overrides discovery of `tessel.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Log filter directive, e.g. `debug` or `model.scroll=trace` (default: RUST_LOG).
    #[arg(long = "log-level")]
    log_level: Option<String>,
    /// Name of the initial buffer.
    #[arg(long = "name", default_value = DEFAULT_BUFFER_NAME)]
    name: String,
}

fn configure_logging(level: Option<&str>) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let filter = level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .unwrap_or_else(EnvFilter::from_default_env);
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // global subscriber already installed; dropping the guard stops the writer
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn editor_options(config: &Config) -> EditorOptions {
    EditorOptions {
        reserved_rows: config.effective.reserved_rows,
        line_wrap: config.file.window.line_wrap,
        share_buffer: config.file.split.share_buffer,
    }
}

fn tick_interval(tick_hz: u32) -> Duration {
    Duration::from_secs(1) / tick_hz.max(1)
}

fn build_key_handler(config: &Config, state: &mut EditorState) -> KeyHandler {
    // invalid entries were already logged while resolving
    let (table, errors) = bindings_from_config(config);
    if !errors.is_empty() {
        state.set_ephemeral(format!("{} invalid binding(s) in config", errors.len()), STATUS_TTL);
    }
    KeyHandler::new(table)
}

fn join_sources(handles: Vec<JoinHandle<()>>) {
    for h in handles {
        let name = h.thread().name().unwrap_or("source").to_owned();
        if h.join().is_err() {
            warn!(target: "runtime", thread = name.as_str(), "event source panicked");
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log_level.as_deref());
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone());
    let options = editor_options(&config);

    let mut backend = CrosstermBackend::new();
    backend.set_title("tessel")?;
    let guard = backend.enter_guard()?;
    let (width, height) = guard.size();

    let mut state = EditorState::new(TextBuffer::new(args.name.as_str()), width, height, options);
    let mut keys = build_key_handler(&config, &mut state);

    let (tx, rx) = event_queue(config.effective.queue_capacity);
    let shutdown = Shutdown::new();
    let mut registry = EventSourceRegistry::new();
    registry.register(TerminalReader::new());
    registry.register(ResizeWatcher::new());
    let handles = registry.spawn_all(&tx, &shutdown)?;
    drop(tx);

    info!(
        target: "runtime",
        width,
        height,
        tick_hz = config.effective.tick_hz,
        queue_capacity = config.effective.queue_capacity,
        "loop_start"
    );
    let interval = tick_interval(config.effective.tick_hz);
    let mut out = BufWriter::new(stdout());
    let mut needs_render = true;
    let loop_result = loop {
        let started = Instant::now();
        let result = run_tick(&mut state, &rx, &mut keys);
        if needs_render || result.dirty || result.quit {
            let frame = compose(&state, keys.pending_display().as_deref());
            if let Err(e) = write_frame(&mut out, &frame) {
                break Err(e);
            }
            needs_render = false;
        }
        if result.quit || state.quit_requested {
            break Ok(());
        }
        let elapsed = started.elapsed();
        trace!(target: "runtime", elapsed_us = elapsed.as_micros() as u64, "tick");
        thread::sleep(interval.saturating_sub(elapsed));
    };

    shutdown.trigger();
    drop(rx);
    join_sources(handles);
    drop(guard);
    info!(
        target: "runtime",
        dropped_events = EVENTS_DROPPED.load(Ordering::Relaxed),
        "shutdown"
    );
    loop_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::BindingEntry;
    use std::sync::{Arc, Mutex};
    use tracing::dispatcher::Dispatch;
    use tracing::{Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    #[test]
    fn tick_interval_follows_rate() {
        assert_eq!(tick_interval(60), Duration::from_secs(1) / 60);
        assert_eq!(tick_interval(1), Duration::from_secs(1));
        assert_eq!(tick_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn options_come_from_config() {
        let mut config = Config::default();
        config.file.window.line_wrap = true;
        config.file.split.share_buffer = false;
        config.effective.reserved_rows = 1;
        let opts = editor_options(&config);
        assert_eq!(
            opts,
            EditorOptions {
                reserved_rows: 1,
                line_wrap: true,
                share_buffer: false
            }
        );
    }

    #[test]
    fn invalid_bindings_surface_as_status() {
        let mut config = Config::default();
        config.file.bindings.push(BindingEntry {
            keys: "C-x 9".into(),
            command: "no-such-command".into(),
        });
        let mut state = EditorState::new(TextBuffer::new("t"), 40, 10, EditorOptions::default());
        let keys = build_key_handler(&config, &mut state);
        assert!(!keys.is_pending());
        assert_eq!(state.status_text(), Some("1 invalid binding(s) in config"));
    }

    #[derive(Clone, Default)]
    struct CountWarnings {
        skipped: Arc<Mutex<usize>>,
    }

    impl<S: Subscriber> Layer<S> for CountWarnings {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            if meta.target() == "config" && *meta.level() == Level::WARN {
                *self.skipped.lock().unwrap() += 1;
            }
        }
    }

    #[test]
    fn invalid_binding_is_logged_once() {
        let mut config = Config::default();
        config.file.bindings.push(BindingEntry {
            keys: "C-x 9".into(),
            command: "no-such-command".into(),
        });
        let counter = CountWarnings::default();
        let skipped = counter.skipped.clone();
        let dispatch = Dispatch::new(Registry::default().with(counter));
        tracing::dispatcher::with_default(&dispatch, || {
            let mut state =
                EditorState::new(TextBuffer::new("t"), 40, 10, EditorOptions::default());
            build_key_handler(&config, &mut state);
        });
        assert_eq!(*skipped.lock().unwrap(), 1);
    }

    #[test]
    fn default_args_name_scratch_buffer() {
        let args = Args::parse_from(["tessel"]);
        assert_eq!(args.name, DEFAULT_BUFFER_NAME);
        assert!(args.config.is_none());
        let args = Args::parse_from(["tessel", "--log-level", "debug", "--name", "notes"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.name, "notes");
    }
}
