//! capture-button: demo host for the capture button core
//!
//! Reads pointer events (`down`, `move`, `up`) line by line from stdin,
//! runs them through the capture state machine and:
//! - paints every redraw into a display list (logged at debug level)
//! - prints lifecycle events as JSON lines on stdout
//!
//! Exits when stdin closes and the button has settled, or on SIGINT/SIGTERM.

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use capture_button::gesture::PointerListener;
use capture_button::lifecycle::ShutdownSignal;
use capture_button::render::{paint, DisplayList, Layout, Palette};
use capture_button::{CaptureEvent, CaptureMachine, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for events
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "capture-button starting"
    );

    let config = Config::load().context("failed to load configuration")?;
    info!(
        button_size = config.button_size,
        long_press_ms = config.long_press_threshold.as_millis() as u64,
        max_record_ms = config.max_record_duration.as_millis() as u64,
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();

    // Pointer listener -> state machine
    let (pointer_tx, pointer_rx) = mpsc::channel(32);
    // State machine -> renderer and capture backend
    let (event_tx, event_rx) = broadcast::channel::<CaptureEvent>(256);

    let mut machine = CaptureMachine::new(config, event_tx);
    let layout = Layout::new(machine.config());

    let listener = PointerListener::new(pointer_tx);
    listener
        .start()
        .context("failed to start pointer listener")?;

    let consumer = tokio::spawn(consume_events(event_rx, layout));

    info!("capture button ready, entering main loop");

    tokio::select! {
        _ = machine.run(pointer_rx) => {
            info!("state machine exited");
        }
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    info!(
        mode = %machine.current_mode(),
        pointer_down = machine.is_pointer_down(),
        "shutting down..."
    );

    listener.stop();
    // Dropping the machine closes the event channel so the consumer drains and exits
    drop(machine);
    if let Err(e) = consumer.await {
        error!(?e, "event consumer failed");
    }

    info!("capture-button stopped");

    Ok(())
}

/// Paint redraws and publish lifecycle events until the channel closes
async fn consume_events(mut event_rx: broadcast::Receiver<CaptureEvent>, layout: Layout) {
    let palette = Palette::default();
    let mut canvas = DisplayList::new();

    loop {
        match event_rx.recv().await {
            Ok(CaptureEvent::Redraw { snapshot }) => {
                canvas.clear();
                paint(&snapshot, &layout, &palette, &mut canvas);
                for op in canvas.ops() {
                    debug!(mode = %snapshot.mode, "{op}");
                }
            }
            Ok(event) => {
                info!(%event, "capture event");
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => warn!(?e, "failed to encode capture event"),
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "capture event receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
