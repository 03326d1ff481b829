//! Line-oriented pointer input
//!
//! Reads one pointer event per line (`down`, `move`, `up`) from stdin or any
//! other reader on a dedicated thread and forwards it to the state machine.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::pointer::PointerEvent;

/// Forwards pointer events read from a line source
pub struct PointerListener {
    event_tx: mpsc::Sender<PointerEvent>,
    running: Arc<AtomicBool>,
}

impl PointerListener {
    pub fn new(event_tx: mpsc::Sender<PointerEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading pointer events from stdin
    pub fn start(&self) -> Result<(), PointerError> {
        self.start_with_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Start reading pointer events from `reader` on a dedicated thread
    ///
    /// The thread exits at end of input, when `stop()` is called (checked
    /// between lines), or when the receiving side is dropped.
    pub fn start_with_reader<R>(&self, reader: R) -> Result<(), PointerError>
    where
        R: BufRead + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(PointerError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name("pointer-listener".to_string())
            .spawn(move || {
                info!("pointer listener thread started");
                let forwarded = forward_lines(reader, &event_tx, &running);
                running.store(false, Ordering::SeqCst);
                info!(forwarded, "pointer listener thread stopped");
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(PointerError::ThreadSpawn(e.to_string()));
        }
        Ok(())
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the pointer listener
#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    #[error("pointer listener is already running")]
    AlreadyRunning,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

/// Returns the number of events forwarded
fn forward_lines<R: BufRead>(
    reader: R,
    event_tx: &mpsc::Sender<PointerEvent>,
    running: &AtomicBool,
) -> usize {
    let mut forwarded = 0;

    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(?e, "failed to read pointer input");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.parse::<PointerEvent>() {
            Ok(event) => {
                debug!(%event, "pointer event");
                if event_tx.blocking_send(event).is_err() {
                    warn!("failed to send pointer event - channel closed?");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => warn!(%e, "skipping pointer input"),
        }
    }

    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_listener_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let listener = PointerListener::new(tx);
        assert!(!listener.is_running());
    }

    #[test]
    fn test_forward_skips_noise() {
        let (tx, mut rx) = mpsc::channel(32);
        let running = AtomicBool::new(true);
        let input = Cursor::new("down\n\n# hold\nmove\nwiggle\nup\n");

        let forwarded = forward_lines(input, &tx, &running);
        assert_eq!(forwarded, 3);
        assert_eq!(rx.try_recv().unwrap(), PointerEvent::Down);
        assert_eq!(rx.try_recv().unwrap(), PointerEvent::Move);
        assert_eq!(rx.try_recv().unwrap(), PointerEvent::Up);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forward_stops_when_not_running() {
        let (tx, mut rx) = mpsc::channel(32);
        let running = AtomicBool::new(false);

        assert_eq!(forward_lines(Cursor::new("down\nup\n"), &tx, &running), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reader_thread_forwards_events() {
        let (tx, mut rx) = mpsc::channel(32);
        let listener = PointerListener::new(tx);

        listener
            .start_with_reader(Cursor::new("down\nup\n"))
            .unwrap();

        assert_eq!(rx.recv().await, Some(PointerEvent::Down));
        assert_eq!(rx.recv().await, Some(PointerEvent::Up));
    }
}
