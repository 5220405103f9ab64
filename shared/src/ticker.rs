use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

/// A background thread that fires a callback at a fixed interval until stopped.
///
/// Dropping the ticker stops it. Once `stop` returns no further callback runs.
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("life-ticker".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => on_tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        debug!("ticker started, interval {interval:?}");

        Ok(Ticker {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The thread may already be gone if the callback panicked
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
            debug!("ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
