//! Cancellable one-second tick source for an active workout.
//!
//! The ticker runs on its own thread and sends an event per tick over an
//! `mpsc` channel, so ticks and user input can be applied to the session
//! from a single consumer loop. Ticks are scheduled against a monotonic
//! start instant and do not drift with loop latency.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const TICK: Duration = Duration::from_secs(1);

/// Background ticker; stopped and joined on [`Ticker::stop`] or drop
#[derive(Debug)]
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl Ticker {
    /// Send `make_event()` on `tx` every `interval` until stopped
    ///
    /// The thread also exits once the receiving side of `tx` is gone.
    pub fn spawn<E, F>(interval: Duration, tx: Sender<E>, make_event: F) -> Self
    where
        E: Send + 'static,
        F: Fn() -> E + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut next = Instant::now() + interval;
            let mut ticks: u64 = 0;
            loop {
                let wait = next.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        ticks += 1;
                        next += interval;
                        if tx.send(make_event()).is_err() {
                            tracing::debug!("Tick receiver dropped after {} ticks", ticks);
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            ticks
        });

        tracing::debug!("Ticker started ({:?} interval)", interval);
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the thread and wait for it; returns the number of ticks sent
    pub fn stop(&mut self) -> u64 {
        // dropping the sender wakes the thread immediately
        self.stop_tx.take();
        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(ticks) => {
                    tracing::debug!("Ticker stopped after {} ticks", ticks);
                    ticks
                }
                Err(_) => {
                    tracing::warn!("Ticker thread panicked");
                    0
                }
            },
            None => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_are_delivered() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(10), tx, || "tick");

        for _ in 0..3 {
            assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "tick");
        }
        assert!(ticker.stop() >= 3);
        assert!(!ticker.is_running());
    }

    #[test]
    fn test_stop_is_prompt_and_idempotent() {
        let (tx, _rx) = mpsc::channel::<()>();
        let mut ticker = Ticker::spawn(Duration::from_secs(60), tx, || ());

        let started = Instant::now();
        assert_eq!(ticker.stop(), 0);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(ticker.stop(), 0);
    }

    #[test]
    fn test_drop_stops_thread() {
        let (tx, rx) = mpsc::channel();
        {
            let _ticker = Ticker::spawn(Duration::from_millis(5), tx, || 1u8);
            rx.recv_timeout(Duration::from_secs(2)).unwrap();
        }
        // sender moved into the thread is gone once the ticker is dropped
        while rx.try_recv().is_ok() {}
        assert!(matches!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(RecvTimeoutError::Disconnected)
        ));
    }
}
