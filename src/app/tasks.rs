use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Result of a job running on a worker thread, polled once per frame.
pub(in crate::app) struct Pending<T> {
    rx: Receiver<Result<T, String>>,
}

impl<T: Send + 'static> Pending<T> {
    pub(in crate::app) fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = job().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        Self { rx }
    }

    /// `None` while the job is still running.
    pub(in crate::app) fn poll(&self) -> Option<Result<T, String>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err("Background worker disconnected".to_owned()))
            }
        }
    }
}
