use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A serial queue backed by one named OS thread.
///
/// Jobs run one at a time, in submission order.
pub struct DispatchQueue {
    label: String,
    sender: Mutex<Option<Sender<Job>>>,
    handle: Option<JoinHandle<()>>,
    thread_id: ThreadId,
}

impl DispatchQueue {
    pub fn new(label: &str) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(label.to_string())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
            })
            .expect("failed to spawn dispatch queue thread");
        let thread_id = handle.thread().id();

        Self {
            label: label.to_string(),
            sender: Mutex::new(Some(sender)),
            handle: Some(handle),
            thread_id,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    pub fn dispatch<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.lock();
        let sent = sender.as_ref().map(|s| s.send(Box::new(job)).is_ok()).unwrap_or(false);
        if !sent {
            log::warn!("Dropped job submitted to closed queue {}", self.label);
        }
    }

    /// Blocks until every job submitted before this call has run.
    ///
    /// Returns immediately when called from the queue's own thread.
    pub fn wait_until_idle(&self) {
        if self.is_current() {
            return;
        }
        let (done_tx, done_rx) = mpsc::sync_channel::<()>(1);
        self.dispatch(move || {
            let _ = done_tx.send(());
        });
        let _ = done_rx.recv();
    }
}

impl Drop for DispatchQueue {
    fn drop(&mut self) {
        self.sender.lock().take();
        if let Some(handle) = self.handle.take() {
            // The last owner can be a job running on this very queue.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}
