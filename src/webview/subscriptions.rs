//! Scoped release of long-lived host resources.

use tokio::task::JoinHandle;

type Disposer = Box<dyn FnOnce() + Send>;

/// Disposers released together, last registered first.
///
/// Each disposer runs exactly once: on [`Subscriptions::dispose`] or when
/// the list is dropped, whichever comes first.
#[derive(Default)]
pub struct Subscriptions {
    disposers: Vec<Disposer>,
}

impl Subscriptions {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a disposer.
    pub fn push(&mut self, disposer: impl FnOnce() + Send + 'static) {
        self.disposers.push(Box::new(disposer));
    }

    /// Registers a background task that is aborted on disposal.
    pub fn push_task<T: Send + 'static>(&mut self, task: JoinHandle<T>) {
        self.push(move || task.abort());
    }

    /// Number of disposers not yet run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    /// Whether nothing is left to dispose.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    /// Runs and forgets every registered disposer.
    pub fn dispose(&mut self) {
        while let Some(disposer) = self.disposers.pop() {
            disposer();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions").field("pending", &self.disposers.len()).finish()
    }
}
