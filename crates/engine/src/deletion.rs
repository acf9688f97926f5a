//! Deferred resource destruction.
//!
//! Vulkan objects must be destroyed in reverse creation order, after the GPU
//! has finished with them. [`DeletionQueue`] records destruction closures as
//! resources are created and runs them LIFO at teardown points.
//!
//! The engine keeps two queues: one scoped to the device (flushed once at
//! shutdown) and one scoped to the swapchain (flushed on every recreation).

use std::collections::VecDeque;

use tracing::trace;

/// LIFO queue of deferred destruction closures.
///
/// # Example
///
/// ```
/// use vkr_render::DeletionQueue;
///
/// let mut queue = DeletionQueue::new();
/// queue.push(|| println!("destroyed second"));
/// queue.push(|| println!("destroyed first"));
/// assert_eq!(queue.len(), 2);
///
/// let ran = queue.flush();
/// assert!(ran);
/// assert!(queue.is_empty());
/// ```
#[derive(Default)]
pub struct DeletionQueue {
    deletors: VecDeque<Box<dyn FnOnce() + Send>>,
}

impl DeletionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a destruction closure. Closures run in reverse push order.
    pub fn push(&mut self, deletor: impl FnOnce() + Send + 'static) {
        self.deletors.push_back(Box::new(deletor));
    }

    /// Runs every pending closure, newest first, and empties the queue.
    ///
    /// Returns true if at least one closure ran.
    pub fn flush(&mut self) -> bool {
        let ran = !self.deletors.is_empty();
        if ran {
            trace!("Flushing deletion queue ({} entries)", self.deletors.len());
        }
        while let Some(deletor) = self.deletors.pop_back() {
            deletor();
        }
        ran
    }

    /// Number of pending closures.
    #[inline]
    pub fn len(&self) -> usize {
        self.deletors.len()
    }

    /// The queue has no pending closures.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deletors.is_empty()
    }
}

impl Drop for DeletionQueue {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn flush_runs_in_reverse_push_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut queue = DeletionQueue::new();

        for i in 0..5 {
            let order = order.clone();
            queue.push(move || order.lock().unwrap().push(i));
        }

        assert!(queue.flush());
        assert_eq!(*order.lock().unwrap(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn flush_empties_the_queue() {
        let mut queue = DeletionQueue::new();
        queue.push(|| {});
        queue.push(|| {});
        assert_eq!(queue.len(), 2);

        queue.flush();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn flush_on_empty_queue_returns_false() {
        let mut queue = DeletionQueue::new();
        assert!(!queue.flush());
    }

    #[test]
    fn closures_run_exactly_once() {
        let count = Arc::new(Mutex::new(0));
        let mut queue = DeletionQueue::new();

        let c = count.clone();
        queue.push(move || *c.lock().unwrap() += 1);

        queue.flush();
        queue.flush();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn drop_flushes_pending_closures() {
        let count = Arc::new(Mutex::new(0));
        {
            let mut queue = DeletionQueue::new();
            let c = count.clone();
            queue.push(move || *c.lock().unwrap() += 1);
        }
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn reuse_after_flush() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut queue = DeletionQueue::new();

        let o = order.clone();
        queue.push(move || o.lock().unwrap().push("a"));
        queue.flush();

        let o = order.clone();
        queue.push(move || o.lock().unwrap().push("b"));
        queue.flush();

        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }
}
