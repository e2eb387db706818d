//! Per-tenant FIFO of pending send tasks
//!
//! Producers (the submission API) append to the tail; the tenant's single
//! worker peeks and removes from the head. A rate-limited task is peeked
//! but never removed, so no work is lost while a tenant is throttled.

use std::collections::VecDeque;

use herald_common::SendTask;
use parking_lot::Mutex;

/// Ordered, thread-safe queue of [`SendTask`] for one tenant.
#[derive(Debug, Default)]
pub struct TenantQueue {
    tasks: Mutex<VecDeque<SendTask>>,
}

impl TenantQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the tail. Always succeeds; the queue is unbounded.
    pub fn enqueue(&self, task: SendTask) {
        self.tasks.lock().push_back(task);
    }

    /// The task at the head, without removing it.
    #[must_use]
    pub fn peek_head(&self) -> Option<SendTask> {
        self.tasks.lock().front().cloned()
    }

    /// Remove the current head after it reached a terminal outcome.
    pub fn pop_head(&self) -> Option<SendTask> {
        self.tasks.lock().pop_front()
    }

    /// Current number of pending tasks.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tasks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(recipient: &str) -> SendTask {
        SendTask {
            recipient: recipient.to_string(),
            subject: "Hi".to_string(),
            body: String::new(),
            is_html: false,
            reply_to: None,
            tenant: "Acme".to_string(),
        }
    }

    #[test]
    fn fifo_ordering() {
        let queue = TenantQueue::new();
        queue.enqueue(task("a@x.com"));
        queue.enqueue(task("b@y.com"));
        queue.enqueue(task("c@z.com"));

        assert_eq!(queue.depth(), 3);
        assert_eq!(queue.pop_head().unwrap().recipient, "a@x.com");
        assert_eq!(queue.pop_head().unwrap().recipient, "b@y.com");
        assert_eq!(queue.pop_head().unwrap().recipient, "c@z.com");
        assert!(queue.pop_head().is_none());
    }

    #[test]
    fn peek_does_not_remove() {
        let queue = TenantQueue::new();
        queue.enqueue(task("a@x.com"));

        assert_eq!(queue.peek_head().unwrap().recipient, "a@x.com");
        assert_eq!(queue.peek_head().unwrap().recipient, "a@x.com");
        assert_eq!(queue.depth(), 1);
    }

    #[test]
    fn empty_queue_reports_empty() {
        let queue = TenantQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.depth(), 0);
        assert!(queue.peek_head().is_none());
    }
}
