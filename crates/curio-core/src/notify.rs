//! Transient user-visible notices
//!
//! The propagation surface for settled mutation and fetch outcomes: the
//! layer swallows errors locally and records a notice here; rendering
//! observes notices and cache values, never raw error objects.

use std::cell::RefCell;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// One transient notification, dismissible by id
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: String,
    pub kind: NoticeKind,
    pub message: String,
}

/// In-memory notice sink, single-threaded like the rest of the layer
#[derive(Default)]
pub struct NoticeLog {
    entries: RefCell<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a success notice, returning its dismiss id
    pub fn success(&self, message: impl Into<String>) -> String {
        self.push(NoticeKind::Success, message.into())
    }

    /// Record a failure notice, returning its dismiss id
    pub fn failure(&self, message: impl Into<String>) -> String {
        self.push(NoticeKind::Failure, message.into())
    }

    pub fn dismiss(&self, id: &str) {
        self.entries.borrow_mut().retain(|notice| notice.id != id);
    }

    /// Current notices, oldest first
    pub fn snapshot(&self) -> Vec<Notice> {
        self.entries.borrow().clone()
    }

    /// Take all notices, leaving the log empty
    pub fn drain(&self) -> Vec<Notice> {
        self.entries.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn push(&self, kind: NoticeKind, message: String) -> String {
        let id = Uuid::now_v7().to_string();
        self.entries.borrow_mut().push(Notice {
            id: id.clone(),
            kind,
            message,
        });
        id
    }
}
