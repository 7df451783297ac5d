//! In-memory notice feed
//!
//! Keeps the most recent notices for the dashboard's toast area.

use crate::domain::repositories::Notifier;
use crate::shared::constants::NOTICE_HISTORY_SIZE;
use crate::shared::types::{Notice, NoticeLevel};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
pub struct NoticeBoard {
    capacity: usize,
    notices: Mutex<VecDeque<Notice>>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::with_capacity(NOTICE_HISTORY_SIZE)
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            notices: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(notices) => notices.iter().rev().take(limit).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn latest(&self) -> Option<Notice> {
        self.recent(1).into_iter().next()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let Ok(mut notices) = self.notices.lock() else {
            return false;
        };
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    pub fn clear(&self) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::error!("{}", notice.message),
            NoticeLevel::Warning => log::warn!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => log::info!("{}", notice.message),
        }

        if let Ok(mut notices) = self.notices.lock() {
            if notices.len() == self.capacity {
                notices.pop_front();
            }
            notices.push_back(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_is_bounded_and_newest_first() {
        let board = NoticeBoard::with_capacity(2);
        board.notify(Notice::info("one"));
        board.notify(Notice::success("two"));
        board.notify(Notice::error("three"));

        let recent = board.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "three");
        assert_eq!(recent[1].message, "two");
    }

    #[test]
    fn test_dismiss() {
        let board = NoticeBoard::new();
        board.notify(Notice::warning("careful"));
        let id = board.latest().unwrap().id;
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert!(board.is_empty());
    }
}
