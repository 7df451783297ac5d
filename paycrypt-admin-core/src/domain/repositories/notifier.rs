//! Notification sink for user-facing notices

use crate::shared::types::Notice;

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
