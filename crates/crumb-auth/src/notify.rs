//! The alert sink seam.

/// An operator-facing alert raised when resolution degrades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub suggestions: Vec<String>,
    pub mention_all: bool,
}

/// Fire-and-forget alert delivery.
///
/// `notify` never fails from the caller's point of view: implementations log their
/// own delivery errors and return.
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Writes alerts to the log. Used when no delivery channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: &Alert) {
        tracing::error!(
            title = %alert.title,
            suggestions = ?alert.suggestions,
            mention_all = alert.mention_all,
            "{}",
            alert.message
        );
    }
}
