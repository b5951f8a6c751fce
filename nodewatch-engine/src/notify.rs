//! Notification events and delivery sinks.
//!
//! The engine never renders toasts itself: a tick produces
//! [`Notification`] values and hands them to whatever sinks are
//! configured. Rendering is a consumer concern.

use nodewatch_types::{Node, NodeStatus};

/// How urgently a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    /// A node became unreachable.
    Destructive,
}

/// A user-facing notification describing one status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    /// Build the notification for a node transitioning to `status`.
    ///
    /// Only called for transitions from a known prior state - the initial
    /// pending observation never notifies.
    pub fn for_transition(node: &Node, status: NodeStatus) -> Self {
        let (title, severity) = match status {
            NodeStatus::Offline => ("Node Unreachable", Severity::Destructive),
            _ => ("Node Connection Restored", Severity::Info),
        };
        Self {
            title: title.to_string(),
            description: format!(
                "{} ({}) is now {}.",
                node.display_name, node.address, status
            ),
            severity,
        }
    }
}

/// Delivery destination for notifications.
///
/// Multiple sinks can be configured; each notification goes to all of them.
#[derive(Debug)]
pub enum NotificationSink {
    /// Log notifications via `tracing`.
    Log,

    /// Send notifications through a channel.
    ///
    /// Use `NotificationSink::channel()` to create this variant and get
    /// the receiver. Delivery is best-effort: a full channel drops the
    /// notification rather than blocking the tick.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<Notification>),
}

impl NotificationSink {
    /// Create a channel sink and return both the sink and the receiver.
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<Notification>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (NotificationSink::Channel(tx), rx)
    }

    /// Deliver a notification to this sink.
    pub fn dispatch(&self, notification: &Notification) {
        match self {
            NotificationSink::Log => match notification.severity {
                Severity::Destructive => {
                    tracing::warn!(title = %notification.title, "{}", notification.description)
                }
                Severity::Info => {
                    tracing::info!(title = %notification.title, "{}", notification.description)
                }
            },
            #[cfg(feature = "tokio")]
            NotificationSink::Channel(tx) => {
                let _ = tx.try_send(notification.clone());
            }
        }
    }
}
