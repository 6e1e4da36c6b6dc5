//! Event Publisher Implementation
//!
//! 将队列错误广播给多个订阅者

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::ErrorListener;

/// 队列事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum QueueEvent {
    /// 控制器报告的错误
    Error {
        message: String,
        at: DateTime<Utc>,
    },
}

/// 事件发布器
pub struct QueueEventPublisher {
    channel: broadcast::Sender<QueueEvent>,
}

impl QueueEventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.channel.subscribe()
    }

    /// 发布错误事件
    pub fn publish_error(&self, message: &str) {
        let event = QueueEvent::Error {
            message: message.to_string(),
            at: Utc::now(),
        };
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish Error event (no receivers)");
        }
    }
}

impl Default for QueueEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorListener for QueueEventPublisher {
    fn on_error(&self, message: &str) {
        self.publish_error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_is_broadcast_to_all_subscribers() {
        let publisher = QueueEventPublisher::new();
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();

        publisher.on_error("TTS Not Initialized");

        for rx in [&mut first, &mut second] {
            match rx.recv().await.unwrap() {
                QueueEvent::Error { message, .. } => assert_eq!(message, "TTS Not Initialized"),
            }
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let publisher = QueueEventPublisher::new();
        publisher.publish_error("nobody listening");
    }

    #[test]
    fn test_event_serialization() {
        let event = QueueEvent::Error {
            message: "TTS engine has been shut down".to_string(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Error");
        assert_eq!(json["data"]["message"], "TTS engine has been shut down");
    }
}
