//! Events Layer - 事件发布

mod publisher;

pub use publisher::{QueueEvent, QueueEventPublisher};
