//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechEnginePort、ErrorListener）
//! - queue_controller: 话语队列控制器
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod queue_controller;

pub use error::QueueError;

pub use ports::{ErrorListener, LanguageStatus, SpeechEngineError, SpeechEnginePort};

pub use queue_controller::{
    ControllerConfig, EngineState, SubmitReceipt, UtteranceQueueController, DEFAULT_LOCALE,
};
