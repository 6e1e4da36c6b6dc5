//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod error_listener;
mod speech_engine;

pub use error_listener::ErrorListener;
pub use speech_engine::{LanguageStatus, SpeechEngineError, SpeechEnginePort};
