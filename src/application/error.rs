//! 应用层错误定义
//!
//! 队列控制器报告的所有错误。错误不会中止进程：控制器记录日志、
//! 通知监听器，然后以 `Err` 返回给调用方

use thiserror::Error;

/// 队列错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// 引擎尚未初始化成功
    #[error("TTS Not Initialized")]
    EngineNotReady,

    /// 引擎初始化失败
    #[error("Initialization Failed! {0}")]
    EngineInitFailed(String),

    /// 语言不受支持（非致命，初始化仍然完成）
    #[error("This Language is not supported: {0}")]
    UnsupportedLanguage(String),

    /// 引擎已关闭
    #[error("TTS engine has been shut down")]
    EngineClosed,

    /// 引擎拒绝了话语
    #[error("Speak failed: {0}")]
    SpeakFailed(String),
}

impl QueueError {
    /// 将引擎初始化阶段的任意错误归为初始化失败
    pub fn init_failed(err: crate::application::ports::SpeechEngineError) -> Self {
        use crate::application::ports::SpeechEngineError;
        match err {
            SpeechEngineError::InitFailed(reason) => Self::EngineInitFailed(reason),
            other => Self::EngineInitFailed(other.to_string()),
        }
    }

    /// 是否为致命错误（非致命错误不影响后续提交）
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnsupportedLanguage(_))
    }
}

impl From<crate::application::ports::SpeechEngineError> for QueueError {
    fn from(err: crate::application::ports::SpeechEngineError) -> Self {
        use crate::application::ports::SpeechEngineError;
        match err {
            SpeechEngineError::InitFailed(reason) => Self::EngineInitFailed(reason),
            other => Self::SpeakFailed(other.to_string()),
        }
    }
}
