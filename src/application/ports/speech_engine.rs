//! Speech Engine Port - 语音合成引擎抽象
//!
//! 定义语音引擎的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::speech::{QueueMode, SpeakParams};

/// 语音引擎错误
#[derive(Debug, Error)]
pub enum SpeechEngineError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Speak rejected: {0}")]
    SpeakRejected(String),
}

/// 设置语言的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageStatus {
    Ok,
    /// 缺少语言数据
    MissingData,
    /// 不支持该语言
    NotSupported,
}

impl LanguageStatus {
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Speech Engine Port
///
/// 外部语音合成能力。初始化与播放都在引擎自身的执行器上异步完成，
/// `speak` 只负责入队，不等待播放结束
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// 初始化引擎，只会解析一次
    async fn initialize(&self) -> Result<(), SpeechEngineError>;

    /// 设置朗读语言（如 `en-US`）
    fn set_language(&self, locale: &str) -> LanguageStatus;

    /// 设置语速，立即作用于引擎状态
    fn set_speech_rate(&self, rate: f32);

    /// 设置音调，立即作用于引擎状态
    fn set_pitch(&self, pitch: f32);

    /// 提交一段话语
    fn speak(
        &self,
        text: &str,
        mode: QueueMode,
        params: Option<&SpeakParams>,
    ) -> Result<(), SpeechEngineError>;

    /// 释放引擎资源
    fn shutdown(&self);
}
