//! Fake Speech Engine - 用于测试的语音引擎
//!
//! 不产生任何音频，只记录收到的调用，便于断言交给引擎的文本与参数

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{LanguageStatus, SpeechEngineError, SpeechEnginePort};
use crate::domain::speech::{QueueMode, SpeakParams};

/// Fake Speech Engine 配置
#[derive(Debug, Clone)]
pub struct FakeSpeechEngineConfig {
    /// 初始化失败原因，None 表示初始化成功
    pub init_error: Option<String>,
    /// set_language 返回的状态
    pub language_status: LanguageStatus,
    /// 模拟初始化耗时
    pub init_delay: Duration,
    /// 是否拒绝所有话语
    pub reject_speak: bool,
}

impl Default for FakeSpeechEngineConfig {
    fn default() -> Self {
        Self {
            init_error: None,
            language_status: LanguageStatus::Ok,
            init_delay: Duration::ZERO,
            reject_speak: false,
        }
    }
}

impl FakeSpeechEngineConfig {
    /// 初始化总是失败的配置
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            init_error: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// 记录的引擎调用
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Initialize,
    SetLanguage(String),
    SetSpeechRate(f32),
    SetPitch(f32),
    Speak {
        text: String,
        mode: QueueMode,
        params: Option<SpeakParams>,
    },
    Shutdown,
}

/// 记录的话语
#[derive(Debug, Clone, PartialEq)]
pub struct SpokenUtterance {
    pub text: String,
    pub mode: QueueMode,
    pub params: Option<SpeakParams>,
}

/// Fake Speech Engine
pub struct FakeSpeechEngine {
    config: FakeSpeechEngineConfig,
    calls: Mutex<Vec<EngineCall>>,
    shut_down: AtomicBool,
}

impl FakeSpeechEngine {
    pub fn new(config: FakeSpeechEngineConfig) -> Self {
        Self {
            config,
            calls: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeSpeechEngineConfig::default())
    }

    fn record(&self, call: EngineCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// 所有调用的快照
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    /// 按提交顺序返回所有话语
    pub fn spoken(&self) -> Vec<SpokenUtterance> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Speak { text, mode, params } => {
                    Some(SpokenUtterance { text, mode, params })
                }
                _ => None,
            })
            .collect()
    }

    /// 最近一次设置的语速
    pub fn current_rate(&self) -> Option<f32> {
        self.calls().into_iter().rev().find_map(|call| match call {
            EngineCall::SetSpeechRate(rate) => Some(rate),
            _ => None,
        })
    }

    /// 最近一次设置的音调
    pub fn current_pitch(&self) -> Option<f32> {
        self.calls().into_iter().rev().find_map(|call| match call {
            EngineCall::SetPitch(pitch) => Some(pitch),
            _ => None,
        })
    }

    pub fn init_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Initialize))
    }

    pub fn shutdown_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Shutdown))
    }

    fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }
}

#[async_trait]
impl SpeechEnginePort for FakeSpeechEngine {
    async fn initialize(&self) -> Result<(), SpeechEngineError> {
        self.record(EngineCall::Initialize);

        if !self.config.init_delay.is_zero() {
            tokio::time::sleep(self.config.init_delay).await;
        }

        match &self.config.init_error {
            Some(reason) => Err(SpeechEngineError::InitFailed(reason.clone())),
            None => Ok(()),
        }
    }

    fn set_language(&self, locale: &str) -> LanguageStatus {
        self.record(EngineCall::SetLanguage(locale.to_string()));
        self.config.language_status
    }

    fn set_speech_rate(&self, rate: f32) {
        self.record(EngineCall::SetSpeechRate(rate));
    }

    fn set_pitch(&self, pitch: f32) {
        self.record(EngineCall::SetPitch(pitch));
    }

    fn speak(
        &self,
        text: &str,
        mode: QueueMode,
        params: Option<&SpeakParams>,
    ) -> Result<(), SpeechEngineError> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(SpeechEngineError::Unavailable("engine shut down".to_string()));
        }
        if self.config.reject_speak {
            return Err(SpeechEngineError::SpeakRejected(format!(
                "refusing {} chars",
                text.len()
            )));
        }

        tracing::debug!(text_len = text.len(), mode = mode.as_str(), "FakeSpeechEngine: recorded utterance");
        self.record(EngineCall::Speak {
            text: text.to_string(),
            mode,
            params: params.cloned(),
        });
        Ok(())
    }

    fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        self.record(EngineCall::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let engine = FakeSpeechEngine::with_defaults();
        engine.initialize().await.unwrap();
        engine.set_speech_rate(2.0);
        engine.set_pitch(0.5);
        let params = SpeakParams::new().with_volume(0.3);
        engine.speak("hello", QueueMode::Add, Some(&params)).unwrap();

        assert_eq!(engine.init_count(), 1);
        assert_eq!(engine.current_rate(), Some(2.0));
        assert_eq!(engine.current_pitch(), Some(0.5));
        assert_eq!(
            engine.spoken(),
            vec![SpokenUtterance {
                text: "hello".to_string(),
                mode: QueueMode::Add,
                params: Some(params),
            }]
        );
    }

    #[tokio::test]
    async fn test_failing_initialization() {
        let engine = FakeSpeechEngine::new(FakeSpeechEngineConfig::failing("boom"));
        assert!(matches!(
            engine.initialize().await,
            Err(SpeechEngineError::InitFailed(reason)) if reason == "boom"
        ));
    }

    #[test]
    fn test_speak_after_shutdown_fails() {
        let engine = FakeSpeechEngine::with_defaults();
        engine.shutdown();
        assert!(engine.speak("hello", QueueMode::Flush, None).is_err());
        assert_eq!(engine.shutdown_count(), 1);
        assert!(engine.spoken().is_empty());
    }
}
