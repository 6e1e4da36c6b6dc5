//! Utterance Queue Controller - 话语队列控制器
//!
//! 负责：
//! - 根据引擎就绪状态决定是否接受话语
//! - 对用户输入调用指令解析器，持久化解析后的参数
//! - 把参数推送给语音引擎并提交话语
//! - 通过监听器与日志报告错误
//!
//! 状态机:
//! - Uninitialized → (初始化成功) → Ready
//! - 初始化失败保持 Uninitialized，不重试
//! - 任意状态 → shut_down() → Closed

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::error::QueueError;
use crate::application::ports::{ErrorListener, LanguageStatus, SpeechEnginePort};
use crate::domain::speech::{
    resolve_utterance, QueueMode, SpeakParams, SpeechParameters, UtteranceId, UtteranceSource,
};

/// 默认朗读语言
pub const DEFAULT_LOCALE: &str = "en-US";

/// 控制器配置
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// 初始化成功后设置的固定语言
    pub locale: String,
    /// 会话初始参数
    pub defaults: SpeechParameters,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            defaults: SpeechParameters::default(),
        }
    }
}

/// 引擎状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Closed,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }
}

/// 提交回执
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub utterance_id: UtteranceId,
    pub mode: QueueMode,
    /// 提交时使用的参数；系统刷新提交不带参数
    pub parameters: Option<SpeechParameters>,
}

struct ControllerInner {
    state: EngineState,
    init_attempted: bool,
    language: Option<LanguageStatus>,
    parameters: SpeechParameters,
    listener: Option<Arc<dyn ErrorListener>>,
}

/// 话语队列控制器
///
/// 所有可变状态位于同一把锁内，多个并发提交者按顺序执行，
/// 指令解析结果不会丢失
pub struct UtteranceQueueController {
    engine: Arc<dyn SpeechEnginePort>,
    config: ControllerConfig,
    inner: Mutex<ControllerInner>,
}

impl UtteranceQueueController {
    pub fn new(engine: Arc<dyn SpeechEnginePort>, config: ControllerConfig) -> Self {
        let parameters = config.defaults;
        Self {
            engine,
            config,
            inner: Mutex::new(ControllerInner {
                state: EngineState::Uninitialized,
                init_attempted: false,
                language: None,
                parameters,
                listener: None,
            }),
        }
    }

    pub fn with_defaults(engine: Arc<dyn SpeechEnginePort>) -> Self {
        Self::new(engine, ControllerConfig::default())
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 初始化引擎
    ///
    /// 等待引擎一次性的初始化结果。语言不受支持只是警告，控制器仍进入 Ready
    pub async fn initialize(&self) -> Result<LanguageStatus, QueueError> {
        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                EngineState::Closed => return Err(report(&inner, QueueError::EngineClosed)),
                EngineState::Ready => return Ok(inner.language.unwrap_or(LanguageStatus::Ok)),
                // 另一次初始化仍在进行，结果未知，不作为错误上报
                EngineState::Initializing => {
                    tracing::debug!("Speech engine initialization already in progress");
                    return Err(QueueError::EngineNotReady);
                }
                _ if inner.init_attempted => {
                    return Err(report(
                        &inner,
                        QueueError::EngineInitFailed("initialization already attempted".into()),
                    ));
                }
                _ => {}
            }
            inner.state = EngineState::Initializing;
            inner.init_attempted = true;
        }

        tracing::debug!("Waiting for speech engine initialization");
        let result = self.engine.initialize().await;

        let mut inner = self.inner.lock().await;
        if inner.state == EngineState::Closed {
            tracing::warn!("Speech engine initialized after shutdown, result discarded");
            return Err(report(&inner, QueueError::EngineClosed));
        }

        if let Err(e) = result {
            inner.state = EngineState::Uninitialized;
            return Err(report(&inner, QueueError::init_failed(e)));
        }

        let language = self.engine.set_language(&self.config.locale);
        inner.parameters.volume = self.config.defaults.volume;
        inner.language = Some(language);
        inner.state = EngineState::Ready;
        tracing::info!(locale = %self.config.locale, language = ?language, "TTS initialized");

        if !language.is_usable() {
            report(
                &inner,
                QueueError::UnsupportedLanguage(self.config.locale.clone()),
            );
        }

        Ok(language)
    }

    /// 提交用户话语（追加模式）
    pub async fn submit_user(&self, text: &str) -> Result<SubmitReceipt, QueueError> {
        self.submit_user_with_mode(text, QueueMode::Add).await
    }

    /// 提交用户话语
    ///
    /// 解析文本中的指令并更新会话参数，然后原样朗读文本
    pub async fn submit_user_with_mode(
        &self,
        text: &str,
        mode: QueueMode,
    ) -> Result<SubmitReceipt, QueueError> {
        let mut inner = self.inner.lock().await;
        ensure_ready(&inner)?;

        let resolved = resolve_utterance(text, inner.parameters);
        if !resolved.applied.is_empty() {
            tracing::debug!(
                applied = ?resolved.applied,
                rate = resolved.parameters.rate,
                pitch = resolved.parameters.pitch,
                volume = resolved.parameters.volume,
                "Speech directives resolved"
            );
        }
        inner.parameters = resolved.parameters;

        self.speak_with_parameters(&inner, text, mode)
    }

    /// 提交系统话语
    ///
    /// 不扫描指令，清空当前队列并立即朗读，不携带参数
    pub async fn submit_system(&self, text: &str) -> Result<SubmitReceipt, QueueError> {
        let inner = self.inner.lock().await;
        ensure_ready(&inner)?;

        let utterance_id = UtteranceId::new();
        self.engine
            .speak(text, QueueMode::Flush, None)
            .map_err(|e| report(&inner, e.into()))?;

        tracing::debug!(utterance_id = %utterance_id, text_len = text.len(), "System utterance flushed");
        Ok(SubmitReceipt {
            utterance_id,
            mode: QueueMode::Flush,
            parameters: None,
        })
    }

    /// 按来源提交话语（追加模式）
    ///
    /// 用户来源会解析指令；系统来源使用当前参数原样朗读
    pub async fn submit(
        &self,
        text: &str,
        source: UtteranceSource,
    ) -> Result<SubmitReceipt, QueueError> {
        match source {
            UtteranceSource::User => self.submit_user(text).await,
            UtteranceSource::System => {
                let inner = self.inner.lock().await;
                ensure_ready(&inner)?;
                self.speak_with_parameters(&inner, text, QueueMode::Add)
            }
        }
    }

    /// 关闭引擎，可重复调用
    pub async fn shut_down(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == EngineState::Closed {
            tracing::debug!("Speech engine already shut down");
            return;
        }
        self.engine.shutdown();
        inner.state = EngineState::Closed;
        tracing::info!("Speech engine shut down");
    }

    /// 注册错误监听器，替换已有的监听器
    pub async fn set_listener(&self, listener: Arc<dyn ErrorListener>) {
        self.inner.lock().await.listener = Some(listener);
    }

    pub async fn state(&self) -> EngineState {
        self.inner.lock().await.state
    }

    pub async fn is_ready(&self) -> bool {
        self.state().await == EngineState::Ready
    }

    /// 当前会话参数
    pub async fn parameters(&self) -> SpeechParameters {
        self.inner.lock().await.parameters
    }

    fn speak_with_parameters(
        &self,
        inner: &ControllerInner,
        text: &str,
        mode: QueueMode,
    ) -> Result<SubmitReceipt, QueueError> {
        let parameters = inner.parameters;
        let utterance_id = UtteranceId::new();

        self.engine.set_speech_rate(parameters.rate);
        self.engine.set_pitch(parameters.pitch);

        let params = SpeakParams::new()
            .with_volume(parameters.volume)
            .with_utterance_id(utterance_id);
        self.engine
            .speak(text, mode, Some(&params))
            .map_err(|e| report(inner, e.into()))?;

        tracing::debug!(
            utterance_id = %utterance_id,
            mode = mode.as_str(),
            text_len = text.len(),
            "Utterance enqueued"
        );

        Ok(SubmitReceipt {
            utterance_id,
            mode,
            parameters: Some(parameters),
        })
    }
}

fn ensure_ready(inner: &ControllerInner) -> Result<(), QueueError> {
    match inner.state {
        EngineState::Ready => Ok(()),
        EngineState::Closed => Err(report(inner, QueueError::EngineClosed)),
        EngineState::Uninitialized | EngineState::Initializing => {
            Err(report(inner, QueueError::EngineNotReady))
        }
    }
}

/// 记录日志并通知监听器，返回原错误
fn report(inner: &ControllerInner, error: QueueError) -> QueueError {
    if error.is_fatal() {
        tracing::error!(state = inner.state.as_str(), error = %error, "TTS error");
    } else {
        tracing::warn!(state = inner.state.as_str(), error = %error, "TTS warning");
    }
    if let Some(listener) = &inner.listener {
        listener.on_error(&error.to_string());
    }
    error
}
