//! Console Speech Engine - 控制台语音引擎
//!
//! 不接入真实的合成器，在后台任务上按语速“播放”话语：
//! 输出日志，并按词数与语速等待相应时长
//!
//! Flush 模式通过递增代数（generation）丢弃已入队但尚未播放的话语，
//! 并打断正在播放的话语

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::application::ports::{LanguageStatus, SpeechEngineError, SpeechEnginePort};
use crate::domain::speech::{QueueMode, SpeakParams};

/// 未携带音量参数时引擎使用的音量
const ENGINE_DEFAULT_VOLUME: f32 = 1.0;

/// 计算播放时长时语速的下限
const MIN_EFFECTIVE_RATE: f32 = 0.25;

/// Console Speech Engine 配置
#[derive(Debug, Clone)]
pub struct ConsoleSpeechEngineConfig {
    /// 语速为 1.0 时每分钟朗读的词数
    pub words_per_minute: u32,
    /// 支持的语言
    pub supported_locales: Vec<String>,
    /// 模拟初始化耗时
    pub init_delay: Duration,
    /// 播放队列容量
    pub queue_capacity: usize,
}

impl Default for ConsoleSpeechEngineConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 180,
            supported_locales: vec!["en-US".to_string(), "en-GB".to_string()],
            init_delay: Duration::from_millis(100),
            queue_capacity: 256,
        }
    }
}

#[derive(Debug)]
struct PlaybackItem {
    text: String,
    generation: u64,
    rate: f32,
    pitch: f32,
    volume: f32,
    utterance_id: Option<String>,
}

/// Console Speech Engine
pub struct ConsoleSpeechEngine {
    config: ConsoleSpeechEngineConfig,
    rate: AtomicU32,
    pitch: AtomicU32,
    generation: watch::Sender<u64>,
    sender: Mutex<Option<mpsc::Sender<PlaybackItem>>>,
    played: Arc<AtomicUsize>,
}

impl ConsoleSpeechEngine {
    pub fn new(config: ConsoleSpeechEngineConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            config,
            rate: AtomicU32::new(1.0_f32.to_bits()),
            pitch: AtomicU32::new(1.0_f32.to_bits()),
            generation,
            sender: Mutex::new(None),
            played: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ConsoleSpeechEngineConfig::default())
    }

    /// 已完整播放的话语数
    pub fn played_count(&self) -> usize {
        self.played.load(Ordering::SeqCst)
    }

    fn current_rate(&self) -> f32 {
        f32::from_bits(self.rate.load(Ordering::SeqCst))
    }

    fn current_pitch(&self) -> f32 {
        f32::from_bits(self.pitch.load(Ordering::SeqCst))
    }

    fn sender(&self) -> Option<mpsc::Sender<PlaybackItem>> {
        self.sender.lock().ok().and_then(|s| s.clone())
    }
}

/// 按词数与语速估算播放时长
pub fn playback_duration(text: &str, words_per_minute: u32, rate: f32) -> Duration {
    let words = text.split_whitespace().count() as f64;
    if words == 0.0 || words_per_minute == 0 {
        return Duration::ZERO;
    }
    let rate = if rate.is_finite() {
        rate.max(MIN_EFFECTIVE_RATE)
    } else {
        1.0
    };
    let secs = words * 60.0 / (words_per_minute as f64 * rate as f64);
    Duration::from_secs_f64(secs)
}

async fn run_player(
    mut receiver: mpsc::Receiver<PlaybackItem>,
    mut generation: watch::Receiver<u64>,
    words_per_minute: u32,
    played: Arc<AtomicUsize>,
) {
    tracing::debug!("Console playback started");

    while let Some(item) = receiver.recv().await {
        let current = *generation.borrow_and_update();
        if item.generation < current {
            tracing::debug!(utterance_id = ?item.utterance_id, "Skipping flushed utterance");
            continue;
        }

        tracing::info!(
            utterance_id = ?item.utterance_id,
            rate = item.rate,
            pitch = item.pitch,
            volume = item.volume,
            "Speaking: {}",
            item.text
        );

        let duration = playback_duration(&item.text, words_per_minute, item.rate);
        tokio::select! {
            _ = tokio::time::sleep(duration) => {
                played.fetch_add(1, Ordering::SeqCst);
            }
            changed = generation.changed() => {
                if changed.is_err() {
                    break;
                }
                tracing::debug!(utterance_id = ?item.utterance_id, "Utterance interrupted");
            }
        }
    }

    tracing::debug!("Console playback stopped");
}

#[async_trait]
impl SpeechEnginePort for ConsoleSpeechEngine {
    async fn initialize(&self) -> Result<(), SpeechEngineError> {
        if self.sender().is_some() {
            return Ok(());
        }
        if self.config.words_per_minute == 0 {
            return Err(SpeechEngineError::InitFailed(
                "words_per_minute cannot be 0".to_string(),
            ));
        }

        tokio::time::sleep(self.config.init_delay).await;

        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));
        tokio::spawn(run_player(
            rx,
            self.generation.subscribe(),
            self.config.words_per_minute,
            self.played.clone(),
        ));

        let mut sender = self
            .sender
            .lock()
            .map_err(|e| SpeechEngineError::InitFailed(e.to_string()))?;
        *sender = Some(tx);

        tracing::info!(
            words_per_minute = self.config.words_per_minute,
            "ConsoleSpeechEngine initialized"
        );
        Ok(())
    }

    fn set_language(&self, locale: &str) -> LanguageStatus {
        let supported = self
            .config
            .supported_locales
            .iter()
            .any(|l| l.eq_ignore_ascii_case(locale));
        if supported {
            LanguageStatus::Ok
        } else {
            LanguageStatus::NotSupported
        }
    }

    fn set_speech_rate(&self, rate: f32) {
        self.rate.store(rate.to_bits(), Ordering::SeqCst);
    }

    fn set_pitch(&self, pitch: f32) {
        self.pitch.store(pitch.to_bits(), Ordering::SeqCst);
    }

    fn speak(
        &self,
        text: &str,
        mode: QueueMode,
        params: Option<&SpeakParams>,
    ) -> Result<(), SpeechEngineError> {
        let sender = self
            .sender()
            .ok_or_else(|| SpeechEngineError::Unavailable("engine not running".to_string()))?;

        let generation = match mode {
            QueueMode::Flush => {
                self.generation.send_modify(|g| *g += 1);
                *self.generation.borrow()
            }
            QueueMode::Add => *self.generation.borrow(),
        };

        let item = PlaybackItem {
            text: text.to_string(),
            generation,
            rate: self.current_rate(),
            pitch: self.current_pitch(),
            volume: params
                .and_then(|p| p.volume())
                .unwrap_or(ENGINE_DEFAULT_VOLUME),
            utterance_id: params
                .and_then(|p| p.get(SpeakParams::KEY_UTTERANCE_ID))
                .map(str::to_string),
        };

        sender.try_send(item).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                SpeechEngineError::SpeakRejected("playback queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                SpeechEngineError::Unavailable("playback stopped".to_string())
            }
        })
    }

    fn shutdown(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
        self.generation.send_modify(|g| *g += 1);
        tracing::info!("ConsoleSpeechEngine shut down");
    }
}
