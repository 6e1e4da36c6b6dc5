//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::{ControllerConfig, DEFAULT_LOCALE};
use crate::domain::speech::{SpeechParameters, DEFAULT_PITCH, DEFAULT_RATE, DEFAULT_VOLUME};
use crate::infrastructure::adapters::ConsoleSpeechEngineConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 语音引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 默认语音参数
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 控制器配置
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            locale: self.engine.locale.clone(),
            defaults: self.speech.parameters(),
        }
    }

    /// 控制台引擎配置
    pub fn console_engine_config(&self) -> ConsoleSpeechEngineConfig {
        ConsoleSpeechEngineConfig {
            words_per_minute: self.engine.words_per_minute,
            supported_locales: self.engine.supported_locales.clone(),
            init_delay: Duration::from_millis(self.engine.init_delay_ms),
            queue_capacity: self.engine.queue_capacity,
        }
    }
}

/// 语音引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 初始化后设置的语言
    #[serde(default = "default_locale")]
    pub locale: String,

    /// 引擎支持的语言
    #[serde(default = "default_supported_locales")]
    pub supported_locales: Vec<String>,

    /// 模拟初始化耗时（毫秒）
    #[serde(default = "default_init_delay_ms")]
    pub init_delay_ms: u64,

    /// 语速为 1.0 时每分钟朗读的词数
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// 播放队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_supported_locales() -> Vec<String> {
    vec!["en-US".to_string(), "en-GB".to_string()]
}

fn default_init_delay_ms() -> u64 {
    100
}

fn default_words_per_minute() -> u32 {
    180
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            supported_locales: default_supported_locales(),
            init_delay_ms: default_init_delay_ms(),
            words_per_minute: default_words_per_minute(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// 默认语音参数配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// 语速
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// 音调
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// 音量 (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_rate() -> f32 {
    DEFAULT_RATE
}

fn default_pitch() -> f32 {
    DEFAULT_PITCH
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

impl SpeechConfig {
    pub fn parameters(&self) -> SpeechParameters {
        SpeechParameters::new(self.rate, self.pitch, self.volume)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
