//! Speech Context - Value Objects

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 引擎默认语速
pub const DEFAULT_RATE: f32 = 1.0;
/// 引擎默认音调
pub const DEFAULT_PITCH: f32 = 1.0;
/// 引擎默认音量
pub const DEFAULT_VOLUME: f32 = 0.5;

/// 语音参数
///
/// 不变量（仅对默认值与配置校验生效）:
/// - rate > 0
/// - pitch > 0
/// - volume ∈ [0, 1]
///
/// 指令解析出的数值不做截断，越界值原样透传
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParameters {
    /// 语速
    pub rate: f32,
    /// 音调
    pub pitch: f32,
    /// 音量 (0.0 - 1.0)
    pub volume: f32,
}

impl Default for SpeechParameters {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl SpeechParameters {
    pub fn new(rate: f32, pitch: f32, volume: f32) -> Self {
        Self { rate, pitch, volume }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.rate.is_nan() || self.rate <= 0.0 {
            return Err("rate must be greater than 0");
        }
        if self.pitch.is_nan() || self.pitch <= 0.0 {
            return Err("pitch must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err("volume must be between 0.0 and 1.0");
        }
        Ok(())
    }
}

/// 话语来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtteranceSource {
    /// 用户输入，会扫描指令
    User,
    /// 系统输入，原样朗读
    System,
}

/// 队列模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    /// 取消当前及待播话语，立即开始
    Flush,
    /// 追加到队列末尾
    Add,
}

impl Default for QueueMode {
    fn default() -> Self {
        Self::Add
    }
}

impl QueueMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flush => "flush",
            Self::Add => "add",
        }
    }
}

/// 话语唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceId(Uuid);

impl UtteranceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UtteranceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 交给引擎的朗读参数（字符串键值对）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakParams(HashMap<String, String>);

impl SpeakParams {
    pub const KEY_VOLUME: &'static str = "volume";
    pub const KEY_UTTERANCE_ID: &'static str = "utteranceId";

    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set(Self::KEY_VOLUME, volume.to_string());
        self
    }

    pub fn with_utterance_id(mut self, id: UtteranceId) -> Self {
        self.set(Self::KEY_UTTERANCE_ID, id.to_string());
        self
    }

    /// 解析音量参数
    pub fn volume(&self) -> Option<f32> {
        self.get(Self::KEY_VOLUME).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
