//! Speech Adapter - 语音引擎实现

mod console_speech_engine;
mod fake_speech_engine;

pub use console_speech_engine::{playback_duration, ConsoleSpeechEngine, ConsoleSpeechEngineConfig};
pub use fake_speech_engine::{EngineCall, FakeSpeechEngine, FakeSpeechEngineConfig, SpokenUtterance};
