//! Speech Context - 语音参数限界上下文
//!
//! 职责:
//! - 语音参数与队列模式等值对象
//! - 文本指令解析

mod resolver;
mod value_objects;

pub use resolver::{resolve_parameters, resolve_utterance, AppliedDirective, ResolvedUtterance};
pub use value_objects::{
    QueueMode, SpeakParams, SpeechParameters, UtteranceId, UtteranceSource, DEFAULT_PITCH,
    DEFAULT_RATE, DEFAULT_VOLUME,
};
