//! VoxQueue - 带指令解析的语音输出队列
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Speech Context: 语音参数、队列模式、文本指令解析
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechEnginePort, ErrorListener）
//! - UtteranceQueueController: 就绪判定、参数下发、话语入队
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: ConsoleSpeechEngine, FakeSpeechEngine
//! - Events: 错误事件广播

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{QueueError, UtteranceQueueController};
pub use config::{load_config, AppConfig};
pub use domain::speech::{resolve_parameters, QueueMode, SpeechParameters, UtteranceSource};
