//! Domain Layer - 领域层
//!
//! Speech Context: 语音参数与文本指令解析

pub mod speech;
