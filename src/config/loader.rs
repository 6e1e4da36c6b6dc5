//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（voxqueue.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["voxqueue", "voxqueue.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "VOXQUEUE";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXQUEUE_`，层级分隔符 `__`）
/// 2. 配置文件（voxqueue.toml 或 voxqueue.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOXQUEUE_ENGINE__LOCALE=en-GB`
/// - `VOXQUEUE_SPEECH__VOLUME=0.8`
/// - `VOXQUEUE_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("engine.locale", "en-US")?
        .set_default("engine.supported_locales", vec!["en-US", "en-GB"])?
        .set_default("engine.init_delay_ms", 100)?
        .set_default("engine.words_per_minute", 180)?
        .set_default("engine.queue_capacity", 256)?
        .set_default("speech.rate", 1.0)?
        .set_default("speech.pitch", 1.0)?
        .set_default("speech.volume", 0.5)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VOXQUEUE_ENGINE__LOCALE=en-GB
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
///
/// 只校验默认参数；运行时指令解析出的数值不受此限制
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.engine.locale.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine locale cannot be empty".to_string(),
        ));
    }

    if config.engine.words_per_minute == 0 {
        return Err(ConfigError::ValidationError(
            "Words per minute cannot be 0".to_string(),
        ));
    }

    if config.engine.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Queue capacity cannot be 0".to_string(),
        ));
    }

    config
        .speech
        .parameters()
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid speech defaults: {}", e)))?;

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Locale: {}", config.engine.locale);
    tracing::info!("Supported Locales: {:?}", config.engine.supported_locales);
    tracing::info!("Init Delay: {}ms", config.engine.init_delay_ms);
    tracing::info!("Words Per Minute: {}", config.engine.words_per_minute);
    tracing::info!(
        "Speech Defaults: rate={} pitch={} volume={}",
        config.speech.rate,
        config.speech.pitch,
        config.speech.volume
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
