//! VoxQueue - 语音输出队列
//!
//! 从标准输入逐行读取文本：
//! - 普通行作为用户话语提交（解析指令）
//! - `/system <text>` 作为系统话语立即朗读
//! - `/quit` 退出

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use voxqueue::application::UtteranceQueueController;
use voxqueue::config::{load_config, print_config, AppConfig};
use voxqueue::infrastructure::{ConsoleSpeechEngine, QueueEvent, QueueEventPublisher};

const SYSTEM_PREFIX: &str = "/system ";
const QUIT_COMMAND: &str = "/quit";

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},voxqueue={}", config.log.level, config.log.level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("VoxQueue - 语音输出队列");
    print_config(&config);

    let engine = Arc::new(ConsoleSpeechEngine::new(config.console_engine_config()));
    let controller = UtteranceQueueController::new(engine, config.controller_config()).arc();

    // 错误事件广播
    let publisher = QueueEventPublisher::new().arc();
    controller.set_listener(publisher.clone()).await;
    let mut events = publisher.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                QueueEvent::Error { message, .. } => eprintln!("! {}", message),
            }
        }
    });

    // 初始化失败不退出：后续提交会被拒绝并报告
    match controller.initialize().await {
        Ok(language) => tracing::info!(language = ?language, "Speech queue ready"),
        Err(e) => tracing::warn!(error = %e, "Speech queue unavailable, input will be dropped"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                break;
            }
        };

        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == QUIT_COMMAND {
            break;
        }

        let result = match line.strip_prefix(SYSTEM_PREFIX) {
            Some(text) => controller.submit_system(text).await,
            None => controller.submit_user(line).await,
        };
        if let Ok(receipt) = result {
            tracing::debug!(utterance_id = %receipt.utterance_id, "Utterance accepted");
        }
    }

    controller.shut_down().await;
    tracing::info!("Shutdown complete");

    Ok(())
}
