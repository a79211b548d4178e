//! Lector - 电子书朗读 TTS 播放管线
//!
//! 命令行入口：读入一个文本文件，切分后经激活的 TTS Profile
//! 逐句合成并播放。

use std::path::PathBuf;
use std::sync::Arc;

use lector::application::ports::HostProxyPort;
use lector::application::PlaybackEngine;
use lector::config::{load_config, print_config, TtsConfigStore};
use lector::domain::split_into_chunks;
use lector::infrastructure::{ReqwestProxy, RodioDevice};
use rodio::OutputStream;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},lector={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Lector - 电子书 TTS 朗读");
    print_config(&config);

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("Usage: lector <text-file>"))?;

    // 加载 TTS Profile 配置（缺失时初始化为内置默认）
    let store = Arc::new(TtsConfigStore::load(&config.storage.profiles_path));
    if !store.snapshot().enabled {
        tracing::warn!("TTS is disabled in profile config, playing anyway");
    }

    let proxy = Arc::new(ReqwestProxy::with_default_config()?);

    // 通过宿主字节通路读入书文并切分
    let raw = proxy.read_binary(&path).await?;
    let text = String::from_utf8_lossy(&raw);
    let chunks = split_into_chunks(&text);
    anyhow::ensure!(!chunks.is_empty(), "No readable text in {}", path.display());
    tracing::info!(path = %path.display(), chunks = chunks.len(), "Text chunked");

    // OutputStream 不是 Send，留在主线程；设备只拿 handle
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| anyhow::anyhow!("Failed to open audio output: {}", e))?;
    let (device_tx, device_rx) = mpsc::unbounded_channel();
    let device = RodioDevice::new(stream_handle, device_tx);

    let (engine, handle) = PlaybackEngine::new(store, proxy, Box::new(device), device_rx);
    tokio::spawn(engine.run());

    let mut status_rx = handle.subscribe();
    handle.set_queue(chunks);
    handle.play();

    // 播放到队列耗尽、出错或 Ctrl-C
    let mut started = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                handle.stop();
                break;
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = status_rx.borrow_and_update().clone();
                if let Some(error) = &status.error {
                    tracing::error!(error = %error, "Playback failed");
                    break;
                }
                if status.is_playing || status.is_loading {
                    started = true;
                } else if started {
                    tracing::info!("Playback finished");
                    break;
                }
            }
        }
    }

    handle.shutdown();
    Ok(())
}
