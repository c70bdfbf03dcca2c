//! HTTP 遥测客户端
//!
//! 有界队列 + 单个后台线程：
//! - `emit` 只做 `try_send`，队列满时丢弃并计数
//! - 后台线程用带全局超时的 ureq Agent 逐条 POST
//! - 客户端被 drop 后队列关闭，线程处理完剩余事件后退出

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::{LogLevel, TelemetryCounters, TelemetryEvent, TelemetrySink, TelemetryStats};
use crate::config::TelemetryConfig;
use crate::errors::{LinkpulseError, Result};

pub struct HttpTelemetryClient {
    stack: String,
    sender: Sender<TelemetryEvent>,
    counters: Arc<TelemetryCounters>,
}

impl HttpTelemetryClient {
    /// 创建客户端并启动后台发送线程
    pub fn spawn(config: &TelemetryConfig) -> Result<Self> {
        let (sender, receiver) = crossbeam_channel::bounded(config.queue_capacity.max(1));
        let counters = Arc::new(TelemetryCounters::default());

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(config.timeout_ms)))
            .build()
            .into();

        let worker = DeliveryWorker {
            agent,
            endpoint: config.endpoint.clone(),
            bearer_token: config
                .bearer_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            counters: Arc::clone(&counters),
        };

        std::thread::Builder::new()
            .name("telemetry-worker".to_string())
            .spawn(move || worker.run(receiver))
            .map_err(|e| {
                LinkpulseError::config(format!("Failed to spawn telemetry worker: {}", e))
            })?;

        debug!(
            "Telemetry client started: endpoint={}, queue_capacity={}, timeout={}ms",
            config.endpoint, config.queue_capacity, config.timeout_ms
        );

        Ok(Self {
            stack: config.stack.clone(),
            sender,
            counters,
        })
    }
}

impl TelemetrySink for HttpTelemetryClient {
    fn emit(&self, level: LogLevel, package: &str, message: String) {
        let event = TelemetryEvent {
            stack: self.stack.clone(),
            level,
            package: package.to_string(),
            message,
        };

        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.counters.dropped();
                debug!("Telemetry queue full, dropping '{}' event", event.package);
            }
            Err(TrySendError::Disconnected(event)) => {
                self.counters.dropped();
                warn!(
                    "Telemetry worker is not running, dropping '{}' event",
                    event.package
                );
            }
        }
    }

    fn stats(&self) -> TelemetryStats {
        self.counters.snapshot()
    }
}

struct DeliveryWorker {
    agent: Agent,
    endpoint: String,
    bearer_token: Option<String>,
    counters: Arc<TelemetryCounters>,
}

impl DeliveryWorker {
    fn run(self, receiver: Receiver<TelemetryEvent>) {
        for event in receiver.iter() {
            match self.deliver(&event) {
                Ok(()) => {
                    self.counters.delivered();
                    trace!("Telemetry event '{}' delivered", event.package);
                }
                Err(e) => {
                    self.counters.failed();
                    warn!("{}", e.format_simple());
                }
            }
        }
        debug!("Telemetry queue closed, worker exiting");
    }

    fn deliver(&self, event: &TelemetryEvent) -> Result<()> {
        let mut request = self.agent.post(&self.endpoint);
        if let Some(ref token) = self.bearer_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request.send_json(event).map_err(|e| {
            LinkpulseError::telemetry_delivery(format!(
                "POST {} for '{}' event failed: {}",
                self.endpoint, event.package, e
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn config_for(endpoint: String, queue_capacity: usize) -> TelemetryConfig {
        TelemetryConfig {
            endpoint,
            timeout_ms: 300,
            queue_capacity,
            ..TelemetryConfig::default()
        }
    }

    #[test]
    fn test_emit_never_blocks_when_queue_full() {
        // 只监听不应答：worker 会卡在第一条事件上直到超时
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/logs", listener.local_addr().unwrap());
        let client = HttpTelemetryClient::spawn(&config_for(endpoint, 1)).unwrap();

        let started = std::time::Instant::now();
        for i in 0..50 {
            client.emit(LogLevel::Info, "redirect", format!("event {}", i));
        }

        assert!(started.elapsed() < Duration::from_millis(250));
        assert!(client.stats().dropped >= 40);
        drop(listener);
    }

    #[test]
    fn test_delivery_failure_is_counted_not_raised() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint = format!("http://127.0.0.1:{}/logs", port);
        let client = HttpTelemetryClient::spawn(&config_for(endpoint, 4)).unwrap();
        client.emit(LogLevel::Error, "stats", "boom".to_string());

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while client.stats().failed == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }

        assert_eq!(client.stats().failed, 1);
        assert_eq!(client.stats().delivered, 0);
    }
}
