//! 远端遥测
//!
//! 将结构化事件尽力而为地转发给外部日志收集器：
//! - 调用方永远不等待发送完成
//! - 发送失败只在本地记录，不影响业务结果

pub mod client;

pub use client::HttpTelemetryClient;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

/// 收集器接受的日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// 事件标签，作为 `package` 字段发送
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EventTag {
    CreateUrl,
    Redirect,
    Stats,
}

/// 发往收集器的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    pub stack: String,
    pub level: LogLevel,
    pub package: String,
    pub message: String,
}

/// 本地诊断计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TelemetryStats {
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct TelemetryCounters {
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl TelemetryCounters {
    pub(crate) fn delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> TelemetryStats {
        TelemetryStats {
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// 遥测出口
///
/// `emit` 必须立即返回且不能失败。
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, level: LogLevel, package: &str, message: String);

    fn is_enabled(&self) -> bool {
        true
    }

    fn stats(&self) -> TelemetryStats {
        TelemetryStats::default()
    }
}

/// 关闭遥测时使用
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn emit(&self, _level: LogLevel, _package: &str, _message: String) {}

    fn is_enabled(&self) -> bool {
        false
    }
}
