//! 短链记录与点击累加器

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::errors::{LinkpulseError, Result};

use super::clock::Clock;

/// 没有 Referer 时使用的来源标记
pub const DIRECT_SOURCE: &str = "direct";

/// 单次跳转的点击事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    /// Referer，缺失时为 "direct"
    pub source: String,
    /// 客户端地址，未知时为空串
    pub origin: String,
}

/// 跳转请求携带的上下文
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub referrer: Option<String>,
    pub origin: Option<String>,
}

impl ClickContext {
    pub fn new(referrer: Option<String>, origin: Option<String>) -> Self {
        Self { referrer, origin }
    }

    /// 空 Referer 与缺失同样视为直接访问
    fn source(&self) -> String {
        match self.referrer.as_deref().map(str::trim) {
            Some(referrer) if !referrer.is_empty() => referrer.to_string(),
            _ => DIRECT_SOURCE.to_string(),
        }
    }
}

/// 点击累加器：计数与日志只能一起变化
#[derive(Debug, Default)]
pub struct ClickLog {
    total_clicks: u64,
    events: Vec<ClickEvent>,
}

impl ClickLog {
    pub fn append(&mut self, event: ClickEvent) {
        self.events.push(event);
        self.total_clicks += 1;
    }

    pub fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    pub fn events(&self) -> &[ClickEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&ClickEvent> {
        self.events.last()
    }
}

/// 短链记录
///
/// 除 `clicks` 外全部字段在创建后不可变。
#[derive(Debug)]
pub struct LinkRecord {
    code: String,
    original_url: String,
    short_link: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    clicks: RwLock<ClickLog>,
}

impl LinkRecord {
    pub(crate) fn new(
        code: String,
        original_url: String,
        short_link: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            original_url,
            short_link,
            created_at,
            expires_at,
            clicks: RwLock::new(ClickLog::default()),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn short_link(&self) -> &str {
        &self.short_link
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// 严格大于才算过期：恰好在 `expires_at` 时仍可跳转
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// 记录一次点击
    ///
    /// 时间读取、过期判断与追加都在写锁内完成，
    /// 因此日志顺序即完成顺序，且过期后记录不会再被修改。
    pub(crate) fn register_click(
        &self,
        clock: &dyn Clock,
        context: &ClickContext,
    ) -> Result<ClickEvent> {
        let mut clicks = self.clicks.write();
        let now = clock.now();

        if self.is_expired_at(now) {
            return Err(LinkpulseError::expired(format!(
                "Short link '{}' expired at {}",
                self.code,
                self.expires_at.to_rfc3339()
            )));
        }

        let event = ClickEvent {
            timestamp: now,
            source: context.source(),
            origin: context.origin.clone().unwrap_or_default(),
        };
        clicks.append(event.clone());
        Ok(event)
    }

    /// 一致性快照：计数与日志在同一把读锁下复制
    pub fn stats(&self) -> LinkStats {
        let clicks = self.clicks.read();
        let last = clicks.last();

        LinkStats {
            short_link: self.short_link.clone(),
            original_url: self.original_url.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
            total_clicks: clicks.total_clicks(),
            last_click_timestamp: last.map(|e| e.timestamp),
            last_click_source: last.map(|e| e.source.clone()),
            click_log: clicks.events().to_vec(),
        }
    }
}

/// 统计查询结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub short_link: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub total_clicks: u64,
    pub last_click_timestamp: Option<DateTime<Utc>>,
    pub last_click_source: Option<String>,
    pub click_log: Vec<ClickEvent>,
}
