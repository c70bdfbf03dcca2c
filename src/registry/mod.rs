//! 短码注册表
//!
//! 进程内唯一的短码 → 记录映射，负责：
//! - 创建（原子的存在性检查 + 插入，冲突即失败）
//! - 跳转解析（过期检查 + 点击追加）
//! - 统计查询（不检查过期）
//!
//! 不做持久化，进程重启即清空；记录永不删除。

pub mod clock;
pub mod generator;
pub mod record;

pub use clock::{Clock, ManualClock, SystemClock};
pub use generator::{CODE_LENGTH, CodeGenerator, RandomCodeGenerator};
pub use record::{ClickContext, ClickEvent, ClickLog, DIRECT_SOURCE, LinkRecord, LinkStats};

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::errors::{LinkpulseError, Result};
use crate::telemetry::{EventTag, LogLevel, TelemetrySink};
use crate::utils::{is_valid_short_code, validate_target_url};

/// 请求未指定有效期时的默认值（分钟）
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

/// 与固定路由同名的短码，不能被注册
pub const RESERVED_CODES: [&str; 2] = ["shorturls", "health"];

/// 生成的短码撞上保留字时的重新生成次数
const RESERVED_REGENERATE_ATTEMPTS: usize = 3;

fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// 创建请求
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub url: String,
    pub validity_minutes: Option<u32>,
    pub shortcode: Option<String>,
}

/// 创建结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    #[serde(skip)]
    pub code: String,
    pub short_link: String,
    #[serde(rename = "expiry")]
    pub expires_at: DateTime<Utc>,
}

pub struct Registry {
    links: DashMap<String, Arc<LinkRecord>>,
    base_url: String,
    default_validity_minutes: u32,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl Registry {
    /// `base_url` 为短链前缀，例如 `http://localhost:5000`
    pub fn new(base_url: impl Into<String>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            links: DashMap::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_validity_minutes: DEFAULT_VALIDITY_MINUTES,
            generator: Arc::new(RandomCodeGenerator),
            clock: Arc::new(SystemClock),
            telemetry,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_default_validity(mut self, minutes: u32) -> Self {
        self.default_validity_minutes = minutes;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn telemetry(&self) -> &Arc<dyn TelemetrySink> {
        &self.telemetry
    }

    /// 创建短链
    ///
    /// 保存的目标地址是去掉首尾空白后的输入，不做规范化。
    /// 生成的短码同样可能冲突，冲突时直接返回 `CodeConflict`，不重试。
    pub fn create(&self, request: CreateLink) -> Result<CreatedLink> {
        let url = request.url.trim();
        validate_target_url(url)?;

        let validity = request
            .validity_minutes
            .unwrap_or(self.default_validity_minutes);
        if validity == 0 {
            return Err(LinkpulseError::invalid_input(
                "Validity must be a positive number of minutes",
            ));
        }

        let code = match request.shortcode {
            Some(code) => {
                if !is_valid_short_code(&code) {
                    return Err(LinkpulseError::invalid_input(format!(
                        "Invalid shortcode '{}': use 1-32 letters, digits, '-' or '_'",
                        code
                    )));
                }
                if is_reserved_code(&code) {
                    return Err(LinkpulseError::invalid_input(format!(
                        "Shortcode '{}' is reserved",
                        code
                    )));
                }
                code
            }
            None => self.generate_code()?,
        };

        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add_signed(TimeDelta::minutes(i64::from(validity)))
            .ok_or_else(|| LinkpulseError::invalid_input("Validity is out of range"))?;
        let short_link = format!("{}/{}", self.base_url, code);

        let inserted = match self.links.entry(code.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(LinkRecord::new(
                    code.clone(),
                    url.to_string(),
                    short_link.clone(),
                    created_at,
                    expires_at,
                )));
                true
            }
        };

        if !inserted {
            debug!("Create rejected, shortcode already exists: {}", code);
            self.emit(
                LogLevel::Warn,
                EventTag::CreateUrl,
                format!("shortcode '{}' already exists", code),
            );
            return Err(LinkpulseError::code_conflict(format!(
                "Shortcode '{}' already exists",
                code
            )));
        }

        info!(
            "Short link created: {} -> {} (expires {})",
            code,
            url,
            expires_at.to_rfc3339()
        );
        self.emit(
            LogLevel::Info,
            EventTag::CreateUrl,
            format!(
                "created '{}' -> {} valid for {} minutes",
                code, url, validity
            ),
        );

        Ok(CreatedLink {
            code,
            short_link,
            expires_at,
        })
    }

    /// 解析短码用于跳转，成功时记录一次点击
    pub fn resolve(&self, code: &str, context: ClickContext) -> Result<String> {
        let Some(record) = self.lookup(code) else {
            debug!("Redirect target not found: {}", code);
            self.emit(
                LogLevel::Warn,
                EventTag::Redirect,
                format!("shortcode '{}' not found", code),
            );
            return Err(Self::not_found(code));
        };

        match record.register_click(self.clock.as_ref(), &context) {
            Ok(event) => {
                trace!("Click recorded for {}: source={}", code, event.source);
                self.emit(
                    LogLevel::Info,
                    EventTag::Redirect,
                    format!(
                        "redirected '{}' -> {} (source: {})",
                        code,
                        record.original_url(),
                        event.source
                    ),
                );
                Ok(record.original_url().to_string())
            }
            Err(e) => {
                debug!("Redirect rejected for {}: {}", code, e);
                self.emit(
                    LogLevel::Warn,
                    EventTag::Redirect,
                    format!("shortcode '{}' is expired", code),
                );
                Err(e)
            }
        }
    }

    /// 查询统计，过期链接依然可查
    pub fn stats(&self, code: &str) -> Result<LinkStats> {
        let Some(record) = self.lookup(code) else {
            self.emit(
                LogLevel::Warn,
                EventTag::Stats,
                format!("stats requested for unknown shortcode '{}'", code),
            );
            return Err(Self::not_found(code));
        };

        let stats = record.stats();
        self.emit(
            LogLevel::Info,
            EventTag::Stats,
            format!(
                "stats served for '{}' ({} clicks)",
                code, stats.total_clicks
            ),
        );
        Ok(stats)
    }

    /// 生成的短码不做唯一性检查，只跳过保留字
    fn generate_code(&self) -> Result<String> {
        for _ in 0..RESERVED_REGENERATE_ATTEMPTS {
            let code = self.generator.generate();
            if !is_reserved_code(&code) {
                return Ok(code);
            }
            debug!("Generated shortcode '{}' is reserved, regenerating", code);
        }
        Err(LinkpulseError::code_conflict(
            "Generated shortcode kept colliding with reserved routes",
        ))
    }

    /// 取出记录后立即释放分片锁，避免持锁等待记录锁
    fn lookup(&self, code: &str) -> Option<Arc<LinkRecord>> {
        self.links.get(code).map(|entry| Arc::clone(entry.value()))
    }

    fn not_found(code: &str) -> LinkpulseError {
        LinkpulseError::not_found(format!("Shortcode '{}' not found", code))
    }

    fn emit(&self, level: LogLevel, tag: EventTag, message: String) {
        self.telemetry.emit(level, tag.as_ref(), message);
    }
}
