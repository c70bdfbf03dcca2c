//! HTTP 接口层
//!
//! 路由注册顺序：`/shorturls`、`/health`，最后是兜底的 `/{code}` 跳转。

pub mod constants;
pub mod middleware;
pub mod services;
