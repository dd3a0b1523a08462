//! 支付错误分类 HTTP 服务
//!
//! 对分类引擎的薄封装：接收请求、调用引擎、序列化结果。

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;

/// 服务名称，用于加载 config/{SERVICE_NAME}.toml
pub const SERVICE_NAME: &str = "resolution-service";
