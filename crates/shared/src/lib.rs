//! 共享库
//!
//! 包含分类服务共用的配置、错误处理与可观测性基础设施代码。

pub mod config;
pub mod error;
pub mod observability;
