//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use rule_engine::Classifier;
use std::sync::Arc;

/// Axum 应用共享状态
///
/// 分类器在启动时构建一次，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}
