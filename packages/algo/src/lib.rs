//! # lexiprobe-algo - 词汇水平估计核心算法库
//!
//! 本 crate 提供纯 Rust 实现的水平估计算法:
//!
//! - **Response Classifier** - 将自评结果映射为成功权重
//! - **Posterior Accumulator** - Beta(α, β) 后验的增量更新
//! - **Estimate Calculator** - 点估计、标准差与 95% 可信区间
//! - **Confidence Classifier** - 根据样本量与标准差给出置信等级
//! - **Vocabulary Estimator** - 基于各类响应计数的词汇量估计
//!
//! ## 设计理念
//!
//! - **纯函数** - 除会话状态外，所有组件都是无状态的纯函数
//! - **O(1) 查询** - 估计值由 (α, β) 直接计算，无需回放历史
//! - **永不失败** - 损坏或缺失的持久化状态回退到先验 Beta(1, 1)
//!
//! ## 模块结构
//!
//! - [`response`] - 响应权重
//! - [`posterior`] - 后验累加器
//! - [`estimate`] - 估计值计算
//! - [`confidence`] - 置信等级
//! - [`vocabulary`] - 词汇量估计
//! - [`session`] - 会话状态、持久化记录与导出
//! - [`sanitize`] - 持久化记录校验
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use lexiprobe_algo::{LearningSession, ResponseEvent, ResponseKind};
//!
//! let mut session = LearningSession::new();
//! session.apply(&ResponseEvent::new("apple", ResponseKind::KnowSentence));
//!
//! let estimate = session.estimate();
//! assert!((estimate.point_estimate_pct - 66.67).abs() < 0.01);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod types;
pub mod response;
pub mod posterior;
pub mod estimate;
pub mod confidence;
pub mod vocabulary;
pub mod sanitize;
pub mod session;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出会话状态
pub use session::{ExportPayload, LearningSession, PersistedState, StateError};
