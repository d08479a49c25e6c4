//! 标注数据规范化
//!
//! 将标注原文按标签数据类型（数字、百分比、日期、布尔、文本）转换为机器可读的规范值，
//! 并提供 CSV / JSON 导出。

pub mod config;
pub mod export;
pub mod normalize;

pub use config::NormalizationConfig;
pub use normalize::{CanonicalValue, DataType, NormalizationEngine, NormalizationResult, NumberMode};
