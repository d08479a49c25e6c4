//! 数据规范化层
//!
//! 将标注的原始文本按标签数据类型转换为机器可读的规范值。
//!
//! ## 处理流程
//! 1. Unicode 归一化 + 引号/空白清理
//! 2. 按数据类型分派（数字 / 百分比 / 日期 / 布尔 / 文本）
//! 3. 成功输出规范值，失败输出"不可机读"

mod boolean;
mod cleanup;
pub(crate) mod date;
mod engine;
mod number;
mod percentage;
pub(crate) mod rules;
pub(crate) mod types;

pub use boolean::BooleanTransformer;
pub use date::{DateTransformer, DEFAULT_CENTURY_PIVOT};
pub use engine::NormalizationEngine;
pub use number::NumberTransformer;
pub use percentage::PercentageTransformer;
pub use rules::SignalWords;
pub use types::{CanonicalValue, DataType, NormalizationResult, NumberMode, Rejection};
