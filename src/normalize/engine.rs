//! 规范化主引擎
//!
//! 按声明的数据类型分派到各转换器；构造后无可变状态，可跨线程共享

use crate::config::NormalizationConfig;
use crate::normalize::boolean::BooleanTransformer;
use crate::normalize::cleanup::trim_and_collapse;
use crate::normalize::date::DateTransformer;
use crate::normalize::number::NumberTransformer;
use crate::normalize::percentage::PercentageTransformer;
use crate::normalize::types::{CanonicalValue, DataType, NormalizationResult, NumberMode, Rejection};

/// 规范化引擎（可复用，预编译规则）
pub struct NormalizationEngine {
    number: NumberTransformer,
    percentage: PercentageTransformer,
    date: DateTransformer,
    boolean: BooleanTransformer,
    /// 未指定模式时的数字模式
    default_mode: NumberMode,
}

impl NormalizationEngine {
    /// 按配置创建引擎
    pub fn new(config: &NormalizationConfig) -> Self {
        Self {
            number: NumberTransformer::new(),
            percentage: PercentageTransformer::new(),
            date: DateTransformer::new(config.date.century_pivot),
            boolean: BooleanTransformer::new(config.signal_words()),
            default_mode: config.number.default_mode,
        }
    }

    /// 规范化标注值
    ///
    /// 纯函数，不会失败：无法转换时返回 `convertible = false`
    ///
    /// # Arguments
    /// * `offset` - 标注的原始文本
    /// * `data_type` - 标签声明的数据类型
    /// * `mode` - 数字/百分比的符号模式，`None` 时使用配置的默认值
    pub fn normalize(
        &self,
        offset: &str,
        data_type: DataType,
        mode: Option<NumberMode>,
    ) -> NormalizationResult {
        let mode = mode.unwrap_or(self.default_mode);

        let outcome = match data_type {
            DataType::Number => self.number.transform(offset, mode),
            DataType::Percentage => self.percentage.transform(offset, mode),
            DataType::Date => self.date.transform(offset),
            DataType::Boolean => self.boolean.transform(offset),
            DataType::Text => Self::normalize_text(offset),
        };

        match &outcome {
            Ok(value) => debug_assert_eq!(value.data_type(), data_type),
            Err(rejection) => tracing::debug!(
                "Normalize: {} 不可机读 [offset={:?}]: {}",
                data_type,
                offset,
                rejection
            ),
        }

        NormalizationResult::from(outcome)
    }

    /// 文本类型：只做清理
    fn normalize_text(offset: &str) -> Result<CanonicalValue, Rejection> {
        let text = trim_and_collapse(offset);
        if text.is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(CanonicalValue::Text(text))
    }
}

impl Default for NormalizationEngine {
    fn default() -> Self {
        Self::new(&NormalizationConfig::default())
    }
}
