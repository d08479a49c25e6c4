//! 百分比转换器
//!
//! 复用数字转换器的清理与解析，结果除以 100（与是否带 `%` 无关）
//!
//! 千分位规则与数字相同：`12.500%` 中的点号视为千分位，结果为 125

use crate::normalize::cleanup::strip_quotes_and_whitespace;
use crate::normalize::number::{round_to, NumberTransformer};
use crate::normalize::types::{CanonicalValue, NumberMode, Rejection};

/// 百分比输出保留的小数位
const PERCENTAGE_DECIMALS: i32 = 4;

pub struct PercentageTransformer {
    number: NumberTransformer,
}

impl PercentageTransformer {
    pub fn new() -> Self {
        Self {
            number: NumberTransformer::new(),
        }
    }

    pub fn transform(&self, offset: &str, mode: NumberMode) -> Result<CanonicalValue, Rejection> {
        let cleaned: String = strip_quotes_and_whitespace(offset)
            .chars()
            .filter(|ch| *ch != '%' && *ch != '％')
            .collect();

        let value = round_to(self.number.parse(&cleaned, mode)? / 100.0, PERCENTAGE_DECIMALS);
        if !value.is_finite() {
            return Err(Rejection::MalformedNumber(cleaned));
        }
        Ok(CanonicalValue::Percentage(value))
    }
}

impl Default for PercentageTransformer {
    fn default() -> Self {
        Self::new()
    }
}
