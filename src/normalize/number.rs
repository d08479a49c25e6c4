//! 数字转换器
//!
//! 处理步骤：
//! 1. 去除空白、引号
//! 2. "无值"词 / 数字词整串匹配
//! 3. 去除末尾借贷标记 `S`/`H`（`S` 表示负数）
//! 4. 纯破折号 → 0
//! 5. 识别符号（前/后破折号、括号、`S`），正号一律去除
//! 6. 千分位/小数点识别，输出 `.` 小数点

use regex::Regex;

use crate::normalize::cleanup::strip_quotes_and_whitespace;
use crate::normalize::rules::{is_dash, NothingLexicon, NothingMatch, NumberWords, PLUS_CHARS};
use crate::normalize::types::{CanonicalValue, NumberMode, Rejection};

lazy_static::lazy_static! {
    static ref INTEGER_RE: Regex = Regex::new(r"^\d+$").unwrap();
    static ref SINGLE_COMMA_RE: Regex = Regex::new(r"^\d*,\d*$").unwrap();
    static ref SINGLE_DOT_RE: Regex = Regex::new(r"^\d*\.\d*$").unwrap();
    /// `1.000` 这类单个点号的千分位写法
    static ref DOT_THOUSAND_RE: Regex = Regex::new(r"^[1-9]\d{0,2}\.\d{3}$").unwrap();
    /// 德式：`1.234.567,89`
    static ref DOT_GROUPED_RE: Regex = Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d*)?$").unwrap();
    /// 英式：`1,234,567.89`
    static ref COMMA_GROUPED_RE: Regex = Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d*)?$").unwrap();
}

/// 数字输出保留的小数位
const NUMBER_DECIMALS: i32 = 2;

/// 四舍五入到指定小数位，并消除 -0.0
///
/// 放大后溢出的数值本身已无小数部分，原样返回
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// 数字转换器
pub struct NumberTransformer {
    words: NumberWords,
}

impl NumberTransformer {
    pub fn new() -> Self {
        Self {
            words: NumberWords::new(),
        }
    }

    /// 转换为规范数字（2 位小数）
    pub fn transform(&self, offset: &str, mode: NumberMode) -> Result<CanonicalValue, Rejection> {
        let cleaned = strip_quotes_and_whitespace(offset);
        let value = round_to(self.parse(&cleaned, mode)?, NUMBER_DECIMALS);
        if !value.is_finite() {
            return Err(Rejection::MalformedNumber(cleaned));
        }
        Ok(CanonicalValue::Number(value))
    }

    /// 解析已清理的字符串，返回未舍入的数值
    ///
    /// 百分比转换器复用此方法
    pub(crate) fn parse(&self, cleaned: &str, mode: NumberMode) -> Result<f64, Rejection> {
        if cleaned.is_empty() {
            return Err(Rejection::Empty);
        }

        // 词库检查在剥离 S/H 之前进行（"eins" 不能变成 "ein"）
        match NothingLexicon::classify(cleaned) {
            NothingMatch::Whole => return Ok(0.0),
            NothingMatch::Embedded => {
                return Err(Rejection::EmbeddedNothingWord(cleaned.to_string()))
            }
            NothingMatch::Absent => {}
        }

        if let Some(n) = self.words.lookup(cleaned) {
            return Ok(f64::from(n));
        }

        // 末尾借贷标记：S（Soll）为负，H（Haben）为正
        let (body, debit) = match cleaned.strip_suffix('S') {
            Some(rest) => (rest, true),
            None => (cleaned.strip_suffix('H').unwrap_or(cleaned), false),
        };

        if Self::is_dash_only(body) {
            return Ok(0.0);
        }

        let (digits, negative) = Self::split_sign(body, debit)?;
        let magnitude = Self::parse_magnitude(digits)?;

        let value = match mode {
            NumberMode::Relative if negative => -magnitude,
            _ => magnitude,
        };
        Ok(value)
    }

    /// 只由破折号（可夹杂逗号、点号）组成，如 `-`、`--`、`-,-`
    fn is_dash_only(text: &str) -> bool {
        text.chars().any(is_dash) && text.chars().all(|ch| is_dash(ch) || ch == ',' || ch == '.')
    }

    /// 剥离符号标记，返回 (数字部分, 是否为负)
    ///
    /// 负号标记：前导破折号、末尾破折号、括号、末尾 `S`；出现多个时无法判定
    fn split_sign(body: &str, debit: bool) -> Result<(&str, bool), Rejection> {
        let mut markers = usize::from(debit);
        let mut s = body.trim_matches(PLUS_CHARS);

        if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            markers += 1;
            s = inner.trim_matches(PLUS_CHARS);
        }
        if let Some(rest) = s.strip_prefix(is_dash) {
            markers += 1;
            s = rest;
        }
        if let Some(rest) = s.strip_suffix(is_dash) {
            markers += 1;
            s = rest;
        }

        if markers > 1 {
            return Err(Rejection::AmbiguousSign(body.to_string()));
        }
        Ok((s, markers == 1))
    }

    /// 解析无符号数字部分
    fn parse_magnitude(text: &str) -> Result<f64, Rejection> {
        let malformed = || Rejection::MalformedNumber(text.to_string());

        if !text.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(malformed());
        }

        let canonical = if INTEGER_RE.is_match(text) {
            text.to_string()
        } else if SINGLE_COMMA_RE.is_match(text) {
            // 单个逗号总是小数点
            text.replace(',', ".")
        } else if SINGLE_DOT_RE.is_match(text) {
            if DOT_THOUSAND_RE.is_match(text) {
                text.replace('.', "")
            } else {
                text.to_string()
            }
        } else if DOT_GROUPED_RE.is_match(text) {
            text.replace('.', "").replace(',', ".")
        } else if COMMA_GROUPED_RE.is_match(text) {
            text.replace(',', "")
        } else {
            return Err(malformed());
        };

        // 超出 f64 范围的数字串会被解析成 inf
        match canonical.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(malformed()),
        }
    }
}

impl Default for NumberTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(offset: &str, mode: NumberMode) -> Option<f64> {
        match NumberTransformer::new().transform(offset, mode) {
            Ok(CanonicalValue::Number(v)) => Some(v),
            Ok(other) => panic!("unexpected value {:?}", other),
            Err(_) => None,
        }
    }

    fn relative(offset: &str) -> Option<f64> {
        number(offset, NumberMode::Relative)
    }

    #[test]
    fn test_negative_notations() {
        for offset in ["-59,00", "59,00-", "59,00S", "(59,00)", "– 59,00"] {
            assert_eq!(relative(offset), Some(-59.0), "relative {}", offset);
            assert_eq!(number(offset, NumberMode::Absolute), Some(59.0), "absolute {}", offset);
        }
    }

    #[test]
    fn test_positive_markers_removed() {
        assert_eq!(relative("+59,00"), Some(59.0));
        assert_eq!(relative("59,00H"), Some(59.0));
        assert_eq!(relative("(+12)"), Some(-12.0));
    }

    #[test]
    fn test_separators() {
        assert_eq!(relative("1.000,00"), Some(1000.0));
        assert_eq!(relative("1,000.00"), Some(1000.0));
        assert_eq!(relative("1.000.000"), Some(1_000_000.0));
        assert_eq!(relative("1,000,000"), Some(1_000_000.0));
        assert_eq!(relative("1.000"), Some(1000.0));
        assert_eq!(relative("12.34"), Some(12.34));
        assert_eq!(relative("12,34"), Some(12.34));
        assert_eq!(relative("0.500"), Some(0.5));
        assert_eq!(relative(",5"), Some(0.5));
        assert_eq!(relative("1 234,5"), Some(1234.5));
        assert_eq!(relative("\"12\""), Some(12.0));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(relative("3,14159"), Some(3.14));
        let value = NumberTransformer::new()
            .transform("1.234,5", NumberMode::Relative)
            .unwrap();
        assert_eq!(value.to_export_string(), "1234.50");
    }

    #[test]
    fn test_dash_only_is_zero() {
        assert_eq!(relative("-"), Some(0.0));
        assert_eq!(relative("---"), Some(0.0));
        assert_eq!(relative("-,-"), Some(0.0));
        assert_eq!(relative("–.––"), Some(0.0));
    }

    #[test]
    fn test_negative_zero_renders_unsigned() {
        let value = NumberTransformer::new()
            .transform("-0,00", NumberMode::Relative)
            .unwrap();
        assert_eq!(value.to_export_string(), "0.00");
    }

    #[test]
    fn test_number_words() {
        assert_eq!(relative("zwölf"), Some(12.0));
        assert_eq!(relative("Eins"), Some(1.0));
        assert_eq!(relative("Three"), Some(3.0));
        assert_eq!(relative("dreizehn"), None);
    }

    #[test]
    fn test_nothing_lexicon() {
        for offset in ["NIL", "kein", "keinen", "keiner", "None"] {
            assert_eq!(relative(offset), Some(0.0), "{}", offset);
        }
        assert_eq!(relative("keine Angabe"), None);
        assert_eq!(relative("NILS"), None);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(relative("43.34.34"), None);
        assert_eq!(relative("1.23.456"), None);
        assert_eq!(relative("12a"), None);
        assert_eq!(relative("."), None);
        assert_eq!(relative(""), None);
        assert_eq!(relative("   "), None);
    }

    #[test]
    fn test_conflicting_signs_fail() {
        assert_eq!(relative("-5-"), None);
        assert_eq!(relative("(5)S"), None);
        assert_eq!(relative("-(5)"), None);
    }

    #[test]
    fn test_overflowing_digits_fail() {
        let huge = format!("1{}", "0".repeat(400));
        assert_eq!(relative(&huge), None);
        assert_eq!(relative(&format!("-{}", huge)), None);
        assert!(matches!(
            NumberTransformer::new().transform(&huge, NumberMode::Relative),
            Err(Rejection::MalformedNumber(_))
        ));
    }

    #[test]
    fn test_large_finite_values_survive_rounding() {
        // 乘以 100 会溢出，但数值本身有限
        let large = format!("1{}", "0".repeat(307));
        assert_eq!(relative(&large), Some(1e307));
        assert_eq!(round_to(f64::MAX, NUMBER_DECIMALS), f64::MAX);
    }
}
