//! 日期转换器
//!
//! 输出 ISO 日期 `YYYY-MM-DD`。识别优先级：
//! 1. ISO 日期 / 日期时间（丢弃时间部分）
//! 2. 书面月份（德语/英语）
//! 3. 数字分组（日在前；首组四位时为年-月-日）
//!
//! 缺年份补 `0000`，缺日补 `01`，只有年份补 `01-01`

use chrono::NaiveDate;
use regex::Regex;

use crate::normalize::cleanup::{trim_and_collapse, Token, TokenType, Tokenizer};
use crate::normalize::rules::MonthNames;
use crate::normalize::types::{CanonicalValue, Rejection};

lazy_static::lazy_static! {
    static ref ISO_RE: Regex = Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})(?:[T ]\d{2}:\d{2}(?::\d{2}(?:[.,]\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$"
    )
    .unwrap();
}

/// 两位年份的世纪分界（POSIX `%y` 约定：00-68 → 20xx，69-99 → 19xx）
pub const DEFAULT_CENTURY_PIVOT: u32 = 69;

/// 数字日期允许的分隔符
const DATE_SEPARATORS: &[char] = &['.', '/', '-'];

/// 书面日期中允许出现的标点
const WRITTEN_PUNCTUATION: &[char] = &['.', ',', '/', '-'];

/// 英语序数后缀（`1st`、`22nd`）
const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th"];

/// 日期转换器
pub struct DateTransformer {
    months: MonthNames,
    century_pivot: u32,
}

impl DateTransformer {
    /// # Arguments
    /// * `century_pivot` - 两位年份小于该值归入 2000 年代，否则归入 1900 年代
    pub fn new(century_pivot: u32) -> Self {
        Self {
            months: MonthNames::new(),
            century_pivot,
        }
    }

    pub fn transform(&self, offset: &str) -> Result<CanonicalValue, Rejection> {
        let text = trim_and_collapse(offset);
        if text.is_empty() {
            return Err(Rejection::Empty);
        }

        // 1. ISO 日期或日期时间
        if let Some(caps) = ISO_RE.captures(&text) {
            let year = caps[1].parse::<i32>().ok();
            let month = caps[2].parse::<u32>().ok();
            let day = caps[3].parse::<u32>().ok();
            return match (year, month, day) {
                (Some(y), Some(m), Some(d)) => Self::assemble(&text, y, m, d),
                _ => Err(Rejection::MalformedDate(text.clone())),
            };
        }

        let tokens = Tokenizer::tokenize(&text);

        // 2. 书面月份
        if tokens.iter().any(|t| t.token_type == TokenType::Letters) {
            return self.parse_written(&text, &tokens);
        }

        // 3. 数字分组
        self.parse_numeric(&text, &tokens)
    }

    /// 解析含书面月份的日期，如 `1. November 2019`、`Nov. 2019`、`November 1, 2019`
    fn parse_written(&self, text: &str, tokens: &[Token]) -> Result<CanonicalValue, Rejection> {
        let malformed = || Rejection::MalformedDate(text.to_string());

        let mut month: Option<u32> = None;
        let mut numbers: Vec<&str> = Vec::new();
        let mut prev: Option<TokenType> = None;

        for token in tokens {
            match token.token_type {
                TokenType::Letters => {
                    let is_ordinal = prev == Some(TokenType::Digits)
                        && ORDINAL_SUFFIXES.contains(&token.text.to_lowercase().as_str());
                    if !is_ordinal {
                        let m = self.months.lookup(&token.text).ok_or_else(malformed)?;
                        if month.replace(m).is_some() {
                            return Err(malformed());
                        }
                    }
                }
                TokenType::Digits => numbers.push(&token.text),
                TokenType::Symbol => {
                    if !token.text.chars().all(|ch| WRITTEN_PUNCTUATION.contains(&ch)) {
                        return Err(malformed());
                    }
                }
                TokenType::Whitespace => {}
            }
            prev = Some(token.token_type);
        }

        let month = month.ok_or_else(malformed)?;

        let (day, year) = match numbers.as_slice() {
            [] => (1, 0),
            [single] if single.len() == 4 => (1, self.expand_year(single).ok_or_else(malformed)?),
            [single] => (Self::parse_day_or_month(single).ok_or_else(malformed)?, 0),
            [first, second] => {
                // 四位数为年份，另一个为日；都不是四位时按 日 + 两位年份
                let (day_str, year_str) = if first.len() == 4 {
                    (second, first)
                } else {
                    (first, second)
                };
                (
                    Self::parse_day_or_month(day_str).ok_or_else(malformed)?,
                    self.expand_year(year_str).ok_or_else(malformed)?,
                )
            }
            _ => return Err(malformed()),
        };

        Self::assemble(text, year, month, day)
    }

    /// 解析纯数字日期，如 `01.11.2019`、`/04.12.`、`2001`、`011119`
    fn parse_numeric(&self, text: &str, tokens: &[Token]) -> Result<CanonicalValue, Rejection> {
        let malformed = || Rejection::MalformedDate(text.to_string());

        let mut groups: Vec<&str> = Vec::new();
        let mut separators: Vec<char> = Vec::new();
        // 两个数字组之间的分隔符（已去掉空白）
        let mut pending: Option<String> = None;

        for token in tokens {
            match token.token_type {
                TokenType::Digits => {
                    if let Some(sep) = pending.take() {
                        if !groups.is_empty() {
                            let mut chars = sep.chars();
                            match (chars.next(), chars.next()) {
                                (Some(ch), None) => separators.push(ch),
                                // 仅空白分隔
                                (None, _) => separators.push(' '),
                                _ => return Err(malformed()),
                            }
                        }
                    } else if !groups.is_empty() {
                        return Err(malformed());
                    }
                    groups.push(&token.text);
                }
                TokenType::Symbol => {
                    if !token.text.chars().all(|ch| DATE_SEPARATORS.contains(&ch)) {
                        return Err(malformed());
                    }
                    pending.get_or_insert_with(String::new).push_str(&token.text);
                }
                TokenType::Whitespace => {
                    pending.get_or_insert_with(String::new);
                }
                TokenType::Letters => return Err(malformed()),
            }
        }

        // 分隔符必须一致（首尾多余的分隔符忽略）
        if separators.windows(2).any(|w| w[0] != w[1]) {
            return Err(malformed());
        }

        let (year, month, day) = match groups.as_slice() {
            [single] => self.parse_compact(single).ok_or_else(malformed)?,
            [first, second] => match (first.len(), second.len()) {
                (4, 1..=2) => (
                    self.expand_year(first).ok_or_else(malformed)?,
                    Self::parse_day_or_month(second).ok_or_else(malformed)?,
                    1,
                ),
                (1..=2, 4) => (
                    self.expand_year(second).ok_or_else(malformed)?,
                    Self::parse_day_or_month(first).ok_or_else(malformed)?,
                    1,
                ),
                (1..=2, 1..=2) => (
                    0,
                    Self::parse_day_or_month(second).ok_or_else(malformed)?,
                    Self::parse_day_or_month(first).ok_or_else(malformed)?,
                ),
                _ => return Err(malformed()),
            },
            [first, second, third] => {
                let ymd_order = first.len() == 4;
                let (y, m, d) = if ymd_order {
                    (first, second, third)
                } else {
                    (third, second, first)
                };
                if !ymd_order && y.len() != 2 && y.len() != 4 {
                    return Err(malformed());
                }
                if m.len() > 2 || d.len() > 2 {
                    return Err(malformed());
                }
                (
                    self.expand_year(y).ok_or_else(malformed)?,
                    Self::parse_day_or_month(m).ok_or_else(malformed)?,
                    Self::parse_day_or_month(d).ok_or_else(malformed)?,
                )
            }
            _ => return Err(malformed()),
        };

        Self::assemble(text, year, month, day)
    }

    /// 无分隔符的数字串
    ///
    /// - 4 位：年份
    /// - 6 位：DDMMYY
    /// - 8 位：DDMMYYYY，不合法时再尝试 YYYYMMDD
    fn parse_compact(&self, digits: &str) -> Option<(i32, u32, u32)> {
        match digits.len() {
            4 => Some((self.expand_year(digits)?, 1, 1)),
            6 => Some((
                self.expand_year(&digits[4..6])?,
                digits[2..4].parse().ok()?,
                digits[0..2].parse().ok()?,
            )),
            8 => {
                let dmy: (i32, u32, u32) = (
                    digits[4..8].parse().ok()?,
                    digits[2..4].parse().ok()?,
                    digits[0..2].parse().ok()?,
                );
                if Self::is_valid(dmy.0, dmy.1, dmy.2) {
                    return Some(dmy);
                }
                Some((
                    digits[0..4].parse().ok()?,
                    digits[4..6].parse().ok()?,
                    digits[6..8].parse().ok()?,
                ))
            }
            _ => None,
        }
    }

    /// 年份：四位原样，两位按世纪分界补全
    fn expand_year(&self, digits: &str) -> Option<i32> {
        let value: u32 = digits.parse().ok()?;
        match digits.len() {
            4 => i32::try_from(value).ok(),
            2 => {
                let century = if value < self.century_pivot { 2000 } else { 1900 };
                i32::try_from(century + value).ok()
            }
            _ => None,
        }
    }

    /// 日或月：1-2 位数字
    fn parse_day_or_month(digits: &str) -> Option<u32> {
        if digits.is_empty() || digits.len() > 2 {
            return None;
        }
        digits.parse().ok()
    }

    fn is_valid(year: i32, month: u32, day: u32) -> bool {
        NaiveDate::from_ymd_opt(year, month, day).is_some()
    }

    /// 校验并输出 ISO 日期
    ///
    /// 年份 0000 在公历外推中是闰年，因此缺年份的 `29.02.` 可以通过
    fn assemble(text: &str, year: i32, month: u32, day: u32) -> Result<CanonicalValue, Rejection> {
        if !Self::is_valid(year, month, day) {
            return Err(Rejection::InvalidDate(text.to_string()));
        }
        Ok(CanonicalValue::Date(format!(
            "{:04}-{:02}-{:02}",
            year, month, day
        )))
    }
}

impl Default for DateTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_CENTURY_PIVOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(offset: &str) -> Option<String> {
        DateTransformer::default()
            .transform(offset)
            .ok()
            .map(|v| v.to_export_string())
    }

    fn assert_date(offset: &str, expected: &str) {
        assert_eq!(date(offset).as_deref(), Some(expected), "input {:?}", offset);
    }

    #[test]
    fn test_iso_passthrough() {
        assert_date("2019-11-01", "2019-11-01");
        assert_date("2019-11-01T13:45:00", "2019-11-01");
        assert_date("2019-11-01 13:45", "2019-11-01");
        assert_date("2019-11-01T13:45:00.123+01:00", "2019-11-01");
        assert_eq!(date("2019-02-30"), None);
    }

    #[test]
    fn test_written_month() {
        assert_date("1. November 2019", "2019-11-01");
        assert_date("November 2019", "2019-11-01");
        assert_date("Nov. 2019", "2019-11-01");
        assert_date("November 1, 2019", "2019-11-01");
        assert_date("3. März 2020", "2020-03-03");
        assert_date("1st November 2019", "2019-11-01");
        assert_date("24. Dezember", "0000-12-24");
        assert_date("1. Nov 19", "2019-11-01");
    }

    #[test]
    fn test_written_month_rejects_unknown_words() {
        assert_eq!(date("1. Movember 2019"), None);
        assert_eq!(date("November Dezember 2019"), None);
        assert_eq!(date("31. November 2019"), None);
    }

    #[test]
    fn test_numeric_day_first() {
        assert_date("01.11.2019", "2019-11-01");
        assert_date("1.11.2019", "2019-11-01");
        assert_date("01/11/2019", "2019-11-01");
        assert_date("01. 11. 2019", "2019-11-01");
        assert_date("2019/11/01", "2019-11-01");
    }

    #[test]
    fn test_missing_parts_defaulted() {
        assert_date("2001", "2001-01-01");
        assert_date("/04.12.", "0000-12-04");
        assert_date("11.2019", "2019-11-01");
        assert_date("2019-11", "2019-11-01");
        assert_date("29.02.", "0000-02-29");
    }

    #[test]
    fn test_two_digit_years() {
        assert_date("011119", "2019-11-01");
        assert_date("01.11.19", "2019-11-01");
        assert_date("01.11.85", "1985-11-01");
        assert_date("01.11.68", "2068-11-01");
        assert_date("01.11.69", "1969-11-01");
    }

    #[test]
    fn test_custom_pivot() {
        let transformer = DateTransformer::new(30);
        let value = transformer.transform("01.11.45").unwrap();
        assert_eq!(value, CanonicalValue::Date("1945-11-01".to_string()));
    }

    #[test]
    fn test_compact_eight_digits() {
        assert_date("01112019", "2019-11-01");
        assert_date("20191101", "2019-11-01");
    }

    #[test]
    fn test_malformed_groupings() {
        assert_eq!(date("14132020"), None);
        assert_eq!(date("23.0K.2010"), None);
        assert_eq!(date("30.07.2.90"), None);
        assert_eq!(date("01.11/2019"), None);
        assert_eq!(date("01..11.2019"), None);
        assert_eq!(date("123.11.2019"), None);
        assert_eq!(date("12"), None);
        assert_eq!(date(""), None);
    }

    #[test]
    fn test_long_digit_runs_fail() {
        let run = "1".repeat(400);
        assert_eq!(date(&run), None);
        assert_eq!(date(&format!("01.11.{}", run)), None);
        assert_eq!(date(&format!("{}.11.2019", run)), None);
        assert_eq!(date(&format!("{}. November", run)), None);
    }
}
