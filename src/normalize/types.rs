//! 规范化类型定义

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// 标签数据类型
///
/// 每个标签在训练时固定一种数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 文本（原样输出，仅做清理）
    #[default]
    #[serde(alias = "Text")]
    Text,
    /// 数字
    #[serde(alias = "Number")]
    Number,
    /// 百分比
    #[serde(alias = "Percentage")]
    Percentage,
    /// 日期
    #[serde(alias = "Date")]
    Date,
    /// 布尔值
    #[serde(alias = "True/False", alias = "Boolean")]
    Boolean,
}

impl DataType {
    /// 解析服务端标签的显示名称
    ///
    /// `Positive Number` 对应 `Number` + 绝对值模式
    pub fn from_display_name(name: &str) -> Option<(DataType, Option<NumberMode>)> {
        match name.trim().to_lowercase().as_str() {
            "text" => Some((DataType::Text, None)),
            "number" => Some((DataType::Number, None)),
            "positive number" => Some((DataType::Number, Some(NumberMode::Absolute))),
            "percentage" => Some((DataType::Percentage, None)),
            "date" => Some((DataType::Date, None)),
            "boolean" | "true/false" => Some((DataType::Boolean, None)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Percentage => "percentage",
            DataType::Date => "date",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 数字符号处理模式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum NumberMode {
    /// 保留符号（默认）
    #[default]
    Relative,
    /// 丢弃符号，只保留数值大小
    Absolute,
}

/// 规范值
///
/// JSON 中按类型输出（number / string / boolean），CSV 中统一输出字符串
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// 数字，保留 2 位小数
    Number(f64),
    /// 百分比（小数形式），保留 4 位小数
    Percentage(f64),
    /// ISO 日期 `YYYY-MM-DD`，年份缺失时为 `0000`
    Date(String),
    Boolean(bool),
    Text(String),
}

impl CanonicalValue {
    /// CSV/Excel 导出使用的字符串形式
    pub fn to_export_string(&self) -> String {
        match self {
            CanonicalValue::Number(v) => format!("{:.2}", v),
            CanonicalValue::Percentage(v) => format!("{:.4}", v),
            CanonicalValue::Date(d) => d.clone(),
            CanonicalValue::Boolean(b) => b.to_string(),
            CanonicalValue::Text(t) => t.clone(),
        }
    }

    /// 对应的数据类型
    pub fn data_type(&self) -> DataType {
        match self {
            CanonicalValue::Number(_) => DataType::Number,
            CanonicalValue::Percentage(_) => DataType::Percentage,
            CanonicalValue::Date(_) => DataType::Date,
            CanonicalValue::Boolean(_) => DataType::Boolean,
            CanonicalValue::Text(_) => DataType::Text,
        }
    }
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CanonicalValue::Number(v) | CanonicalValue::Percentage(v) => serializer.serialize_f64(*v),
            CanonicalValue::Date(s) | CanonicalValue::Text(s) => serializer.serialize_str(s),
            CanonicalValue::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_export_string())
    }
}

/// 拒绝原因（仅用于日志，不参与序列化）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("空字符串")]
    Empty,
    #[error("包含\"无值\"词但不是整个字符串: {0}")]
    EmbeddedNothingWord(String),
    #[error("符号标记冲突: {0}")]
    AmbiguousSign(String),
    #[error("无法识别的数字格式: {0}")]
    MalformedNumber(String),
    #[error("无法识别的日期格式: {0}")]
    MalformedDate(String),
    #[error("日期不存在: {0}")]
    InvalidDate(String),
    #[error("首个词不是信号词: {0}")]
    UnknownSignalWord(String),
    #[error("词数过多 ({0} > 2)")]
    TooManyTokens(usize),
}

/// 规范化结果
///
/// 二元结果：要么完整转换，要么整体标记为“不可机读”
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationResult {
    /// 是否可机读
    pub convertible: bool,
    /// 规范值，失败时为 null
    pub canonical_value: Option<CanonicalValue>,
    /// 失败原因
    #[serde(skip)]
    pub rejection: Option<Rejection>,
}

impl NormalizationResult {
    /// 转换成功
    pub fn converted(value: CanonicalValue) -> Self {
        Self {
            convertible: true,
            canonical_value: Some(value),
            rejection: None,
        }
    }

    /// 不可机读
    pub fn not_machine_readable(rejection: Rejection) -> Self {
        Self {
            convertible: false,
            canonical_value: None,
            rejection: Some(rejection),
        }
    }

    /// CSV 单元格内容，失败时为空
    pub fn export_string(&self) -> String {
        self.canonical_value
            .as_ref()
            .map(CanonicalValue::to_export_string)
            .unwrap_or_default()
    }
}

impl From<Result<CanonicalValue, Rejection>> for NormalizationResult {
    fn from(outcome: Result<CanonicalValue, Rejection>) -> Self {
        match outcome {
            Ok(value) => Self::converted(value),
            Err(rejection) => Self::not_machine_readable(rejection),
        }
    }
}
