// 标注导出
//
// 批量规范化标注并导出：
// - CSV/Excel：规范值一律为字符串，失败为空单元格
// - JSON：规范值按类型输出（number / string / boolean），失败为 null

use anyhow::Result;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

use crate::normalize::{CanonicalValue, DataType, NormalizationEngine, NormalizationResult, NumberMode};

/// CSV 列
const CSV_HEADER: [&str; 10] = [
    "id",
    "document_id",
    "label",
    "data_type",
    "offset_string",
    "start_offset",
    "end_offset",
    "page_number",
    "convertible",
    "normalized",
];

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// 标签数据类型（接受服务端显示名称，如 `Positive Number`、`True/False`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelType {
    pub data_type: DataType,
    /// 数据类型本身隐含的数字模式
    pub mode: Option<NumberMode>,
}

impl LabelType {
    pub fn name(&self) -> &'static str {
        match (self.data_type, self.mode) {
            (DataType::Number, Some(NumberMode::Absolute)) => "positive number",
            (data_type, _) => data_type.as_str(),
        }
    }
}

impl Serialize for LabelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for LabelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        DataType::from_display_name(&name)
            .map(|(data_type, mode)| LabelType { data_type, mode })
            .ok_or_else(|| de::Error::custom(format!("未知的数据类型: {}", name)))
    }
}

/// 标注记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub document_id: Option<u64>,
    /// 标签名称
    pub label: String,
    #[serde(default)]
    pub data_type: LabelType,
    /// 显式指定的数字模式，优先于数据类型隐含的模式
    #[serde(default)]
    pub mode: Option<NumberMode>,
    /// 标注的原始文本
    pub offset_string: String,
    #[serde(default)]
    pub start_offset: Option<usize>,
    #[serde(default)]
    pub end_offset: Option<usize>,
    #[serde(default)]
    pub page_number: Option<u32>,
}

impl Annotation {
    /// 实际使用的数字模式
    pub fn effective_mode(&self) -> Option<NumberMode> {
        self.mode.or(self.data_type.mode)
    }
}

/// 规范化后的标注
#[derive(Debug, Clone)]
pub struct NormalizedAnnotation {
    pub annotation: Annotation,
    pub result: NormalizationResult,
}

/// JSON 导出行
#[derive(Serialize)]
struct ExportRow<'a> {
    id: Option<u64>,
    document_id: Option<u64>,
    label: &'a str,
    data_type: LabelType,
    offset_string: &'a str,
    start_offset: Option<usize>,
    end_offset: Option<usize>,
    page_number: Option<u32>,
    convertible: bool,
    normalized: Option<&'a CanonicalValue>,
}

impl<'a> From<&'a NormalizedAnnotation> for ExportRow<'a> {
    fn from(item: &'a NormalizedAnnotation) -> Self {
        let a = &item.annotation;
        Self {
            id: a.id,
            document_id: a.document_id,
            label: &a.label,
            data_type: a.data_type,
            offset_string: &a.offset_string,
            start_offset: a.start_offset,
            end_offset: a.end_offset,
            page_number: a.page_number,
            convertible: item.result.convertible,
            normalized: item.result.canonical_value.as_ref(),
        }
    }
}

/// 从 JSON 文件读取标注列表
pub fn load_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("读取标注文件失败 {:?}: {}", path, e))?;
    parse_annotations(&content)
}

/// 解析 JSON 标注列表
pub fn parse_annotations(content: &str) -> Result<Vec<Annotation>> {
    serde_json::from_str(content).map_err(|e| anyhow::anyhow!("解析标注失败: {}", e))
}

/// 批量规范化
pub fn normalize_annotations(
    engine: &NormalizationEngine,
    annotations: Vec<Annotation>,
) -> Vec<NormalizedAnnotation> {
    let items: Vec<NormalizedAnnotation> = annotations
        .into_iter()
        .map(|annotation| {
            let result = engine.normalize(
                &annotation.offset_string,
                annotation.data_type.data_type,
                annotation.effective_mode(),
            );
            NormalizedAnnotation { annotation, result }
        })
        .collect();

    let rejected = items.iter().filter(|i| !i.result.convertible).count();
    tracing::info!(
        "Export: 共 {} 条标注，其中 {} 条不可机读",
        items.len(),
        rejected
    );
    for item in items.iter().filter(|i| !i.result.convertible) {
        tracing::warn!(
            "Export: 标注需要人工确认 [id={:?}, label={}, offset={:?}]",
            item.annotation.id,
            item.annotation.label,
            item.annotation.offset_string
        );
    }

    items
}

/// JSON 导出（类型化）
pub fn to_json(items: &[NormalizedAnnotation]) -> Result<String> {
    let rows: Vec<ExportRow> = items.iter().map(ExportRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// CSV 导出（全部为字符串）
pub fn to_csv(items: &[NormalizedAnnotation]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str("\r\n");

    let opt = |v: Option<String>| v.unwrap_or_default();

    for item in items {
        let a = &item.annotation;
        let cells = [
            opt(a.id.map(|v| v.to_string())),
            opt(a.document_id.map(|v| v.to_string())),
            a.label.clone(),
            a.data_type.name().to_string(),
            a.offset_string.clone(),
            opt(a.start_offset.map(|v| v.to_string())),
            opt(a.end_offset.map(|v| v.to_string())),
            opt(a.page_number.map(|v| v.to_string())),
            item.result.convertible.to_string(),
            item.result.export_string(),
        ];

        let line: Vec<String> = cells.iter().map(|c| escape_csv(c)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }

    out
}

/// 按指定格式导出
pub fn render(items: &[NormalizedAnnotation], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(items),
        ExportFormat::Csv => Ok(to_csv(items)),
    }
}

/// RFC 4180 转义
fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": 1, "label": "Betrag", "data_type": "Number", "offset_string": "1.234,50-"},
        {"id": 2, "label": "Rabatt", "data_type": "percentage", "offset_string": "12,34 %"},
        {"id": 3, "label": "Datum", "data_type": "Date", "offset_string": "1. November 2019"},
        {"id": 4, "label": "Versichert", "data_type": "True/False", "offset_string": "versichert ja"},
        {"id": 5, "label": "Netto", "data_type": "Positive Number", "offset_string": "(59,00)"}
    ]"#;

    fn normalized() -> Vec<NormalizedAnnotation> {
        let engine = NormalizationEngine::default();
        normalize_annotations(&engine, parse_annotations(SAMPLE).unwrap())
    }

    #[test]
    fn test_parse_display_names() {
        let annotations = parse_annotations(SAMPLE).unwrap();
        assert_eq!(annotations[3].data_type.data_type, DataType::Boolean);
        assert_eq!(annotations[4].data_type.data_type, DataType::Number);
        assert_eq!(annotations[4].effective_mode(), Some(NumberMode::Absolute));
        assert_eq!(annotations[0].effective_mode(), None);
    }

    #[test]
    fn test_unknown_data_type_rejected() {
        let err = parse_annotations(r#"[{"label": "x", "data_type": "Currency", "offset_string": "1"}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_explicit_mode_overrides_label_type() {
        let mut annotations = parse_annotations(SAMPLE).unwrap();
        annotations[4].mode = Some(NumberMode::Relative);
        assert_eq!(annotations[4].effective_mode(), Some(NumberMode::Relative));
    }

    #[test]
    fn test_json_export_is_typed() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&normalized()).unwrap()).unwrap();
        assert_eq!(json[0]["normalized"], serde_json::json!(-1234.5));
        assert_eq!(json[1]["normalized"], serde_json::json!(0.1234));
        assert_eq!(json[2]["normalized"], serde_json::json!("2019-11-01"));
        assert!(json[3]["normalized"].is_null());
        assert_eq!(json[3]["convertible"], serde_json::json!(false));
        assert_eq!(json[4]["normalized"], serde_json::json!(59.0));
        assert_eq!(json[4]["data_type"], serde_json::json!("positive number"));
    }

    #[test]
    fn test_csv_export_is_string() {
        let csv = to_csv(&normalized());
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(lines[1], "1,,Betrag,number,\"1.234,50-\",,,,true,-1234.50");
        assert!(lines[2].ends_with(",true,0.1234"));
        assert!(lines[3].ends_with(",true,2019-11-01"));
        assert!(lines[4].ends_with(",false,"));
        assert!(lines[5].ends_with(",true,59.00"));
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("1,5"), "\"1,5\"");
        assert_eq!(escape_csv("say \"ja\""), "\"say \"\"ja\"\"\"");
    }

    #[test]
    fn test_render_formats() {
        let items = normalized();
        assert!(render(&items, ExportFormat::Csv).unwrap().starts_with("id,"));
        assert!(render(&items, ExportFormat::Json).unwrap().starts_with('['));
    }
}
