// 规范化配置
//
// 可调的词表与策略：布尔信号词、两位年份世纪分界、默认数字模式
// 以 JSON 保存在用户配置目录下

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::normalize::date::DEFAULT_CENTURY_PIVOT;
use crate::normalize::rules::SignalWords;
use crate::normalize::types::NumberMode;

/// 配置目录名
const APP_DIR: &str = "Konfuzio";
/// 配置文件名
const CONFIG_FILE: &str = "normalization.json";

// ============================================================================
// 布尔信号词
// ============================================================================

/// 布尔信号词配置（大小写不敏感）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanConfig {
    /// 肯定信号词
    #[serde(default = "default_yes_list")]
    pub yes_list: Vec<String>,
    /// 否定信号词
    #[serde(default = "default_no_list")]
    pub no_list: Vec<String>,
}

fn default_yes_list() -> Vec<String> {
    ["VORHANDEN", "JA", "MIT", "YES"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_no_list() -> Vec<String> {
    ["NEIN", "NICHT", "KEIN", "OHNE", "NO"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for BooleanConfig {
    fn default() -> Self {
        Self {
            yes_list: default_yes_list(),
            no_list: default_no_list(),
        }
    }
}

impl BooleanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.yes_list.iter().all(|w| w.trim().is_empty()) {
            anyhow::bail!("肯定信号词表不能为空");
        }
        if self.no_list.iter().all(|w| w.trim().is_empty()) {
            anyhow::bail!("否定信号词表不能为空");
        }

        let yes: HashSet<String> = self.yes_list.iter().map(|w| w.trim().to_uppercase()).collect();
        let overlap: Vec<&String> = self
            .no_list
            .iter()
            .filter(|w| yes.contains(&w.trim().to_uppercase()))
            .collect();
        if !overlap.is_empty() {
            anyhow::bail!("信号词同时出现在肯定和否定词表中: {:?}", overlap);
        }
        Ok(())
    }
}

// ============================================================================
// 日期
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateConfig {
    /// 两位年份世纪分界：小于该值 → 20xx，否则 → 19xx
    #[serde(default = "default_century_pivot")]
    pub century_pivot: u32,
}

fn default_century_pivot() -> u32 {
    DEFAULT_CENTURY_PIVOT
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            century_pivot: default_century_pivot(),
        }
    }
}

// ============================================================================
// 数字
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberConfig {
    /// 调用方未指定模式时使用
    #[serde(default)]
    pub default_mode: NumberMode,
}

// ============================================================================
// 总配置
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    #[serde(default)]
    pub boolean: BooleanConfig,
    #[serde(default)]
    pub date: DateConfig,
    #[serde(default)]
    pub number: NumberConfig,
}

impl NormalizationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认配置路径（不创建目录）
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        self.boolean.validate()?;
        if self.date.century_pivot > 99 {
            anyhow::bail!(
                "世纪分界必须在 0-99 之间，当前为 {}",
                self.date.century_pivot
            );
        }
        Ok(())
    }

    /// 从指定路径加载并校验
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("读取配置文件失败 {:?}: {}", path, e))?;
        let config: NormalizationConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("解析配置文件失败 {:?}: {}", path, e))?;
        config.validate()?;

        Ok(config)
    }

    /// 加载配置
    ///
    /// - 显式路径：必须存在
    /// - 未指定：默认路径存在则加载，否则返回默认配置
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("配置文件不存在，使用默认配置: {:?}", path);
            Ok(Self::new())
        }
    }

    /// 保存到指定路径
    ///
    /// 先写同目录下的临时文件，再重命名覆盖目标，目标文件不会处于半写状态
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("创建配置目录失败: {:?}", parent))?;
        }

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("写入临时文件失败: {:?}", temp_path))?;

        if let Err(e) = std::fs::rename(&temp_path, path) {
            if let Err(cleanup_err) = std::fs::remove_file(&temp_path) {
                tracing::warn!("清理临时文件失败 {:?}: {}", temp_path, cleanup_err);
            }
            return Err(anyhow::Error::new(e).context(format!("替换配置文件失败: {:?}", path)));
        }

        tracing::info!("配置已保存: {:?}", path);
        Ok(())
    }

    /// 写出默认配置，供用户在此基础上修改
    ///
    /// 目标已存在且未指定 `overwrite` 时报错
    pub fn init(path: &Path, overwrite: bool) -> Result<Self> {
        if path.exists() && !overwrite {
            anyhow::bail!("配置文件已存在: {:?}（使用 --force 覆盖）", path);
        }
        let config = Self::new();
        config.save_to(path)?;
        Ok(config)
    }

    /// 构建布尔信号词表
    pub fn signal_words(&self) -> SignalWords {
        SignalWords::new(&self.boolean.yes_list, &self.boolean.no_list)
    }
}
