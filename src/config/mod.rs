// Config System - 配置系统
//
// 职责：PieceTable 的可调参数（新增缓冲区分段、合并阈值），
//       只是纯数据，不参与编辑逻辑

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::buffer::{DEFAULT_COMPACT_THRESHOLD, DEFAULT_SEGMENT_SIZE};
use crate::error::ConfigError;

/// PieceTable 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// 新增缓冲区单个分段的字节数
    pub added_segment_size: usize,
    /// Piece数量超过此值时 `compact_if_needed` 执行合并
    pub compact_threshold: usize,
    /// Piece链初始容量
    pub span_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            added_segment_size: DEFAULT_SEGMENT_SIZE,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
            span_capacity: 16,
        }
    }
}

impl TableConfig {
    /// 从TOML文本解析
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded table config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.added_segment_size == 0 {
            return Err(ConfigError::Invalid("added_segment_size 必须大于 0".to_string()));
        }
        if self.compact_threshold == 0 {
            return Err(ConfigError::Invalid("compact_threshold 必须大于 0".to_string()));
        }
        Ok(())
    }
}
