// 错误类型
//
// 职责：定义 PieceTable 与配置加载的错误，
//       所有错误在修改状态之前检测并直接返回给调用方

use thiserror::Error;

/// PieceTable 操作错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PieceTableError {
    /// 位置或范围超出文档（或存储区）边界
    #[error("范围 {start}..{end} 超出长度 {len}")]
    OutOfRange { start: usize, end: usize, len: usize },

    /// 向新增缓冲区追加空字节串
    #[error("不能追加空内容")]
    EmptyAppend,
}

impl PieceTableError {
    pub(crate) fn out_of_range(start: usize, end: usize, len: usize) -> Self {
        PieceTableError::OutOfRange { start, end, len }
    }
}

/// PieceTable 操作结果
pub type Result<T> = std::result::Result<T, PieceTableError>;

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("配置无效: {0}")]
    Invalid(String),
}
