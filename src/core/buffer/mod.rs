// Piece Table 缓冲区 - 文本缓冲区核心实现
//
// 职责：使用 Piece Table 数据结构管理文本内容，
//       两个只追加存储区 + 有序Piece链，支持只读快照

mod piece_table;
mod span;
mod store;
mod chunk_iter;
mod snapshot;

// 重新导出
pub use self::piece_table::PieceTable;
pub use self::span::Span;
pub use self::store::{BufferStore, Source};
pub use self::chunk_iter::Chunks;
pub use self::snapshot::Snapshot;

/// 新增缓冲区单个分段大小
pub const DEFAULT_SEGMENT_SIZE: usize = 64 * 1024; // 64KB

/// Piece数量合并阈值
pub const DEFAULT_COMPACT_THRESHOLD: usize = 1000;
