// Editor Core - 编辑器核心
//
// 职责：管理 Piece Table 缓冲区；
//       光标、渲染、输入由外部前端负责，只通过文档偏移调用本模块

pub mod buffer;

pub use buffer::{PieceTable, Snapshot, Span, Source};
