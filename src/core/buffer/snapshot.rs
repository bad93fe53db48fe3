// 只读快照
//
// 职责：冻结某一时刻的Piece链，与写入方共享存储区，
//       可跨线程并发读取

use std::fmt;

use crate::core::buffer::{
    chunk_iter::Chunks,
    piece_table::collect_chunks,
    span::{Span, SpanSequence},
    store::BufferStore,
};
use crate::error::Result;

/// PieceTable 的冻结视图
///
/// 存储区只追加，因此快照持有的偏移永远有效；之后对原表的编辑不会影响它。
#[derive(Debug, Clone)]
pub struct Snapshot {
    store: BufferStore,
    spans: SpanSequence,
}

impl Snapshot {
    pub(crate) fn new(store: BufferStore, spans: SpanSequence) -> Self {
        Self { store, spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn span_count(&self) -> usize {
        self.spans.span_count()
    }

    pub fn spans(&self) -> impl ExactSizeIterator<Item = Span> + '_ {
        self.spans.spans().iter().copied()
    }

    pub fn text(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        self.chunks(start, end).map(collect_chunks)
    }

    pub fn render(&self) -> Vec<u8> {
        collect_chunks(Chunks::whole(&self.store, &self.spans))
    }

    pub fn chunks(&self, start: usize, end: usize) -> Result<Chunks<'_>> {
        Chunks::new(&self.store, &self.spans, start, end)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.render()))
    }
}
