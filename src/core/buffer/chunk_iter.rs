// 流式迭代器
//
// 职责：按Piece借用读取文档区间，不复制字节，
//       只访问与区间重叠的Piece

use crate::core::buffer::span::{Span, SpanSequence};
use crate::core::buffer::store::BufferStore;
use crate::error::{PieceTableError, Result};

/// 文档区间 `[start, end)` 的借用切片迭代器
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    store: &'a BufferStore,
    spans: &'a [Span],
    index: usize,     // 当前Piece
    skip: usize,      // 当前Piece内已消费的字节
    remaining: usize, // 还需输出的字节
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(
        store: &'a BufferStore,
        sequence: &'a SpanSequence,
        start: usize,
        end: usize,
    ) -> Result<Self> {
        let len = sequence.len();
        if start > end || end > len {
            return Err(PieceTableError::out_of_range(start, end, len));
        }

        // 二分定位第一个重叠的Piece，之前的Piece不会被访问
        let (index, skip) = match sequence.index_containing(start) {
            Some(index) if start < end => (index, start - sequence.start_of(index)),
            _ => (sequence.span_count(), 0),
        };

        Ok(Self {
            store,
            spans: sequence.spans(),
            index,
            skip,
            remaining: end - start,
        })
    }

    /// 整个文档，区间恒合法
    pub(crate) fn whole(store: &'a BufferStore, sequence: &'a SpanSequence) -> Self {
        Self {
            store,
            spans: sequence.spans(),
            index: 0,
            skip: 0,
            remaining: sequence.len(),
        }
    }

    /// 剩余字节数
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let span = self.spans.get(self.index)?;
        let want = (span.length - self.skip).min(self.remaining);

        // 新增缓冲区在分段边界处可能只返回一部分
        let chunk = self.store.prefix(span.source, span.offset + self.skip, want);
        if chunk.is_empty() {
            self.remaining = 0;
            return None;
        }

        self.skip += chunk.len();
        self.remaining -= chunk.len();
        if self.skip == span.length {
            self.index += 1;
            self.skip = 0;
        }

        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            (0, Some(0))
        } else {
            (1, Some(self.remaining))
        }
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
