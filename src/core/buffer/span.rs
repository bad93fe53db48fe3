// Piece链与位置解析
//
// 职责：维护有序的Piece（Span）序列及累积偏移缓存，
//       把文档偏移解析为切点，并在切点处分裂Piece

use std::ops::Range;

use tracing::trace;

use crate::core::buffer::store::Source;
use crate::error::{PieceTableError, Result};

/// Piece描述符：某个存储区中的一段连续字节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub source: Source,
    pub offset: usize, // 在相应存储区中的起始位置
    pub length: usize, // 长度（字节）
}

impl Span {
    pub fn new(source: Source, offset: usize, length: usize) -> Self {
        Self { source, offset, length }
    }

    /// 在局部偏移k处切成两段，要求 0 < k < length
    pub(crate) fn split_at(self, k: usize) -> (Span, Span) {
        debug_assert!(k > 0 && k < self.length);
        (
            Span::new(self.source, self.offset, k),
            Span::new(self.source, self.offset + k, self.length - k),
        )
    }

    /// b是否紧接在self之后（同一存储区且偏移连续）
    pub(crate) fn is_followed_by(&self, b: &Span) -> bool {
        self.source == b.source && self.offset + self.length == b.offset
    }
}

/// 切点：文档偏移在Piece链中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CutPoint {
    /// 恰好落在第index个Piece之前（index == 长度表示末尾）
    Boundary(usize),
    /// 落在第index个Piece内部，距其开头offset字节
    Interior { index: usize, offset: usize },
}

/// 有序Piece链 + 累积偏移缓存
#[derive(Debug, Clone, Default)]
pub(crate) struct SpanSequence {
    spans: Vec<Span>,
    offsets: Vec<usize>, // offsets[i] 为第i个Piece在文档中的起始偏移
    total_bytes: usize,
}

impl SpanSequence {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
            total_bytes: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.total_bytes
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.total_bytes == 0
    }

    pub(crate) fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub(crate) fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// 第index个Piece在文档中的起始偏移
    pub(crate) fn start_of(&self, index: usize) -> usize {
        self.offsets.get(index).copied().unwrap_or(self.total_bytes)
    }

    /// 把文档偏移解析为切点
    pub(crate) fn locate(&self, position: usize) -> Result<CutPoint> {
        if position > self.total_bytes {
            return Err(PieceTableError::out_of_range(position, position, self.total_bytes));
        }
        if position == self.total_bytes {
            return Ok(CutPoint::Boundary(self.spans.len()));
        }

        // 没有空Piece，offsets严格递增
        match self.offsets.binary_search(&position) {
            Ok(index) => Ok(CutPoint::Boundary(index)),
            Err(i) => {
                // offsets[0] == 0 且 position > 0，所以 i >= 1
                let index = i - 1;
                Ok(CutPoint::Interior {
                    index,
                    offset: position - self.offsets[index],
                })
            }
        }
    }

    /// 包含position的Piece下标（position < len）
    pub(crate) fn index_containing(&self, position: usize) -> Option<usize> {
        match self.locate(position).ok()? {
            CutPoint::Boundary(index) if index < self.spans.len() => Some(index),
            CutPoint::Boundary(_) => None,
            CutPoint::Interior { index, .. } => Some(index),
        }
    }

    /// 在切点处分裂，返回切点对应的边界下标
    pub(crate) fn split(&mut self, cut: CutPoint) -> usize {
        match cut {
            CutPoint::Boundary(index) => index,
            CutPoint::Interior { index, offset } => {
                let (left, right) = self.spans[index].split_at(offset);
                trace!(index, offset, ?left, ?right, "split span");
                self.spans[index] = left;
                self.spans.insert(index + 1, right);
                self.reindex(index);
                index + 1
            }
        }
    }

    /// 在边界下标处插入一个Piece
    pub(crate) fn insert_at(&mut self, index: usize, span: Span) {
        debug_assert!(span.length > 0);
        self.spans.insert(index, span);
        self.reindex(index);
    }

    /// 移除下标范围内的Piece
    pub(crate) fn remove(&mut self, range: Range<usize>) {
        let start = range.start;
        self.spans.drain(range);
        self.reindex(start);
    }

    /// 整体替换Piece链
    pub(crate) fn replace_all(&mut self, spans: Vec<Span>) {
        self.spans = spans;
        self.reindex(0);
    }

    /// 从下标from开始重建累积偏移
    fn reindex(&mut self, from: usize) {
        let from = from.min(self.offsets.len());
        self.offsets.truncate(from);

        let mut offset = match from {
            0 => 0,
            i => self.offsets[i - 1] + self.spans[i - 1].length,
        };

        for span in &self.spans[from..] {
            self.offsets.push(offset);
            offset += span.length;
        }

        self.total_bytes = offset;
    }

    /// 检查Piece链不变量
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.offsets.len() != self.spans.len() {
            return Err(format!(
                "offset cache has {} entries for {} spans",
                self.offsets.len(),
                self.spans.len()
            ));
        }

        let mut expected = 0;
        for (i, (span, start)) in self.spans.iter().zip(&self.offsets).enumerate() {
            if span.length == 0 {
                return Err(format!("span {} is empty", i));
            }
            if *start != expected {
                return Err(format!("span {} starts at {}, expected {}", i, start, expected));
            }
            expected += span.length;
        }

        if expected != self.total_bytes {
            return Err(format!(
                "spans cover {} bytes but length is {}",
                expected, self.total_bytes
            ));
        }

        Ok(())
    }
}
