// Piece Table 核心实现
//
// 职责：持有两个只追加存储区与Piece链，
//       提供插入、删除、区间读取；编辑只改写Piece，从不改写字节

use std::fmt;

use tracing::{debug, trace};

use crate::config::TableConfig;
use crate::core::buffer::{
    chunk_iter::Chunks,
    snapshot::Snapshot,
    span::{CutPoint, Span, SpanSequence},
    store::{BufferStore, Source},
};
use crate::error::{PieceTableError, Result};

/// Piece Table核心实现
#[derive(Debug, Clone)]
pub struct PieceTable {
    store: BufferStore,    // 原始缓冲区 + 新增缓冲区
    spans: SpanSequence,   // Piece链
    compact_threshold: usize,
}

// ========== 构造方法 ==========

impl PieceTable {
    /// 创建新的空PieceTable
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// 从初始文本创建，整段文本成为一个Original Piece
    pub fn from_text(text: impl AsRef<[u8]>) -> Self {
        Self::with_config(text, &TableConfig::default())
    }

    pub fn with_config(text: impl AsRef<[u8]>, config: &TableConfig) -> Self {
        let text = text.as_ref();
        let mut spans = SpanSequence::with_capacity(config.span_capacity);

        if !text.is_empty() {
            spans.insert_at(0, Span::new(Source::Original, 0, text.len()));
        }

        Self {
            store: BufferStore::new(text, config.added_segment_size),
            spans,
            compact_threshold: config.compact_threshold,
        }
    }
}

// ========== 基本查询 ==========

impl PieceTable {
    /// 文档字节数
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// 获取Piece数量
    pub fn span_count(&self) -> usize {
        self.spans.span_count()
    }

    /// 按文档顺序遍历Piece
    ///
    /// Piece在编辑后会被替换，不能作为跨编辑的稳定句柄；
    /// 光标等标记应保存为文档偏移。
    pub fn spans(&self) -> impl ExactSizeIterator<Item = Span> + '_ {
        self.spans.spans().iter().copied()
    }

    /// 估计内存使用量
    pub fn memory_usage(&self) -> usize {
        let bookkeeping = std::mem::size_of::<Span>() + std::mem::size_of::<usize>();
        self.store.byte_size() + self.spans.span_count() * bookkeeping
    }

    /// 底层存储区（只读）
    pub fn store(&self) -> &BufferStore {
        &self.store
    }

    /// 校验Piece链不变量以及每个Piece都落在其存储区内
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        self.spans.check_invariants()?;

        for (i, span) in self.spans.spans().iter().enumerate() {
            self.store
                .check_range(span.source, span.offset, span.length)
                .map_err(|e| format!("span {} outside its store: {}", i, e))?;
        }

        Ok(())
    }
}

// ========== 编辑操作 ==========

impl PieceTable {
    /// 在position处插入text
    ///
    /// 空文本是无操作。位置越界时返回 `OutOfRange`，状态不变。
    pub fn insert(&mut self, position: usize, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();

        // 1. 先解析切点，越界时尚未修改任何状态
        let cut = self.spans.locate(position)?;
        if text.is_empty() {
            return Ok(());
        }

        // 2. 追加到新增缓冲区
        let base = self.store.append_to_added(text)?;
        let span = Span::new(Source::Added, base, text.len());

        // 3. 必要时分裂，然后在边界处放入新Piece
        let index = self.spans.split(cut);
        self.spans.insert_at(index, span);

        trace!(
            position,
            bytes = text.len(),
            spans = self.spans.span_count(),
            "insert"
        );
        Ok(())
    }

    /// 删除 `[position, position + length)`
    ///
    /// 被删除的字节仍留在存储区中，只是不再被任何Piece引用。
    pub fn delete(&mut self, position: usize, length: usize) -> Result<()> {
        let len = self.len();
        let end = match position.checked_add(length) {
            Some(end) if end <= len => end,
            _ => {
                return Err(PieceTableError::out_of_range(
                    position,
                    position.saturating_add(length),
                    len,
                ))
            }
        };

        if length == 0 {
            return Ok(());
        }

        let start_cut = self.spans.locate(position)?;
        let end_cut = self.spans.locate(end)?;

        // 先分裂尾部，头部下标不受影响
        let last = self.spans.split(end_cut);
        let first = self.spans.split(start_cut);

        // 头部分裂会让尾部边界右移一位
        let last = match start_cut {
            CutPoint::Interior { .. } => last + 1,
            CutPoint::Boundary(_) => last,
        };

        self.spans.remove(first..last);

        trace!(
            position,
            length,
            spans = self.spans.span_count(),
            "delete"
        );
        Ok(())
    }
}

// ========== 文本获取 ==========

impl PieceTable {
    /// 获取 `[start, end)` 的字节（核心API）
    pub fn text(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        self.chunks(start, end).map(collect_chunks)
    }

    /// 获取全部文本
    pub fn render(&self) -> Vec<u8> {
        collect_chunks(Chunks::whole(&self.store, &self.spans))
    }

    /// 借用读取区间，每个Piece（或分段）产出一个切片
    pub fn chunks(&self, start: usize, end: usize) -> Result<Chunks<'_>> {
        Chunks::new(&self.store, &self.spans, start, end)
    }
}

pub(crate) fn collect_chunks(chunks: Chunks<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(chunks.remaining());
    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out
}

impl fmt::Display for PieceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.render()))
    }
}

// ========== 合并策略 ==========

impl PieceTable {
    /// 合并所有相邻且在存储区中连续的Piece，返回减少的Piece数
    ///
    /// 只在显式调用时执行：插入不触碰相邻Piece。
    pub fn compact(&mut self) -> usize {
        let before = self.spans.span_count();
        if before <= 1 {
            return 0;
        }

        let mut merged: Vec<Span> = Vec::with_capacity(before);
        for &span in self.spans.spans() {
            match merged.last_mut() {
                Some(last) if last.is_followed_by(&span) => {
                    *last = Span::new(last.source, last.offset, last.length + span.length);
                }
                _ => merged.push(span),
            }
        }

        let removed = before - merged.len();
        if removed > 0 {
            self.spans.replace_all(merged);
        }

        debug!(before, after = self.spans.span_count(), "compacted spans");
        removed
    }

    /// Piece数量超过阈值时合并
    pub fn compact_if_needed(&mut self) -> usize {
        if self.spans.span_count() > self.compact_threshold {
            self.compact()
        } else {
            0
        }
    }
}

// ========== 快照 ==========

impl PieceTable {
    /// 冻结当前状态：复制Piece链，共享存储区
    pub fn snapshot(&self) -> Snapshot {
        debug!(
            bytes = self.len(),
            spans = self.spans.span_count(),
            "snapshot taken"
        );
        Snapshot::new(self.store.clone(), self.spans.clone())
    }
}

// ========== 默认实现 ==========

impl Default for PieceTable {
    fn default() -> Self {
        Self::new()
    }
}

// ========== 测试 ==========
