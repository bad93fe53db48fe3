// 字节存储区
//
// 职责：管理原始缓冲区与新增缓冲区两个只追加存储，
//       已写入的字节永不移动或改写

use std::sync::Arc;

use crate::error::{PieceTableError, Result};

/// 字节来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Original,
    Added,
}

/// 新增缓冲区的一个分段（Arc共享，快照只复制指针）
#[derive(Debug, Clone)]
struct Segment {
    base: usize,
    bytes: Arc<Vec<u8>>,
}

impl Segment {
    fn end(&self) -> usize {
        self.base + self.bytes.len()
    }
}

/// 新增缓冲区：分段存储，逻辑偏移连续
#[derive(Debug, Clone)]
struct AddedStore {
    segments: Vec<Segment>,
    segment_size: usize,
    len: usize,
}

impl AddedStore {
    fn new(segment_size: usize) -> Self {
        Self {
            segments: Vec::new(),
            segment_size: segment_size.max(1),
            len: 0,
        }
    }

    fn append(&mut self, bytes: &[u8]) -> usize {
        let base = self.len;
        let segment_size = self.segment_size;

        match self.segments.last_mut() {
            // 只有最后一个分段接收追加；若被快照共享则只复制这一段
            Some(tail) if tail.bytes.len() + bytes.len() <= segment_size => {
                Arc::make_mut(&mut tail.bytes).extend_from_slice(bytes);
            }
            _ => {
                let mut buf = Vec::with_capacity(segment_size.max(bytes.len()));
                buf.extend_from_slice(bytes);
                self.segments.push(Segment {
                    base,
                    bytes: Arc::new(buf),
                });
            }
        }

        self.len += bytes.len();
        base
    }

    /// 从offset开始、位于同一分段内的最长前缀（最多length字节）
    fn prefix(&self, offset: usize, length: usize) -> &[u8] {
        let idx = self.segments.partition_point(|s| s.base <= offset);
        if idx == 0 {
            return &[];
        }

        let segment = &self.segments[idx - 1];
        if offset >= segment.end() {
            return &[];
        }

        let local = offset - segment.base;
        let end = (local + length).min(segment.bytes.len());
        &segment.bytes[local..end]
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// 两个只追加存储区
#[derive(Debug, Clone)]
pub struct BufferStore {
    original: Arc<[u8]>,
    added: AddedStore,
}

impl BufferStore {
    pub fn new(original: &[u8], segment_size: usize) -> Self {
        Self {
            original: Arc::from(original),
            added: AddedStore::new(segment_size),
        }
    }

    /// 追加到新增缓冲区，返回起始偏移
    pub fn append_to_added(&mut self, bytes: &[u8]) -> Result<usize> {
        if bytes.is_empty() {
            return Err(PieceTableError::EmptyAppend);
        }
        Ok(self.added.append(bytes))
    }

    /// 存储区当前大小
    pub fn len(&self, source: Source) -> usize {
        match source {
            Source::Original => self.original.len(),
            Source::Added => self.added.len,
        }
    }

    /// 复制读取 `[offset, offset + length)`
    pub fn read(&self, source: Source, offset: usize, length: usize) -> Result<Vec<u8>> {
        self.check_range(source, offset, length)?;

        let mut out = Vec::with_capacity(length);
        let mut pos = offset;
        let end = offset + length;
        while pos < end {
            let chunk = self.prefix(source, pos, end - pos);
            if chunk.is_empty() {
                break;
            }
            out.extend_from_slice(chunk);
            pos += chunk.len();
        }

        Ok(out)
    }

    /// 借用读取：返回从offset起连续存放的最长前缀，不超过length
    ///
    /// 原始缓冲区总是一次返回全部；新增缓冲区在分段边界处截断，
    /// 调用方需循环读取剩余部分。越界时返回空切片。
    pub fn prefix(&self, source: Source, offset: usize, length: usize) -> &[u8] {
        match source {
            Source::Original => {
                let start = offset.min(self.original.len());
                let end = offset.saturating_add(length).min(self.original.len());
                &self.original[start..end]
            }
            Source::Added => self.added.prefix(offset, length),
        }
    }

    pub(crate) fn check_range(&self, source: Source, offset: usize, length: usize) -> Result<()> {
        let store_len = self.len(source);
        match offset.checked_add(length) {
            Some(end) if end <= store_len => Ok(()),
            _ => Err(PieceTableError::out_of_range(
                offset,
                offset.saturating_add(length),
                store_len,
            )),
        }
    }

    /// 两个存储区占用的字节数
    pub fn byte_size(&self) -> usize {
        self.original.len() + self.added.len
    }

    pub fn segment_count(&self) -> usize {
        self.added.segment_count()
    }
}
