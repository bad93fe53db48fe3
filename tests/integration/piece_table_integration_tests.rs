// Piece Table 集成测试

use std::thread;

use proptest::prelude::*;
use spantable::{PieceTable, TableConfig};

#[test]
fn test_edit_workflow() {
    // 模拟真实编辑场景
    let mut table = PieceTable::from_text("fn main() {\n    println!(\"Hello\");\n}");

    // 在函数内添加代码
    table.insert(35, "    println!(\"World\");\n").unwrap();

    let text = String::from_utf8(table.render()).unwrap();
    assert_eq!(
        text,
        "fn main() {\n    println!(\"Hello\");\n    println!(\"World\");\n}"
    );
    table.check_invariants().unwrap();
}

#[test]
fn test_retype_after_delete() {
    let mut table = PieceTable::from_text("Hello");

    table.insert(5, " world").unwrap();
    table.insert(11, "!").unwrap();
    table.delete(6, 5).unwrap();
    assert_eq!(table.text(0, 7).unwrap(), b"Hello !");

    table.insert(6, "world").unwrap();
    assert_eq!(table.text(0, 12).unwrap(), b"Hello world!");
    table.check_invariants().unwrap();
}

#[test]
fn test_multiline_edit() {
    let mut table = PieceTable::from_text("Line 1\nLine 2\nLine 3");

    // 在第二行末尾插入
    table.insert(13, " inserted").unwrap();

    let result = String::from_utf8(table.render()).unwrap();
    assert!(result.contains("Line 2 inserted\n"));
}

#[test]
fn test_large_text_viewport() {
    let large_text = "x".repeat(1_000_000); // 1MB
    let mut table = PieceTable::from_text(&large_text);
    assert_eq!(table.len(), 1_000_000);

    table.insert(500_000, "INSERT").unwrap();
    assert_eq!(table.len(), 1_000_006);
    assert_eq!(table.text(500_000, 500_006).unwrap(), b"INSERT");
    assert_eq!(table.text(499_998, 500_002).unwrap(), b"xxIN");
}

#[test]
fn test_snapshot_read_from_other_threads() {
    let mut table = PieceTable::from_text("shared text");
    table.insert(7, "and frozen ").unwrap();
    assert_eq!(table.render(), b"shared and frozen text");
    let snapshot = table.snapshot();

    thread::scope(|scope| {
        for _ in 0..4 {
            let snapshot = &snapshot;
            scope.spawn(move || {
                assert_eq!(snapshot.render(), b"shared and frozen text");
            });
        }

        // 写入方继续修改原表
        table.delete(0, 7).unwrap();
        table.insert(0, "still ").unwrap();
    });

    assert_eq!(table.render(), b"still and frozen text");
    assert_eq!(snapshot.render(), b"shared and frozen text");
}

#[test]
fn test_snapshot_survives_segment_rollover() {
    let config = TableConfig {
        added_segment_size: 8,
        ..TableConfig::default()
    };
    let mut table = PieceTable::with_config("", &config);
    table.insert(0, "abcd").unwrap();
    let snapshot = table.snapshot();

    // 共享分段被写时复制，快照不受影响
    table.insert(4, "efg").unwrap();
    table.insert(0, "0123456789").unwrap();

    assert_eq!(snapshot.render(), b"abcd");
    assert_eq!(table.render(), b"0123456789abcdefg");
}

/// 随机编辑操作
#[derive(Debug, Clone)]
enum EditOp {
    Insert { position: usize, text: Vec<u8> },
    Delete { position: usize, length: usize },
}

fn arb_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (0..200usize, prop::collection::vec(any::<u8>(), 0..12))
            .prop_map(|(position, text)| EditOp::Insert { position, text }),
        (0..200usize, 0..30usize)
            .prop_map(|(position, length)| EditOp::Delete { position, length }),
    ]
}

proptest! {
    /// 与直接拼接字节向量的结果一致，且不变量始终成立
    #[test]
    fn prop_matches_naive_splice(
        initial in prop::collection::vec(any::<u8>(), 0..64),
        segment_size in 1..32usize,
        ops in prop::collection::vec(arb_edit_op(), 1..40)
    ) {
        let config = TableConfig { added_segment_size: segment_size, ..TableConfig::default() };
        let mut table = PieceTable::with_config(&initial, &config);
        let mut reference = initial.clone();

        for op in ops {
            match op {
                EditOp::Insert { position, text } => {
                    let result = table.insert(position, &text);
                    if position <= reference.len() {
                        prop_assert!(result.is_ok());
                        reference.splice(position..position, text.iter().copied());
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                EditOp::Delete { position, length } => {
                    let result = table.delete(position, length);
                    if position + length <= reference.len() {
                        prop_assert!(result.is_ok());
                        reference.drain(position..position + length);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }

            prop_assert_eq!(table.check_invariants(), Ok(()));
            prop_assert_eq!(table.len(), reference.len());
            prop_assert_eq!(table.spans().map(|s| s.length).sum::<usize>(), reference.len());
        }

        prop_assert_eq!(table.render(), reference.clone());

        table.compact();
        prop_assert_eq!(table.check_invariants(), Ok(()));
        prop_assert_eq!(table.render(), reference);
    }

    /// 任意合法区间读取等于整体文本的切片
    #[test]
    fn prop_range_read_matches_render(
        runs in prop::collection::vec((0..40usize, "[a-z]{1,6}"), 1..20),
        start in 0..120usize,
        width in 0..60usize
    ) {
        let mut table = PieceTable::from_text("0123456789");
        for (position, run) in runs {
            let position = position.min(table.len());
            table.insert(position, run).unwrap();
        }

        let full = table.render();
        let start = start.min(full.len());
        let end = (start + width).min(full.len());

        prop_assert_eq!(table.text(start, end).unwrap(), full[start..end].to_vec());
        let chunked: Vec<u8> = table.chunks(start, end).unwrap().flatten().copied().collect();
        prop_assert_eq!(chunked, full[start..end].to_vec());
    }

    /// 空插入与零长度删除不改变文档
    #[test]
    fn prop_noop_edits(
        text in "[ -~]{0,40}",
        position in 0..41usize
    ) {
        let mut table = PieceTable::from_text(&text);
        table.insert(2usize.min(table.len()), "--").unwrap();
        let position = position.min(table.len());
        let before = table.render();
        let spans_before = table.span_count();

        table.insert(position, "").unwrap();
        table.delete(position, 0).unwrap();

        prop_assert_eq!(table.render(), before);
        prop_assert_eq!(table.span_count(), spans_before);
    }
}
