// spantable - piece table text buffer
//
// Licensed under MIT License

use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use spantable::{PieceTable, TableConfig};

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("spantable v{} starting...", env!("CARGO_PKG_VERSION"));

    // 可选：第一个参数为TOML配置文件
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => TableConfig::load(&path)
            .with_context(|| format!("加载配置 {} 失败", path.display()))?,
        None => TableConfig::default(),
    };

    let mut table = PieceTable::with_config("HEllo\n\n WOrld", &config);

    // 依次追加到文档末尾
    for run in ["More Text Here:", "\n\n", "\tMore Text Over Here"] {
        table.insert(table.len(), run)?;
    }

    // 中间插入、删除
    table.insert(7, "Big ")?;
    table.delete(0, 1)?;

    for (i, span) in table.spans().enumerate() {
        debug!(i, source = ?span.source, offset = span.offset, length = span.length, "span");
    }

    info!(
        bytes = table.len(),
        spans = table.span_count(),
        memory = table.memory_usage(),
        "document ready"
    );
    println!("{}", table);

    Ok(())
}
