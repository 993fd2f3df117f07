use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` 優先，其次 `--verbose`，再來是設定檔的 `logging.level`
fn default_filter(level: Option<&str>, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match (verbose, level) {
        (true, _) => EnvFilter::new("grana_functions=debug,grana=debug,info"),
        (false, Some(level)) => EnvFilter::try_new(level)
            .unwrap_or_else(|_| EnvFilter::new("grana_functions=info,grana=info")),
        (false, None) => EnvFilter::new("grana_functions=info,grana=info"),
    })
}

/// 初始化 CLI 日誌；`json` 為 true 時輸出 JSON 格式
pub fn init_cli_logger(level: Option<&str>, verbose: bool, json: bool) {
    let filter = default_filter(level, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    // 日誌寫到 stderr，stdout 留給計算結果
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
