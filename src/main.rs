//! `i18n-seed` コマンドのエントリーポイント

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use i18n_seed::cli::{
    Cli,
    report_error,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{
    RollingFileAppender,
    Rotation,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let guard = init_tracing(&cli);

    let mut stdout = std::io::stdout().lock();
    let status = match cli.execute(&mut stdout).await {
        Ok(status) => status,
        Err(err) => {
            tracing::error!("{err}");
            // ログがファイルに出る場合もエラーは端末に表示する
            if guard.is_some()
                && let Err(write_err) = report_error(&err, &mut std::io::stderr().lock())
            {
                tracing::warn!("Failed to report error: {write_err}");
            }
            err.exit_status()
        }
    };
    drop(guard);
    ExitCode::from(status)
}

/// tracing を初期化する
///
/// `RUST_LOG` があればそれを優先し、なければ `-v` の数でレベルを決める。
/// `--log-file` 指定時はファイルへ書き出し、返したガードが生きている間だけフラッシュされる。
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = cli.log_file.as_deref() else {
        builder.with_writer(std::io::stderr).init();
        return None;
    };
    if let Some(appender) = file_appender(path) {
        let (writer, guard) = tracing_appender::non_blocking(appender);
        builder.with_ansi(false).with_writer(writer).init();
        Some(guard)
    } else {
        builder.with_writer(std::io::stderr).init();
        tracing::warn!(path = %path.display(), "Cannot open log file, logging to stderr");
        None
    }
}

fn file_appender(path: &Path) -> Option<RollingFileAppender> {
    let file_name = path.file_name()?;
    let directory =
        path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .ok()
}
