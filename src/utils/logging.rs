use std::{fs, io, path::Path};
use std::time::Duration;
use tracing::Subscriber;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{
    filter::Targets, fmt, fmt::time::UtcTime, prelude::*, registry::LookupSpan, EnvFilter, Layer,
};

/// Keeps the non-blocking file writers alive; drop flushes them.
pub struct LogGuards {
    _normal: WorkerGuard,
    _perf: WorkerGuard,
    _cron: WorkerGuard,
}

/// Non-blocking writer for `<dir>/<file>.<date>`, creating `dir` if needed.
fn daily_writer(dir: &Path, file: &str) -> io::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir)?;
    Ok(tracing_appender::non_blocking(rolling::daily(dir, file)))
}

fn json_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(writer)
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_ids(false)
}

/// Three JSON files under `log_dir` (everything, `perf` target, `cron`
/// target) plus a compact console.
pub fn setup_logging(log_dir: &str, svc: &str, debug: bool) -> anyhow::Result<LogGuards> {
    let level = if debug { "debug" } else { "info" };
    let root = Path::new(log_dir);

    let (normal_writer, normal_guard) = daily_writer(&root.join(svc), &format!("{svc}.log"))?;
    let (perf_writer, perf_guard) = daily_writer(&root.join("perf"), &format!("{svc}_perf.log"))?;
    let (cron_writer, cron_guard) = daily_writer(&root.join("cron"), &format!("{svc}_cron.log"))?;

    let console_layer = fmt::layer()
        .compact()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_ids(false)
        .with_filter(EnvFilter::new(level));

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(json_layer(normal_writer).with_filter(EnvFilter::new(level)))
            .with(
                json_layer(perf_writer)
                    .with_filter(Targets::new().with_target("perf", tracing::Level::INFO)),
            )
            .with(json_layer(cron_writer).with_filter(EnvFilter::new("cron=info")))
            .with(console_layer),
    )?;

    Ok(LogGuards {
        _normal: normal_guard,
        _perf: perf_guard,
        _cron: cron_guard,
    })
}

pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}
