//! Measures the time to look up user agents read from stdin.
//!
//! Prints one matched pattern (or `-`) per input line on stdout and
//! `Total duration = <seconds> sec` on stderr. Takes no flags; the cache
//! folder comes from `BROWSCAPY_CONFIG` / `BROWSCAPY_CACHE`.

use anyhow::Context;
use browscapy::domain::ports::ConfigProvider;
use browscapy::utils::logger;
use browscapy::{BenchRunner, Browscapy, Settings};

fn main() -> anyhow::Result<()> {
    logger::init_harness_logger();

    let settings = Settings::from_env()?;
    let storage = settings.storage();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("building runtime")?;
    let searcher = runtime
        .block_on(Browscapy::open(&storage))
        .with_context(|| format!("loading cache from {}", storage.base_path().display()))?
        .with_case_insensitive_fallback(settings.case_insensitive_fallback());

    BenchRunner::new_with_monitoring(searcher, settings.monitoring_enabled()).run_stdio()?;
    Ok(())
}
