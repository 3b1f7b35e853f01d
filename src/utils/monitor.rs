use crate::core::bench::BenchReport;

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resident memory and CPU of this process at one point of a benchmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSample {
    pub resident_mb: u64,
    pub cpu_percent: f32,
}

/// Reports what the lookup loop costs on top of the loaded pattern cache.
///
/// The first sample is taken when the monitor is created, which happens after
/// the cache is loaded, so it is the cache's resident footprint. The final
/// report adds the loop's throughput and how much memory it grew.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    sampler: Option<ProcessSampler>,
    cache_loaded: Option<ProcessSample>,
}

#[cfg(feature = "cli")]
struct ProcessSampler {
    system: Mutex<System>,
    pid: Pid,
}

#[cfg(feature = "cli")]
impl ProcessSampler {
    fn sample(&self) -> Option<ProcessSample> {
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        let process = system.process(self.pid)?;
        Some(ProcessSample {
            resident_mb: process.memory() / 1024 / 1024,
            cpu_percent: process.cpu_usage(),
        })
    }
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let sampler = enabled
            .then(|| match sysinfo::get_current_pid() {
                Ok(pid) => Some(ProcessSampler {
                    system: Mutex::new(System::new()),
                    pid,
                }),
                Err(e) => {
                    tracing::warn!("Process monitoring unavailable: {}", e);
                    None
                }
            })
            .flatten();

        let cache_loaded = sampler.as_ref().and_then(ProcessSampler::sample);
        if let Some(sample) = cache_loaded {
            tracing::info!("Pattern cache loaded, resident {}MB", sample.resident_mb);
        }

        Self { sampler, cache_loaded }
    }

    pub fn is_enabled(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn sample(&self) -> Option<ProcessSample> {
        self.sampler.as_ref()?.sample()
    }

    pub fn report(&self, report: &BenchReport) {
        let Some(after) = self.sample() else {
            return;
        };
        let grown = self
            .cache_loaded
            .map_or(0, |before| after.resident_mb.saturating_sub(before.resident_mb));
        tracing::info!(
            "{} lookups ({} matched) at {:.0}/sec, CPU {:.1}%, resident {}MB (+{}MB during lookups)",
            report.lines,
            report.matched,
            report.lookups_per_second(),
            after.cpu_percent,
            after.resident_mb,
            grown
        );
    }
}

// No-op stand-in when built without the `cli` feature.
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn sample(&self) -> Option<ProcessSample> {
        None
    }

    pub fn report(&self, _report: &BenchReport) {}
}
