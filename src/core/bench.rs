use crate::domain::ports::Detector;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchReport {
    pub lines: usize,
    pub matched: usize,
    pub duration: Duration,
}

impl BenchReport {
    pub fn summary(&self) -> String {
        format!("Total duration = {} sec", self.duration.as_secs_f64())
    }

    pub fn lookups_per_second(&self) -> f64 {
        let seconds = self.duration.as_secs_f64();
        if seconds > 0.0 {
            self.lines as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Times a detector over newline-delimited user agents.
///
/// Every line, blank ones included, is looked up once and its
/// `browser_name` written in input order. The first error stops the run.
pub struct BenchRunner<D: Detector> {
    detector: D,
    monitor: SystemMonitor,
}

impl<D: Detector> BenchRunner<D> {
    pub fn new(detector: D) -> Self {
        Self::new_with_monitoring(detector, false)
    }

    pub fn new_with_monitoring(detector: D, monitor_enabled: bool) -> Self {
        Self {
            detector,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn run<R, W, E>(&self, mut input: R, mut output: W, mut diagnostics: E) -> Result<BenchReport>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let start = Instant::now();
        let mut lines = 0;
        let mut matched = 0;
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            if input.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buffer);
            let user_agent = line.trim_end();

            let result = self.detector.lookup(user_agent)?;
            writeln!(output, "{}", result.browser_name)?;

            lines += 1;
            if result.is_match() {
                matched += 1;
            }
        }
        output.flush()?;
        let duration = start.elapsed();

        let report = BenchReport {
            lines,
            matched,
            duration,
        };
        writeln!(diagnostics, "{}", report.summary())?;
        diagnostics.flush()?;

        tracing::debug!("Looked up {} user agents, {} matched", lines, matched);
        self.monitor.report(&report);
        Ok(report)
    }

    /// Runs over the process's stdin, stdout and stderr.
    pub fn run_stdio(&self) -> Result<BenchReport> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        self.run(
            stdin.lock(),
            std::io::BufWriter::new(stdout.lock()),
            stderr.lock(),
        )
    }
}
