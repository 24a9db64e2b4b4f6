//! Process-wide system memory utilisation gauge.
//!
//! The dispatcher's admission guard reads [`utilization`] before starting
//! each new fetch. The underlying sample is shared by all queries and
//! refreshed at most once per [`SAMPLE_INTERVAL`]; between refreshes every
//! reader sees the cached value.
//!
//! Platform sources:
//! - Linux: `/proc/meminfo` (`MemAvailable` / `MemTotal`)
//! - macOS: `sysctl` (`vm.page_free_count`, `hw.pagesize`, `hw.memsize`)
//! - Other: reports 0.0 — admission is never blocked on unknown platforms.

use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

/// Minimum time between fresh samples of system memory.
const SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

struct Sample {
    taken: Option<Instant>,
    utilization: f64,
}

static SAMPLE: OnceLock<Mutex<Sample>> = OnceLock::new();

/// Fraction of physical RAM currently in use, in `[0.0, 1.0]`.
///
/// Cheap to call from hot paths: a fresh reading is taken at most once per
/// [`SAMPLE_INTERVAL`] across the whole process.
pub fn utilization() -> f64 {
    let lock = SAMPLE.get_or_init(|| {
        Mutex::new(Sample {
            taken: None,
            utilization: 0.0,
        })
    });
    let mut sample = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let stale = match sample.taken {
        Some(at) => at.elapsed() >= SAMPLE_INTERVAL,
        None => true,
    };
    if stale {
        sample.utilization = read_utilization();
        sample.taken = Some(Instant::now());
    }
    sample.utilization
}

fn read_utilization() -> f64 {
    #[cfg(target_os = "linux")]
    {
        linux_utilization().unwrap_or(0.0)
    }
    #[cfg(target_os = "macos")]
    {
        macos_utilization().unwrap_or(0.0)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        0.0
    }
}

#[cfg(target_os = "linux")]
fn linux_utilization() -> Option<f64> {
    let content = std::fs::read_to_string("/proc/meminfo").ok()?;
    let total_kb = parse_meminfo_line(&content, "MemTotal:")?;
    let available_kb = parse_meminfo_line(&content, "MemAvailable:")?;
    if total_kb == 0 {
        return None;
    }
    Some(1.0 - available_kb as f64 / total_kb as f64)
}

#[cfg(target_os = "linux")]
fn parse_meminfo_line(content: &str, prefix: &str) -> Option<u64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(prefix))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse::<u64>().ok())
}

#[cfg(target_os = "macos")]
fn macos_utilization() -> Option<f64> {
    let total = run_sysctl_u64("hw.memsize")?;
    let page_size = run_sysctl_u64("hw.pagesize")?;
    let free_pages = run_sysctl_u64("vm.page_free_count")?;
    if total == 0 {
        return None;
    }
    let free = free_pages.saturating_mul(page_size);
    Some(1.0 - free as f64 / total as f64)
}

#[cfg(target_os = "macos")]
fn run_sysctl_u64(name: &str) -> Option<u64> {
    let output = std::process::Command::new("sysctl")
        .arg("-n")
        .arg(name)
        .output()
        .ok()?;
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse::<u64>()
        .ok()
}
