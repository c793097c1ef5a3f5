//! Local environment facts for the provenance footer.
//!
//! Collected synchronously on demand, never cached. Collection must
//! never abort the notification flow: any probe that fails falls back
//! to a fixed default, and a total failure yields the full default set.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Default facts used when a probe fails.
const DEFAULT_CPU: &str = "4 cores";
const DEFAULT_RAM: &str = "8GB";
const DEFAULT_OS: &str = "Linux x64";
const DEFAULT_BUILD: &str = "Debian 12 (Build Container)";
const DEFAULT_GPU: &str = "GPU Passthrough Enabled";

/// Snapshot of the build/runtime environment embedded in each
/// notification's provenance footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentFacts {
    pub cpu: String,
    pub ram: String,
    pub gpu: String,
    pub os: String,
    pub build: String,
}

impl Default for EnvironmentFacts {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU.to_string(),
            ram: DEFAULT_RAM.to_string(),
            gpu: DEFAULT_GPU.to_string(),
            os: DEFAULT_OS.to_string(),
            build: DEFAULT_BUILD.to_string(),
        }
    }
}

impl EnvironmentFacts {
    /// Probe the local machine. Each field falls back independently.
    pub fn collect() -> Self {
        Self {
            cpu: cpu_fact(),
            ram: ram_fact(),
            gpu: gpu_fact(),
            os: os_fact(),
            build: build_fact(),
        }
    }
}

impl fmt::Display for EnvironmentFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CPU: {}", self.cpu)?;
        writeln!(f, "RAM: {}", self.ram)?;
        writeln!(f, "GPU: {}", self.gpu)?;
        writeln!(f, "OS: {}", self.os)?;
        write!(f, "BUILD: {}", self.build)
    }
}

fn cpu_fact() -> String {
    match std::thread::available_parallelism() {
        Ok(n) => format!("{n} cores"),
        Err(_) => DEFAULT_CPU.to_string(),
    }
}

/// Total memory in whole GB, read from /proc/meminfo (Linux).
fn ram_fact() -> String {
    let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") else {
        return DEFAULT_RAM.to_string();
    };
    parse_mem_total_gb(&meminfo)
        .map(|gb| format!("{gb}GB"))
        .unwrap_or_else(|| DEFAULT_RAM.to_string())
}

fn parse_mem_total_gb(meminfo: &str) -> Option<u64> {
    let line = meminfo.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024 / 1024)
}

fn gpu_fact() -> String {
    if Path::new("/dev/dri/card0").exists() {
        "Intel/AMD + GPU Passthrough".to_string()
    } else {
        DEFAULT_GPU.to_string()
    }
}

fn os_fact() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

/// OS build string from /etc/os-release, e.g. "Debian GNU/Linux 12".
fn build_fact() -> String {
    let Ok(contents) = std::fs::read_to_string("/etc/os-release") else {
        return DEFAULT_BUILD.to_string();
    };
    parse_pretty_name(&contents).unwrap_or_else(|| DEFAULT_BUILD.to_string())
}

fn parse_pretty_name(os_release: &str) -> Option<String> {
    let line = os_release
        .lines()
        .find(|l| l.starts_with("PRETTY_NAME="))?;
    let value = line.strip_prefix("PRETTY_NAME=")?.trim();
    Some(value.trim_matches('"').to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
