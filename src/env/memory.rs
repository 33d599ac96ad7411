//! Host memory-pressure signal

use std::fs;

const MEMINFO_PATH: &str = "/proc/meminfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_kib: u64,
    pub available_kib: u64,
}

impl MemoryInfo {
    pub fn is_low(&self, threshold_kib: u64) -> bool {
        self.available_kib < threshold_kib
    }
}

/// Parse the `MemTotal` / `MemAvailable` lines of `/proc/meminfo`.
/// Older kernels without `MemAvailable` fall back to `MemFree`.
pub fn parse_meminfo(content: &str) -> Option<MemoryInfo> {
    let mut total = None;
    let mut available = None;
    let mut free = None;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(label), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            continue;
        };
        match label {
            "MemTotal:" => total = Some(value),
            "MemAvailable:" => available = Some(value),
            "MemFree:" => free = Some(value),
            _ => {}
        }
    }

    Some(MemoryInfo {
        total_kib: total?,
        available_kib: available.or(free)?,
    })
}

pub fn read_memory_info() -> Option<MemoryInfo> {
    let content = fs::read_to_string(MEMINFO_PATH).ok()?;
    parse_meminfo(&content)
}

/// Whether available memory is under `threshold_kib`. Unknown counts as not low.
pub fn is_low_on_memory(threshold_kib: u64) -> bool {
    match read_memory_info() {
        Some(info) => info.is_low(threshold_kib),
        None => {
            log::debug!("Memory info unavailable, assuming no memory pressure");
            false
        }
    }
}
