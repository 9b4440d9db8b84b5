//! Host diagnostics and sensors.
//!
//! The console started life on a microcontroller; on a host the same
//! diagnostics are answered from `/proc` and the thermal zone in `/sys`.

use crate::errors::WalletError;
use std::fs;
use std::path::PathBuf;
use tracing::error;

/// Build and platform information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Console version
    pub version: String,
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// Available CPU cores
    pub cores: usize,
}

/// Memory use of the console process, in kilobytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapInfo {
    /// Resident set size
    pub resident_kb: u64,
    /// Peak resident set size
    pub peak_resident_kb: u64,
    /// Size of the data segment
    pub data_kb: u64,
    /// Size of the main stack
    pub stack_kb: u64,
}

/// System diagnostics available regardless of network state.
pub trait Device: Send + Sync {
    /// Returns build and platform information.
    fn info(&self) -> DeviceInfo;

    /// Returns the memory available to new allocations, in kilobytes.
    fn free_memory_kb(&self) -> Result<u64, WalletError>;

    /// Returns the memory breakdown of the console process.
    fn heap(&self) -> Result<HeapInfo, WalletError>;

    /// Returns the number of threads of the console process.
    fn task_count(&self) -> Result<u64, WalletError>;
}

/// Diagnostics backed by the Linux `/proc` filesystem.
#[derive(Clone, Debug)]
pub struct HostDevice {
    proc_root: PathBuf,
}

impl Default for HostDevice {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl HostDevice {
    fn read(&self, relative: &str) -> Result<String, WalletError> {
        Ok(fs::read_to_string(self.proc_root.join(relative))?)
    }
}

impl Device for HostDevice {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cores: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }

    fn free_memory_kb(&self) -> Result<u64, WalletError> {
        let meminfo = self.read("meminfo")?;
        kb_field(&meminfo, "MemAvailable").ok_or_else(|| missing("MemAvailable"))
    }

    fn heap(&self) -> Result<HeapInfo, WalletError> {
        let status = self.read("self/status")?;
        Ok(HeapInfo {
            resident_kb: kb_field(&status, "VmRSS").unwrap_or(0),
            peak_resident_kb: kb_field(&status, "VmHWM").unwrap_or(0),
            data_kb: kb_field(&status, "VmData").unwrap_or(0),
            stack_kb: kb_field(&status, "VmStk").unwrap_or(0),
        })
    }

    fn task_count(&self) -> Result<u64, WalletError> {
        let status = self.read("self/status")?;
        kb_field(&status, "Threads").ok_or_else(|| missing("Threads"))
    }
}

fn missing(field: &str) -> WalletError {
    WalletError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("{} not reported by the host", field),
    ))
}

/// Reads the first number of a `Key:   value [kB]` line.
fn kb_field(text: &str, key: &str) -> Option<u64> {
    text.lines().find_map(|line| {
        let (name, rest) = line.split_once(':')?;
        if name.trim() != key {
            return None;
        }
        rest.split_whitespace().next()?.parse().ok()
    })
}

/// A temperature source for the `sensor` command.
pub trait TemperatureSensor: Send + Sync {
    /// Returns the temperature in degrees Celsius.
    fn read_celsius(&self) -> f32;
}

/// Reads a Linux thermal zone, reporting 0.0 when none is available.
#[derive(Clone, Debug)]
pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl Default for ThermalZoneSensor {
    fn default() -> Self {
        Self::new("/sys/class/thermal/thermal_zone0/temp")
    }
}

impl ThermalZoneSensor {
    /// Creates a sensor reading millidegrees from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemperatureSensor for ThermalZoneSensor {
    fn read_celsius(&self) -> f32 {
        let reading = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|text| text.trim().parse::<i64>().map_err(|e| e.to_string()));

        match reading {
            Ok(millidegrees) => millidegrees as f32 / 1000.0,
            Err(e) => {
                error!("Temperature sensor unavailable at {}: {}", self.path.display(), e);
                0.0
            }
        }
    }
}
