//! Metric sources
//!
//! Each source acquires raw data from one fixed origin (a /proc or /sys
//! pseudo-file, or the stdout of an external diagnostic command), parses it
//! against a fixed pattern and returns a typed value. A pattern miss or a
//! failing command is a `MetricError` naming the metric; sources never
//! retry.
//!
//! CPU utilization is computed from a single snapshot of the cumulative
//! counters in /proc/stat (busy vs. total ticks since boot), not from a
//! two-sample delta. The figure trends toward the boot-time average on
//! long uptimes; kept for parity with the historical daemon.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

/// Failure of a single metric source for one cycle
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("cannot detect {metric}: unexpected output")]
    Unavailable { metric: &'static str },
    #[error("cannot read {metric}: {source}")]
    Read {
        metric: &'static str,
        source: std::io::Error,
    },
    #[error("{metric} command `{command}` exited with {code:?}")]
    CommandFailed {
        metric: &'static str,
        command: String,
        code: Option<i32>,
    },
}

/// Battery charge status as reported by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatus {
    Full,
    Charging,
    Discharging,
    Unknown,
}

impl BatteryStatus {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "full" => BatteryStatus::Full,
            "charging" => BatteryStatus::Charging,
            "discharging" => BatteryStatus::Discharging,
            _ => BatteryStatus::Unknown,
        }
    }
}

/// One battery sample: charge status plus percentage clamped to [0, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub status: BatteryStatus,
    pub percent: f64,
}

static CPU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"cpu\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)").unwrap());
static MEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Mem:\s*(\d+)\s+(\d+)").unwrap());
static TEMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Core 0:\s*\+(\d+\.\d+)").unwrap());

/// Probe for battery hardware. Checked exactly once at startup; the result
/// is fixed for the process lifetime.
pub fn probe_battery(power_supply_dir: &Path) -> bool {
    power_supply_dir.exists()
}

/// Cumulative CPU utilization from one read of /proc/stat
pub async fn cpu(stat_path: &Path) -> Result<f64, MetricError> {
    let stat = tokio::fs::read_to_string(stat_path)
        .await
        .map_err(|source| MetricError::Read {
            metric: "cpu",
            source,
        })?;
    parse_cpu(&stat)
}

/// Used-memory percentage from the `free` summary line
pub async fn ram(free_cmd: &str) -> Result<f64, MetricError> {
    let stdout = run_command("ram", free_cmd).await?;
    parse_ram(&stdout)
}

/// Core 0 temperature in whole °C from `sensors` output
pub async fn temperature(sensors_cmd: &str) -> Result<i64, MetricError> {
    let stdout = run_command("temperature", sensors_cmd).await?;
    parse_temperature(&stdout)
}

/// Host name from the `hostname` command, trimmed
pub async fn hostname(hostname_cmd: &str) -> Result<String, MetricError> {
    let stdout = run_command("hostname", hostname_cmd).await?;
    let name = stdout.trim();
    if name.is_empty() {
        return Err(MetricError::Unavailable { metric: "hostname" });
    }
    Ok(name.to_string())
}

/// Battery status and charge percentage from the power-supply pseudo-files
pub async fn battery(battery_dir: &Path) -> Result<BatteryReading, MetricError> {
    let status_raw = read_battery_file(battery_dir, "status").await?;
    let full = parse_charge(&read_battery_file(battery_dir, "charge_full").await?)?;
    let now = parse_charge(&read_battery_file(battery_dir, "charge_now").await?)?;

    let percent = (100.0 * now as f64 / full as f64).clamp(0.0, 100.0);

    Ok(BatteryReading {
        status: BatteryStatus::parse(&status_raw),
        percent,
    })
}

fn parse_cpu(stat: &str) -> Result<f64, MetricError> {
    let caps = CPU_RE
        .captures(stat)
        .ok_or(MetricError::Unavailable { metric: "cpu" })?;

    let user: u64 = parse_capture(&caps, 1, "cpu")?;
    let system: u64 = parse_capture(&caps, 3, "cpu")?;
    let idle: u64 = parse_capture(&caps, 4, "cpu")?;

    let busy = user + system;
    Ok(busy as f64 * 100.0 / (busy + idle) as f64)
}

fn parse_ram(free_output: &str) -> Result<f64, MetricError> {
    let caps = MEM_RE
        .captures(free_output)
        .ok_or(MetricError::Unavailable { metric: "ram" })?;

    let total: u64 = parse_capture(&caps, 1, "ram")?;
    let used: u64 = parse_capture(&caps, 2, "ram")?;

    Ok(used as f64 / total as f64 * 100.0)
}

fn parse_temperature(sensors_output: &str) -> Result<i64, MetricError> {
    let caps = TEMP_RE.captures(sensors_output).ok_or(MetricError::Unavailable {
        metric: "temperature",
    })?;

    let degrees: f64 = caps[1].parse().map_err(|_| MetricError::Unavailable {
        metric: "temperature",
    })?;

    Ok(degrees.trunc() as i64)
}

fn parse_capture<T: std::str::FromStr>(
    caps: &regex::Captures<'_>,
    index: usize,
    metric: &'static str,
) -> Result<T, MetricError> {
    caps[index]
        .parse()
        .map_err(|_| MetricError::Unavailable { metric })
}

fn parse_charge(raw: &str) -> Result<u64, MetricError> {
    raw.trim()
        .parse()
        .map_err(|_| MetricError::Unavailable { metric: "battery" })
}

async fn read_battery_file(battery_dir: &Path, name: &str) -> Result<String, MetricError> {
    tokio::fs::read_to_string(battery_dir.join(name))
        .await
        .map_err(|source| MetricError::Read {
            metric: "battery",
            source,
        })
}

/// Run one diagnostic command and return its stdout. A spawn failure or a
/// non-zero exit status fails the metric for this cycle.
async fn run_command(metric: &'static str, command: &str) -> Result<String, MetricError> {
    let output: Output = Command::new(command)
        .output()
        .await
        .map_err(|source| MetricError::Read { metric, source })?;

    if !output.status.success() {
        return Err(MetricError::CommandFailed {
            metric,
            command: command.to_string(),
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_snapshot() {
        // busy = 100 + 100, total = busy + 200 -> 50%
        let stat = "cpu  100 5 100 200 7 0 0 0 0 0\ncpu0 50 2 50 100 3 0 0 0 0 0\n";
        let pct = parse_cpu(stat).unwrap();
        assert!((pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_cpu_rejects_garbage() {
        assert!(matches!(
            parse_cpu("intr 12345"),
            Err(MetricError::Unavailable { metric: "cpu" })
        ));
    }

    #[test]
    fn test_parse_ram_used_over_total() {
        let free = "              total        used        free\nMem:        16000000     4000000    12000000\nSwap:              0           0           0\n";
        let pct = parse_ram(free).unwrap();
        assert!((pct - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_temperature_truncates() {
        let sensors = "coretemp-isa-0000\nAdapter: ISA adapter\nCore 0:        +47.8°C  (high = +100.0°C)\n";
        assert_eq!(parse_temperature(sensors).unwrap(), 47);
    }

    #[test]
    fn test_parse_temperature_requires_pattern() {
        assert!(parse_temperature("Core 1: +47.8°C").is_err());
    }

    #[test]
    fn test_battery_status_parsing() {
        assert_eq!(BatteryStatus::parse("Full\n"), BatteryStatus::Full);
        assert_eq!(BatteryStatus::parse("Charging"), BatteryStatus::Charging);
        assert_eq!(BatteryStatus::parse("discharging"), BatteryStatus::Discharging);
        assert_eq!(BatteryStatus::parse("Not charging"), BatteryStatus::Unknown);
    }

    #[tokio::test]
    async fn test_battery_reads_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("status"), "Discharging\n").unwrap();
        std::fs::write(dir.path().join("charge_full"), "4000000\n").unwrap();
        // charge_now above charge_full happens on worn cells reporting stale full values
        std::fs::write(dir.path().join("charge_now"), "4400000\n").unwrap();

        let reading = battery(dir.path()).await.unwrap();
        assert_eq!(reading.status, BatteryStatus::Discharging);
        assert!((reading.percent - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_battery_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            battery(dir.path()).await,
            Err(MetricError::Read { metric: "battery", .. })
        ));
    }

    #[test]
    fn test_probe_battery_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_battery(dir.path()));
        assert!(!probe_battery(&dir.path().join("power_supply")));
    }
}
