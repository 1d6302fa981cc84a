//! System performance screen
//!
//! CPU utilisation is computed from the difference between two
//! `/proc/stat` samples, so the first refresh reports the average since
//! boot.

use std::fs;
use std::path::PathBuf;

use keydeck_core::render::{bar_line, fit_line, layout};
use keydeck_core::Renderer;

use super::SourceError;

const STAT: &str = "stat";
const MEMINFO: &str = "meminfo";
const LOADAVG: &str = "loadavg";

/// Aggregate CPU counters from the first line of `/proc/stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTimes {
    busy: u64,
    total: u64,
}

impl CpuTimes {
    /// Busy fraction between `previous` and `self`
    fn usage_since(&self, previous: Option<CpuTimes>) -> f32 {
        let (busy, total) = match previous {
            Some(prev) if self.total > prev.total => (
                self.busy.saturating_sub(prev.busy),
                self.total - prev.total,
            ),
            _ => (self.busy, self.total),
        };
        if total == 0 {
            0.0
        } else {
            busy as f32 / total as f32
        }
    }
}

/// One sample of everything the screen shows
#[derive(Debug, Clone, Copy, PartialEq)]
struct PerfSample {
    cpu: f32,
    mem: f32,
    swap: f32,
    load: [f32; 3],
}

/// CPU, memory, swap and load average
pub struct PerfSource {
    proc_root: PathBuf,
    last_cpu: Option<CpuTimes>,
}

impl PerfSource {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Read the `stat`, `meminfo` and `loadavg` files below `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: root.into(),
            last_cpu: None,
        }
    }

    pub fn refresh(&mut self) -> Result<Renderer, SourceError> {
        let sample = self.sample()?;
        Ok(Box::new(move |width, height| render(&sample, width, height)))
    }

    fn sample(&mut self) -> Result<PerfSample, SourceError> {
        let cpu = parse_stat(&self.read(STAT)?).ok_or(SourceError::Parse(STAT))?;
        let (mem, swap) =
            parse_meminfo(&self.read(MEMINFO)?).ok_or(SourceError::Parse(MEMINFO))?;
        let load = parse_loadavg(&self.read(LOADAVG)?).ok_or(SourceError::Parse(LOADAVG))?;

        let usage = cpu.usage_since(self.last_cpu);
        self.last_cpu = Some(cpu);

        Ok(PerfSample {
            cpu: usage,
            mem,
            swap,
            load,
        })
    }

    fn read(&self, name: &str) -> Result<String, SourceError> {
        let path = self.proc_root.join(name);
        fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source })
    }
}

impl Default for PerfSource {
    fn default() -> Self {
        Self::new()
    }
}

fn render(sample: &PerfSample, width: u8, height: u8) -> String {
    let load = format!(
        "LD {:.2} {:.2} {:.2}",
        sample.load[0], sample.load[1], sample.load[2]
    );
    let lines = [
        bar_line("CPU", sample.cpu, width),
        bar_line("MEM", sample.mem, width),
        bar_line("SWP", sample.swap, width),
        fit_line(&load, width),
    ];
    layout(lines, width, height)
}

/// First `cpu` line: user nice system idle iowait irq softirq steal
fn parse_stat(text: &str) -> Option<CpuTimes> {
    let line = text.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|f| f.parse().ok())
        .collect::<Option<_>>()?;
    if fields.len() < 4 {
        return None;
    }

    let total: u64 = fields.iter().sum();
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    Some(CpuTimes {
        busy: total.saturating_sub(idle),
        total,
    })
}

/// Used memory and used swap fractions
fn parse_meminfo(text: &str) -> Option<(f32, f32)> {
    let field = |name: &str| -> Option<u64> {
        text.lines()
            .find(|l| l.starts_with(name))
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|v| v.parse().ok())
    };

    let total = field("MemTotal:")?;
    let available = field("MemAvailable:")?;
    if total == 0 {
        return None;
    }
    let mem = total.saturating_sub(available) as f32 / total as f32;

    let swap = match (field("SwapTotal:"), field("SwapFree:")) {
        (Some(total), Some(free)) if total > 0 => total.saturating_sub(free) as f32 / total as f32,
        _ => 0.0,
    };

    Some((mem, swap))
}

/// 1, 5 and 15 minute load averages
fn parse_loadavg(text: &str) -> Option<[f32; 3]> {
    let mut fields = text.split_whitespace().map(|f| f.parse::<f32>().ok());
    Some([fields.next()??, fields.next()??, fields.next()??])
}
