use crate::core::io::Input;
use crate::core::model::{Dialect, TypeFilter};
use crate::core::scan::{ScanStats, for_each_record};
use crate::report::attr_stats::AttrStats;
use crate::report::extract::{ColumnSpec, Extractor};
use crate::report::summary::Summary;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub enum Mode {
    Summary,
    AttrStats {
        types: TypeFilter,
    },
    Extract {
        types: TypeFilter,
        columns: ColumnSpec,
    },
}

pub struct RunConfig {
    pub input: PathBuf,
    pub dialect: Dialect,
    pub mode: Mode,
}

#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    pub scan: ScanStats,
    pub parse_failures: usize,
    pub rows: usize,
}

/// Opens the input and streams it once through the selected report.
pub fn run(cfg: RunConfig, out: &mut dyn Write) -> Result<RunOutput> {
    let stats = stats_enabled();
    let t_open = Instant::now();
    let mut input = Input::open(&cfg.input)?;
    log_stage(stats, "engine.input_open", t_open);

    let t_pass = Instant::now();
    let output = run_on(&mut input, cfg.dialect, cfg.mode, out)
        .with_context(|| format!("while processing {}", cfg.input.display()))?;
    log_stage(stats, "engine.pass", t_pass);
    if stats {
        eprintln!(
            "GFFINFO_STATS input={} kind={:?} dialect={} lines={} records={} invalid={} attr_failures={} rows={}",
            cfg.input.display(),
            input.kind(),
            cfg.dialect.as_str(),
            output.scan.lines,
            output.scan.records,
            output.scan.invalid,
            output.parse_failures,
            output.rows
        );
    }
    Ok(output)
}

pub fn run_on(
    input: &mut Input,
    dialect: Dialect,
    mode: Mode,
    out: &mut dyn Write,
) -> Result<RunOutput> {
    let mut output = RunOutput::default();
    match mode {
        Mode::Summary => {
            let mut summary = Summary::new();
            output.scan = for_each_record(input, |r| {
                summary.update(r);
                Ok(())
            })?;
            summary.write(out)?;
        }
        Mode::AttrStats { types } => {
            let mut agg = AttrStats::new(dialect, types);
            output.scan = for_each_record(input, |r| {
                agg.update(r);
                Ok(())
            })?;
            agg.write(out)?;
            output.parse_failures = agg.parse_failures;
        }
        Mode::Extract { types, columns } => {
            let mut extractor = Extractor::new(dialect, types, columns);
            extractor.write_header(out)?;
            output.scan = for_each_record(input, |r| extractor.write_record(&mut *out, r))?;
            output.parse_failures = extractor.parse_failures;
            output.rows = extractor.rows;
        }
    }
    out.flush().context("failed to flush output")?;
    Ok(output)
}

pub fn stats_enabled() -> bool {
    matches!(std::env::var("GFFINFO_STATS").as_deref(), Ok("1"))
}

pub fn log_stage(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("GFFINFO_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

pub fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
