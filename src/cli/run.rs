use crate::cli::args::Cli;
use crate::core::engine::{self, Mode, RunConfig, log_stage, stats_enabled};
use crate::core::model::{Dialect, TypeFilter};
use crate::report::extract::ColumnSpec;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::LevelFilter;
use std::io::{self, BufWriter};
use std::process;
use std::time::Instant;

const HELP_EXIT_CODE: i32 = 2;

pub enum Action {
    Run(RunConfig),
    Help { exit_code: i32 },
}

pub fn entry() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match plan(cli)? {
        Action::Help { exit_code } => {
            Cli::command()
                .print_help()
                .context("failed to print usage")?;
            println!();
            if exit_code != 0 {
                process::exit(exit_code);
            }
            Ok(())
        }
        Action::Run(config) => run(config),
    }
}

fn init_logging() {
    let _ = pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .try_init();
}

/// Maps the positional argument count to a report. Rename and column specs
/// are validated here so a bad configuration fails before any input is read.
pub fn plan(cli: Cli) -> Result<Action> {
    let input = match cli.input {
        Some(input) if !cli.help => input,
        _ => {
            return Ok(Action::Help {
                exit_code: HELP_EXIT_CODE,
            });
        }
    };
    if !cli.extra.is_empty() {
        return Ok(Action::Help { exit_code: 0 });
    }

    let dialect = Dialect::from_path(&input);
    let mode = match (cli.types, cli.columns) {
        (None, _) => Mode::Summary,
        (Some(types), None) => Mode::AttrStats {
            types: TypeFilter::parse(&types),
        },
        (Some(types), Some(columns)) => Mode::Extract {
            types: TypeFilter::parse(&types),
            columns: ColumnSpec::new(&columns, cli.renames.as_deref())?,
        },
    };

    Ok(Action::Run(RunConfig {
        input,
        dialect,
        mode,
    }))
}

fn run(config: RunConfig) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    engine::run(config, &mut out)?;
    log_stage(stats, "total", t0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_args(args: &[&str]) -> Result<Action> {
        let cli = Cli::try_parse_from(std::iter::once("gffinfo").chain(args.iter().copied()))?;
        plan(cli)
    }

    fn help_code(action: Action) -> Option<i32> {
        match action {
            Action::Help { exit_code } => Some(exit_code),
            Action::Run(_) => None,
        }
    }

    #[test]
    fn no_arguments_or_help_flag_exit_with_usage_code() {
        assert_eq!(help_code(plan_args(&[]).unwrap()), Some(2));
        assert_eq!(help_code(plan_args(&["-h"]).unwrap()), Some(2));
        assert_eq!(help_code(plan_args(&["--help", "a.gff"]).unwrap()), Some(2));
    }

    #[test]
    fn too_many_arguments_print_usage_without_failing() {
        let action = plan_args(&["a.gff", "", "ID", "ID:id", "extra"]).unwrap();
        assert_eq!(help_code(action), Some(0));
    }

    #[test]
    fn argument_count_selects_mode() {
        let Action::Run(cfg) = plan_args(&["a.gtf.gz"]).unwrap() else {
            panic!("expected run");
        };
        assert!(matches!(cfg.mode, Mode::Summary));
        assert_eq!(cfg.dialect, Dialect::Gtf);

        let Action::Run(cfg) = plan_args(&["-", ""]).unwrap() else {
            panic!("expected run");
        };
        assert!(matches!(cfg.mode, Mode::AttrStats { types: TypeFilter::Any }));
        assert_eq!(cfg.dialect, Dialect::Gff);

        let Action::Run(cfg) = plan_args(&["a.gff", "gene", "ID,4", "4:pos"]).unwrap() else {
            panic!("expected run");
        };
        let Mode::Extract { types, columns } = cfg.mode else {
            panic!("expected extract");
        };
        assert_eq!(types, TypeFilter::Only(vec!["gene".to_string()]));
        assert_eq!(columns.header_line(), "ID\tpos");
    }

    #[test]
    fn bad_rename_is_fatal() {
        assert!(plan_args(&["a.gff", "", "ID", "Name:n"]).is_err());
        assert!(plan_args(&["a.gff", "", "ID", "ID"]).is_err());
    }
}
