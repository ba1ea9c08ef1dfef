use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub const USAGE: &str = r#"Modes are selected by the number of arguments:

  summary of sequences, sources and types
    $ gffinfo <gff>

  attribute statistics per type ("" for any type)
    $ gffinfo <gff> <type1,type2...>

  extract attributes and Dbxref tags as TSV
    $ gffinfo <gff> <type1,type2...> <attr1,attr2,dbxref1...> [key:label,...]

  derived columns: "0" whole line, "3" or "type" for the third column,
  "4" or "position" for "chrom:start:end:strand"

Files ending in .gz are decompressed, .gtf/.gtf.gz use the GTF attribute
grammar, and "-" reads GFF text from stdin. Set RUST_LOG to change the
diagnostic level and GFFINFO_STATS=1 for timings."#;

#[derive(Parser, Debug)]
#[command(
    name = "gffinfo",
    version,
    about = "Summarize GFF3/GTF (.gz) annotations and extract attributes",
    after_help = USAGE,
    disable_help_flag = true
)]
pub struct Cli {
    /// Feature file (GFF3 or GTF, optionally gzipped), or "-" for stdin
    pub input: Option<PathBuf>,

    /// Comma-separated feature types, "" for any
    pub types: Option<String>,

    /// Comma-separated output columns
    pub columns: Option<String>,

    /// Comma-separated header renames as key:label
    pub renames: Option<String>,

    #[arg(hide = true)]
    pub extra: Vec<String>,

    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,
}
