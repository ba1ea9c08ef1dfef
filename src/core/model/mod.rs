use indexmap::IndexMap;
use std::path::Path;

pub const FIELD_COUNT: usize = 9;

/// Attribute order follows the source text.
pub type AttributeMap = IndexMap<String, String>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dialect {
    Gff,
    Gtf,
}

impl Dialect {
    /// Picks the attribute grammar from the literal input argument, so `-` is always GFF.
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy();
        if name.ends_with(".gtf") || name.ends_with(".gtf.gz") {
            Dialect::Gtf
        } else {
            Dialect::Gff
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Gff => "gff",
            Dialect::Gtf => "gtf",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeFilter {
    Any,
    Only(Vec<String>),
}

impl TypeFilter {
    /// Comma-separated list; an empty first entry selects every type.
    pub fn parse(list: &str) -> Self {
        let types: Vec<String> = list.split(',').map(str::to_string).collect();
        match types.first() {
            Some(first) if !first.is_empty() => TypeFilter::Only(types),
            _ => TypeFilter::Any,
        }
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Only(types) => types.iter().any(|t| t == kind),
        }
    }
}

/// One validated feature line, borrowing its nine columns from the line buffer.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    pub line_no: usize,
    pub line: &'a str,
    fields: [&'a str; FIELD_COUNT],
}

impl<'a> Record<'a> {
    pub fn new(line_no: usize, line: &'a str, fields: [&'a str; FIELD_COUNT]) -> Self {
        Self {
            line_no,
            line,
            fields,
        }
    }

    pub fn seq_id(&self) -> &'a str {
        self.fields[0]
    }

    pub fn source(&self) -> &'a str {
        self.fields[1]
    }

    pub fn kind(&self) -> &'a str {
        self.fields[2]
    }

    pub fn start(&self) -> &'a str {
        self.fields[3]
    }

    pub fn end(&self) -> &'a str {
        self.fields[4]
    }

    pub fn strand(&self) -> &'a str {
        self.fields[6]
    }

    pub fn attributes(&self) -> &'a str {
        self.fields[8]
    }

    pub fn position(&self) -> String {
        [self.seq_id(), self.start(), self.end(), self.strand()].join(":")
    }
}
