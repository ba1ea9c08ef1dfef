use crate::core::model::Record;
use crate::core::tally::Tally;
use crate::report::table::write_table;
use anyhow::Result;
use std::io::Write;

#[derive(Clone, Debug, Default)]
pub struct Summary {
    sequences: Tally,
    sources: Tally,
    types: Tally,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, record: &Record<'_>) {
        self.sequences.add(record.seq_id());
        self.sources.add(record.source());
        self.types.add(record.kind());
    }

    pub fn rows(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(2 + self.sources.len() + self.types.len());
        rows.push("NAME\tCOUNT".to_string());
        rows.push(format!("Sequences\t{}", self.sequences.len()));
        for (k, c) in self.sources.sorted() {
            rows.push(format!("source: {}\t{}", k, c));
        }
        for (k, c) in self.types.sorted() {
            rows.push(format!("type: {}\t{}", k, c));
        }
        rows
    }

    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        write_table(w, &self.rows())
    }
}
