use crate::core::model::{Dialect, Record, TypeFilter};
use crate::core::tally::sort_case_insensitive;
use crate::report::table::write_table;
use anyhow::Result;
use log::warn;
use std::collections::HashMap;
use std::io::Write;

#[derive(Clone, Debug)]
struct KeyEntry {
    key: String,
    values: HashMap<String, u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrRow {
    pub key: String,
    pub total: u64,
    pub unique: usize,
}

/// Per `(type, attribute)` occurrence and cardinality counters.
///
/// The first sighting of a composite key only registers it: its value is not
/// counted, so `total` is one short and the first value only shows up in
/// `unique` if it occurs again.
#[derive(Clone, Debug)]
pub struct AttrStats {
    dialect: Dialect,
    filter: TypeFilter,
    index: HashMap<String, usize>,
    entries: Vec<KeyEntry>,
    pub parse_failures: usize,
}

impl AttrStats {
    pub fn new(dialect: Dialect, filter: TypeFilter) -> Self {
        Self {
            dialect,
            filter,
            index: HashMap::new(),
            entries: Vec::new(),
            parse_failures: 0,
        }
    }

    pub fn update(&mut self, record: &Record<'_>) {
        if !self.filter.matches(record.kind()) {
            return;
        }
        let kv = match self
            .dialect
            .parse_attributes(record.attributes(), record.line_no)
        {
            Ok(kv) => kv,
            Err(e) => {
                self.parse_failures += 1;
                warn!("failed to parse attributes: {:#}: {}", e, record.attributes());
                return;
            }
        };

        for (k, v) in kv {
            let composite = format!("{}\t{}", record.kind(), k);
            match self.index.get(&composite) {
                Some(&idx) => {
                    *self.entries[idx].values.entry(v).or_insert(0) += 1;
                }
                None => {
                    self.index.insert(composite.clone(), self.entries.len());
                    self.entries.push(KeyEntry {
                        key: composite,
                        values: HashMap::new(),
                    });
                }
            }
        }
    }

    pub fn finalize(&self) -> Vec<AttrRow> {
        let mut rows: Vec<AttrRow> = self
            .entries
            .iter()
            .map(|e| AttrRow {
                key: e.key.clone(),
                total: e.values.values().sum(),
                unique: e.values.len(),
            })
            .collect();
        sort_case_insensitive(&mut rows, |r| r.key.as_str());
        rows
    }

    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        let mut lines = vec!["TYPE\tATTRIBUTION\tTOTAL\tUNIQUE".to_string()];
        for row in self.finalize() {
            lines.push(format!("{}\t{}\t{}", row.key, row.total, row.unique));
        }
        write_table(w, &lines)
    }
}
