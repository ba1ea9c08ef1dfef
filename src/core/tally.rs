use std::collections::HashMap;

/// String counter that remembers first-insertion order.
#[derive(Clone, Debug, Default)]
pub struct Tally {
    map: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        if let Some(&idx) = self.map.get(key) {
            self.entries[idx].1 += 1;
            return;
        }
        let idx = self.entries.len();
        self.entries.push((key.to_string(), 1));
        self.map.insert(key.to_string(), idx);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(k, c)| (k.as_str(), *c))
            .collect();
        rows.sort_by_cached_key(|(k, _)| k.to_lowercase());
        rows
    }
}

/// Stable case-insensitive ordering; equal keys keep their current order.
pub fn sort_case_insensitive<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| key(item).to_lowercase());
}
