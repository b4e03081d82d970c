use ahash::AHashMap;

/// Running totals that remember the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    entries: Vec<(String, f64)>,
    index: AHashMap<String, usize>,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to `key`, registering the key on first sight.
    pub fn add(&mut self, key: &str, value: f64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// Entries in first-encounter order.
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for Totals {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut t = Totals::new();
        for (k, v) in iter {
            t.add(k.as_ref(), v);
        }
        t
    }
}

/// Keys ordered by total, largest first; ties keep first-encounter order.
pub fn rank_desc(totals: &Totals) -> Vec<String> {
    let mut ranked: Vec<&(String, f64)> = totals.entries.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(k, _)| k.clone()).collect()
}

/// The `n` largest keys by total; ties keep first-encounter order.
pub fn top_n(totals: &Totals, n: usize) -> Vec<String> {
    let mut keys = rank_desc(totals);
    keys.truncate(n);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_encounter_order() {
        let t: Totals = [("b", 1.0), ("a", 2.0), ("c", 1.0), ("d", 2.0)]
            .into_iter()
            .collect();
        assert_eq!(top_n(&t, 3), vec!["a", "d", "b"]);
    }

    #[test]
    fn add_accumulates() {
        let mut t = Totals::new();
        t.add("x", 1.5);
        t.add("y", 1.0);
        t.add("x", 2.0);
        assert_eq!(t.get("x"), Some(3.5));
        assert_eq!(t.len(), 2);
    }
}
