use crate::{Error, Result};
use std::collections::{HashMap as Map, HashSet as Set};
use std::path::Path;
use tracing::{debug, error, trace, warn};

/// Symbols read from the input table, each mapped to the values collected for it.
///
/// Keys keep their first-seen order from the input file; that order drives partitioning.
/// Each entry starts empty and is filled exactly once, after which it is read-only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    order: Vec<String>,
    entries: Map<String, Vec<String>>,
    filled: Set<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every symbol from column 0 of the table at `path`, skipping the header row.
    ///
    /// A missing or unreadable file is an error; no partial registry is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        trace!("reading ticker table at path: {path:?}");
        let file = std::fs::File::open(path).map_err(|err| {
            error!("failed to open ticker table {path:?}, error({err})");
            err
        })?;
        let registry = Self::from_reader(file)?;
        debug!("{} tickers loaded from {path:?}", registry.len());
        Ok(registry)
    }

    /// Load from any CSV source; see [`Registry::load`].
    pub fn from_reader<R: std::io::Read>(rdr: R) -> Result<Self> {
        let mut reader = table_reader(rdr);
        let mut registry = Self::new();

        for (i, record) in reader.byte_records().enumerate() {
            let record = record?;
            if i == 0 {
                continue;
            }

            let symbol = match record.get(0) {
                Some(field) if !field.is_empty() => String::from_utf8_lossy(field).into_owned(),
                _ => {
                    warn!("row {i} has no symbol in its first column, skipping");
                    continue;
                }
            };

            if !registry.insert_if_absent(&symbol) {
                debug!("duplicate ticker [{symbol}] at row {i}, keeping the first occurrence");
            }
        }

        Ok(registry)
    }

    /// Insert `symbol` with an empty value list, unless it is already present.
    ///
    /// Duplicates collapse to one entry and the first occurrence wins: an existing entry (and
    /// its position in the key order) is left untouched. Returns `true` if the symbol was new.
    pub fn insert_if_absent(&mut self, symbol: &str) -> bool {
        if self.entries.contains_key(symbol) {
            return false;
        }
        self.order.push(symbol.to_string());
        self.entries.insert(symbol.to_string(), Vec::new());
        true
    }

    /// Store the collected values for `symbol`. Each entry may be filled once.
    pub fn fill(&mut self, symbol: &str, values: Vec<String>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(symbol)
            .ok_or_else(|| Error::Registry(format!("unknown ticker [{symbol}]")))?;
        if !self.filled.insert(symbol.to_string()) {
            return Err(Error::Registry(format!("ticker [{symbol}] already filled")));
        }
        *entry = values;
        Ok(())
    }

    /// Symbols in first-seen order.
    pub fn symbols(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, symbol: &str) -> Option<&[String]> {
        self.entries.get(symbol).map(Vec::as_slice)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn is_filled(&self, symbol: &str) -> bool {
        self.filled.contains(symbol)
    }

    /// `true` once every entry has been filled with exactly `width` values.
    pub fn is_complete(&self, width: usize) -> bool {
        self.order
            .iter()
            .all(|symbol| self.is_filled(symbol) && self.entries[symbol].len() == width)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .map(|symbol| (symbol.as_str(), self.entries[symbol].as_slice()))
    }
}

/// CSV reader shared by the registry and the exporter: no header handling, ragged rows allowed.
pub(crate) fn table_reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "Symbol,Name\nAAA,Alpha Inc\nBBB,Beta Inc\nAAA,Alpha Again\n";

    #[test]
    fn skips_header_and_collapses_duplicates() {
        let registry = Registry::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(registry.symbols(), &["AAA".to_string(), "BBB".to_string()]);
        assert!(!registry.contains("Symbol"));
        assert_eq!(registry.get("AAA"), Some(&[][..]));
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut registry = Registry::new();
        assert!(registry.insert_if_absent("AAA"));
        assert!(registry.insert_if_absent("BBB"));
        assert!(!registry.insert_if_absent("AAA"));
        assert_eq!(registry.symbols(), &["AAA".to_string(), "BBB".to_string()]);
    }

    #[test]
    fn rows_without_symbol_are_skipped() {
        let registry = Registry::from_reader("Symbol,Name\n,Nobody\nCCC\n".as_bytes()).unwrap();
        assert_eq!(registry.symbols(), &["CCC".to_string()]);
    }

    #[test]
    fn fill_once() {
        let mut registry = Registry::from_reader(TABLE.as_bytes()).unwrap();
        assert!(!registry.is_complete(1));

        registry.fill("AAA", vec!["1.2".into()]).unwrap();
        assert!(matches!(
            registry.fill("AAA", vec!["1.3".into()]),
            Err(Error::Registry(_))
        ));
        assert!(matches!(
            registry.fill("ZZZ", vec!["1.3".into()]),
            Err(Error::Registry(_))
        ));
        assert_eq!(registry.get("AAA"), Some(&["1.2".to_string()][..]));

        registry.fill("BBB", vec!["N/A".into()]).unwrap();
        assert!(registry.is_complete(1));
        assert!(!registry.is_complete(2));
    }

    #[test]
    fn missing_file_is_fatal() {
        let result = Registry::load("./does/not/exist.csv");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
