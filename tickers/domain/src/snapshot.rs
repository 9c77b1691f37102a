use std::collections::HashSet;

use crate::quote::QuoteRecord;

/// A complete batch of quotes: exactly the expected number of records,
/// each with a distinct, non-empty symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    records: Vec<QuoteRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<QuoteRecord>, expected_len: usize) -> Result<Self, SnapshotError> {
        if records.len() != expected_len {
            return Err(SnapshotError::CountMismatch {
                expected: expected_len,
                actual: records.len(),
            });
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if record.symbol().is_empty() {
                return Err(SnapshotError::EmptySymbol);
            }
            if !seen.insert(record.symbol()) {
                return Err(SnapshotError::DuplicateSymbol(record.symbol().to_string()));
            }
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    pub fn get(&self, symbol: &str) -> Option<&QuoteRecord> {
        self.records.iter().find(|r| r.symbol() == symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.symbol())
    }

    pub fn into_records(self) -> Vec<QuoteRecord> {
        self.records
    }
}

impl IntoIterator for Snapshot {
    type Item = QuoteRecord;
    type IntoIter = std::vec::IntoIter<QuoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("Symbol cannot be empty")]
    EmptySymbol,

    #[error("Expected {expected} records, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Duplicate symbol in batch: {0}")]
    DuplicateSymbol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, price: f64) -> QuoteRecord {
        QuoteRecord::new(symbol.to_string(), price, price * 2.0, price + 0.5).unwrap()
    }

    #[test]
    fn test_valid_snapshot() {
        let snapshot = Snapshot::new(vec![quote("A", 1.0), quote("B", 4.0)], 2).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("B").unwrap().price(), 4.0);
        assert!(snapshot.get("C").is_none());
        assert_eq!(snapshot.symbols().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_short_batch_rejected() {
        let result = Snapshot::new(vec![quote("A", 1.0), quote("B", 2.0), quote("C", 3.0)], 102);

        assert_eq!(
            result,
            Err(SnapshotError::CountMismatch {
                expected: 102,
                actual: 3
            })
        );
    }

    #[test]
    fn test_long_batch_rejected() {
        let result = Snapshot::new(vec![quote("A", 1.0), quote("B", 2.0)], 1);

        assert!(matches!(
            result,
            Err(SnapshotError::CountMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let result = Snapshot::new(vec![quote("A", 1.0), quote("A", 2.0)], 2);

        assert_eq!(result, Err(SnapshotError::DuplicateSymbol("A".to_string())));
    }

    #[test]
    fn test_empty_snapshot_when_nothing_expected() {
        let snapshot = Snapshot::new(Vec::new(), 0).unwrap();

        assert!(snapshot.is_empty());
    }
}
