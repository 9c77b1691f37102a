use crate::snapshot::SnapshotError;

/// Latest 24h figures for one traded symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    symbol: String,
    price: f64,
    volume: f64,
    last_trade: f64,
}

impl QuoteRecord {
    pub fn new(
        symbol: String,
        price: f64,
        volume: f64,
        last_trade: f64,
    ) -> Result<Self, SnapshotError> {
        if symbol.is_empty() {
            return Err(SnapshotError::EmptySymbol);
        }

        Ok(Self {
            symbol,
            price,
            volume,
            last_trade,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn last_trade(&self) -> f64 {
        self.last_trade
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_quote_creation() {
        let quote = QuoteRecord::new("BTC-USD".to_string(), 50000.0, 123.4, 50010.5).unwrap();

        assert_eq!(quote.symbol(), "BTC-USD");
        assert_eq!(quote.price(), 50000.0);
        assert_eq!(quote.volume(), 123.4);
        assert_eq!(quote.last_trade(), 50010.5);
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let result = QuoteRecord::new(String::new(), 1.0, 2.0, 3.0);

        assert!(matches!(result, Err(SnapshotError::EmptySymbol)));
    }

    #[test]
    fn test_zero_values_allowed() {
        let quote = QuoteRecord::new("ETH-USD".to_string(), 0.0, 0.0, 0.0);

        assert!(quote.is_ok());
    }
}
