use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::annotation::Annotation;

/// Unique identifier for an instrument, assigned by the store on insert
/// and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentId(pub i64);

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstrumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A financial instrument ("stock"), the primary entity of the service.
///
/// Owns zero or more [`Annotation`]s. The `annotations` field is populated
/// only when a lookup requested eager loading; otherwise it is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    /// Ticker symbol ("AAPL").
    pub symbol: String,
    pub company_name: String,
    /// Price paid per share. Always carries exactly 2 fractional digits.
    pub purchase_price: Decimal,
    /// Most recent dividend. Always carries exactly 2 fractional digits.
    pub last_dividend: Decimal,
    pub industry: String,
    pub market_cap: i64,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// The full mutable field set of an instrument.
///
/// Used both as the create payload and as the replacement set for update.
/// Partial updates are not supported: callers always supply every field.
/// There is no `id` here, so a caller can never pre-assign identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentFields {
    pub symbol: String,
    pub company_name: String,
    pub purchase_price: Decimal,
    pub last_dividend: Decimal,
    pub industry: String,
    pub market_cap: i64,
}

impl InstrumentFields {
    /// Return a copy with both monetary fields normalized to exactly
    /// 2 fractional digits.
    pub fn normalized(mut self) -> Self {
        self.purchase_price = round_money(self.purchase_price);
        self.last_dividend = round_money(self.last_dividend);
        self
    }

    /// Field-level constraints checked at the transport boundary on create.
    ///
    /// Update deliberately skips these checks, so they live here as an
    /// explicit call rather than inside the repository.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("symbol is required".to_string());
        }
        if self.symbol.chars().count() > 10 {
            return Err("symbol can't be over 10 characters".to_string());
        }
        if self.company_name.is_empty() {
            return Err("company name is required".to_string());
        }
        if self.company_name.chars().count() > 30 {
            return Err("company name can't be over 30 characters".to_string());
        }
        if self.purchase_price < Decimal::ONE
            || self.purchase_price > Decimal::from(1_000_000_000_i64)
        {
            return Err("purchase price must be between 1 and 1000000000".to_string());
        }
        // 0.001 expressed exactly, not as a float
        if self.last_dividend < Decimal::new(1, 3) || self.last_dividend > Decimal::from(100) {
            return Err("last dividend must be between 0.001 and 100".to_string());
        }
        if self.industry.is_empty() {
            return Err("industry is required".to_string());
        }
        if self.industry.chars().count() > 20 {
            return Err("industry can't be over 20 characters".to_string());
        }
        if self.market_cap < 1 || self.market_cap > 5_000_000_000 {
            return Err("market cap must be between 1 and 5000000000".to_string());
        }
        Ok(())
    }
}

/// Round a monetary value to 2 fractional digits, midpoints away from zero,
/// then rescale so the result always carries exactly two digits
/// (12.345 -> 12.35, 7 -> 7.00).
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> InstrumentFields {
        InstrumentFields {
            symbol: "AAPL".to_string(),
            company_name: "Apple Inc".to_string(),
            purchase_price: Decimal::new(18945, 2),
            last_dividend: Decimal::new(92, 2),
            industry: "Technology".to_string(),
            market_cap: 2_900_000_000,
        }
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        let v: Decimal = "12.345".parse().unwrap();
        assert_eq!(round_money(v).to_string(), "12.35");
    }

    #[test]
    fn test_round_money_below_midpoint() {
        let v: Decimal = "12.344".parse().unwrap();
        assert_eq!(round_money(v).to_string(), "12.34");
    }

    #[test]
    fn test_round_money_rescales_whole_numbers() {
        assert_eq!(round_money(Decimal::from(7)).to_string(), "7.00");
    }

    #[test]
    fn test_normalized_touches_both_monetary_fields() {
        let mut f = fields();
        f.purchase_price = "10.005".parse().unwrap();
        f.last_dividend = "0.125".parse().unwrap();
        let n = f.normalized();
        assert_eq!(n.purchase_price.to_string(), "10.01");
        assert_eq!(n.last_dividend.to_string(), "0.13");
    }

    #[test]
    fn test_validate_accepts_well_formed_fields() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn test_validate_symbol_length() {
        let mut f = fields();
        f.symbol = "TOOLONGSYMBOL".to_string();
        assert!(f.validate().unwrap_err().contains("symbol"));
    }

    #[test]
    fn test_validate_empty_company_name() {
        let mut f = fields();
        f.company_name = String::new();
        assert!(f.validate().unwrap_err().contains("company name"));
    }

    #[test]
    fn test_validate_purchase_price_range() {
        let mut f = fields();
        f.purchase_price = Decimal::new(99, 2); // 0.99
        assert!(f.validate().is_err());
        f.purchase_price = Decimal::from(1_000_000_001_i64);
        assert!(f.validate().is_err());
        f.purchase_price = Decimal::ONE;
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_validate_last_dividend_range() {
        let mut f = fields();
        f.last_dividend = Decimal::ZERO;
        assert!(f.validate().is_err());
        f.last_dividend = Decimal::new(1, 3); // 0.001, lower bound inclusive
        assert!(f.validate().is_ok());
        f.last_dividend = Decimal::from(101);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_market_cap_range() {
        let mut f = fields();
        f.market_cap = 0;
        assert!(f.validate().is_err());
        f.market_cap = 5_000_000_001;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_instrument_id_display_roundtrip() {
        let id = InstrumentId(42);
        let parsed: InstrumentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_instrument_deserializes_without_annotations() {
        let json = r#"{
            "id": 1,
            "symbol": "AAPL",
            "company_name": "Apple Inc",
            "purchase_price": "189.45",
            "last_dividend": "0.92",
            "industry": "Technology",
            "market_cap": 2900000000
        }"#;
        let instrument: Instrument = serde_json::from_str(json).unwrap();
        assert!(instrument.annotations.is_empty());
    }

    #[test]
    fn test_fields_ignore_caller_supplied_id() {
        // A stray id in the payload is dropped at deserialization; identity
        // is only ever assigned by the store.
        let json = r#"{
            "id": 999,
            "symbol": "AAPL",
            "company_name": "Apple Inc",
            "purchase_price": "189.45",
            "last_dividend": "0.92",
            "industry": "Technology",
            "market_cap": 2900000000
        }"#;
        let fields: InstrumentFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.symbol, "AAPL");
    }
}
