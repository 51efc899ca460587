//! Wire types for kline responses (REST).
//!
//! The exchange returns each kline as a positional JSON array:
//! `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
//! Only the first six entries are read; trailing entries are ignored so the
//! row survives the exchange appending fields.

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A single kline row with numeric fields kept as the strings the exchange sent.
#[derive(Debug, Clone, PartialEq)]
pub struct KlineRow {
    pub open_time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// A numeric field that may arrive either as a string or as a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumField {
    Str(String),
    Num(serde_json::Number),
}

impl NumField {
    fn into_string(self) -> String {
        match self {
            NumField::Str(s) => s,
            NumField::Num(n) => n.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for KlineRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = KlineRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a kline array [openTime, open, high, low, close, volume, ...]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<KlineRow, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let open_time: i64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut next = |idx: usize| -> Result<String, A::Error> {
                    seq.next_element::<NumField>()?
                        .map(NumField::into_string)
                        .ok_or_else(|| de::Error::invalid_length(idx, &self))
                };
                let open = next(1)?;
                let high = next(2)?;
                let low = next(3)?;
                let close = next(4)?;
                let volume = next(5)?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(KlineRow {
                    open_time,
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            }
        }

        deserializer.deserialize_seq(RowVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_exchange_row() {
        let json = r#"[1704067200000,"42283.58","44184.10","42180.77","44179.55","27174.29903",1704153599999,"1169995682.73",1260042,"14170.43926","610181296.84","0"]"#;
        let row: KlineRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.open_time, 1704067200000);
        assert_eq!(row.open, "42283.58");
        assert_eq!(row.volume, "27174.29903");
    }

    #[test]
    fn test_minimal_row_with_numbers() {
        let row: KlineRow = serde_json::from_str("[0, 100, 110, 95, 105, 50]").unwrap();
        assert_eq!(row.high, "110");
        assert_eq!(row.close, "105");
    }

    #[test]
    fn test_short_row_rejected() {
        let r = serde_json::from_str::<KlineRow>(r#"[0,"1","2","3"]"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_batch() {
        let rows: Vec<KlineRow> =
            serde_json::from_str(r#"[[0,"1","2","0.5","1.5","10"],[86400000,"1.5","2","1","1","3"]]"#)
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].open, "1.5");
    }
}
