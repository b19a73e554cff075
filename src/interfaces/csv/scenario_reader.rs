use crate::error::{GatewayError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioEventType {
    /// Open a transaction for `name` / `national_id` / `wallet`.
    Open,
    /// Bank webhook: `amount` THB received from sender `name`.
    Transfer,
    Approve,
    ToggleHedge,
}

/// One row of a simulation scenario.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScenarioEvent {
    pub event: ScenarioEventType,
    pub amount: Option<Decimal>,
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub wallet: Option<String>,
}

/// Reads scenario events from a CSV source.
///
/// Wraps `csv::Reader` and yields `Result<ScenarioEvent>` lazily, trimming
/// whitespace and tolerating rows with trailing columns omitted.
pub struct ScenarioReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScenarioReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn events(self) -> impl Iterator<Item = Result<ScenarioEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(GatewayError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "event, amount, name, national_id, wallet\n\
                    open, 1000, SOMCHAI JAIDEE, 1234567890123, TWallet\n\
                    transfer, 1000, somchai jaidee\n\
                    approve\n\
                    toggle_hedge, , , ,";
        let reader = ScenarioReader::new(data.as_bytes());
        let results: Vec<Result<ScenarioEvent>> = reader.events().collect();

        assert_eq!(results.len(), 4);
        let open = results[0].as_ref().unwrap();
        assert_eq!(open.event, ScenarioEventType::Open);
        assert_eq!(open.amount, Some(dec!(1000)));
        assert_eq!(open.wallet.as_deref(), Some("TWallet"));

        let transfer = results[1].as_ref().unwrap();
        assert_eq!(transfer.name.as_deref(), Some("somchai jaidee"));
        assert_eq!(transfer.wallet, None);

        assert_eq!(
            results[2].as_ref().unwrap().event,
            ScenarioEventType::Approve
        );
        let hedge = results[3].as_ref().unwrap();
        assert_eq!(hedge.event, ScenarioEventType::ToggleHedge);
        assert_eq!(hedge.amount, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "event, amount, name, national_id, wallet\nrefund, 1, X, 1, W";
        let reader = ScenarioReader::new(data.as_bytes());
        let results: Vec<Result<ScenarioEvent>> = reader.events().collect();

        assert!(results[0].is_err());
    }
}
