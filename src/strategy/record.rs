//! Conversion between strategies and backend records.
//!
//! The backend stores the variant-specific numbers as a JSON string in
//! `params`, next to the shared columns.

use super::model::{
    ConsecutiveMoveParams, FundingRateParams, Period, Strategy, StrategyId, StrategyKind,
    StrategyType, VolatilitySpikeParams,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A strategy row as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategyRecord {
    pub id: StrategyId,
    pub strategy_type: String,
    pub symbol: String,
    pub period: String,
    pub params: String,
}

impl StrategyRecord {
    /// Build the record sent to the backend for `strategy`.
    pub fn from_strategy(strategy: &Strategy) -> Result<Self> {
        let params = match &strategy.kind {
            StrategyKind::VolatilitySpike { params, .. } => serde_json::to_string(params)?,
            StrategyKind::ConsecutiveMove { params, .. } => serde_json::to_string(params)?,
            StrategyKind::FundingRate { params } => serde_json::to_string(params)?,
        };

        Ok(Self {
            id: strategy.id,
            strategy_type: strategy.strategy_type().to_string(),
            symbol: strategy.symbol.clone(),
            period: strategy
                .kind
                .period()
                .map(|p| p.to_string())
                .unwrap_or_default(),
            params,
        })
    }

    /// Parsed discriminator, or `None` for a type this client does not know.
    pub fn known_type(&self) -> Option<StrategyType> {
        self.strategy_type.parse().ok()
    }

    /// Decode into a typed strategy.
    pub fn into_strategy(self) -> Result<Strategy> {
        let strategy_type: StrategyType = self.strategy_type.parse()?;

        let kind = match strategy_type {
            StrategyType::VolatilitySpike => StrategyKind::VolatilitySpike {
                period: self.parse_period()?,
                params: serde_json::from_str::<VolatilitySpikeParams>(&self.params)?,
            },
            StrategyType::ConsecutiveMove => StrategyKind::ConsecutiveMove {
                period: self.parse_period()?,
                params: serde_json::from_str::<ConsecutiveMoveParams>(&self.params)?,
            },
            StrategyType::FundingRate => StrategyKind::FundingRate {
                params: serde_json::from_str::<FundingRateParams>(&self.params)?,
            },
        };

        Ok(Strategy {
            id: self.id,
            symbol: self.symbol,
            created_at: None,
            kind,
        })
    }

    fn parse_period(&self) -> Result<Period> {
        self.period.parse().map_err(|_| {
            Error::invalid_input(format!(
                "Strategy {} has invalid period '{}'",
                self.id, self.period
            ))
        })
    }
}

impl TryFrom<StrategyRecord> for Strategy {
    type Error = Error;

    fn try_from(record: StrategyRecord) -> Result<Self> {
        record.into_strategy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(strategy_type: &str, period: &str, params: &str) -> StrategyRecord {
        StrategyRecord {
            id: 11,
            strategy_type: strategy_type.to_string(),
            symbol: "ETHUSDT".to_string(),
            period: period.to_string(),
            params: params.to_string(),
        }
    }

    #[test]
    fn test_consecutive_move_from_record() {
        let strategy = record("ConsecutiveMove", "5m", r#"{"count":4,"turnover":2000000}"#)
            .into_strategy()
            .unwrap();

        assert_eq!(strategy.id, 11);
        assert_eq!(strategy.symbol, "ETHUSDT");
        assert_eq!(
            strategy.kind,
            StrategyKind::ConsecutiveMove {
                period: Period::FiveMinutes,
                params: ConsecutiveMoveParams {
                    count: 4,
                    turnover: 2_000_000.0,
                },
            }
        );
    }

    #[test]
    fn test_params_carry_only_variant_fields() {
        let strategy = Strategy {
            id: 2,
            symbol: "BTCUSDT".to_string(),
            created_at: None,
            kind: StrategyKind::VolatilitySpike {
                period: Period::OneHour,
                params: VolatilitySpikeParams {
                    volume: 1000.0,
                    turnover: 5000.0,
                    amplitude_multiple: 3.0,
                },
            },
        };

        let record = StrategyRecord::from_strategy(&strategy).unwrap();
        assert_eq!(record.strategy_type, "VolatilitySpike");
        assert_eq!(record.period, "1h");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&record.params).unwrap(),
            serde_json::json!({"volume": 1000.0, "turnover": 5000.0, "amplitudeMultiple": 3.0})
        );
        assert_eq!(record.into_strategy().unwrap(), strategy);
    }

    #[test]
    fn test_funding_rate_has_empty_period() {
        let strategy = record("FundingRate", "", r#"{"fundingRate":0.01}"#)
            .into_strategy()
            .unwrap();
        let back = StrategyRecord::from_strategy(&strategy).unwrap();
        assert_eq!(back.period, "");
        assert_eq!(back.params, r#"{"fundingRate":0.01}"#);
    }

    #[test]
    fn test_unknown_type() {
        let unknown = record("GridBot", "5m", "{}");
        assert_eq!(unknown.known_type(), None);
        assert!(unknown.into_strategy().is_err());
    }

    #[test]
    fn test_malformed_params() {
        assert!(
            record("VolatilitySpike", "15m", r#"{"volume":1}"#)
                .into_strategy()
                .is_err()
        );
        assert!(
            record("ConsecutiveMove", "3m", r#"{"count":1,"turnover":1}"#)
                .into_strategy()
                .is_err()
        );
    }

    #[test]
    fn test_record_wire_names() {
        let value = serde_json::to_value(record("FundingRate", "", "{}")).unwrap();
        assert_eq!(value["strategyType"], "FundingRate");
        assert!(value.get("strategy_type").is_none());
    }
}
