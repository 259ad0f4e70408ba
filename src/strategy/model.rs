//! Strategy variants managed by the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend identifier of a strategy.
pub type StrategyId = u64;

/// Discriminator of a strategy variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyType {
    VolatilitySpike,
    ConsecutiveMove,
    FundingRate,
}

impl StrategyType {
    /// All variants in display order.
    pub const ALL: [StrategyType; 3] = [
        StrategyType::VolatilitySpike,
        StrategyType::ConsecutiveMove,
        StrategyType::FundingRate,
    ];

    /// Wire name of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VolatilitySpike => "VolatilitySpike",
            Self::ConsecutiveMove => "ConsecutiveMove",
            Self::FundingRate => "FundingRate",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VolatilitySpike => "Volatility Spike",
            Self::ConsecutiveMove => "Consecutive Move",
            Self::FundingRate => "Funding Rate",
        }
    }

    /// Whether this variant is evaluated on a candle period.
    pub fn has_period(&self) -> bool {
        !matches!(self, Self::FundingRate)
    }

    /// The variant after this one, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            Self::VolatilitySpike => Self::ConsecutiveMove,
            Self::ConsecutiveMove => Self::FundingRate,
            Self::FundingRate => Self::VolatilitySpike,
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VolatilitySpike" => Ok(Self::VolatilitySpike),
            "ConsecutiveMove" => Ok(Self::ConsecutiveMove),
            "FundingRate" => Ok(Self::FundingRate),
            other => Err(crate::Error::invalid_input(format!(
                "Unknown strategy type '{}'",
                other
            ))),
        }
    }
}

/// Candle period a strategy watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[default]
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
}

impl Period {
    /// All periods, shortest first.
    pub const ALL: [Period; 5] = [
        Period::OneMinute,
        Period::FiveMinutes,
        Period::FifteenMinutes,
        Period::ThirtyMinutes,
        Period::OneHour,
    ];

    /// Wire name, e.g. `15m`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
        }
    }

    /// The next longer period, wrapping around.
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| crate::Error::invalid_input(format!("Unknown period '{}'", s)))
    }
}

/// Parameters of a volatility spike alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilitySpikeParams {
    pub volume: f64,
    pub turnover: f64,
    pub amplitude_multiple: f64,
}

/// Parameters of a consecutive move alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsecutiveMoveParams {
    pub count: u32,
    pub turnover: f64,
}

/// Parameters of a funding rate alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateParams {
    pub funding_rate: f64,
}

/// Variant-specific part of a strategy, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StrategyKind {
    VolatilitySpike {
        period: Period,
        #[serde(flatten)]
        params: VolatilitySpikeParams,
    },
    ConsecutiveMove {
        period: Period,
        #[serde(flatten)]
        params: ConsecutiveMoveParams,
    },
    FundingRate {
        #[serde(flatten)]
        params: FundingRateParams,
    },
}

impl StrategyKind {
    /// Discriminator of this variant.
    pub fn strategy_type(&self) -> StrategyType {
        match self {
            Self::VolatilitySpike { .. } => StrategyType::VolatilitySpike,
            Self::ConsecutiveMove { .. } => StrategyType::ConsecutiveMove,
            Self::FundingRate { .. } => StrategyType::FundingRate,
        }
    }

    /// Candle period, if the variant has one.
    pub fn period(&self) -> Option<Period> {
        match self {
            Self::VolatilitySpike { period, .. } | Self::ConsecutiveMove { period, .. } => {
                Some(*period)
            }
            Self::FundingRate { .. } => None,
        }
    }
}

/// A user-defined alert strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    /// Backend ID (0 until the backend assigns one).
    #[serde(default)]
    pub id: StrategyId,
    /// Trading pair, or `*` for every pair.
    pub symbol: String,
    /// Creation timestamp, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Variant data.
    #[serde(flatten)]
    pub kind: StrategyKind,
}

impl Strategy {
    /// Symbol meaning "every trading pair".
    pub const WILDCARD_SYMBOL: &'static str = "*";

    /// Discriminator of this strategy.
    pub fn strategy_type(&self) -> StrategyType {
        self.kind.strategy_type()
    }

    /// Whether this strategy watches every pair.
    pub fn is_wildcard(&self) -> bool {
        self.symbol.trim() == Self::WILDCARD_SYMBOL
    }

    /// Symbol for display.
    pub fn display_symbol(&self) -> &str {
        if self.symbol.is_empty() {
            "Unnamed"
        } else {
            &self.symbol
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn volatility_spike() -> Strategy {
        Strategy {
            id: 7,
            symbol: "BTCUSDT".to_string(),
            created_at: None,
            kind: StrategyKind::VolatilitySpike {
                period: Period::FifteenMinutes,
                params: VolatilitySpikeParams {
                    volume: 1_000_000.0,
                    turnover: 50_000_000.0,
                    amplitude_multiple: 2.5,
                },
            },
        }
    }

    #[test]
    fn test_strategy_json_shape() {
        let value = serde_json::to_value(volatility_spike()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "symbol": "BTCUSDT",
                "type": "VolatilitySpike",
                "period": "15m",
                "volume": 1_000_000.0,
                "turnover": 50_000_000.0,
                "amplitudeMultiple": 2.5,
            })
        );
    }

    #[test]
    fn test_funding_rate_from_json() {
        let strategy: Strategy = serde_json::from_value(json!({
            "id": 3,
            "symbol": "SOLUSDT",
            "type": "FundingRate",
            "fundingRate": 0.0125,
            "createdAt": "2025-03-01T08:00:00Z",
        }))
        .unwrap();

        assert_eq!(strategy.strategy_type(), StrategyType::FundingRate);
        assert_eq!(strategy.kind.period(), None);
        assert!(strategy.created_at.is_some());
        assert_eq!(
            strategy.kind,
            StrategyKind::FundingRate {
                params: FundingRateParams {
                    funding_rate: 0.0125
                }
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<Strategy, _> = serde_json::from_value(json!({
            "symbol": "BTCUSDT",
            "type": "GridBot",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_wildcard() {
        let mut strategy = volatility_spike();
        assert!(!strategy.is_wildcard());
        strategy.symbol = " * ".to_string();
        assert!(strategy.is_wildcard());
    }

    #[test]
    fn test_period_parse_and_cycle() {
        assert_eq!("30m".parse::<Period>().unwrap(), Period::ThirtyMinutes);
        assert!("2h".parse::<Period>().is_err());
        assert_eq!(Period::OneHour.next(), Period::OneMinute);
        assert_eq!(StrategyType::FundingRate.next(), StrategyType::VolatilitySpike);
    }
}
