//! Strategy model.
//!
//! Strategies are closed tagged variants (`VolatilitySpike`,
//! `ConsecutiveMove`, `FundingRate`) sharing an ID and symbol. This module
//! holds the typed model, the backend record codec, and the form draft used
//! to create or edit one.

mod form;
mod model;
mod record;

pub use form::{FormField, StrategyForm};
pub use model::{
    ConsecutiveMoveParams, FundingRateParams, Period, Strategy, StrategyId, StrategyKind,
    StrategyType, VolatilitySpikeParams,
};
pub use record::StrategyRecord;
