//! Editable draft behind the add/edit strategy screen.

use super::model::{
    ConsecutiveMoveParams, FundingRateParams, Period, Strategy, StrategyId, StrategyKind,
    StrategyType, VolatilitySpikeParams,
};
use crate::error::{Error, Result};

/// A field of the strategy form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Type,
    Symbol,
    Period,
    Volume,
    Turnover,
    AmplitudeMultiple,
    Count,
    FundingRate,
}

impl FormField {
    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Type => "Strategy type",
            Self::Symbol => "Symbol",
            Self::Period => "Period",
            Self::Volume => "Volume",
            Self::Turnover => "Turnover",
            Self::AmplitudeMultiple => "Amplitude multiple",
            Self::Count => "Consecutive count",
            Self::FundingRate => "Funding rate",
        }
    }

    /// Whether the field is chosen from a fixed set rather than typed.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Type | Self::Period)
    }
}

const VOLATILITY_SPIKE_FIELDS: &[FormField] = &[
    FormField::Type,
    FormField::Symbol,
    FormField::Period,
    FormField::Volume,
    FormField::Turnover,
    FormField::AmplitudeMultiple,
];

const CONSECUTIVE_MOVE_FIELDS: &[FormField] = &[
    FormField::Type,
    FormField::Symbol,
    FormField::Period,
    FormField::Count,
    FormField::Turnover,
];

const FUNDING_RATE_FIELDS: &[FormField] =
    &[FormField::Type, FormField::Symbol, FormField::FundingRate];

/// Draft of a strategy being added or edited.
///
/// Numeric inputs are kept as text until [`StrategyForm::build`] so partial
/// input such as `2.` can be typed.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyForm {
    /// ID of the strategy being edited, `None` when adding.
    pub editing: Option<StrategyId>,
    pub strategy_type: StrategyType,
    pub symbol: String,
    pub period: Period,
    pub volume: String,
    pub turnover: String,
    pub amplitude_multiple: String,
    pub count: String,
    pub funding_rate: String,
    focus: usize,
}

impl Default for StrategyForm {
    fn default() -> Self {
        Self {
            editing: None,
            strategy_type: StrategyType::VolatilitySpike,
            symbol: String::new(),
            period: Period::FifteenMinutes,
            volume: "1000000".to_string(),
            turnover: "50000000".to_string(),
            amplitude_multiple: "2.5".to_string(),
            count: "3".to_string(),
            funding_rate: "0.01".to_string(),
            focus: 0,
        }
    }
}

impl StrategyForm {
    /// Blank form for a new strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing strategy.
    pub fn edit(strategy: &Strategy) -> Self {
        let mut form = Self {
            editing: Some(strategy.id),
            strategy_type: strategy.strategy_type(),
            symbol: strategy.symbol.clone(),
            ..Self::default()
        };

        match &strategy.kind {
            StrategyKind::VolatilitySpike { period, params } => {
                form.period = *period;
                form.volume = params.volume.to_string();
                form.turnover = params.turnover.to_string();
                form.amplitude_multiple = params.amplitude_multiple.to_string();
            }
            StrategyKind::ConsecutiveMove { period, params } => {
                form.period = *period;
                form.count = params.count.to_string();
                form.turnover = params.turnover.to_string();
            }
            StrategyKind::FundingRate { params } => {
                form.funding_rate = params.funding_rate.to_string();
            }
        }

        form
    }

    /// Whether this form edits an existing strategy.
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Fields shown for the selected type, in order.
    pub fn fields(&self) -> &'static [FormField] {
        match self.strategy_type {
            StrategyType::VolatilitySpike => VOLATILITY_SPIKE_FIELDS,
            StrategyType::ConsecutiveMove => CONSECUTIVE_MOVE_FIELDS,
            StrategyType::FundingRate => FUNDING_RATE_FIELDS,
        }
    }

    /// Field that currently receives input.
    pub fn focused(&self) -> FormField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    /// Move focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    /// Move focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Cycle the focused choice field (type or period).
    pub fn cycle_choice(&mut self) {
        match self.focused() {
            FormField::Type => {
                self.strategy_type = self.strategy_type.next();
                self.focus = 0;
            }
            FormField::Period => self.period = self.period.next(),
            _ => {}
        }
    }

    /// Type a character into the focused text field.
    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focused()) {
            text.push(c);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut(self.focused()) {
            text.pop();
        }
    }

    /// Display value of a field.
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Type => self.strategy_type.label().to_string(),
            FormField::Symbol => self.symbol.clone(),
            FormField::Period => self.period.to_string(),
            FormField::Volume => self.volume.clone(),
            FormField::Turnover => self.turnover.clone(),
            FormField::AmplitudeMultiple => self.amplitude_multiple.clone(),
            FormField::Count => self.count.clone(),
            FormField::FundingRate => self.funding_rate.clone(),
        }
    }

    /// Validate the draft and produce a strategy.
    pub fn build(&self) -> Result<Strategy> {
        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err(Error::invalid_input("Symbol is required"));
        }

        let kind = match self.strategy_type {
            StrategyType::VolatilitySpike => StrategyKind::VolatilitySpike {
                period: self.period,
                params: VolatilitySpikeParams {
                    volume: parse_non_negative(FormField::Volume, &self.volume)?,
                    turnover: parse_non_negative(FormField::Turnover, &self.turnover)?,
                    amplitude_multiple: parse_positive(
                        FormField::AmplitudeMultiple,
                        &self.amplitude_multiple,
                    )?,
                },
            },
            StrategyType::ConsecutiveMove => StrategyKind::ConsecutiveMove {
                period: self.period,
                params: ConsecutiveMoveParams {
                    count: parse_count(&self.count)?,
                    turnover: parse_non_negative(FormField::Turnover, &self.turnover)?,
                },
            },
            StrategyType::FundingRate => StrategyKind::FundingRate {
                params: FundingRateParams {
                    funding_rate: parse_number(FormField::FundingRate, &self.funding_rate)?,
                },
            },
        };

        Ok(Strategy {
            id: self.editing.unwrap_or_default(),
            symbol: symbol.to_string(),
            created_at: None,
            kind,
        })
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Symbol => Some(&mut self.symbol),
            FormField::Volume => Some(&mut self.volume),
            FormField::Turnover => Some(&mut self.turnover),
            FormField::AmplitudeMultiple => Some(&mut self.amplitude_multiple),
            FormField::Count => Some(&mut self.count),
            FormField::FundingRate => Some(&mut self.funding_rate),
            FormField::Type | FormField::Period => None,
        }
    }
}

fn parse_number(field: FormField, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::invalid_input(format!("{} must be a number", field.label())))
}

fn parse_non_negative(field: FormField, text: &str) -> Result<f64> {
    let value = parse_number(field, text)?;
    if value < 0.0 {
        return Err(Error::invalid_input(format!(
            "{} cannot be negative",
            field.label()
        )));
    }
    Ok(value)
}

fn parse_positive(field: FormField, text: &str) -> Result<f64> {
    let value = parse_number(field, text)?;
    if value <= 0.0 {
        return Err(Error::invalid_input(format!(
            "{} must be greater than zero",
            field.label()
        )));
    }
    Ok(value)
}

fn parse_count(text: &str) -> Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(Error::invalid_input(
            "Consecutive count must be a whole number above zero",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_build_volatility_spike() {
        let mut form = StrategyForm::new();
        form.symbol = "BTCUSDT".to_string();

        let strategy = form.build().unwrap();
        assert_eq!(strategy.id, 0);
        assert_eq!(
            strategy.kind,
            StrategyKind::VolatilitySpike {
                period: Period::FifteenMinutes,
                params: VolatilitySpikeParams {
                    volume: 1_000_000.0,
                    turnover: 50_000_000.0,
                    amplitude_multiple: 2.5,
                },
            }
        );
    }

    #[test]
    fn test_symbol_required() {
        let form = StrategyForm::new();
        assert!(form.build().is_err());
    }

    #[test]
    fn test_cycle_type_changes_fields() {
        let mut form = StrategyForm::new();
        assert_eq!(form.focused(), FormField::Type);
        form.cycle_choice();
        assert_eq!(form.strategy_type, StrategyType::ConsecutiveMove);
        assert_eq!(form.fields(), CONSECUTIVE_MOVE_FIELDS);
        form.cycle_choice();
        assert_eq!(form.fields(), FUNDING_RATE_FIELDS);
    }

    #[test]
    fn test_typing_into_focused_field() {
        let mut form = StrategyForm::new();
        form.focus_next();
        assert_eq!(form.focused(), FormField::Symbol);
        for c in "ETHUSDX".chars() {
            form.push_char(c);
        }
        form.pop_char();
        form.push_char('T');
        assert_eq!(form.symbol, "ETHUSDT");

        form.focus_prev();
        form.push_char('x');
        assert_eq!(form.strategy_type, StrategyType::VolatilitySpike);
    }

    #[test]
    fn test_edit_round_trip() {
        let original = Strategy {
            id: 9,
            symbol: "SOLUSDT".to_string(),
            created_at: None,
            kind: StrategyKind::ConsecutiveMove {
                period: Period::ThirtyMinutes,
                params: ConsecutiveMoveParams {
                    count: 5,
                    turnover: 1_250_000.5,
                },
            },
        };

        let form = StrategyForm::edit(&original);
        assert!(form.is_editing());
        assert_eq!(form.build().unwrap(), original);
    }

    #[test]
    fn test_invalid_numbers() {
        let mut form = StrategyForm::new();
        form.symbol = "BTCUSDT".to_string();
        form.amplitude_multiple = "0".to_string();
        assert!(form.build().is_err());

        form.amplitude_multiple = "2".to_string();
        form.volume = "lots".to_string();
        assert!(form.build().is_err());

        form.strategy_type = StrategyType::ConsecutiveMove;
        form.count = "0".to_string();
        assert!(form.build().is_err());

        form.strategy_type = StrategyType::FundingRate;
        form.funding_rate = "-0.005".to_string();
        assert!(form.build().is_ok());
    }
}
