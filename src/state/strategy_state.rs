//! Strategy list state.

use crate::error::{Error, Result};
use crate::strategy::{Strategy, StrategyForm, StrategyId, StrategyType};
use chrono::{DateTime, Utc};

/// Backend call an accepted form turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Add(Strategy),
    Update(Strategy),
}

impl Submission {
    pub fn strategy(&self) -> &Strategy {
        match self {
            Self::Add(strategy) | Self::Update(strategy) => strategy,
        }
    }
}

/// State for the strategy management page.
#[derive(Debug, Default)]
pub struct StrategyState {
    /// Strategies in backend order.
    pub strategies: Vec<Strategy>,
    /// Index into [`StrategyState::display_order`].
    pub selected_index: Option<usize>,
    /// Open add/edit form.
    pub form: Option<StrategyForm>,
    /// Whether strategies are currently loading.
    pub loading: bool,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl StrategyState {
    /// Strategies grouped by type, in the order they are listed on screen.
    pub fn grouped(&self) -> Vec<(StrategyType, Vec<&Strategy>)> {
        StrategyType::ALL
            .iter()
            .filter_map(|ty| {
                let items: Vec<&Strategy> = self
                    .strategies
                    .iter()
                    .filter(|s| s.strategy_type() == *ty)
                    .collect();
                (!items.is_empty()).then_some((*ty, items))
            })
            .collect()
    }

    /// Strategies flattened in on-screen order.
    pub fn display_order(&self) -> Vec<&Strategy> {
        self.grouped()
            .into_iter()
            .flat_map(|(_, items)| items)
            .collect()
    }

    /// Currently selected strategy.
    pub fn selected(&self) -> Option<&Strategy> {
        self.selected_index
            .and_then(|i| self.display_order().get(i).copied())
    }

    /// Whether the add/edit form is open.
    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    /// Validate the open form into a backend call.
    ///
    /// Returns `Ok(None)` when no form is open. The wildcard symbol is only
    /// allowed for subscribed users.
    pub fn submission(&self, subscribed: bool) -> Result<Option<Submission>> {
        let Some(form) = &self.form else {
            return Ok(None);
        };
        let strategy = form.build()?;
        if strategy.is_wildcard() && !subscribed {
            return Err(Error::invalid_input("Subscribe to watch every pair with *"));
        }

        Ok(Some(if form.is_editing() {
            Submission::Update(strategy)
        } else {
            Submission::Add(strategy)
        }))
    }

    /// Replace a strategy with the same ID.
    pub fn replace(&mut self, strategy: Strategy) {
        if let Some(existing) = self.strategies.iter_mut().find(|s| s.id == strategy.id) {
            *existing = strategy;
        }
    }

    /// Remove a strategy by ID, keeping the selection in range.
    pub fn remove(&mut self, id: StrategyId) {
        self.strategies.retain(|s| s.id != id);
        self.clamp_selection();
    }

    /// Keep the selection within the list.
    pub fn clamp_selection(&mut self) {
        let len = self.strategies.len();
        self.selected_index = match (self.selected_index, len) {
            (_, 0) => None,
            (Some(i), _) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }
}
