//! Subscription plan selection and payment state.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A subscription plan offered for purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in USDT.
    pub price: Decimal,
    pub duration_days: u32,
    pub badge: Option<&'static str>,
    pub popular: bool,
}

/// Wallet a payment can be made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wallet {
    Binance,
    MetaMask,
}

impl Wallet {
    pub const ALL: [Wallet; 2] = [Wallet::Binance, Wallet::MetaMask];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Binance => "Binance Wallet",
            Self::MetaMask => "MetaMask",
        }
    }
}

/// The fixed plan catalogue.
pub fn plans() -> Vec<Plan> {
    vec![
        Plan {
            id: "monthly",
            name: "Monthly",
            price: dec!(10),
            duration_days: 30,
            badge: None,
            popular: false,
        },
        Plan {
            id: "quarterly",
            name: "Quarterly",
            price: dec!(25),
            duration_days: 90,
            badge: Some("Save 16%"),
            popular: true,
        },
        Plan {
            id: "yearly",
            name: "Yearly",
            price: dec!(85),
            duration_days: 365,
            badge: Some("Save 29%"),
            popular: false,
        },
    ]
}

/// Which list receives up/down input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionFocus {
    #[default]
    Plans,
    Wallets,
}

/// State for the subscription page.
#[derive(Debug)]
pub struct SubscriptionState {
    pub plans: Vec<Plan>,
    pub selected_plan: usize,
    /// Wallet cursor position.
    pub wallet_cursor: usize,
    /// Chosen wallet. Payment is disabled until one is picked.
    pub selected_wallet: Option<Wallet>,
    pub focus: SubscriptionFocus,
    pub paying: bool,
}

impl Default for SubscriptionState {
    fn default() -> Self {
        let plans = plans();
        let selected_plan = plans.iter().position(|p| p.popular).unwrap_or(0);
        Self {
            plans,
            selected_plan,
            wallet_cursor: 0,
            selected_wallet: None,
            focus: SubscriptionFocus::default(),
            paying: false,
        }
    }
}

impl SubscriptionState {
    /// Currently selected plan.
    pub fn plan(&self) -> Option<&Plan> {
        self.plans.get(self.selected_plan)
    }

    /// Whether the pay button is enabled.
    pub fn can_pay(&self) -> bool {
        self.selected_wallet.is_some() && !self.paying
    }

    /// Move the cursor of the focused list.
    pub fn move_cursor(&mut self, delta: i32) {
        match self.focus {
            SubscriptionFocus::Plans => {
                self.selected_plan = step(self.selected_plan, delta, self.plans.len());
            }
            SubscriptionFocus::Wallets => {
                self.wallet_cursor = step(self.wallet_cursor, delta, Wallet::ALL.len());
            }
        }
    }
}

fn step(current: usize, delta: i32, len: usize) -> usize {
    let max = len.saturating_sub(1) as i32;
    (current as i32 + delta).clamp(0, max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarterly_selected_by_default() {
        let state = SubscriptionState::default();
        let plan = state.plan().unwrap();
        assert_eq!(plan.id, "quarterly");
        assert_eq!(plan.price, dec!(25));
        assert!(!state.can_pay());
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut state = SubscriptionState::default();
        state.move_cursor(5);
        assert_eq!(state.selected_plan, 2);
        state.move_cursor(-9);
        assert_eq!(state.selected_plan, 0);

        state.focus = SubscriptionFocus::Wallets;
        state.move_cursor(1);
        assert_eq!(state.wallet_cursor, 1);
        assert_eq!(state.selected_plan, 0);
    }
}
