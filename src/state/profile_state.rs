//! Account and payment history state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// The signed-in user, as returned by `GetProfile`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub telegram_name: String,
    /// Strategy quota. Zero means the user has no subscription.
    pub max_strategies: u32,
    pub active: bool,
    #[serde(deserialize_with = "optional_timestamp")]
    pub subscription_start: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "optional_timestamp")]
    pub subscription_end: Option<DateTime<Utc>>,
    pub email: String,
    pub avatar: String,
    pub telegram_chat_id: String,
    pub telegram_thread_id: String,
}

impl UserProfile {
    /// Whether the user has an active subscription quota.
    pub fn is_subscribed(&self) -> bool {
        self.max_strategies > 0
    }

    /// Bound notification target, `chatId,threadId` with empty parts dropped.
    pub fn bind_info(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.telegram_chat_id.as_str(),
            self.telegram_thread_id.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        (!parts.is_empty()).then(|| parts.join(","))
    }

    /// Whole days of subscription left at `now`, if a subscription end is known.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.subscription_end
            .map(|end| crate::format::days_until(end, now))
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        if self.telegram_name.is_empty() {
            "Telegram user"
        } else {
            &self.telegram_name
        }
    }
}

/// A subscription payment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub invoice_id: String,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(deserialize_with = "optional_timestamp")]
    pub paid_at: Option<DateTime<Utc>>,
    pub chain: String,
    pub tx_hash: String,
}

impl Invoice {
    /// Block explorer link for the payment transaction.
    pub fn explorer_url(&self) -> Option<String> {
        if self.tx_hash.is_empty() {
            return None;
        }
        match self.chain.to_ascii_lowercase().as_str() {
            "bsc" => Some(format!("https://bscscan.com/tx/{}", self.tx_hash)),
            _ => None,
        }
    }
}

fn optional_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// State for the profile page.
#[derive(Debug)]
pub struct ProfileState {
    /// Signed-in user, `None` when signed out.
    pub user: Option<UserProfile>,
    /// Current invoice page.
    pub invoices: Vec<Invoice>,
    /// 1-based invoice page number.
    pub page: u32,
    pub page_size: u32,
    /// Selected invoice row.
    pub selected_invoice: Option<usize>,
    /// Email being typed, `Some` while editing.
    pub email_draft: Option<String>,
    pub loading: bool,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            user: None,
            invoices: Vec::new(),
            page: 1,
            page_size: 10,
            selected_invoice: None,
            email_draft: None,
            loading: false,
        }
    }
}

impl ProfileState {
    /// Whether the email field is being edited.
    pub fn is_editing_email(&self) -> bool {
        self.email_draft.is_some()
    }

    /// Whether a full page came back, so a next page may exist.
    pub fn has_next_page(&self) -> bool {
        self.invoices.len() as u32 >= self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_profile_from_json() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "telegramId": 42,
                "telegramName": "alice",
                "maxStrategies": 20,
                "active": true,
                "subscriptionStart": "",
                "subscriptionEnd": "2026-11-15T00:00:00Z",
                "telegramChatId": "-100123",
                "telegramThreadId": "7"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.telegram_id, 42);
        assert!(profile.is_subscribed());
        assert_eq!(profile.subscription_start, None);
        assert_eq!(profile.bind_info().as_deref(), Some("-100123,7"));

        let now = Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap();
        assert_eq!(profile.days_remaining(now), Some(30));
    }

    #[test]
    fn test_bind_info_without_thread() {
        let profile = UserProfile {
            telegram_chat_id: "555".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.bind_info().as_deref(), Some("555"));
        assert_eq!(UserProfile::default().bind_info(), None);
    }

    #[test]
    fn test_invoice_from_json() {
        let invoice: Invoice = serde_json::from_str(
            r#"{
                "invoiceId": "inv-1",
                "status": "paid",
                "amount": "25",
                "currency": "USDT",
                "paidAt": "2026-03-01T08:30:00Z",
                "chain": "BSC",
                "txHash": "0xabc"
            }"#,
        )
        .unwrap();

        assert_eq!(invoice.amount, dec!(25));
        assert_eq!(
            invoice.explorer_url().as_deref(),
            Some("https://bscscan.com/tx/0xabc")
        );
    }

    #[test]
    fn test_explorer_url_only_for_bsc() {
        let invoice = Invoice {
            chain: "TRON".to_string(),
            tx_hash: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(invoice.explorer_url(), None);
    }
}
