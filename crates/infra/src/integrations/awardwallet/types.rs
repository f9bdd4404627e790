//! AwardWallet wire types and canonical mapping

use chrono::NaiveDate;
use serde::Deserialize;
use voyagr_domain::{BalanceUnit, LoyaltyAccount};

#[derive(Debug, Deserialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfoResponse {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectedUserResponse {
    #[serde(default)]
    pub accounts: Vec<RawAccount>,
}

/// One raw per-account record. Field coverage varies per loyalty program;
/// everything beyond the program identity is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccount {
    #[serde(default)]
    pub code: Option<String>,
    pub display_name: String,
    /// Free-text program category ("Airlines", "Hotel chains", ...).
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    /// Some programs report balances as formatted strings.
    #[serde(default)]
    pub balance_raw: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub account_number_masked: Option<String>,
    #[serde(default)]
    pub provider_logo_url: Option<String>,
}

/// Map one raw record into the canonical model. Partial records are kept
/// with optional fields absent rather than dropped.
pub fn map_account(raw: RawAccount) -> LoyaltyAccount {
    let balance = raw
        .balance
        .or_else(|| raw.balance_raw.as_deref().and_then(parse_balance))
        .unwrap_or(0.0);

    let unit = BalanceUnit::from_category(raw.kind.as_deref().unwrap_or_default());

    LoyaltyAccount {
        provider_code: raw.code.unwrap_or_else(|| raw.display_name.clone()),
        provider_name: raw.display_name,
        balance,
        unit,
        elite_status: raw.level,
        expiration_date: raw.expiration_date.as_deref().and_then(parse_date),
        masked_number: raw.account_number_masked,
        logo_url: raw.provider_logo_url,
    }
}

fn parse_balance(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    cleaned.parse().ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Dates arrive as "YYYY-MM-DD" or with a trailing time component.
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_full_record() {
        let raw: RawAccount = serde_json::from_value(serde_json::json!({
            "code": "aa",
            "displayName": "American Airlines (AAdvantage)",
            "kind": "Airlines",
            "balance": 54200.0,
            "level": "Platinum Pro",
            "expirationDate": "2026-06-30",
            "accountNumberMasked": "***4821",
            "providerLogoUrl": "https://cdn.example.com/aa.png"
        }))
        .unwrap();

        let account = map_account(raw);
        assert_eq!(account.provider_code, "aa");
        assert_eq!(account.balance, 54200.0);
        assert_eq!(account.unit, BalanceUnit::Miles);
        assert_eq!(account.elite_status.as_deref(), Some("Platinum Pro"));
        assert_eq!(
            account.expiration_date,
            NaiveDate::from_ymd_opt(2026, 6, 30)
        );
        assert_eq!(account.masked_number.as_deref(), Some("***4821"));
    }

    #[test]
    fn partial_record_keeps_optional_fields_absent() {
        let raw: RawAccount = serde_json::from_value(serde_json::json!({
            "displayName": "Hyatt"
        }))
        .unwrap();

        let account = map_account(raw);
        assert_eq!(account.provider_code, "Hyatt");
        assert_eq!(account.balance, 0.0);
        assert_eq!(account.unit, BalanceUnit::Points);
        assert!(account.elite_status.is_none());
        assert!(account.expiration_date.is_none());
    }

    #[test]
    fn string_balances_are_parsed() {
        let raw: RawAccount = serde_json::from_value(serde_json::json!({
            "displayName": "Marriott Bonvoy",
            "kind": "Hotel chains",
            "balanceRaw": "120,450 points"
        }))
        .unwrap();

        let account = map_account(raw);
        assert_eq!(account.balance, 120450.0);
        assert_eq!(account.unit, BalanceUnit::Nights);
    }

    #[test]
    fn date_with_time_component_still_parses() {
        let raw: RawAccount = serde_json::from_value(serde_json::json!({
            "displayName": "Chase Ultimate Rewards",
            "kind": "Credit cards",
            "expirationDate": "2026-01-15T00:00:00Z"
        }))
        .unwrap();

        let account = map_account(raw);
        assert_eq!(account.unit, BalanceUnit::Credits);
        assert_eq!(account.expiration_date, NaiveDate::from_ymd_opt(2026, 1, 15));
    }
}
