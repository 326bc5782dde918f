use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The smart fund is a dual-currency ledger; balances never convert between
/// the two sides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Syp,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Syp];

    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Syp => "syp",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Syp => "SYP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "usd" | "$" => Ok(Currency::Usd),
            "syp" | "sp" => Ok(Currency::Syp),
            _ => Err(ParseCurrencyError {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCurrencyError {
    value: String,
}

impl fmt::Display for ParseCurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid currency '{}': expected one of {}",
            self.value,
            Currency::ALL
                .iter()
                .map(|currency| currency.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseCurrencyError {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FundKind {
    Deposit,
    Expense,
}

impl FundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FundKind::Deposit => "deposit",
            FundKind::Expense => "expense",
        }
    }
}

impl FromStr for FundKind {
    type Err = ParseFundKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deposit" | "in" => Ok(FundKind::Deposit),
            "expense" | "spend" | "out" => Ok(FundKind::Expense),
            _ => Err(ParseFundKindError {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFundKindError {
    value: String,
}

impl fmt::Display for ParseFundKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid fund entry kind '{}': expected deposit or expense",
            self.value
        )
    }
}

impl Error for ParseFundKindError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundTransaction {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    pub kind: FundKind,
    pub currency: Currency,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundBalance {
    pub usd: f64,
    pub syp: f64,
}

/// Folded from the project's transactions on every read; there is no
/// persisted running balance.
pub fn balance_for_project(transactions: &[FundTransaction], project_id: &str) -> FundBalance {
    let mut balance = FundBalance::default();
    for txn in transactions {
        if txn.project_id != project_id {
            continue;
        }
        let signed = match txn.kind {
            FundKind::Deposit => txn.amount,
            FundKind::Expense => -txn.amount,
        };
        match txn.currency {
            Currency::Usd => balance.usd += signed,
            Currency::Syp => balance.syp += signed,
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{balance_for_project, Currency, FundKind, FundTransaction};

    fn txn(project_id: &str, kind: FundKind, currency: Currency, amount: f64) -> FundTransaction {
        FundTransaction {
            id: format!("f-{amount}"),
            created_at: "2026-03-01T10:00:00Z".to_string(),
            project_id: project_id.to_string(),
            kind,
            currency,
            amount,
            note: None,
        }
    }

    #[test]
    fn balance_folds_deposits_and_expenses_per_currency() {
        let transactions = vec![
            txn("p1", FundKind::Deposit, Currency::Usd, 100.0),
            txn("p1", FundKind::Expense, Currency::Usd, 40.0),
            txn("p1", FundKind::Deposit, Currency::Syp, 5000.0),
        ];
        let balance = balance_for_project(&transactions, "p1");
        assert_eq!(balance.usd, 60.0);
        assert_eq!(balance.syp, 5000.0);
    }

    #[test]
    fn balance_ignores_other_projects() {
        let transactions = vec![
            txn("p1", FundKind::Deposit, Currency::Usd, 100.0),
            txn("p2", FundKind::Deposit, Currency::Usd, 900.0),
        ];
        let balance = balance_for_project(&transactions, "p1");
        assert_eq!(balance.usd, 100.0);
        assert_eq!(balance.syp, 0.0);
    }

    #[test]
    fn parses_currency_and_kind_aliases() {
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("sp").unwrap(), Currency::Syp);
        assert!(Currency::from_str("eur").is_err());

        assert_eq!(FundKind::from_str("spend").unwrap(), FundKind::Expense);
        assert_eq!(FundKind::from_str("in").unwrap(), FundKind::Deposit);
        assert!(FundKind::from_str("loan").is_err());
    }
}
