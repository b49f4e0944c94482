use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{domain::AccountNumber, format::to_display_date};

/// A single transparent account as published by the accounts API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: AccountNumber,
    pub bank_code: String,
    /// Date from which the account is transparent.
    pub transparency_from: String,
    /// Date until which the account is transparent, inclusive.
    pub transparency_to: String,
    /// Date until which published entries are valid.
    pub publication_to: String,
    pub actualization_date: String,
    pub balance: Decimal,
    #[serde(default)]
    pub currency: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default)]
    pub statements: Vec<String>,
}

impl Account {
    pub fn transparency_from_display(&self) -> String {
        to_display_date(&self.transparency_from)
    }

    pub fn transparency_to_display(&self) -> String {
        to_display_date(&self.transparency_to)
    }

    pub fn publication_to_display(&self) -> String {
        to_display_date(&self.publication_to)
    }

    pub fn actualization_date_display(&self) -> String {
        to_display_date(&self.actualization_date)
    }

    pub fn balance_display(&self) -> String {
        if self.currency.is_empty() {
            self.balance.to_string()
        } else {
            format!("{} {}", self.balance, self.currency)
        }
    }
}

/// One page of the paginated account listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPage {
    pub page_number: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub record_count: u64,
    /// `None` when the server has no further pages.
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub statements: Vec<String>,
}
