//! Scripted in-memory gateway shared by controller tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    domain::AccountNumber,
    protocol::{Account, AccountPage},
};
use tokio::sync::{oneshot, Mutex};

use crate::{AccountsGateway, GatewayError};

pub(crate) fn sample_account(n: usize) -> Account {
    Account {
        account_number: AccountNumber::new(format!("000000-{n:010}")),
        bank_code: "0800".into(),
        transparency_from: "2016-08-18T00:00:00".into(),
        transparency_to: "3000-01-01T00:00:00".into(),
        publication_to: "3000-01-01T00:00:00".into(),
        actualization_date: "2018-01-17T13:00:00".into(),
        balance: Decimal::new(n as i64 * 100 + 25, 2),
        currency: "CZK".into(),
        name: format!("Account {n}"),
        description: String::new(),
        note: None,
        iban: None,
        statements: Vec::new(),
    }
}

pub(crate) fn sample_accounts(range: std::ops::Range<usize>) -> Vec<Account> {
    range.map(sample_account).collect()
}

pub(crate) fn sample_page(
    page_number: u32,
    page_count: u32,
    next_page: Option<u32>,
    accounts: Vec<Account>,
) -> AccountPage {
    AccountPage {
        page_number,
        page_count,
        page_size: 10,
        record_count: 0,
        next_page,
        accounts,
        statements: Vec::new(),
    }
}

pub(crate) fn unavailable() -> GatewayError {
    GatewayError::status(503, "/transparentAccounts/")
}

/// Replays queued responses in order and records every call.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    pages: Mutex<VecDeque<Result<AccountPage, GatewayError>>>,
    details: Mutex<VecDeque<Result<Account, GatewayError>>>,
    pub(crate) page_calls: Mutex<Vec<(u32, u32)>>,
    pub(crate) detail_calls: Mutex<Vec<String>>,
    hold: Mutex<Option<oneshot::Receiver<()>>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_pages(
        pages: impl IntoIterator<Item = Result<AccountPage, GatewayError>>,
    ) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn with_details(
        details: impl IntoIterator<Item = Result<Account, GatewayError>>,
    ) -> Self {
        Self {
            details: Mutex::new(details.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) async fn push_page(&self, page: Result<AccountPage, GatewayError>) {
        self.pages.lock().await.push_back(page);
    }

    /// The next fetch blocks until the returned sender fires or is dropped.
    pub(crate) async fn hold_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.lock().await = Some(rx);
        tx
    }

    pub(crate) async fn page_call_count(&self) -> usize {
        self.page_calls.lock().await.len()
    }

    async fn wait_if_held(&self) {
        let hold = self.hold.lock().await.take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
    }
}

#[async_trait]
impl AccountsGateway for ScriptedGateway {
    async fn fetch_accounts_page(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<AccountPage, GatewayError> {
        self.page_calls.lock().await.push((page_index, page_size));
        self.wait_if_held().await;
        self.pages
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn fetch_account_by_id(&self, id: &str) -> Result<Account, GatewayError> {
        self.detail_calls.lock().await.push(id.to_string());
        self.wait_if_held().await;
        self.details
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}
