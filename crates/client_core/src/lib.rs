use async_trait::async_trait;
use shared::{
    error::LoadFailure,
    protocol::{Account, AccountPage},
};

pub mod config;
pub mod detail_controller;
pub mod error;
pub mod http_gateway;
pub mod list_controller;
mod loading;

pub use detail_controller::{AccountDetailController, DetailCommand, DetailState};
pub use error::GatewayError;
pub use http_gateway::HttpAccountsGateway;
pub use list_controller::{AccountListController, ListCommand, ListState, DEFAULT_PAGE_SIZE};

/// Read-only access to the remote account catalog.
///
/// Every failure surfaces through the returned `Result`; implementations must
/// not panic on transport or decoding problems.
#[async_trait]
pub trait AccountsGateway: Send + Sync {
    async fn fetch_accounts_page(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<AccountPage, GatewayError>;
    async fn fetch_account_by_id(&self, id: &str) -> Result<Account, GatewayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyLoading,
    LastPageReached,
}

/// What a controller command did. Failures are also recorded in state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Skipped(SkipReason),
    Failed(LoadFailure),
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
