use std::sync::Arc;

use shared::{domain::AccountNumber, error::LoadFailure, protocol::Account};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::{loading::LoadingGuard, AccountsGateway, LoadOutcome, SkipReason};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub account: Option<Account>,
    pub is_loading: bool,
    pub error_message: String,
}

impl DetailState {
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailCommand {
    Load(AccountNumber),
    Refresh(AccountNumber),
}

pub struct AccountDetailController {
    gateway: Arc<dyn AccountsGateway>,
    state: watch::Sender<DetailState>,
}

impl AccountDetailController {
    pub fn new(gateway: Arc<dyn AccountsGateway>) -> Arc<Self> {
        let (state, _) = watch::channel(DetailState::default());
        Arc::new(Self { gateway, state })
    }

    /// Builds a controller for `account_number` and dispatches its first load.
    pub fn create(
        gateway: Arc<dyn AccountsGateway>,
        account_number: AccountNumber,
    ) -> (Arc<Self>, JoinHandle<LoadOutcome>) {
        let controller = Self::new(gateway);
        let initial_load = controller.dispatch(DetailCommand::Load(account_number));
        (controller, initial_load)
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<DetailState> {
        WatchStream::new(self.state.subscribe())
    }

    pub fn dispatch(self: &Arc<Self>, command: DetailCommand) -> JoinHandle<LoadOutcome> {
        debug!(?command, "dispatching account detail command");
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            match command {
                DetailCommand::Load(id) => controller.load_detail(id.as_str()).await,
                DetailCommand::Refresh(id) => controller.refresh_detail(id.as_str()).await,
            }
        })
    }

    pub async fn refresh_detail(&self, id: &str) -> LoadOutcome {
        self.load_detail(id).await
    }

    pub async fn load_detail(&self, id: &str) -> LoadOutcome {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.error_message.clear();
            true
        });
        if !started {
            debug!(account = id, "skipping account detail load");
            return LoadOutcome::Skipped(SkipReason::AlreadyLoading);
        }

        let guard = LoadingGuard::new(&self.state, |state: &mut DetailState| {
            state.is_loading = false;
        });

        match self.gateway.fetch_account_by_id(id).await {
            Ok(account) => {
                info!(account = id, "loaded account detail");
                guard.settle(|state| state.account = Some(account));
                LoadOutcome::Loaded
            }
            Err(err) => {
                warn!(account = id, error = %err, "failed to load account detail");
                let failure = LoadFailure::DetailLoadFailed;
                guard.settle(|state| state.error_message = failure.message());
                LoadOutcome::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/detail_controller_tests.rs"]
mod tests;
