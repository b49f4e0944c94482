//! Paginated account list: page cursor bookkeeping, accumulation and
//! end-of-data detection.

use std::sync::Arc;

use shared::{error::LoadFailure, protocol::Account};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::{loading::LoadingGuard, AccountsGateway, LoadOutcome, SkipReason};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Snapshot of the list as presentation sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// Accounts in server order. Overlapping pages are not deduplicated.
    pub items: Vec<Account>,
    /// Zero-based index of the next page to request.
    pub current_page_cursor: u32,
    pub is_last_page: bool,
    pub is_loading: bool,
    /// Empty when the last command did not fail.
    pub error_message: String,
}

impl ListState {
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Infinite-scroll trigger: true once the item at `visible_index` is the
    /// last loaded one and another page can be requested.
    pub fn should_load_more(&self, visible_index: usize) -> bool {
        !self.is_loading
            && !self.is_last_page
            && !self.items.is_empty()
            && visible_index + 1 >= self.items.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    Initialize,
    LoadNextPage,
    Refresh,
}

pub struct AccountListController {
    gateway: Arc<dyn AccountsGateway>,
    page_size: u32,
    state: watch::Sender<ListState>,
}

impl AccountListController {
    pub fn new(gateway: Arc<dyn AccountsGateway>, page_size: u32) -> Arc<Self> {
        let (state, _) = watch::channel(ListState::default());
        Arc::new(Self {
            gateway,
            page_size: page_size.max(1),
            state,
        })
    }

    /// Builds a controller and dispatches its initial load right away.
    pub fn create(
        gateway: Arc<dyn AccountsGateway>,
        page_size: u32,
    ) -> (Arc<Self>, JoinHandle<LoadOutcome>) {
        let controller = Self::new(gateway, page_size);
        let initial_load = controller.dispatch(ListCommand::Initialize);
        (controller, initial_load)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<ListState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Runs `command` on a spawned task. Must be called within a tokio runtime.
    pub fn dispatch(self: &Arc<Self>, command: ListCommand) -> JoinHandle<LoadOutcome> {
        debug!(?command, "dispatching account list command");
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            match command {
                ListCommand::Initialize => controller.initialize().await,
                ListCommand::LoadNextPage => controller.load_next_page(false).await,
                ListCommand::Refresh => controller.refresh().await,
            }
        })
    }

    pub async fn initialize(&self) -> LoadOutcome {
        self.load_next_page(true).await
    }

    pub async fn refresh(&self) -> LoadOutcome {
        self.load_next_page(true).await
    }

    pub async fn load_next_page(&self, reset: bool) -> LoadOutcome {
        let page_index = match self.begin_load(reset) {
            Ok(page_index) => page_index,
            Err(reason) => {
                debug!(?reason, reset, "skipping account page load");
                return LoadOutcome::Skipped(reason);
            }
        };

        let guard = LoadingGuard::new(&self.state, |state: &mut ListState| {
            state.is_loading = false;
        });

        match self
            .gateway
            .fetch_accounts_page(page_index, self.page_size)
            .await
        {
            Ok(page) => {
                info!(
                    page_index,
                    page_count = page.page_count,
                    accounts = page.accounts.len(),
                    "loaded account page"
                );
                guard.settle(|state| {
                    state.items.extend(page.accounts);
                    let at_final_page =
                        state.current_page_cursor.saturating_add(1) >= page.page_count;
                    if page.next_page.is_none() || at_final_page {
                        state.is_last_page = true;
                    } else {
                        state.current_page_cursor += 1;
                    }
                });
                LoadOutcome::Loaded
            }
            Err(err) => {
                warn!(page_index, error = %err, "failed to load account page");
                let failure = LoadFailure::ListLoadFailed;
                guard.settle(|state| state.error_message = failure.message());
                LoadOutcome::Failed(failure)
            }
        }
    }

    /// Applies the reset and marks the list loading in one atomic transition.
    /// Returns the page to request, or why nothing should be fetched.
    fn begin_load(&self, reset: bool) -> Result<u32, SkipReason> {
        let mut started = Err(SkipReason::AlreadyLoading);
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            if reset {
                state.items.clear();
                state.current_page_cursor = 0;
                state.is_last_page = false;
            }
            if state.is_last_page {
                started = Err(SkipReason::LastPageReached);
                return false;
            }
            state.is_loading = true;
            state.error_message.clear();
            started = Ok(state.current_page_cursor);
            true
        });
        started
    }
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
