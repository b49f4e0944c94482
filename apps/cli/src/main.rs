use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings, AccountDetailController, AccountListController, AccountsGateway,
    DetailCommand, HttpAccountsGateway, ListState, LoadOutcome,
};
use futures::{Stream, StreamExt};
use shared::{domain::AccountNumber, protocol::Account};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "accounts_cli", about = "Browse published transparent bank accounts")]
struct Args {
    /// Settings file; defaults to ./transparent_accounts.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    api_key: Option<String>,
    #[arg(long, global = true)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List accounts, loading further pages as the previous one is exhausted.
    List {
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show a single account.
    Detail {
        account_number: String,
        /// Reload the account once more after the initial fetch.
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.api_base_url = base_url;
    }
    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size.max(1);
    }
    if let Command::List {
        filter: Some(filter),
        ..
    } = &args.command
    {
        settings.filter = Some(filter.clone());
    }
    if settings.api_key.is_empty() {
        warn!("no API key configured; the accounts API will likely reject requests");
    }

    let gateway: Arc<dyn AccountsGateway> = Arc::new(
        HttpAccountsGateway::from_settings(&settings)
            .context("failed to build accounts gateway")?,
    );

    match args.command {
        Command::List { pages, .. } => run_list(gateway, settings.page_size, pages).await,
        Command::Detail {
            account_number,
            refresh,
        } => run_detail(gateway, AccountNumber::from(account_number), refresh).await,
    }
}

async fn run_list(gateway: Arc<dyn AccountsGateway>, page_size: u32, max_pages: u32) -> Result<()> {
    let (controller, initial_load) = AccountListController::create(gateway, page_size);
    let transitions = tokio::spawn(log_list_transitions(controller.state_stream()));

    let mut outcome = initial_load.await.context("initial account load task failed")?;
    let mut pages_loaded = 0u32;
    let mut printed = 0usize;
    loop {
        let state = controller.state();
        if let LoadOutcome::Failed(_) = outcome {
            transitions.abort();
            bail!("{}", state.error_message);
        }
        if outcome == LoadOutcome::Loaded {
            pages_loaded += 1;
        }

        for account in &state.items[printed..] {
            print_account_row(account);
        }
        printed = state.items.len();

        let last_visible = printed.saturating_sub(1);
        if pages_loaded >= max_pages.max(1) || !state.should_load_more(last_visible) {
            if state.is_last_page {
                println!("-- end of list --");
            }
            break;
        }
        outcome = controller.load_next_page(false).await;
    }

    transitions.abort();
    println!("{printed} accounts shown");
    Ok(())
}

async fn run_detail(
    gateway: Arc<dyn AccountsGateway>,
    account_number: AccountNumber,
    refresh: bool,
) -> Result<()> {
    let (controller, initial_load) =
        AccountDetailController::create(gateway, account_number.clone());
    let mut outcome = initial_load.await.context("account detail task failed")?;
    if refresh && outcome == LoadOutcome::Loaded {
        outcome = controller
            .dispatch(DetailCommand::Refresh(account_number.clone()))
            .await
            .context("account refresh task failed")?;
    }

    let state = controller.state();
    if let LoadOutcome::Failed(_) = outcome {
        bail!("{}", state.error_message);
    }
    let account = state
        .account
        .ok_or_else(|| anyhow!("account {account_number} was not returned"))?;
    print_account_detail(&account);
    Ok(())
}

async fn log_list_transitions(updates: impl Stream<Item = ListState>) {
    let mut updates = std::pin::pin!(updates);
    while let Some(state) = updates.next().await {
        debug!(
            loading = state.is_loading,
            items = state.items.len(),
            cursor = state.current_page_cursor,
            last_page = state.is_last_page,
            "account list state changed"
        );
    }
}

fn print_account_row(account: &Account) {
    println!(
        "{:<22} {:>18}  {}",
        format!("{}/{}", account.account_number, account.bank_code),
        account.balance_display(),
        account.name
    );
}

fn print_account_detail(account: &Account) {
    println!("{}", account.name);
    println!(
        "  account:       {}/{}",
        account.account_number, account.bank_code
    );
    if let Some(iban) = &account.iban {
        println!("  iban:          {iban}");
    }
    println!("  balance:       {}", account.balance_display());
    println!(
        "  transparent:   {} - {}",
        account.transparency_from_display(),
        account.transparency_to_display()
    );
    println!("  published to:  {}", account.publication_to_display());
    println!("  updated:       {}", account.actualization_date_display());
    if !account.description.is_empty() {
        println!("  description:   {}", account.description);
    }
    if let Some(note) = &account.note {
        println!("  note:          {note}");
    }
    for statement in &account.statements {
        println!("  statement:     {statement}");
    }
}
