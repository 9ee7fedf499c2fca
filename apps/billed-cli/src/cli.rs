//! # billed CLI
//!
//! Command parsing and orchestration. The pipelines live in `billed-app`;
//! this module only wires them to an in-memory store, a console view and a
//! console navigator.
//!
//! ```text
//! billed list   --fixture bills.json [--config config.toml] [--fail-list 404|500]
//! billed submit --fixture bills.json --email a@a --file receipt.jpg \
//!               --type "Transports" --date 2022-12-03 --amount 400 [...]
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use billed_app::{AppConfig, Bills, BillsPage, NewBill, NewBillView, Navigator, Route};
use billed_core::{FormErrors, FormValues, ReceiptFile, User};
use billed_store::{MemorySessionStore, MemoryStore, Operation, StoreError};

/// Command-line front end for Billed expense reports.
#[derive(Debug, Parser)]
#[command(name = "billed", version, about = "List and submit expense report bills")]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the bills page for a fixture
    List {
        /// JSON fixture seeding the in-memory store
        #[arg(long)]
        fixture: PathBuf,

        /// Make the store reject the listing with this status
        #[arg(long, value_parser = ["404", "500"])]
        fail_list: Option<String>,
    },

    /// Submit a new bill, then show the bills page
    Submit {
        /// JSON fixture seeding the in-memory store
        #[arg(long)]
        fixture: PathBuf,

        /// Email of the signed-in employee
        #[arg(long)]
        email: String,

        /// Receipt image
        #[arg(long)]
        file: PathBuf,

        /// MIME type of the receipt (guessed from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,

        /// Expense category label, e.g. "Transports"
        #[arg(long = "type")]
        expense_type: String,

        #[arg(long, default_value = "")]
        name: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: String,

        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "")]
        pct: String,

        #[arg(long, default_value = "")]
        vat: String,

        #[arg(long, default_value = "")]
        commentary: String,
    },
}

/// Entry point shared by `main` and tests.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List { fixture, fail_list } => {
            let store = load_fixture(&fixture)?;
            if let Some(code) = fail_list {
                store
                    .fail_next(
                        config.bills_collection(),
                        Operation::List,
                        StoreError::from_message(format!("Erreur {}", code)),
                    )
                    .await;
            }

            let session = MemorySessionStore::signed_in(&User::employee("employee@billed.local"))?;
            let bills = Bills::new(
                Arc::new(store),
                Arc::new(ConsoleNavigator::default()),
                &session,
                &config,
            );
            print_page(&bills.load_page().await);
            Ok(())
        }

        Commands::Submit {
            fixture,
            email,
            file,
            mime,
            expense_type,
            name,
            date,
            amount,
            pct,
            vat,
            commentary,
        } => {
            let store = load_fixture(&fixture)?;
            let session = MemorySessionStore::signed_in(&User::employee(email))?;
            let navigator = Arc::new(ConsoleNavigator::default());

            let mut new_bill = NewBill::new(
                Arc::new(store.clone()),
                navigator.clone(),
                Arc::new(ConsoleView),
                &session,
                &config,
            )?;

            let receipt = read_receipt(&file, mime)?;
            new_bill.handle_change_file(receipt)?;

            let ack = new_bill
                .handle_submit(FormValues {
                    expense_type,
                    name,
                    date,
                    amount,
                    vat,
                    pct,
                    commentary,
                })
                .await?;
            println!("Created bill {}", ack.id);

            if let Some(route) = navigator.last_route() {
                println!("→ {}", route);
            }

            let bills = Bills::new(Arc::new(store), navigator, &session, &config);
            print_page(&bills.load_page().await);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(Some(path.to_path_buf()))
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AppConfig::load_or_default(None)),
    }
}

fn load_fixture(path: &Path) -> Result<MemoryStore> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let store = MemoryStore::from_fixture(&json)?;
    info!(fixture = %path.display(), "Fixture loaded");
    Ok(store)
}

fn read_receipt(path: &Path, mime: Option<String>) -> Result<ReceiptFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading receipt {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime.unwrap_or_else(|| guess_mime(&file_name).to_string());

    Ok(ReceiptFile::new(file_name, mime_type, bytes))
}

/// MIME type from the extension; empty when unknown.
fn guess_mime(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "",
    }
}

fn print_page(page: &BillsPage) {
    match page {
        BillsPage::Error { message } => println!("{}", message),
        BillsPage::Loaded(listing) if listing.is_empty() => println!("Aucune note de frais"),
        BillsPage::Loaded(listing) => {
            println!("Mes notes de frais");
            for row in &listing.rows {
                println!(
                    "{:<12} {:<24} {:<20} {:>12}  {}",
                    row.display_date,
                    row.bill.expense_type,
                    row.bill.name,
                    row.display_amount,
                    row.display_status
                );
            }
            for entry in &listing.diagnostics {
                println!("! {}: {}", entry.bill_id, entry.diagnostic);
            }
        }
    }
}

// =============================================================================
// Console Collaborators
// =============================================================================

/// Records where the pipelines asked to go.
#[derive(Debug, Default)]
struct ConsoleNavigator {
    last: Mutex<Option<Route>>,
}

impl ConsoleNavigator {
    fn last_route(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|last| *last)
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "Navigate");
        if let Ok(mut last) = self.last.lock() {
            *last = Some(route);
        }
    }
}

struct ConsoleView;

impl NewBillView for ConsoleView {
    fn set_file_error_visible(&self, visible: bool) {
        if visible {
            eprintln!("Le fichier doit être une image (jpg, jpeg ou png)");
        }
    }

    fn show_form_errors(&self, errors: &FormErrors) {
        for error in errors.errors() {
            eprintln!("{}: {}", error.field(), error);
        }
    }
}
