//! Precision Turbo Stock Management - terminal dashboard
//!
//! # Usage
//!
//! ```bash
//! # Log in (demo backend accepts any credentials)
//! pts-dashboard login -u operator -p secret
//!
//! # Browse stock
//! pts-dashboard list --search "5303 970"
//! pts-dashboard stats
//!
//! # Mutate stock
//! pts-dashboard add -l B4 -m "846015, 825758" -q 3
//! pts-dashboard sell "846015, 825758" -q 1 --yes
//!
//! # Purchase orders
//! pts-dashboard order "846015, 825758" -q 2
//! pts-dashboard bulk-order -i "846015, 825758" -i 883860=4
//! pts-dashboard arrived <ORDER_ID>
//! ```

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shared::validation::split_part_numbers;
use turbo_stock_client::api::TurboApiClient;
use turbo_stock_client::dashboard::{Dashboard, LotForm};
use turbo_stock_client::notify::{Notifier, TermNotifier};
use turbo_stock_client::session::{SessionStatus, SessionStore};
use turbo_stock_client::Config;

#[derive(Parser)]
#[command(name = "pts-dashboard")]
#[command(author, version, about = "Precision Turbo stock management dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the local session marker
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Log out and clear the local session marker
    Logout,
    /// Show the current session status
    Status,
    /// List stocked parts as dashboard rows
    List {
        /// Case-insensitive filter on the model text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show inventory statistics
    Stats,
    /// Add a new lot (simple, or big/small variants when variant flags are used)
    Add {
        /// Bay location
        #[arg(short, long)]
        location: String,

        /// Comma-separated part numbers (simple lots)
        #[arg(short, long)]
        models: Option<String>,

        /// Shared quantity (simple lots)
        #[arg(short, long)]
        quantity: Option<i64>,

        /// Relax the low-stock threshold for this lot
        #[arg(long)]
        priority: bool,

        /// Comma-separated big-variant part numbers
        #[arg(long)]
        big_models: Option<String>,

        #[arg(long, default_value_t = 0)]
        big_quantity: i64,

        /// Comma-separated small-variant part numbers
        #[arg(long)]
        small_models: Option<String>,

        #[arg(long, default_value_t = 0)]
        small_quantity: i64,
    },
    /// Replace the fields of an existing lot, addressed by its row id
    Update {
        /// Row id as shown by `list`
        id: String,

        #[arg(short, long)]
        location: String,

        #[arg(short, long)]
        models: Option<String>,

        #[arg(short, long)]
        quantity: Option<i64>,

        #[arg(long)]
        priority: bool,

        #[arg(long)]
        big_models: Option<String>,

        #[arg(long, default_value_t = 0)]
        big_quantity: i64,

        #[arg(long)]
        small_models: Option<String>,

        #[arg(long, default_value_t = 0)]
        small_quantity: i64,
    },
    /// Delete a lot
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Sell stock off a lot
    Sell {
        id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List pending purchase orders
    Orders,
    /// Create a purchase order for one low-stock row
    Order {
        id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Create purchase orders for several rows with one consolidated email
    BulkOrder {
        /// Row to order, as `ROW_ID` or `ROW_ID=QTY` (default quantity 1)
        #[arg(short = 'i', long = "item", value_name = "ROW_ID[=QTY]")]
        items: Vec<String>,
    },
    /// Mark a pending order as arrived and restock the lot
    Arrived { order_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turbo_stock_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::debug!("Environment: {}", config.environment);

    let cli = Cli::parse();
    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let notifier = TermNotifier;
    let session = SessionStore::new(&config.session.file);
    let api = TurboApiClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?;

    match cli.command {
        Commands::Login { username, password } => {
            api.login(&username, &password).await?;
            session.save(&username)?;
            notifier.success("Login successful!");
            return Ok(());
        }
        Commands::Logout => {
            session.clear()?;
            notifier.success("Logged out");
            return Ok(());
        }
        Commands::Status => {
            match session.check() {
                SessionStatus::Active { username } => {
                    notifier.info(&format!("Logged in as {}", username));
                }
                SessionStatus::ExpiringSoon {
                    username,
                    hours_remaining,
                } => {
                    notifier.info(&format!("Logged in as {}", username));
                    notifier.warning(&format!(
                        "Session expires in about {} hour(s)",
                        hours_remaining
                    ));
                }
                SessionStatus::Expired => notifier.info("Session expired; please log in again"),
                SessionStatus::Missing => notifier.info("Not logged in"),
            }
            return Ok(());
        }
        command => {
            ensure_session(&session, &notifier)?;
            let mut dashboard = Dashboard::new(api, notifier);
            dashboard.refresh_all().await;
            dispatch(command, &mut dashboard).await?;
        }
    }
    Ok(())
}

async fn dispatch(command: Commands, dashboard: &mut Dashboard<TermNotifier>) -> anyhow::Result<()> {
    match command {
        Commands::List { search } => {
            if let Some(term) = search {
                dashboard.set_search(&term);
            }
            print_rows(dashboard);
        }
        Commands::Stats => {
            let stats = dashboard.stats();
            println!("Total items:     {}", stats.total_items);
            println!("Low stock items: {}", stats.low_stock_items);
            println!("Total quantity:  {}", stats.total_quantity);
        }
        Commands::Add {
            location,
            models,
            quantity,
            priority,
            big_models,
            big_quantity,
            small_models,
            small_quantity,
        } => {
            let form = build_form(
                location,
                models,
                quantity,
                big_models,
                big_quantity,
                small_models,
                small_quantity,
            );
            dashboard.add_lot(form, priority).await?;
        }
        Commands::Update {
            id,
            location,
            models,
            quantity,
            priority,
            big_models,
            big_quantity,
            small_models,
            small_quantity,
        } => {
            let form = build_form(
                location,
                models,
                quantity,
                big_models,
                big_quantity,
                small_models,
                small_quantity,
            );
            dashboard.update_lot(&id, form, priority).await?;
        }
        Commands::Delete { id, yes } => {
            if yes
                || confirm(&format!(
                    "Delete {}? This action cannot be undone.",
                    id
                ))?
            {
                dashboard.delete_lot(&id).await?;
            } else {
                println!("Cancelled");
            }
        }
        Commands::Sell { id, quantity, yes } => {
            if yes || confirm(&format!("Sell {} x {}?", quantity, id))? {
                dashboard.sell(&id, quantity).await?;
            } else {
                println!("Cancelled");
            }
        }
        Commands::Orders => {
            for order in dashboard.pending_orders() {
                println!(
                    "{}  {}  {}  qty {}  ordered {}",
                    order.id,
                    order.part_number,
                    order.location,
                    order.quantity,
                    order.order_date.format("%Y-%m-%d")
                );
            }
        }
        Commands::Order { id, quantity } => {
            dashboard.place_order(&id, quantity).await?;
        }
        Commands::BulkOrder { items } => {
            for item in &items {
                match item.split_once('=') {
                    Some((id, qty)) => {
                        let quantity: i64 = qty
                            .trim()
                            .parse()
                            .map_err(|_| anyhow::anyhow!("Invalid quantity in '{}'", item))?;
                        dashboard.set_order_quantity(id.trim(), quantity);
                    }
                    None => dashboard.select_row(item.trim()),
                }
            }
            dashboard.place_bulk_order().await?;
        }
        Commands::Arrived { order_id } => {
            dashboard.mark_arrived(&order_id).await?;
        }
        // Handled before dispatch.
        Commands::Login { .. } | Commands::Logout | Commands::Status => unreachable!(),
    }
    Ok(())
}

/// Variant flags switch the form into its big/small shape; otherwise the
/// simple shape is used, mirroring the two modal layouts.
fn build_form(
    location: String,
    models: Option<String>,
    quantity: Option<i64>,
    big_models: Option<String>,
    big_quantity: i64,
    small_models: Option<String>,
    small_quantity: i64,
) -> LotForm {
    if big_models.is_some() || small_models.is_some() {
        LotForm::Variants {
            location,
            big_models: split_part_numbers(&big_models.unwrap_or_default()),
            big_quantity,
            small_models: split_part_numbers(&small_models.unwrap_or_default()),
            small_quantity,
        }
    } else {
        LotForm::Simple {
            models: split_part_numbers(&models.unwrap_or_default()),
            location,
            quantity: quantity.unwrap_or(-1),
        }
    }
}

fn ensure_session(session: &SessionStore, notifier: &TermNotifier) -> anyhow::Result<()> {
    match session.check() {
        SessionStatus::Active { .. } => {
            session.refresh()?;
            Ok(())
        }
        SessionStatus::ExpiringSoon {
            hours_remaining, ..
        } => {
            notifier.warning(&format!(
                "Session expires in about {} hour(s)",
                hours_remaining
            ));
            session.refresh()?;
            Ok(())
        }
        SessionStatus::Expired => {
            anyhow::bail!("Session expired. Please log in again.")
        }
        SessionStatus::Missing => {
            anyhow::bail!("Not logged in. Run `pts-dashboard login` first.")
        }
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_rows(dashboard: &Dashboard<TermNotifier>) {
    let rows = dashboard.filtered_rows();
    if rows.is_empty() {
        println!("No turbo items found");
        return;
    }
    for row in rows {
        let mut flags = String::new();
        if row.is_low_stock {
            flags.push_str("  LOW STOCK");
        }
        if row.priority {
            flags.push_str("  PRIORITY");
        }
        println!(
            "#{}\n  {}\n  bay {}  qty {}{}",
            row.id, row.display_text, row.location, row.quantity, flags
        );
    }
}
