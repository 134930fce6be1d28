//! Vetrina CLI - storefront and admin console from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog as a guest
//! vetrina catalog --category MONITOR
//!
//! # Sign in (VETRINA_USERNAME / VETRINA_PASSWORD) and order two items
//! vetrina order --add 7=2 --add 12=1 --note "leave at the door"
//!
//! # Admin: remove three units of product 7
//! vetrina admin stock 7 --remove 3
//!
//! # Follow stock changes
//! vetrina watch --admin
//! ```
//!
//! # Commands
//!
//! - `categories`, `catalog` - public catalog
//! - `register`, `order`, `my-orders`, `my-order`, `profile`, `password` -
//!   shopper account
//! - `admin ...` - orders, products, stock, stats, alerts, promotions
//! - `watch` - inventory feed

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vetrina_client::ClientConfig;

mod commands;
mod output;

use commands::admin::AdminCommand;
use commands::args::{parse_category, parse_order_line};
use vetrina_core::ProductCategory;

#[derive(Parser)]
#[command(name = "vetrina")]
#[command(author, version, about = "Vetrina storefront and admin console")]
struct Cli {
    /// Backend base URL (overrides `VETRINA_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product categories
    Categories,
    /// Browse one page of the public catalog
    Catalog {
        /// Free-text search
        #[arg(short, long, default_value = "")]
        q: String,

        /// Category code (e.g. `MONITOR`)
        #[arg(short, long, value_parser = parse_category)]
        category: Option<ProductCategory>,

        /// 0-based page
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Create a shopper account and sign it in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
    },
    /// Stage products in the cart, reconcile against stock and check out
    Order {
        /// `PRODUCT_ID=QUANTITY`, repeatable
        #[arg(short = 'a', long = "add", value_parser = parse_order_line, required = true)]
        lines: Vec<(i64, u32)>,

        /// Note for the order
        #[arg(short, long)]
        note: Option<String>,

        /// Show the reconciled cart without placing the order
        #[arg(long)]
        dry_run: bool,
    },
    /// List your orders, newest first
    MyOrders {
        #[arg(short, long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show one of your orders
    MyOrder { id: i64 },
    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Change your password (signs you out)
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Follow inventory changes
    Watch {
        /// Reload the admin product dashboard on every change
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Update contact details
    Update {
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
    },
}

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed for Sentry, which must start before tracing.
    let config = match commands::load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Configuration error: {e}");
            }
            std::process::exit(2);
        }
    };
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "vetrina_cli=info,vetrina_client=info,vetrina_storefront=info,vetrina_admin=info".into()
    });

    // JSON logs on Fly.io, text locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::new(config)?;

    match command {
        Commands::Categories => commands::shop::categories(&ctx).await?,
        Commands::Catalog {
            q,
            category,
            page,
            size,
        } => commands::shop::catalog(&ctx, q, category, page, size).await?,
        Commands::Register {
            username,
            password,
            first_name,
            last_name,
            email,
            phone,
            address,
            city,
        } => {
            let request = vetrina_core::RegisterRequest {
                username,
                password,
                first_name,
                last_name,
                email,
                phone,
                address,
                city,
            };
            commands::account::register(&ctx, &request).await?;
        }
        Commands::Order {
            lines,
            note,
            dry_run,
        } => commands::shop::order(&ctx, &lines, note, dry_run).await?,
        Commands::MyOrders { page, size } => commands::account::my_orders(&ctx, page, size).await?,
        Commands::MyOrder { id } => commands::account::my_order(&ctx, id).await?,
        Commands::Profile { action } => match action {
            None => commands::account::show_profile(&ctx).await?,
            Some(ProfileAction::Update {
                email,
                phone,
                address,
                city,
            }) => {
                let request = vetrina_core::UpdateProfileRequest {
                    email,
                    phone,
                    address,
                    city,
                };
                commands::account::update_profile(&ctx, &request).await?;
            }
        },
        Commands::Password {
            current,
            new,
            confirm,
        } => {
            let request = vetrina_core::ChangePasswordRequest {
                current_password: current,
                new_password: new,
                confirm_new_password: confirm,
            };
            commands::account::change_password(&ctx, &request).await?;
        }
        Commands::Admin { command } => commands::admin::run(&ctx, command).await?,
        Commands::Watch { admin } => {
            if admin {
                commands::watch::dashboard(&ctx).await?;
            } else {
                commands::watch::feed(&ctx).await?;
            }
        }
    }
    Ok(())
}
