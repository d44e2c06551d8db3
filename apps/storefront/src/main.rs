//! # Flash Storefront Entry Point
//!
//! ```text
//! flash [--config <path>] [shop]            interactive session (default)
//! flash categories                          list categories and exit
//! flash products <category>                 list one category and exit
//! flash sign-up <email> <password>          create an account
//! flash sign-in <email> <password>          check credentials
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load AppConfig (defaults, file, `FLASH_*` env)
//! 3. Pick the Firebase or demo backend
//! 4. Run the requested command

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flash_storefront::shell::Shell;
use flash_storefront::state::{AppConfig, CONFIG_PATH_ENV};
use flash_storefront::{init_tracing, Storefront};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "flash")]
#[command(about = "Browse the Flash clothing store from your terminal")]
struct Cli {
    /// Config file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive shopping session
    Shop,
    /// List categories
    Categories,
    /// List the products of one category
    Products { category: String },
    /// Create an account
    SignUp { email: String, password: String },
    /// Sign in with an existing account
    SignIn { email: String, password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config).context("loading configuration")?;
    info!(store = %config.store_name, demo = config.is_demo(), "Starting Flash storefront");

    let storefront = Storefront::from_config(config)?;

    match cli.command.unwrap_or(Command::Shop) {
        Command::Shop => {
            let mut shell = Shell::new(storefront);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell.run(stdin, tokio::io::stdout()).await?;
        }
        Command::Categories => {
            storefront.catalog.load_categories().await?;
            for category in storefront.catalog.snapshot().categories {
                println!("{}", category.name);
            }
        }
        Command::Products { category } => {
            storefront.catalog.select_category(&category).await?;
            let config = &storefront.config;
            for product in storefront.catalog.snapshot().products {
                println!(
                    "{}\t{}\t{}",
                    product.name,
                    product.brand,
                    config.format_money(product.discounted_price())
                );
            }
        }
        Command::SignUp { email, password } => {
            let user = authenticate(&storefront, true, &email, &password).await?;
            println!("Created {}. A verification email is on its way.", user.email);
        }
        Command::SignIn { email, password } => {
            let user = authenticate(&storefront, false, &email, &password).await?;
            let status = if user.email_verified { "verified" } else { "not verified" };
            println!("Signed in as {} ({status}).", user.email);
        }
    }

    Ok(())
}

async fn authenticate(
    storefront: &Storefront,
    sign_up: bool,
    email: &str,
    password: &str,
) -> anyhow::Result<flash_remote::AuthUser> {
    let auth = &storefront.auth;
    auth.set_sign_up_mode(sign_up);
    auth.update_email(email);
    auth.update_password(password);
    Ok(auth.authenticate().await?)
}
