//! MLK Shop CLI - terminal front end for the storefront client.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the password may also come from MLK_PASSWORD)
//! mlk login -u admin -p admin
//!
//! # Browse and shop
//! mlk products list --category home
//! mlk cart add p1 2
//! mlk cart show
//! mlk checkout
//!
//! # Admin
//! mlk products create --name "Desk Lamp" --sku LAMP-1 --price 19.99 --description "Warm light"
//! mlk products delete p1
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami` - session management
//! - `products` - catalog browsing and admin product management
//! - `cart` - local shopping cart
//! - `favorites` - local favorites list
//! - `order`, `checkout` - order placement
//!
//! Session, cart and favorites persist in `MLK_STORAGE_DIR` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mlk_shop_core::Price;
use mlk_shop_storefront::AppState;
use mlk_shop_storefront::config::StorefrontConfig;
use mlk_shop_storefront::models::ProductDraft;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

mod commands;

use commands::CliError;

const DEFAULT_LOG_FILTER: &str = "mlk_shop_storefront=info,mlk_shop_cli=info";

#[derive(Parser)]
#[command(name = "mlk")]
#[command(author, version, about = "MLK Shop storefront client")]
struct Cli {
    /// API base URL (overrides MLK_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<Url>,

    /// Storage directory (overrides MLK_STORAGE_DIR)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with username and password
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "MLK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MLK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation
        #[arg(short, long, env = "MLK_PASSWORD_CONFIRM", hide_env_values = true)]
        confirm: String,
    },
    /// Log out and forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorite products
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Order a single product
    Order {
        product_id: String,
        quantity: u32,
    },
    /// Place one order per cart line and take the ordered units out of the cart
    Checkout,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List the catalog
    List {
        /// Only show this category ("all" for everything)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show { id: String },
    /// Create a product (admin)
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Update a product (admin)
    Update {
        id: String,

        #[command(flatten)]
        fields: ProductUpdate,
    },
    /// Delete a product (admin)
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
struct ProductFields {
    #[arg(long)]
    name: String,

    #[arg(long)]
    sku: String,

    #[arg(long)]
    price: Price,

    #[arg(long)]
    description: String,

    #[arg(long)]
    category: Option<String>,

    #[arg(long, default_value_t = 0)]
    stock: u32,

    /// Image URI, repeatable
    #[arg(long = "image")]
    images: Vec<String>,

    /// Index of the cover image (defaults to the first)
    #[arg(long)]
    cover: Option<usize>,

    /// Extra color, repeatable
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Extra size, repeatable (stored uppercase)
    #[arg(long = "size")]
    sizes: Vec<String>,

    /// Start without the default colors and sizes
    #[arg(long)]
    no_default_options: bool,
}

#[derive(clap::Args)]
struct ProductUpdate {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    sku: Option<String>,

    #[arg(long)]
    price: Option<Price>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    stock: Option<u32>,

    /// Replace all images, repeatable
    #[arg(long = "image")]
    images: Vec<String>,

    #[arg(long)]
    cover: Option<usize>,

    /// Replace all colors, repeatable
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Replace all sizes, repeatable
    #[arg(long = "size")]
    sizes: Vec<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        product_id: String,

        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Set { product_id: String, quantity: u32 },
    /// Remove a line
    Remove { product_id: String },
    /// Show the cart
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Add or remove a favorite
    Toggle { product_id: String },
    /// List favorites
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(dir) = cli.storage_dir {
        config = config.with_storage_dir(dir);
    }
    let state = AppState::open(config)?;

    let result = match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&state, &username, &password).await
        }
        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => commands::auth::register(&state, username, email, password, confirm).await,
        Commands::Logout => {
            commands::auth::logout(&state);
            Ok(())
        }
        Commands::Whoami => {
            commands::auth::whoami(&state);
            Ok(())
        }
        Commands::Products { action } => match action {
            ProductAction::List { category } => {
                commands::products::list(&state, category.as_deref()).await
            }
            ProductAction::Show { id } => commands::products::show(&state, &id).await,
            ProductAction::Create { fields } => {
                commands::products::create(&state, fields.into_draft()).await
            }
            ProductAction::Update { id, fields } => {
                commands::products::update(&state, &id, |draft| fields.apply(draft)).await
            }
            ProductAction::Delete { id, yes } => {
                commands::products::delete(&state, &id, yes).await
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&state, &product_id, quantity).await,
            CartAction::Set {
                product_id,
                quantity,
            } => {
                commands::cart::set(&state, &product_id, quantity);
                Ok(())
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&state, &product_id);
                Ok(())
            }
            CartAction::Show => {
                commands::cart::show(&state);
                Ok(())
            }
            CartAction::Clear => {
                commands::cart::clear(&state);
                Ok(())
            }
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::Toggle { product_id } => {
                commands::favorites::toggle(&state, &product_id).await
            }
            FavoritesAction::List => {
                commands::favorites::list(&state);
                Ok(())
            }
        },
        Commands::Order {
            product_id,
            quantity,
        } => commands::orders::order(&state, &product_id, quantity).await,
        Commands::Checkout => commands::orders::checkout(&state).await,
    };

    commands::flush_notifications(&state);
    result
}

impl ProductFields {
    fn into_draft(self) -> ProductDraft {
        let mut draft = ProductDraft {
            name: self.name,
            description: self.description,
            sku_code: self.sku,
            price: self.price,
            category: self.category,
            in_stock: self.stock,
            images: self.images,
            cover_index: self.cover,
            ..ProductDraft::default()
        };
        if !self.no_default_options {
            draft = draft.with_default_options();
        }
        for color in &self.colors {
            draft.add_color(color);
        }
        for size in &self.sizes {
            draft.add_size(size);
        }
        draft
    }
}

impl ProductUpdate {
    fn apply(self, draft: &mut ProductDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(sku) = self.sku {
            draft.sku_code = sku;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(category) = self.category {
            draft.category = Some(category);
        }
        if let Some(stock) = self.stock {
            draft.in_stock = stock;
        }
        if !self.images.is_empty() {
            draft.images = self.images;
            draft.cover_index = None;
        }
        if let Some(cover) = self.cover {
            draft.cover_index = Some(cover);
        }
        if !self.colors.is_empty() {
            draft.colors.clear();
            for color in &self.colors {
                draft.add_color(color);
            }
        }
        if !self.sizes.is_empty() {
            draft.sizes.clear();
            for size in &self.sizes {
                draft.add_size(size);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_draft(args: &[&str]) -> ProductDraft {
        let base = [
            "mlk", "products", "create", "--name", "Tee", "--sku", "TEE-1", "--price", "12.50",
            "--description", "Cotton",
        ];
        let cli = Cli::try_parse_from(base.iter().chain(args)).unwrap();
        match cli.command {
            Commands::Products {
                action: ProductAction::Create { fields },
            } => fields.into_draft(),
            _ => panic!("expected products create"),
        }
    }

    #[test]
    fn test_create_starts_from_default_options() {
        let draft = create_draft(&["--color", "#000000", "--size", "xxxl", "--size", "m"]);
        assert_eq!(draft.colors.len(), 5);
        assert_eq!(draft.colors.last().map(String::as_str), Some("#000000"));
        assert_eq!(draft.sizes.last().map(String::as_str), Some("XXXL"));
        assert_eq!(draft.sizes.len(), 7);
    }

    #[test]
    fn test_create_without_default_options() {
        let draft = create_draft(&["--no-default-options", "--size", "s", "--size", "S"]);
        assert!(draft.colors.is_empty());
        assert_eq!(draft.sizes, vec!["S"]);
    }

    #[test]
    fn test_update_replaces_options() {
        let cli = Cli::try_parse_from(["mlk", "products", "update", "p1", "--size", "l"]).unwrap();
        let Commands::Products {
            action: ProductAction::Update { fields, .. },
        } = cli.command
        else {
            panic!("expected products update");
        };
        let mut draft = ProductDraft::default().with_default_options();
        fields.apply(&mut draft);
        assert_eq!(draft.sizes, vec!["L"]);
        assert_eq!(draft.colors.len(), 4);
    }
}
