//! # Terminal Shell
//!
//! A line-oriented front end over the storefront. Each line is parsed into
//! a [`ShellCommand`], applied through the controllers, and answered with a
//! rendering of the current screen.
//!
//! ## Screen Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Start (categories) ──open n──► Items ──detail n──► Product Details     │
//! │        │                          │ add n               │ size s / add  │
//! │        │                          ▼                     ▼               │
//! │        └──────── cart ─────────► Cart ◄──── cart ───────┘               │
//! │                                  dec n / rm n / clear                   │
//! │                                                                         │
//! │  signin / signup / demo ──► Account      back ──► previous screen       │
//! │                                          home ──► Start                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use flash_core::ProductDetail;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::commands::cart as cart_commands;
use crate::error::ApiError;
use crate::navigation::{NavStack, Screen};
use crate::Storefront;

pub const HELP: &str = "\
Browsing
  categories            reload categories and go to the start screen
  open <n>              open category n
  products              reload the open category
  detail <n>            show product n
  size <s>              pick a size on the product screen
Cart
  add <n>               add product n (or one more of cart line n)
  add                   add the picked size on the product screen
  dec <n> / rm <n>      one less of / remove cart line n
  cart / clear          show / empty the cart
Account
  signin <email> <pw>   sign in
  signup <email> <pw>   create an account
  demo                  fill in the demo account
  verify                resend the verification email
  refresh               reload verification status
  signout / whoami
Other
  back / home / help / quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Categories,
    Open(usize),
    Products,
    Detail(usize),
    Size(String),
    Add(Option<usize>),
    Dec(usize),
    Rm(usize),
    Cart,
    Clear,
    Back,
    Home,
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    Demo,
    Verify,
    Refresh,
    SignOut,
    WhoAmI,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, ApiError> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| ApiError::validation("Type a command, or `help`."))?
            .to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("categories", []) => ShellCommand::Categories,
            ("open", [n]) => ShellCommand::Open(index(n)?),
            ("products", []) => ShellCommand::Products,
            ("detail", [n]) => ShellCommand::Detail(index(n)?),
            ("size", [size]) => ShellCommand::Size(size.to_string()),
            ("add", []) => ShellCommand::Add(None),
            ("add", [n]) => ShellCommand::Add(Some(index(n)?)),
            ("dec", [n]) => ShellCommand::Dec(index(n)?),
            ("rm", [n]) => ShellCommand::Rm(index(n)?),
            ("cart", []) => ShellCommand::Cart,
            ("clear", []) => ShellCommand::Clear,
            ("back", []) => ShellCommand::Back,
            ("home", []) => ShellCommand::Home,
            ("signin", [email, password]) => ShellCommand::SignIn {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("signup", [email, password]) => ShellCommand::SignUp {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("demo", []) => ShellCommand::Demo,
            ("verify", []) => ShellCommand::Verify,
            ("refresh", []) => ShellCommand::Refresh,
            ("signout", []) => ShellCommand::SignOut,
            ("whoami", []) => ShellCommand::WhoAmI,
            ("help", []) => ShellCommand::Help,
            ("quit" | "exit", []) => ShellCommand::Quit,
            (
                "categories" | "open" | "products" | "detail" | "size" | "add" | "dec" | "rm"
                | "cart" | "clear" | "back" | "home" | "signin" | "signup" | "demo" | "verify"
                | "refresh" | "signout" | "whoami" | "help" | "quit" | "exit",
                _,
            ) => {
                return Err(ApiError::validation(format!(
                    "Wrong arguments for `{verb}`. Type `help` for usage."
                )))
            }
            _ => {
                return Err(ApiError::validation(format!(
                    "Unknown command `{verb}`. Type `help` for the list."
                )))
            }
        };
        Ok(command)
    }
}

fn index(word: &str) -> Result<usize, ApiError> {
    word.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ApiError::validation(format!("`{word}` is not a list number.")))
}

/// Interactive session: the storefront plus where the user is.
pub struct Shell {
    storefront: Storefront,
    nav: NavStack,
}

impl Shell {
    pub fn new(storefront: Storefront) -> Self {
        Shell {
            storefront,
            nav: NavStack::new(),
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    pub fn current_screen(&self) -> Screen {
        self.nav.current()
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Err(err) = self.storefront.catalog.load_categories().await {
            debug!(error = %err, "Initial category load failed");
        }
        output.write_all(self.render().as_bytes()).await?;
        output.write_all(b"\n> ").await?;
        output.flush().await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                output.write_all(b"> ").await?;
                output.flush().await?;
                continue;
            }

            let reply = match ShellCommand::parse(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(err) => Err(err),
            };
            let text = match reply {
                Ok(text) => text,
                Err(err) => format!("Error: {}", err.message),
            };
            output.write_all(text.as_bytes()).await?;
            output.write_all(b"\n> ").await?;
            output.flush().await?;
        }

        output.write_all(b"\nGoodbye.\n").await?;
        output.flush().await
    }

    /// Applies one command and returns what to print.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<String, ApiError> {
        debug!(screen = ?self.nav.current(), "Shell command");
        let store = &self.storefront;

        match command {
            ShellCommand::Categories => {
                self.go_home().await;
                self.storefront.catalog.load_categories().await?;
            }
            ShellCommand::Open(n) => {
                if store.catalog.snapshot().categories.is_empty() {
                    store.catalog.load_categories().await?;
                }
                let category = store
                    .catalog
                    .snapshot()
                    .category_at(n)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| ApiError::not_found("Category", &n.to_string()))?;
                self.go_home().await;
                self.nav.navigate(Screen::Items);
                self.storefront.catalog.select_category(&category).await?;
            }
            ShellCommand::Products => {
                let category = store
                    .catalog
                    .snapshot()
                    .selected_category
                    .ok_or_else(|| ApiError::validation("Open a category first."))?;
                self.unwind_to(Screen::Items).await;
                self.nav.navigate(Screen::Items);
                self.storefront.catalog.select_category(&category).await?;
            }
            ShellCommand::Detail(n) => {
                let product = store
                    .catalog
                    .snapshot()
                    .product_at(n)
                    .cloned()
                    .ok_or_else(|| ApiError::not_found("Product", &n.to_string()))?;
                if product.id.is_empty() {
                    store.catalog.select_product(ProductDetail::from(&product)).await;
                } else {
                    store.catalog.fetch_product_detail(&product.id).await?;
                }
                self.nav.navigate(Screen::ProductDetail);
            }
            ShellCommand::Size(size) => {
                store.catalog.select_size(&size)?;
            }
            ShellCommand::Add(Some(n)) => match self.nav.current() {
                Screen::Cart => {
                    let product = cart_commands::line_product(&store.cart, n)?;
                    cart_commands::add_to_cart(&store.cart, &product);
                }
                _ => {
                    let product = store
                        .catalog
                        .snapshot()
                        .product_at(n)
                        .cloned()
                        .ok_or_else(|| ApiError::not_found("Product", &n.to_string()))?;
                    let view = cart_commands::add_to_cart(&store.cart, &product);
                    return Ok(format!(
                        "Added {}. Cart: {} item(s), {}",
                        product.name,
                        view.item_count,
                        store.config.format_currency(view.total_cents)
                    ));
                }
            },
            ShellCommand::Add(None) => {
                let catalog = store.catalog.snapshot();
                let detail = catalog
                    .selected_product
                    .as_ref()
                    .filter(|_| self.nav.current() == Screen::ProductDetail)
                    .ok_or_else(|| ApiError::validation("Open a product first, or use `add <n>`."))?;
                let size = catalog
                    .selected_size
                    .as_deref()
                    .ok_or_else(|| ApiError::validation("Pick a size first."))?;
                let view = cart_commands::add_sized(&store.cart, detail, size)?;
                return Ok(format!(
                    "Added {} ({}). Cart: {} item(s), {}",
                    detail.name,
                    size,
                    view.item_count,
                    store.config.format_currency(view.total_cents)
                ));
            }
            ShellCommand::Dec(n) => {
                let product = cart_commands::line_product(&store.cart, n)?;
                cart_commands::decrease_item(&store.cart, &product);
                self.nav.navigate(Screen::Cart);
            }
            ShellCommand::Rm(n) => {
                let product = cart_commands::line_product(&store.cart, n)?;
                cart_commands::remove_item(&store.cart, &product);
                self.nav.navigate(Screen::Cart);
            }
            ShellCommand::Cart => self.nav.navigate(Screen::Cart),
            ShellCommand::Clear => {
                cart_commands::clear_cart(&store.cart);
                self.nav.navigate(Screen::Cart);
            }
            ShellCommand::Back => match self.nav.navigate_up() {
                Some(left) => self.on_leave(left).await,
                None => return Ok("Already at the start screen.".to_string()),
            },
            ShellCommand::Home => self.go_home().await,
            ShellCommand::SignIn { email, password } => {
                self.nav.navigate(Screen::Auth);
                self.submit(false, &email, &password).await?;
            }
            ShellCommand::SignUp { email, password } => {
                self.nav.navigate(Screen::Auth);
                self.submit(true, &email, &password).await?;
            }
            ShellCommand::Demo => {
                store.auth.set_sign_up_mode(false);
                store.auth.fill_demo_credentials();
                self.nav.navigate(Screen::Auth);
            }
            ShellCommand::Verify => {
                store.auth.resend_verification_email().await?;
                return Ok("Verification email sent. Check your inbox.".to_string());
            }
            ShellCommand::Refresh => {
                store.auth.refresh_user().await?;
                self.nav.navigate(Screen::Auth);
            }
            ShellCommand::SignOut => {
                store.auth.sign_out().await;
                return Ok("Signed out.".to_string());
            }
            ShellCommand::WhoAmI => {
                return Ok(match store.auth.current_user() {
                    Some(user) => format!(
                        "{} ({})",
                        user.email,
                        if user.email_verified { "verified" } else { "not verified" }
                    ),
                    None => "Not signed in.".to_string(),
                })
            }
            ShellCommand::Help => return Ok(HELP.to_string()),
            ShellCommand::Quit => return Ok("Goodbye.".to_string()),
        }

        Ok(self.render())
    }

    async fn submit(&self, sign_up: bool, email: &str, password: &str) -> Result<(), ApiError> {
        let auth = &self.storefront.auth;
        auth.set_sign_up_mode(sign_up);
        auth.update_email(email);
        auth.update_password(password);
        auth.authenticate().await.map(|_| ())
    }

    async fn go_home(&mut self) {
        for screen in self.nav.pop_to_root() {
            self.on_leave(screen).await;
        }
    }

    /// Pops the screens above `target` when it is already on the stack.
    async fn unwind_to(&mut self, target: Screen) {
        if !self.nav.contains(target) {
            return;
        }
        while self.nav.current() != target {
            match self.nav.navigate_up() {
                Some(left) => self.on_leave(left).await,
                None => break,
            }
        }
    }

    async fn on_leave(&self, screen: Screen) {
        match screen {
            Screen::Items => self.storefront.catalog.leave_items_screen().await,
            Screen::ProductDetail => self.storefront.catalog.clear_selected_product(),
            Screen::Start | Screen::Cart | Screen::Auth => {}
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Text rendering of the current screen.
    pub fn render(&self) -> String {
        let screen = self.nav.current();
        let cart = self.storefront.cart.view();
        let mut out = String::new();

        let _ = write!(out, "== {} ==", screen.title());
        if cart.item_count > 0 {
            let _ = write!(out, "   [cart: {}]", cart.item_count);
        }
        if self.nav.can_navigate_back() {
            out.push_str("   (back)");
        }
        out.push('\n');

        match screen {
            Screen::Start => self.render_start(&mut out),
            Screen::Items => self.render_items(&mut out),
            Screen::ProductDetail => self.render_detail(&mut out),
            Screen::Cart => self.render_cart(&mut out),
            Screen::Auth => self.render_auth(&mut out),
        }
        out.trim_end().to_string()
    }

    fn render_status(&self, out: &mut String) -> bool {
        let catalog = self.storefront.catalog.snapshot();
        if catalog.is_loading {
            out.push_str("Loading...\n");
            return true;
        }
        if let Some(error) = &catalog.error {
            let _ = writeln!(out, "Error: {error}");
            return true;
        }
        false
    }

    fn render_start(&self, out: &mut String) {
        let _ = writeln!(out, "Shop {} by category:", self.storefront.config.store_name);
        if self.render_status(out) {
            return;
        }
        let catalog = self.storefront.catalog.snapshot();
        if catalog.categories.is_empty() {
            out.push_str("No categories yet. Type `categories` to load them.\n");
        }
        for (i, category) in catalog.categories.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, category.name);
        }
    }

    fn render_items(&self, out: &mut String) {
        let catalog = self.storefront.catalog.snapshot();
        if let Some(category) = &catalog.selected_category {
            let _ = writeln!(out, "Category: {category}");
        }
        if self.render_status(out) {
            return;
        }
        if catalog.products.is_empty() {
            out.push_str("No products in this category.\n");
        }

        let config = &self.storefront.config;
        for (i, product) in catalog.products.iter().enumerate() {
            let price = if product.is_discounted() {
                format!(
                    "{} -> {} ({}% off)",
                    config.format_money(product.price()),
                    config.format_money(product.discounted_price()),
                    product.discount_percent
                )
            } else {
                config.format_money(product.price())
            };
            let in_cart = self.storefront.cart.with_cart(|c| c.quantity_of(product));
            let _ = write!(out, "  {}. {}  {}", i + 1, product.name, price);
            if in_cart > 0 {
                let _ = write!(out, "  [in cart: {in_cart}]");
            }
            out.push('\n');
        }
    }

    fn render_detail(&self, out: &mut String) {
        if self.render_status(out) {
            return;
        }
        let catalog = self.storefront.catalog.snapshot();
        let Some(detail) = &catalog.selected_product else {
            out.push_str("No product selected.\n");
            return;
        };
        let config = &self.storefront.config;

        let _ = writeln!(out, "{} by {}", detail.name, detail.brand);
        let _ = writeln!(out, "Price: {}", config.format_money(detail.discounted_price()));
        if detail.discount_percent > 0 {
            let _ = writeln!(
                out,
                "  was {} ({}% off)",
                config.format_currency(detail.price_cents),
                detail.discount_percent
            );
        }
        if let Some(description) = detail.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "{description}");
        }

        if detail.variants.is_empty() {
            out.push_str("No sizes listed.\n");
        } else {
            let selected = catalog.selected_size.as_deref();
            let sizes: Vec<String> = detail
                .variants
                .iter()
                .map(|v| {
                    if Some(v.size.as_str()) == selected {
                        format!("[{}]", v.size)
                    } else {
                        v.size.clone()
                    }
                })
                .collect();
            let _ = writeln!(out, "Sizes: {}", sizes.join(" "));
            if let Some(variant) = selected.and_then(|s| detail.variant(s)) {
                let _ = writeln!(out, "{}", variant.stock_message());
            }
        }

        if !catalog.related_products.is_empty() {
            out.push_str("Pair it with:\n");
            for related in &catalog.related_products {
                let _ = writeln!(
                    out,
                    "  - {}  {}",
                    related.name,
                    config.format_currency(related.price_cents)
                );
            }
        }
    }

    fn render_cart(&self, out: &mut String) {
        let view = self.storefront.cart.view();
        let config = &self.storefront.config;
        if view.is_empty() {
            out.push_str("Your cart is empty.\n");
            return;
        }
        for (i, line) in view.lines.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} x{}  {} each  {}",
                i + 1,
                line.product.name,
                line.quantity,
                config.format_currency(line.unit_price_cents),
                config.format_currency(line.line_total_cents)
            );
        }
        let _ = writeln!(
            out,
            "Items: {}  Total: {}",
            view.item_count,
            config.format_currency(view.total_cents)
        );
    }

    fn render_auth(&self, out: &mut String) {
        let auth = self.storefront.auth.snapshot();
        if auth.is_loading {
            out.push_str("Working...\n");
        }
        if let Some(error) = &auth.error {
            let _ = writeln!(out, "Error: {error}");
        }
        match &auth.current_user {
            Some(user) => {
                let _ = writeln!(out, "Signed in as {}", user.email);
                if auth.is_email_verified {
                    out.push_str("Email verified.\n");
                } else {
                    out.push_str(
                        "Email not verified. Type `verify` to resend the link, then `refresh`.\n",
                    );
                }
            }
            None => {
                let mode = if auth.is_sign_up_mode { "Sign up" } else { "Sign in" };
                let _ = writeln!(out, "{mode}");
                let _ = writeln!(out, "  email: {}", auth.email);
                let _ = writeln!(
                    out,
                    "  password: {}",
                    "*".repeat(auth.password.chars().count())
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;

    fn demo_shell() -> Shell {
        Shell::new(Storefront::from_config(AppConfig::default()).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("open 2").unwrap(), ShellCommand::Open(2));
        assert_eq!(ShellCommand::parse("  ADD ").unwrap(), ShellCommand::Add(None));
        assert_eq!(ShellCommand::parse("size xl").unwrap(), ShellCommand::Size("xl".into()));
        assert_eq!(
            ShellCommand::parse("signin a@b.co pw").unwrap(),
            ShellCommand::SignIn {
                email: "a@b.co".into(),
                password: "pw".into()
            }
        );
        assert_eq!(ShellCommand::parse("exit").unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ShellCommand::parse("open").is_err());
        assert!(ShellCommand::parse("open 0").is_err());
        assert!(ShellCommand::parse("open two").is_err());
        assert!(ShellCommand::parse("signin only-email").is_err());
        let err = ShellCommand::parse("checkout").unwrap_err();
        assert!(err.message.contains("Unknown command `checkout`"));
    }

    #[tokio::test]
    async fn test_browse_and_add_sized_item() {
        let mut shell = demo_shell();

        let out = shell.execute(ShellCommand::Categories).await.unwrap();
        assert!(out.contains("== Welcome to Quarkz =="));
        assert!(out.contains("1. Shirts"));
        assert!(!out.contains("(back)"));

        let out = shell.execute(ShellCommand::Open(1)).await.unwrap();
        assert!(out.contains("== Choose Items =="));
        assert!(out.contains("1. Adidas Shirt  $100.00"));
        assert!(out.contains("(back)"));

        let out = shell.execute(ShellCommand::Detail(2)).await.unwrap();
        assert!(out.contains("Nike Shirt by Nike"));
        assert!(out.contains("Sizes: [S] M L XL"));
        assert!(out.contains("In stock"));
        assert!(out.contains("Pair it with:"));

        let out = shell.execute(ShellCommand::Size("l".into())).await.unwrap();
        assert!(out.contains("Hurry, only 2 items left in stock!"));

        let out = shell.execute(ShellCommand::Add(None)).await.unwrap();
        assert_eq!(out, "Added Nike Shirt (L). Cart: 1 item(s), $100.00");

        shell.execute(ShellCommand::Size("XL".into())).await.unwrap();
        let err = shell.execute(ShellCommand::Add(None)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfStock);

        let out = shell.execute(ShellCommand::Cart).await.unwrap();
        assert!(out.contains("1. Nike Shirt (L) x1"));
        assert!(out.contains("Total: $100.00"));
    }

    #[tokio::test]
    async fn test_back_leaves_screens_cleanly() {
        let mut shell = demo_shell();
        shell.execute(ShellCommand::Open(1)).await.unwrap();
        shell.execute(ShellCommand::Detail(1)).await.unwrap();

        shell.execute(ShellCommand::Back).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Items);
        assert!(shell.storefront().catalog.snapshot().selected_product.is_none());

        shell.execute(ShellCommand::Back).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Start);

        let out = shell.execute(ShellCommand::Back).await.unwrap();
        assert_eq!(out, "Already at the start screen.");
    }

    #[tokio::test]
    async fn test_products_from_details_returns_to_items() {
        let mut shell = demo_shell();
        shell.execute(ShellCommand::Open(1)).await.unwrap();
        shell.execute(ShellCommand::Detail(1)).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::ProductDetail);

        shell.execute(ShellCommand::Products).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Items);
        assert!(shell.storefront().catalog.snapshot().selected_product.is_none());

        // Items sits directly above Start; no stale details underneath.
        shell.execute(ShellCommand::Back).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Start);
    }

    #[tokio::test]
    async fn test_products_from_cart_returns_to_items() {
        let mut shell = demo_shell();
        shell.execute(ShellCommand::Open(1)).await.unwrap();
        shell.execute(ShellCommand::Cart).await.unwrap();

        shell.execute(ShellCommand::Products).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Items);
        shell.execute(ShellCommand::Back).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Start);
    }

    #[tokio::test]
    async fn test_cart_lines_by_number() {
        let mut shell = demo_shell();
        shell.execute(ShellCommand::Open(1)).await.unwrap();
        shell.execute(ShellCommand::Add(Some(1))).await.unwrap();
        shell.execute(ShellCommand::Add(Some(1))).await.unwrap();
        shell.execute(ShellCommand::Add(Some(3))).await.unwrap();

        let out = shell.execute(ShellCommand::Dec(1)).await.unwrap();
        assert!(out.contains("1. Adidas Shirt x1"));
        assert!(out.contains("[cart: 2]"));

        let out = shell.execute(ShellCommand::Add(Some(2))).await.unwrap();
        assert!(out.contains("2. Puma Shirt x2"));

        let out = shell.execute(ShellCommand::Rm(1)).await.unwrap();
        assert!(out.contains("1. Puma Shirt x2"));

        let out = shell.execute(ShellCommand::Clear).await.unwrap();
        assert!(out.contains("Your cart is empty."));

        let err = shell.execute(ShellCommand::Rm(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_account_commands() {
        let mut shell = demo_shell();

        let err = shell
            .execute(ShellCommand::SignIn {
                email: "demo@email.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        shell.execute(ShellCommand::Demo).await.unwrap();
        assert_eq!(shell.current_screen(), Screen::Auth);
        shell.storefront().auth.authenticate().await.unwrap();

        let out = shell.execute(ShellCommand::WhoAmI).await.unwrap();
        assert_eq!(out, "demo@email.com (verified)");

        shell.execute(ShellCommand::SignOut).await.unwrap();
        let out = shell.execute(ShellCommand::WhoAmI).await.unwrap();
        assert_eq!(out, "Not signed in.");
    }

    #[tokio::test]
    async fn test_run_reads_until_quit() {
        let mut shell = demo_shell();
        let input: &[u8] = b"open 1\n\nbogus\ncart\nquit\nhome\n";
        let mut output = Vec::new();

        shell.run(input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("1. Shirts"));
        assert!(text.contains("== Choose Items =="));
        assert!(text.contains("Error: Unknown command `bogus`"));
        assert!(text.contains("Your cart is empty."));
        assert!(text.ends_with("Goodbye.\n"));
        assert_eq!(shell.current_screen(), Screen::Cart);
    }
}
