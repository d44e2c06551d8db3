//! # Demo Collaborators
//!
//! Local stand-ins used when no Firebase project is configured:
//!
//! - [`DemoCatalog`]: the built-in clothing catalog (10 categories, 15
//!   products from five brands).
//! - [`InMemoryIdentity`]: email/password accounts held in memory. Accounts
//!   start unverified; [`InMemoryIdentity::mark_verified`] plays the role of
//!   the user clicking the emailed link.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use flash_core::validation::validate_email;
use flash_core::{Category, Product, ProductDetail, ProductVariant, MIN_PASSWORD_LENGTH};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{run_cancellable, CatalogService};
use crate::error::{RemoteError, RemoteResult};
use crate::identity::{AuthErrorCode, AuthSession, AuthUser, IdentityService};

// =============================================================================
// Demo Catalog
// =============================================================================

const CATEGORIES: [(&str, &str); 10] = [
    ("Shirts", "shirt"),
    ("T-Shirts", "tshirts"),
    ("Pants", "jeans"),
    ("Hoodies", "hoodies"),
    ("Sweaters", "sweater"),
    ("Jackets", "jackets"),
    ("Socks", "socks"),
    ("Belts", "belts"),
    ("Hats", "hats"),
    ("Scarves", "scarves"),
];

const BRANDS: [&str; 5] = ["Adidas", "Nike", "Puma", "Gucci", "Snitch"];

/// (category, name suffix) for the three garments every brand sells.
const GARMENTS: [(&str, &str); 3] = [
    ("Shirts", "Shirt"),
    ("T-Shirts", "T-Shirt"),
    ("Pants", "Pants"),
];

/// Every demo product costs $100.00.
pub const DEMO_PRICE_CENTS: i64 = 10_000;

fn demo_image(key: &str) -> String {
    format!("asset://{key}")
}

fn slug(value: &str) -> String {
    value.to_ascii_lowercase().replace(' ', "-")
}

/// Static catalog shipped with the app.
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoCatalog {
    pub fn new() -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|(name, image)| Category::new(*name, demo_image(image)))
            .collect();

        let mut products = Vec::with_capacity(BRANDS.len() * GARMENTS.len());
        for brand in BRANDS {
            for (category, garment) in GARMENTS {
                let name = format!("{brand} {garment}");
                let image = format!("{}{}", slug(brand), slug(garment).replace('-', ""));
                products.push(
                    Product::new(&name, brand, category, DEMO_PRICE_CENTS)
                        .with_id(slug(&name))
                        .with_image(demo_image(&image)),
                );
            }
        }

        DemoCatalog {
            categories,
            products,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products in `category_name`, in catalog order.
    pub fn products_in(&self, category_name: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category_name == category_name)
            .cloned()
            .collect()
    }

    /// Detail with the demo size run. Stock varies so every stock message
    /// can be seen.
    pub fn detail(&self, product_id: &str) -> Option<ProductDetail> {
        let product = self.products.iter().find(|p| p.id == product_id)?;
        Some(ProductDetail {
            variants: vec![
                ProductVariant::new("S", 8),
                ProductVariant::new("M", 12),
                ProductVariant::new("L", 2),
                ProductVariant::new("XL", 0),
            ],
            ..ProductDetail::from(product)
        })
    }
}

#[async_trait]
impl CatalogService for DemoCatalog {
    async fn list_categories(&self, cancel: &CancellationToken) -> RemoteResult<Vec<Category>> {
        run_cancellable(cancel, async { Ok(self.categories.clone()) }).await
    }

    async fn list_products(
        &self,
        category_name: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<Vec<Product>> {
        run_cancellable(cancel, async { Ok(self.products_in(category_name)) }).await
    }

    async fn get_product_detail(
        &self,
        product_id: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<ProductDetail> {
        run_cancellable(cancel, async {
            self.detail(product_id)
                .ok_or_else(|| RemoteError::NotFound(format!("Product {product_id}")))
        })
        .await
    }
}

// =============================================================================
// In-Memory Identity
// =============================================================================

/// Lifetime of locally issued id tokens.
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: String,
    email_verified: bool,
}

#[derive(Debug, Default)]
struct Accounts {
    /// Keyed by lowercased email.
    by_email: HashMap<String, Account>,
    /// id token or refresh token → lowercased email.
    tokens: HashMap<String, String>,
    verification_emails: Vec<String>,
}

/// Identity provider that keeps accounts in process memory.
#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    accounts: Mutex<Accounts>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider preloaded with one verified account.
    pub fn with_account(email: &str, password: &str) -> Self {
        let mut accounts = Accounts::default();
        let key = email.to_ascii_lowercase();
        accounts.by_email.insert(
            key,
            Account {
                uid: Uuid::new_v4().to_string(),
                email: email.to_string(),
                password: password.to_string(),
                email_verified: true,
            },
        );
        InMemoryIdentity {
            accounts: Mutex::new(accounts),
        }
    }

    /// Marks the account as verified. Returns false if it does not exist.
    pub async fn mark_verified(&self, email: &str) -> bool {
        let mut accounts = self.accounts.lock().await;
        match accounts.by_email.get_mut(&email.to_ascii_lowercase()) {
            Some(account) => {
                account.email_verified = true;
                true
            }
            None => false,
        }
    }

    /// Addresses that were sent a verification email, oldest first.
    pub async fn verification_emails(&self) -> Vec<String> {
        self.accounts.lock().await.verification_emails.clone()
    }

    fn issue(accounts: &mut Accounts, account: &Account) -> AuthSession {
        let id_token = Uuid::new_v4().to_string();
        let refresh_token = Uuid::new_v4().to_string();
        let key = account.email.to_ascii_lowercase();
        accounts.tokens.insert(id_token.clone(), key.clone());
        accounts.tokens.insert(refresh_token.clone(), key);

        AuthSession::issued_at(
            AuthUser {
                uid: account.uid.clone(),
                email: account.email.clone(),
                email_verified: account.email_verified,
            },
            id_token,
            refresh_token,
            Utc::now(),
            TOKEN_LIFETIME_SECS,
        )
    }

    fn account_for_token<'a>(accounts: &'a Accounts, token: &str) -> RemoteResult<&'a Account> {
        accounts
            .tokens
            .get(token)
            .and_then(|key| accounts.by_email.get(key))
            .ok_or(RemoteError::Auth {
                code: AuthErrorCode::InvalidToken,
            })
    }
}

fn auth_error(code: AuthErrorCode) -> RemoteError {
    RemoteError::Auth { code }
}

#[async_trait]
impl IdentityService for InMemoryIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> RemoteResult<AuthSession> {
        if email.is_empty() {
            return Err(auth_error(AuthErrorCode::MissingEmail));
        }
        if password.is_empty() {
            return Err(auth_error(AuthErrorCode::MissingPassword));
        }
        if validate_email(email).is_err() {
            return Err(auth_error(AuthErrorCode::InvalidEmail));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(auth_error(AuthErrorCode::WeakPassword));
        }

        let mut accounts = self.accounts.lock().await;
        let key = email.to_ascii_lowercase();
        if accounts.by_email.contains_key(&key) {
            return Err(auth_error(AuthErrorCode::EmailExists));
        }

        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            email_verified: false,
        };
        accounts.by_email.insert(key, account.clone());
        info!(uid = %account.uid, "Created in-memory account");
        Ok(Self::issue(&mut accounts, &account))
    }

    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<AuthSession> {
        if email.is_empty() {
            return Err(auth_error(AuthErrorCode::MissingEmail));
        }
        if password.is_empty() {
            return Err(auth_error(AuthErrorCode::MissingPassword));
        }

        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .by_email
            .get(&email.to_ascii_lowercase())
            .filter(|a| a.password == password)
            .cloned()
            .ok_or(auth_error(AuthErrorCode::InvalidCredentials))?;

        debug!(uid = %account.uid, "In-memory sign-in");
        Ok(Self::issue(&mut accounts, &account))
    }

    async fn send_verification_email(&self, session: &AuthSession) -> RemoteResult<()> {
        let mut accounts = self.accounts.lock().await;
        let email = Self::account_for_token(&accounts, &session.id_token)?
            .email
            .clone();
        info!(%email, "Recorded verification email");
        accounts.verification_emails.push(email);
        Ok(())
    }

    async fn lookup(&self, session: &AuthSession) -> RemoteResult<AuthUser> {
        let accounts = self.accounts.lock().await;
        let account = Self::account_for_token(&accounts, &session.id_token)?;
        Ok(AuthUser {
            uid: account.uid.clone(),
            email: account.email.clone(),
            email_verified: account.email_verified,
        })
    }

    async fn refresh(&self, session: &AuthSession) -> RemoteResult<AuthSession> {
        let mut accounts = self.accounts.lock().await;
        let account = Self::account_for_token(&accounts, &session.refresh_token)?.clone();
        accounts.tokens.remove(&session.id_token);
        accounts.tokens.remove(&session.refresh_token);
        Ok(Self::issue(&mut accounts, &account))
    }

    async fn sign_out(&self, session: &AuthSession) -> RemoteResult<()> {
        let mut accounts = self.accounts.lock().await;
        accounts.tokens.remove(&session.id_token);
        accounts.tokens.remove(&session.refresh_token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_shape() {
        let catalog = DemoCatalog::new();
        assert_eq!(catalog.categories().len(), 10);
        assert_eq!(catalog.categories()[1].name, "T-Shirts");
        assert_eq!(catalog.products().len(), 15);
        assert!(catalog
            .products()
            .iter()
            .all(|p| p.price_cents == DEMO_PRICE_CENTS));
    }

    #[test]
    fn test_products_in_category() {
        let catalog = DemoCatalog::new();
        let shirts = catalog.products_in("Shirts");
        let names: Vec<&str> = shirts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Adidas Shirt", "Nike Shirt", "Puma Shirt", "Gucci Shirt", "Snitch Shirt"]
        );
        assert_eq!(shirts[1].id, "nike-shirt");
        assert_eq!(shirts[0].image_url, "asset://adidasshirt");
        assert!(catalog.products_in("Hats").is_empty());
    }

    #[tokio::test]
    async fn test_detail_and_not_found() {
        let catalog = DemoCatalog::new();
        let token = CancellationToken::new();

        let detail = catalog
            .get_product_detail("puma-t-shirt", &token)
            .await
            .unwrap();
        assert_eq!(detail.name, "Puma T-Shirt");
        assert_eq!(detail.default_size(), Some("S"));

        let err = catalog
            .get_product_detail("missing", &token)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_cancelled_demo_fetch() {
        let catalog = DemoCatalog::new();
        let token = CancellationToken::new();
        token.cancel();
        let err = catalog.list_categories(&token).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let identity = InMemoryIdentity::new();
        let session = identity.sign_up("new@flash.dev", "secret1").await.unwrap();
        assert!(!session.user.email_verified);

        identity.send_verification_email(&session).await.unwrap();
        assert_eq!(identity.verification_emails().await, vec!["new@flash.dev"]);

        assert!(identity.mark_verified("NEW@flash.dev").await);
        let user = identity.lookup(&session).await.unwrap();
        assert!(user.email_verified);

        let again = identity.sign_in("new@flash.dev", "secret1").await.unwrap();
        assert_eq!(again.user.uid, session.user.uid);
    }

    #[tokio::test]
    async fn test_provider_rejections() {
        let identity = InMemoryIdentity::with_account("demo@email.com", "password123");

        let err = identity
            .sign_up("demo@email.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Auth {
                code: AuthErrorCode::EmailExists
            }
        ));

        let err = identity.sign_up("a@b.co", "123").await.unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Auth {
                code: AuthErrorCode::WeakPassword
            }
        ));

        let err = identity
            .sign_in("demo@email.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Auth {
                code: AuthErrorCode::InvalidCredentials
            }
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens_and_sign_out_revokes() {
        let identity = InMemoryIdentity::with_account("demo@email.com", "password123");
        let session = identity
            .sign_in("demo@email.com", "password123")
            .await
            .unwrap();

        let refreshed = identity.refresh(&session).await.unwrap();
        assert_ne!(refreshed.id_token, session.id_token);
        assert!(identity.lookup(&session).await.is_err());

        identity.sign_out(&refreshed).await.unwrap();
        let err = identity.lookup(&refreshed).await.unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Auth {
                code: AuthErrorCode::InvalidToken
            }
        ));
    }
}
