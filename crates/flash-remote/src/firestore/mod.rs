//! # Firestore Catalog Client
//!
//! [`CatalogService`] over the Firestore REST v1 API.
//!
//! ## Requests
//! ```text
//! list_categories     GET  {documents}/categories?pageSize=..&pageToken=..
//! list_products       POST {documents}:runQuery   (categoryName EQUAL name)
//! get_product_detail  GET  {documents}/products/{id}
//! ```
//!
//! Status mapping: 404 → `NotFound`, 401/403 → `Unauthorized`, any other
//! non-2xx → `UnexpectedStatus`.

mod value;

pub use value::{price_to_cents, Document, Value};

use async_trait::async_trait;
use flash_core::{Category, Product, ProductDetail};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{run_cancellable, CatalogService};
use crate::config::FirebaseConfig;
use crate::error::{RemoteError, RemoteResult};

use value::{
    category_from_document, product_detail_from_document, product_from_document,
    ListDocumentsResponse, RunQueryItem,
};

const CATEGORIES: &str = "categories";
const PRODUCTS: &str = "products";

/// Documents requested per page when listing a collection.
pub const PAGE_SIZE: u32 = 300;

/// Upper bound on pages fetched for one listing.
pub const MAX_PAGES: usize = 50;

/// Google API error envelope: `{"error": {"code": 403, "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Catalog backed by a Firestore database.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: Client,
    config: FirebaseConfig,
}

impl FirestoreClient {
    pub fn new(config: FirebaseConfig) -> RemoteResult<Self> {
        config.validate()?;
        let client = config.http_client()?;
        Ok(FirestoreClient { client, config })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.config.documents_url(), collection)
    }

    /// `{collection}/{id}` with the id percent-encoded as one path segment.
    fn document_url(&self, collection: &str, id: &str) -> RemoteResult<Url> {
        let base = self.collection_url(collection);
        let mut url = Url::parse(&base)
            .map_err(|e| RemoteError::InvalidConfig(format!("bad Firestore URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidConfig(format!("Firestore URL {base} has no path")))?
            .push(id);
        Ok(url)
    }

    /// Sends `request` and decodes a 2xx JSON body into `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> RemoteResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_default();
            debug!(status = status.as_u16(), %url, %message, "Firestore request failed");

            return Err(match status {
                StatusCode::NOT_FOUND => RemoteError::NotFound(what.to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    RemoteError::Unauthorized(if message.is_empty() {
                        status.to_string()
                    } else {
                        message
                    })
                }
                _ => RemoteError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                },
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::InvalidResponse(format!("{what}: {e}")))
    }

    async fn fetch_categories(&self) -> RemoteResult<Vec<Category>> {
        let url = self.collection_url(CATEGORIES);
        let page_size = PAGE_SIZE.to_string();
        let mut categories = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..MAX_PAGES {
            let mut query = vec![
                ("key", self.config.api_key.as_str()),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            debug!(page, "Fetching categories page");
            let response: ListDocumentsResponse = self
                .send_json(self.client.get(&url).query(&query), "Categories")
                .await?;

            categories.extend(response.documents.iter().map(category_from_document));

            match response.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => {
                    info!(count = categories.len(), "Loaded categories");
                    return Ok(categories);
                }
            }
        }

        warn!(max_pages = MAX_PAGES, "Category listing did not terminate");
        Err(RemoteError::PaginationLimit {
            collection: CATEGORIES.to_string(),
            max_pages: MAX_PAGES,
        })
    }

    async fn query_products(&self, category_name: &str) -> RemoteResult<Vec<Product>> {
        let url = format!("{}:runQuery", self.config.documents_url());
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": PRODUCTS }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "categoryName" },
                        "op": "EQUAL",
                        "value": { "stringValue": category_name }
                    }
                }
            }
        });

        debug!(category_name, "Querying products");
        let items: Vec<RunQueryItem> = self
            .send_json(
                self.client
                    .post(&url)
                    .query(&[("key", self.config.api_key.as_str())])
                    .json(&body),
                "Products",
            )
            .await?;

        let products: Vec<Product> = items
            .iter()
            .filter_map(|item| item.document.as_ref())
            .map(product_from_document)
            .collect();

        info!(category_name, count = products.len(), "Loaded products");
        Ok(products)
    }

    async fn fetch_product(&self, product_id: &str) -> RemoteResult<ProductDetail> {
        let what = format!("Product {product_id}");
        if product_id.is_empty() || product_id.contains('/') {
            return Err(RemoteError::NotFound(what));
        }

        let url = self.document_url(PRODUCTS, product_id)?;
        debug!(product_id, "Fetching product detail");
        let doc: Document = self
            .send_json(
                self.client
                    .get(url)
                    .query(&[("key", self.config.api_key.as_str())]),
                &what,
            )
            .await?;

        Ok(product_detail_from_document(&doc))
    }
}

#[async_trait]
impl CatalogService for FirestoreClient {
    async fn list_categories(&self, cancel: &CancellationToken) -> RemoteResult<Vec<Category>> {
        run_cancellable(cancel, self.fetch_categories()).await
    }

    async fn list_products(
        &self,
        category_name: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<Vec<Product>> {
        run_cancellable(cancel, self.query_products(category_name)).await
    }

    async fn get_product_detail(
        &self,
        product_id: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<ProductDetail> {
        run_cancellable(cancel, self.fetch_product(product_id)).await
    }
}
