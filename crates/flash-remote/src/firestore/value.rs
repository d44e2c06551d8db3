//! Firestore REST wire types and their mapping onto catalog types.
//!
//! Firestore encodes every field as a single-key object naming its type:
//!
//! ```json
//! { "name": ".../documents/products/p-1",
//!   "fields": { "name": {"stringValue": "Nike Shirt"},
//!               "price": {"doubleValue": 99.5},
//!               "discountPercent": {"integerValue": "10"} } }
//! ```
//!
//! Missing or mistyped fields decode to the type's default, the same way
//! the mobile SDK maps documents onto objects with default constructors.

use std::collections::HashMap;

use flash_core::validation::validate_discount_percent;
use flash_core::{Category, Product, ProductDetail, ProductVariant};
use serde::Deserialize;
use tracing::warn;

/// One typed Firestore value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(IntegerRepr),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

/// int64 values arrive as JSON strings; emulators sometimes send numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IntegerRepr {
    Text(String),
    Number(i64),
}

impl IntegerRepr {
    fn as_i64(&self) -> Option<i64> {
        match self {
            IntegerRepr::Text(s) => s.parse().ok(),
            IntegerRepr::Number(n) => Some(*n),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    /// Full resource name, ending in `/<collection>/<id>`.
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// Body of `GET documents/<collection>`. An empty collection is `{}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

/// One element of the `documents:runQuery` response array. Elements
/// without a document only report progress (`readTime`, `skippedResults`).
#[derive(Debug, Deserialize)]
pub struct RunQueryItem {
    pub document: Option<Document>,
}

impl Document {
    /// Document id: the last segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    fn fields(&self) -> Fields<'_> {
        Fields(&self.fields)
    }
}

/// Typed accessors shared by documents and map values.
struct Fields<'a>(&'a HashMap<String, Value>);

impl<'a> Fields<'a> {
    fn string(&self, key: &str) -> Option<&'a str> {
        match self.0.get(key) {
            Some(Value::StringValue(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn string_or_default(&self, key: &str) -> String {
        self.string(key).unwrap_or_default().to_string()
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(Value::DoubleValue(d)) => Some(*d),
            Some(Value::IntegerValue(i)) => i.as_i64().map(|n| n as f64),
            _ => None,
        }
    }

    fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(Value::IntegerValue(i)) => i.as_i64(),
            Some(Value::DoubleValue(d)) => Some(d.trunc() as i64),
            _ => None,
        }
    }

    fn array(&self, key: &str) -> &'a [Value] {
        match self.0.get(key) {
            Some(Value::ArrayValue(a)) => &a.values,
            _ => &[],
        }
    }
}

/// Converts a stored double price to cents, rounding to the nearest cent.
pub fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

fn discount_percent(doc_id: &str, raw: Option<i64>) -> u32 {
    let raw = raw.unwrap_or(0);
    if let Err(e) = validate_discount_percent(raw) {
        warn!(doc_id, raw, error = %e, "Suspicious discount on catalog document");
    }
    u32::try_from(raw).unwrap_or(0)
}

pub fn category_from_document(doc: &Document) -> Category {
    let f = doc.fields();
    Category {
        name: f.string_or_default("name"),
        image_url: f.string_or_default("imageUrl"),
    }
}

pub fn product_from_document(doc: &Document) -> Product {
    let f = doc.fields();
    Product {
        id: doc.id().to_string(),
        name: f.string_or_default("name"),
        brand: f.string_or_default("brand"),
        category_name: f.string_or_default("categoryName"),
        price_cents: price_to_cents(f.number("price").unwrap_or(0.0)),
        description: f.string("description").map(str::to_string),
        discount_percent: discount_percent(doc.id(), f.integer("discountPercent")),
        image_url: f.string_or_default("imageUrl"),
    }
}

pub fn product_detail_from_document(doc: &Document) -> ProductDetail {
    let product = product_from_document(doc);
    let variants = doc
        .fields()
        .array("variants")
        .iter()
        .filter_map(|v| match v {
            Value::MapValue(m) => {
                let f = Fields(&m.fields);
                Some(ProductVariant {
                    size: f.string_or_default("size"),
                    stock: f.integer("stock").unwrap_or(0),
                })
            }
            _ => None,
        })
        .collect();

    ProductDetail {
        variants,
        ..ProductDetail::from(&product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_product_decodes_all_fields() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/products/nike-1",
            "fields": {
                "name": {"stringValue": "Nike Shirt"},
                "brand": {"stringValue": "Nike"},
                "categoryName": {"stringValue": "Shirts"},
                "price": {"doubleValue": 99.99},
                "description": {"stringValue": "Dri-FIT"},
                "discountPercent": {"integerValue": "15"},
                "imageUrl": {"stringValue": "https://img/nike.png"}
            }
        }));

        let p = product_from_document(&d);
        assert_eq!(p.id, "nike-1");
        assert_eq!(p.name, "Nike Shirt");
        assert_eq!(p.category_name, "Shirts");
        assert_eq!(p.price_cents, 9999);
        assert_eq!(p.description.as_deref(), Some("Dri-FIT"));
        assert_eq!(p.discount_percent, 15);
    }

    #[test]
    fn test_missing_fields_default() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/products/bare",
            "fields": {"description": {"nullValue": null}}
        }));

        let p = product_from_document(&d);
        assert_eq!(p.id, "bare");
        assert_eq!(p.name, "");
        assert_eq!(p.price_cents, 0);
        assert_eq!(p.description, None);
        assert_eq!(p.discount_percent, 0);

        let no_fields = doc(json!({"name": "x/categories/c1"}));
        assert_eq!(category_from_document(&no_fields), Category::default());
    }

    #[test]
    fn test_integer_price_and_numeric_integer() {
        let d = doc(json!({
            "name": "a/products/p",
            "fields": {
                "price": {"integerValue": "100"},
                "discountPercent": {"integerValue": 25}
            }
        }));
        let p = product_from_document(&d);
        assert_eq!(p.price_cents, 10000);
        assert_eq!(p.discount_percent, 25);
    }

    #[test]
    fn test_negative_discount_clamps_to_zero() {
        let d = doc(json!({
            "name": "a/products/p",
            "fields": {"discountPercent": {"integerValue": "-5"}}
        }));
        assert_eq!(product_from_document(&d).discount_percent, 0);
    }

    #[test]
    fn test_detail_decodes_variants() {
        let d = doc(json!({
            "name": "a/products/p",
            "fields": {
                "name": {"stringValue": "Puma Pants"},
                "variants": {"arrayValue": {"values": [
                    {"mapValue": {"fields": {"size": {"stringValue": "M"}, "stock": {"integerValue": "3"}}}},
                    {"mapValue": {"fields": {"size": {"stringValue": "L"}}}},
                    {"stringValue": "ignored"}
                ]}}
            }
        }));

        let detail = product_detail_from_document(&d);
        assert_eq!(detail.name, "Puma Pants");
        assert_eq!(
            detail.variants,
            vec![ProductVariant::new("M", 3), ProductVariant::new("L", 0)]
        );
    }

    #[test]
    fn test_empty_array_value() {
        let d = doc(json!({
            "name": "a/products/p",
            "fields": {"variants": {"arrayValue": {}}}
        }));
        assert!(product_detail_from_document(&d).variants.is_empty());
    }

    #[test]
    fn test_list_response_without_documents() {
        let resp: ListDocumentsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.documents.is_empty());
        assert!(resp.next_page_token.is_none());
    }

    #[test]
    fn test_price_to_cents_rounds() {
        assert_eq!(price_to_cents(0.1 + 0.2), 30);
        assert_eq!(price_to_cents(19.995), 2000);
        assert_eq!(price_to_cents(100.0), 10000);
    }
}
