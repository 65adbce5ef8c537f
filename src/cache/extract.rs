//! Derive narrower responses from broader cached ones
//!
//! Each function takes a cached payload and returns the payload a direct
//! call to the narrower endpoint would have produced, or `None` when the
//! cached data does not contain the requested piece. Items that do not
//! have the expected shape are skipped rather than failing the whole
//! extraction.

use crate::version::normalize_version;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

/// `/products/full` response, with items left untyped so they can be
/// re-emitted verbatim
#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(default)]
    schema_version: Value,
    #[serde(default)]
    last_modified: Option<Value>,
    result: Vec<Value>,
}

impl Catalog {
    fn parse(payload: &Value) -> Option<Self> {
        Catalog::deserialize(payload).ok()
    }

    /// Items paired with their typed view, malformed ones skipped
    fn entries(&self) -> impl Iterator<Item = (&Value, CatalogEntry)> + '_ {
        self.result
            .iter()
            .filter_map(|item| CatalogEntry::deserialize(item).ok().map(|entry| (item, entry)))
    }

    fn find(&self, product: &str) -> Option<(&Value, CatalogEntry)> {
        self.entries().find(|(_, entry)| entry.name == product)
    }
}

/// The fields of a catalog item the extractors look at
///
/// Only `name` is strict. The other fields are kept as raw JSON so a
/// malformed value drops that field instead of the whole product.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    label: Value,
    #[serde(default)]
    category: Value,
    #[serde(default, deserialize_with = "present")]
    aliases: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    tags: Option<Value>,
    #[serde(default)]
    releases: Value,
}

/// `Some` whenever the key exists, including an explicit `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CatalogEntry {
    fn summary(&self, base_url: &str) -> ProductSummary {
        ProductSummary {
            name: self.name.clone(),
            label: self.label.clone(),
            category: self.category.clone(),
            uri: format!("{}/products/{}", base_url, self.name),
            aliases: self.aliases.clone(),
            tags: self.tags.clone(),
        }
    }

    fn category_name(&self) -> Option<&str> {
        self.category.as_str()
    }

    /// String tags; anything else in the list is ignored
    fn tag_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags
            .as_ref()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tag_names().any(|t| t == tag)
    }

    fn releases(&self) -> Option<&[Value]> {
        self.releases.as_array().map(Vec::as_slice)
    }
}

/// Single product response: `{schema_version, result: {releases: [...]}}`
#[derive(Debug, Deserialize)]
struct ProductPayload {
    #[serde(default)]
    schema_version: Value,
    result: ProductBody,
}

#[derive(Debug, Deserialize)]
struct ProductBody {
    #[serde(default)]
    releases: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseName {
    name: String,
}

/// Entry of `/products`, `/categories/{c}` and `/tags/{t}` results
#[derive(Debug, Serialize)]
struct ProductSummary {
    name: String,
    label: Value,
    category: Value,
    uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aliases: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Value>,
}

/// Entry of `/categories` and `/tags` results
#[derive(Debug, Serialize)]
struct UriItem {
    name: String,
    uri: String,
}

/// Exact-match passthrough
pub fn identity(payload: &Value) -> Option<Value> {
    Some(payload.clone())
}

/// Single product out of the full catalog
pub fn product_from_catalog(catalog: &Value, product: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let (item, _) = catalog.find(product)?;

    let mut response = json!({
        "schema_version": catalog.schema_version,
        "result": item,
    });
    if let Some(last_modified) = catalog.last_modified.clone() {
        response["last_modified"] = last_modified;
    }

    Some(response)
}

/// Single release out of a cached single-product response
pub fn release_from_product(product: &Value, release: &str) -> Option<Value> {
    let payload = ProductPayload::deserialize(product).ok()?;
    let releases = payload.result.releases?;
    let found = find_release(&releases, release)?;

    Some(json!({
        "schema_version": payload.schema_version,
        "result": found,
    }))
}

/// Single release out of the full catalog
pub fn release_from_catalog(catalog: &Value, product: &str, release: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let (_, entry) = catalog.find(product)?;
    let found = find_release(entry.releases()?, release)?;

    Some(json!({
        "schema_version": catalog.schema_version,
        "result": found,
    }))
}

/// `/products` summary list out of the full catalog
pub fn products_from_catalog(catalog: &Value, base_url: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let base_url = base_url.trim_end_matches('/');

    let products: Vec<ProductSummary> = catalog
        .entries()
        .map(|(_, entry)| entry.summary(base_url))
        .collect();

    Some(list_response(&catalog.schema_version, products))
}

/// `/categories` out of the full catalog
pub fn categories_from_catalog(catalog: &Value, base_url: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let base_url = base_url.trim_end_matches('/');

    let categories = distinct(
        catalog
            .entries()
            .filter_map(|(_, entry)| entry.category_name().map(str::to_string)),
    );
    let items: Vec<UriItem> = categories
        .into_iter()
        .map(|name| UriItem {
            uri: format!("{}/categories/{}", base_url, name),
            name,
        })
        .collect();

    Some(list_response(&catalog.schema_version, items))
}

/// `/categories/{category}` out of the full catalog
///
/// A category no product carries is a miss, not an empty list.
pub fn products_by_category(catalog: &Value, category: &str, base_url: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let base_url = base_url.trim_end_matches('/');

    let products: Vec<ProductSummary> = catalog
        .entries()
        .filter(|(_, entry)| entry.category_name() == Some(category))
        .map(|(_, entry)| entry.summary(base_url))
        .collect();

    if products.is_empty() {
        return None;
    }
    Some(list_response(&catalog.schema_version, products))
}

/// `/tags` out of the full catalog
pub fn tags_from_catalog(catalog: &Value, base_url: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let base_url = base_url.trim_end_matches('/');

    let tags = distinct(
        catalog
            .entries()
            .flat_map(|(_, entry)| entry.tag_names().map(str::to_string).collect::<Vec<_>>()),
    );
    let items: Vec<UriItem> = tags
        .into_iter()
        .map(|name| UriItem {
            uri: format!("{}/tags/{}", base_url, name),
            name,
        })
        .collect();

    Some(list_response(&catalog.schema_version, items))
}

/// `/tags/{tag}` out of the full catalog, `None` when no product has the tag
pub fn products_by_tag(catalog: &Value, tag: &str, base_url: &str) -> Option<Value> {
    let catalog = Catalog::parse(catalog)?;
    let base_url = base_url.trim_end_matches('/');

    let products: Vec<ProductSummary> = catalog
        .entries()
        .filter(|(_, entry)| entry.has_tag(tag))
        .map(|(_, entry)| entry.summary(base_url))
        .collect();

    if products.is_empty() {
        return None;
    }
    Some(list_response(&catalog.schema_version, products))
}

/// Exact name first, then the normalized `major.minor` form
fn find_release<'a>(releases: &'a [Value], release: &str) -> Option<&'a Value> {
    release_named(releases, release).or_else(|| {
        let normalized = normalize_version(release);
        if normalized == release {
            None
        } else {
            release_named(releases, &normalized)
        }
    })
}

fn release_named<'a>(releases: &'a [Value], name: &str) -> Option<&'a Value> {
    releases.iter().find(|candidate| {
        ReleaseName::deserialize(*candidate)
            .map(|r| r.name == name)
            .unwrap_or(false)
    })
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

fn list_response<T: Serialize>(schema_version: &Value, items: Vec<T>) -> Value {
    json!({
        "schema_version": schema_version,
        "total": items.len(),
        "result": items,
    })
}
