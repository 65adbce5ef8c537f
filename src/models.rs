//! endoflife.date API response types
//!
//! Only `name` fields are required; everything the API may omit or null out
//! is optional, and unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A named link to another API resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uri {
    pub name: String,
    pub uri: String,
}

/// A product identifier (purl, cpe, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Latest version within a release cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVersion {
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A release cycle of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRelease {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub codename: Option<String>,
    #[serde(default)]
    pub is_lts: bool,
    #[serde(default)]
    pub lts_from: Option<String>,
    #[serde(default)]
    pub is_eol: bool,
    #[serde(default)]
    pub eol_from: Option<String>,
    #[serde(default)]
    pub is_maintained: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_eoas: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eoas_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_eoes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eoes_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_discontinued: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued_from: Option<String>,
    #[serde(default)]
    pub latest: Option<ProductVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Map<String, Value>>,
}

/// Product summary as listed by `/products`, `/categories/{c}` and `/tags/{t}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// Lifecycle phase labels of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLabels {
    #[serde(default)]
    pub eol: Option<String>,
    #[serde(default)]
    pub eoas: Option<String>,
    #[serde(default)]
    pub eoes: Option<String>,
    #[serde(default)]
    pub discontinued: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLinks {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub release_policy: Option<String>,
}

/// Full product details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub version_command: Option<String>,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
    #[serde(default)]
    pub labels: ProductLabels,
    #[serde(default)]
    pub links: ProductLinks,
    #[serde(default)]
    pub releases: Vec<ProductRelease>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/`, `/categories`, `/tags` and `/identifiers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UriListResponse {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub result: Vec<Uri>,
}

/// `/products`, `/categories/{category}` and `/tags/{tag}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub result: Vec<ProductSummary>,
}

/// `/products/full`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullProductListResponse {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub result: Vec<ProductDetails>,
}

/// `/products/{product}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    pub result: ProductDetails,
}

/// `/products/{product}/releases/{release}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReleaseResponse {
    #[serde(default)]
    pub schema_version: String,
    pub result: ProductRelease,
}

/// An identifier and the product it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierProduct {
    pub identifier: String,
    pub product: Uri,
}

/// `/identifiers/{type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierListResponse {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub result: Vec<IdentifierProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_release_with_nulls_and_extras() {
        let release: ProductRelease = serde_json::from_value(json!({
            "name": "22.04",
            "codename": "Jammy Jellyfish",
            "label": "22.04 'Jammy Jellyfish' (LTS)",
            "releaseDate": "2022-04-21",
            "isLts": true,
            "ltsFrom": null,
            "isEoas": false,
            "eoasFrom": "2027-06-01",
            "isEol": false,
            "eolFrom": "2027-06-01",
            "isMaintained": true,
            "latest": {"name": "22.04.5", "date": null, "link": null},
            "somethingNew": [1, 2, 3]
        }))
        .unwrap();

        assert_eq!(release.name, "22.04");
        assert!(release.is_lts);
        assert_eq!(release.lts_from, None);
        assert_eq!(release.is_eoas, Some(false));
        assert_eq!(release.is_discontinued, None);
        assert_eq!(release.latest.unwrap().name, "22.04.5");
    }

    #[test]
    fn test_product_response_minimal() {
        let response: ProductResponse = serde_json::from_value(json!({
            "schema_version": "1.2.0",
            "result": {"name": "go"}
        }))
        .unwrap();

        assert_eq!(response.result.name, "go");
        assert!(response.result.releases.is_empty());
        assert!(response.last_modified.is_none());
    }

    #[test]
    fn test_null_aliases_and_tags() {
        let summary: ProductSummary = serde_json::from_value(json!({
            "name": "go",
            "label": "Go",
            "category": "lang",
            "uri": "https://endoflife.date/api/v1/products/go",
            "aliases": null,
            "tags": null
        }))
        .unwrap();

        assert!(summary.aliases.is_empty());
        assert!(summary.tags.is_empty());
    }

    #[test]
    fn test_identifier_type_field() {
        let list: IdentifierListResponse = serde_json::from_value(json!({
            "schema_version": "1.2.0",
            "total": 1,
            "result": [{
                "identifier": "pkg:golang/go",
                "product": {"name": "go", "uri": "https://endoflife.date/api/v1/products/go"}
            }]
        }))
        .unwrap();
        assert_eq!(list.result[0].product.name, "go");

        let id: Identifier = serde_json::from_value(json!({"id": "cpe:/a:golang:go", "type": "cpe"})).unwrap();
        assert_eq!(id.kind, "cpe");
        assert_eq!(serde_json::to_value(&id).unwrap()["type"], "cpe");
    }
}
