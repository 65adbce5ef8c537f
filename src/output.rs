//! Output formatting - plain text views or pretty JSON

use crate::cache::CacheStats;
use crate::models::{
    FullProductListResponse, IdentifierListResponse, ProductListResponse, ProductRelease,
    ProductReleaseResponse, ProductResponse, ProductSummary, Uri, UriListResponse,
};
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Write;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a command can print
#[derive(Debug, Clone)]
pub enum Response {
    Index(UriListResponse),
    Products(ProductListResponse),
    FullProducts(FullProductListResponse),
    Product(ProductResponse),
    Release(ProductReleaseResponse),
    LatestRelease(ProductReleaseResponse),
    Categories(UriListResponse),
    CategoryProducts {
        category: String,
        products: ProductListResponse,
    },
    Tags(UriListResponse),
    TagProducts {
        tag: String,
        products: ProductListResponse,
    },
    IdentifierTypes(UriListResponse),
    Identifiers {
        kind: String,
        identifiers: IdentifierListResponse,
    },
    CacheStats(CacheStats),
    CacheCleared {
        removed: usize,
    },
    CacheExpiredCleared {
        removed: usize,
    },
}

impl Response {
    /// JSON document for `--format json`
    ///
    /// API responses are emitted as received; cache maintenance reports a
    /// small summary object.
    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            Response::Index(r)
            | Response::Categories(r)
            | Response::Tags(r)
            | Response::IdentifierTypes(r) => to_value(r)?,
            Response::Products(r)
            | Response::CategoryProducts { products: r, .. }
            | Response::TagProducts { products: r, .. } => to_value(r)?,
            Response::FullProducts(r) => to_value(r)?,
            Response::Product(r) => to_value(r)?,
            Response::Release(r) | Response::LatestRelease(r) => to_value(r)?,
            Response::Identifiers { identifiers, .. } => to_value(identifiers)?,
            Response::CacheStats(stats) => to_value(stats)?,
            Response::CacheCleared { removed } => json!({"cleared": true, "removed": removed}),
            Response::CacheExpiredCleared { removed } => {
                json!({"cleared": "expired", "removed": removed})
            }
        };
        Ok(value)
    }

    /// Fixed plain-text view
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Response::Index(r) => uri_list(&mut out, "API endpoints:", &r.result),
            Response::Products(r) => {
                let _ = writeln!(out, "Products - {} total:", r.total);
                product_list(&mut out, &r.result);
            }
            Response::FullProducts(r) => {
                let _ = writeln!(out, "All products (full details) - {} total:", r.total);
                for product in &r.result {
                    let _ = writeln!(
                        out,
                        "  {:<24} {:<32} {} releases",
                        product.name,
                        product.label.as_deref().unwrap_or("-"),
                        product.releases.len()
                    );
                }
            }
            Response::Product(r) => {
                match &r.last_modified {
                    Some(modified) => {
                        let _ = writeln!(out, "Product details (last modified: {}):", modified);
                    }
                    None => out.push_str("Product details:\n"),
                }
                let p = &r.result;
                let _ = writeln!(out, "  Name: {}", p.name);
                field(&mut out, "Label", p.label.as_deref());
                field(&mut out, "Category", p.category.as_deref());
                if !p.aliases.is_empty() {
                    let _ = writeln!(out, "  Aliases: {}", p.aliases.join(", "));
                }
                if !p.tags.is_empty() {
                    let _ = writeln!(out, "  Tags: {}", p.tags.join(", "));
                }
                field(&mut out, "Link", p.links.html.as_deref());
                if !p.releases.is_empty() {
                    out.push_str("  Releases:\n");
                    let _ = writeln!(
                        out,
                        "    {:<12} {:<12} {:<12} {:<5} {:<11} LATEST",
                        "NAME", "RELEASED", "EOL", "LTS", "MAINTAINED"
                    );
                    for release in &p.releases {
                        release_row(&mut out, release);
                    }
                }
            }
            Response::Release(r) => release_details(&mut out, "Release information:", &r.result),
            Response::LatestRelease(r) => {
                release_details(&mut out, "Latest release information:", &r.result)
            }
            Response::Categories(r) => uri_list(&mut out, "Categories:", &r.result),
            Response::CategoryProducts { category, products } => {
                let _ = writeln!(out, "Products in category '{}':", category);
                product_list(&mut out, &products.result);
            }
            Response::Tags(r) => uri_list(&mut out, "Tags:", &r.result),
            Response::TagProducts { tag, products } => {
                let _ = writeln!(out, "Products with tag '{}':", tag);
                product_list(&mut out, &products.result);
            }
            Response::IdentifierTypes(r) => uri_list(&mut out, "Identifier types:", &r.result),
            Response::Identifiers { kind, identifiers } => {
                let _ = writeln!(out, "Identifiers of type '{}':", kind);
                for item in &identifiers.result {
                    let _ = writeln!(out, "  {} -> {}", item.identifier, item.product.name);
                }
            }
            Response::CacheStats(stats) => out.push_str(&stats.display()),
            Response::CacheCleared { removed } => {
                let _ = writeln!(out, "Cache cleared successfully ({} entries removed)", removed);
            }
            Response::CacheExpiredCleared { removed } => {
                let _ = writeln!(out, "Removed {} expired cache entries", removed);
            }
        }
        out
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn uri_list(out: &mut String, header: &str, items: &[Uri]) {
    let _ = writeln!(out, "{}", header);
    for item in items {
        let _ = writeln!(out, "  {:<24} {}", item.name, item.uri);
    }
}

fn product_list(out: &mut String, items: &[ProductSummary]) {
    for item in items {
        let _ = writeln!(
            out,
            "  {:<24} {:<32} {}",
            item.name,
            item.label.as_deref().unwrap_or("-"),
            item.category.as_deref().unwrap_or("-")
        );
    }
}

fn field(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "  {}: {}", name, value);
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn release_row(out: &mut String, release: &ProductRelease) {
    let _ = writeln!(
        out,
        "    {:<12} {:<12} {:<12} {:<5} {:<11} {}",
        release.name,
        release.release_date.as_deref().unwrap_or("-"),
        release.eol_from.as_deref().unwrap_or("-"),
        yes_no(release.is_lts),
        yes_no(release.is_maintained),
        release.latest.as_ref().map(|v| v.name.as_str()).unwrap_or("-")
    );
}

fn release_details(out: &mut String, header: &str, release: &ProductRelease) {
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "  Name: {}", release.name);
    field(out, "Label", release.label.as_deref());
    field(out, "Codename", release.codename.as_deref());
    field(out, "Released", release.release_date.as_deref());
    let _ = writeln!(out, "  LTS: {}", yes_no(release.is_lts));
    let _ = writeln!(out, "  Maintained: {}", yes_no(release.is_maintained));
    let _ = writeln!(
        out,
        "  EOL: {}{}",
        yes_no(release.is_eol),
        release
            .eol_from
            .as_deref()
            .map(|d| format!(" ({})", d))
            .unwrap_or_default()
    );
    if let Some(latest) = &release.latest {
        let _ = writeln!(
            out,
            "  Latest: {}{}",
            latest.name,
            latest
                .date
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        );
    }
}

/// Render a response in the requested format
pub fn render(response: &Response, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(response.to_text()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&response.to_value()?)?;
            json.push('\n');
            Ok(json)
        }
    }
}
