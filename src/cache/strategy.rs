//! Lookup strategies
//!
//! A request can be answered by its own cache entry or by re-shaping a
//! broader one. `build_strategies` lists every candidate from the most to
//! the least specific; the manager tries them in order.

use super::extract;
use super::FULL_CATALOG_ENDPOINT;
use serde_json::Value;

/// The shape of a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointShape {
    /// `/products/full`
    FullCatalog,
    /// `/products`
    Products,
    /// `/products/{product}`
    Product { product: String },
    /// `/products/{product}/releases/latest`
    LatestRelease { product: String },
    /// `/products/{product}/releases/{release}`
    Release { product: String, release: String },
    /// `/categories`
    Categories,
    /// `/categories/{category}`
    Category { category: String },
    /// `/tags`
    Tags,
    /// `/tags/{tag}`
    Tag { tag: String },
    /// Index, identifiers and anything unrecognised
    Other,
}

impl EndpointShape {
    /// Classify an endpoint path (leading and trailing slashes are optional)
    pub fn parse(endpoint: &str) -> Self {
        let trimmed = endpoint.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            ["products"] => Self::Products,
            ["products", "full"] => Self::FullCatalog,
            ["products", product] => Self::Product {
                product: product.to_string(),
            },
            ["products", product, "releases", "latest"] => Self::LatestRelease {
                product: product.to_string(),
            },
            ["products", product, "releases", release] => Self::Release {
                product: product.to_string(),
                release: release.to_string(),
            },
            ["categories"] => Self::Categories,
            ["categories", category] => Self::Category {
                category: category.to_string(),
            },
            ["tags"] => Self::Tags,
            ["tags", tag] => Self::Tag {
                tag: tag.to_string(),
            },
            _ => Self::Other,
        }
    }

    /// Whether this is the always-cached full catalog
    pub fn is_full_catalog(&self) -> bool {
        matches!(self, Self::FullCatalog)
    }
}

/// How to turn a cached payload into the requested one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    Identity,
    ProductFromCatalog { product: String },
    ReleaseFromProduct { release: String },
    ReleaseFromCatalog { product: String, release: String },
    ProductsFromCatalog,
    CategoriesFromCatalog,
    ProductsByCategory { category: String },
    TagsFromCatalog,
    ProductsByTag { tag: String },
}

impl Extractor {
    /// Run the extraction; `base_url` feeds synthesized `uri` fields
    pub fn apply(&self, payload: &Value, base_url: &str) -> Option<Value> {
        match self {
            Self::Identity => extract::identity(payload),
            Self::ProductFromCatalog { product } => extract::product_from_catalog(payload, product),
            Self::ReleaseFromProduct { release } => extract::release_from_product(payload, release),
            Self::ReleaseFromCatalog { product, release } => {
                extract::release_from_catalog(payload, product, release)
            }
            Self::ProductsFromCatalog => extract::products_from_catalog(payload, base_url),
            Self::CategoriesFromCatalog => extract::categories_from_catalog(payload, base_url),
            Self::ProductsByCategory { category } => {
                extract::products_by_category(payload, category, base_url)
            }
            Self::TagsFromCatalog => extract::tags_from_catalog(payload, base_url),
            Self::ProductsByTag { tag } => extract::products_by_tag(payload, tag, base_url),
        }
    }
}

/// One place the answer could live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub endpoint: String,
    pub params: Vec<String>,
    pub extractor: Extractor,
}

impl Candidate {
    fn new(endpoint: &str, params: &[&str], extractor: Extractor) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            extractor,
        }
    }

    fn from_catalog(extractor: Extractor) -> Self {
        Self::new(FULL_CATALOG_ENDPOINT, &[], extractor)
    }

    /// Parameters as borrowed slices for key generation
    pub fn param_refs(&self) -> Vec<&str> {
        self.params.iter().map(String::as_str).collect()
    }
}

/// Candidates for a request, most specific first
pub fn build_strategies(endpoint: &str, params: &[&str]) -> Vec<Candidate> {
    let mut candidates = vec![Candidate::new(endpoint, params, Extractor::Identity)];

    match EndpointShape::parse(endpoint) {
        EndpointShape::Products => {
            candidates.push(Candidate::from_catalog(Extractor::ProductsFromCatalog));
        }
        EndpointShape::Product { product } => {
            candidates.push(Candidate::from_catalog(Extractor::ProductFromCatalog {
                product,
            }));
        }
        EndpointShape::Release { product, release } => {
            let product_endpoint = format!("/products/{}", product);
            candidates.push(Candidate::new(
                &product_endpoint,
                &[product.as_str()],
                Extractor::ReleaseFromProduct {
                    release: release.clone(),
                },
            ));
            candidates.push(Candidate::from_catalog(Extractor::ReleaseFromCatalog {
                product,
                release,
            }));
        }
        EndpointShape::Categories => {
            candidates.push(Candidate::from_catalog(Extractor::CategoriesFromCatalog));
        }
        EndpointShape::Category { category } => {
            candidates.push(Candidate::from_catalog(Extractor::ProductsByCategory {
                category,
            }));
        }
        EndpointShape::Tags => {
            candidates.push(Candidate::from_catalog(Extractor::TagsFromCatalog));
        }
        EndpointShape::Tag { tag } => {
            candidates.push(Candidate::from_catalog(Extractor::ProductsByTag { tag }));
        }
        EndpointShape::FullCatalog | EndpointShape::LatestRelease { .. } | EndpointShape::Other => {}
    }

    candidates
}
