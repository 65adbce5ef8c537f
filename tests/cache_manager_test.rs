//! Cache behaviour through the public interface

use eol::cache::{
    create_cache, generate_cache_key, Cache, CacheConfig, CacheResult, FULL_CATALOG_ENDPOINT,
};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const BASE: &str = "https://endoflife.date/api/v1";

fn cache_in(temp_dir: &TempDir, enabled: bool) -> Arc<dyn Cache> {
    create_cache(CacheConfig::new(
        enabled,
        Duration::from_secs(3600),
        temp_dir.path().join("eol"),
        BASE,
    ))
}

fn snapshot() -> Value {
    json!({
        "schema_version": "1.2.0",
        "total": 2,
        "result": [
            {
                "name": "go",
                "label": "Go",
                "category": "lang",
                "tags": ["google", "lang"],
                "releases": [{"name": "1.24"}, {"name": "1.23"}]
            },
            {
                "name": "python",
                "label": "Python",
                "category": "lang",
                "tags": ["lang", "python-software-foundation"],
                "releases": [{"name": "3.13"}]
            }
        ]
    })
}

fn hit(result: CacheResult) -> Value {
    result.into_hit().expect("expected a cache hit")
}

#[test]
fn test_release_derived_from_catalog_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_in(&temp_dir, true);
    cache.put(FULL_CATALOG_ENDPOINT, &[], &snapshot()).unwrap();

    let release = hit(cache.get("/products/go/releases/1.23.4", &["go", "1.23.4"]));
    assert_eq!(release["result"]["name"], "1.23");

    let exact = hit(cache.get("/products/python/releases/3.13", &["python", "3.13"]));
    assert_eq!(exact["result"]["name"], "3.13");
}

#[test]
fn test_catalog_synthesizes_lists() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_in(&temp_dir, true);
    cache.put(FULL_CATALOG_ENDPOINT, &[], &snapshot()).unwrap();

    let product = hit(cache.get("/products/python", &["python"]));
    assert_eq!(product["result"]["label"], "Python");
    assert_eq!(product["schema_version"], "1.2.0");

    let products = hit(cache.get("/products", &[]));
    assert_eq!(products["total"], 2);
    assert_eq!(products["result"][0]["uri"], format!("{}/products/go", BASE));
    assert!(products["result"][0].get("releases").is_none());

    let categories = hit(cache.get("/categories", &[]));
    assert_eq!(categories["total"], 1);
    assert_eq!(categories["result"][0]["name"], "lang");
    assert_eq!(categories["result"][0]["uri"], format!("{}/categories/lang", BASE));

    let tags = hit(cache.get("/tags", &[]));
    let names: Vec<&str> = tags["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["google", "lang", "python-software-foundation"]);

    let google = hit(cache.get("/tags/google", &["tag", "google"]));
    assert_eq!(google["total"], 1);
    assert_eq!(google["result"][0]["name"], "go");

    let lang = hit(cache.get("/categories/lang", &["category", "lang"]));
    assert_eq!(lang["total"], 2);

    assert!(matches!(
        cache.get("/categories/langg", &["category", "langg"]),
        CacheResult::Miss
    ));
    assert!(matches!(cache.get("/tags/nope", &["tag", "nope"]), CacheResult::Miss));
}

#[test]
fn test_release_normalized_against_cached_product() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_in(&temp_dir, true);
    cache
        .put(
            "/products/go",
            &["go"],
            &json!({
                "schema_version": "1.2.0",
                "result": {"name": "go", "releases": [{"name": "1.24"}, {"name": "1.23"}]}
            }),
        )
        .unwrap();

    let release = hit(cache.get("/products/go/releases/1.23.4", &["go", "1.23.4"]));
    assert_eq!(release["result"]["name"], "1.23");
}

#[test]
fn test_exact_entry_is_preferred() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_in(&temp_dir, true);
    cache.put(FULL_CATALOG_ENDPOINT, &[], &snapshot()).unwrap();
    cache
        .put("/categories", &[], &json!({"total": 9, "result": []}))
        .unwrap();

    assert_eq!(
        hit(cache.get("/categories", &[])),
        json!({"total": 9, "result": []})
    );
}

#[test]
fn test_corrupt_catalog_is_a_miss() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_in(&temp_dir, true);
    let dir = temp_dir.path().join("eol");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(generate_cache_key(FULL_CATALOG_ENDPOINT, &[])), "{\"data\":").unwrap();

    assert!(cache.get("/products/go", &["go"]).is_miss());
    assert!(cache.get(FULL_CATALOG_ENDPOINT, &[]).is_miss());
}

#[test]
fn test_disabled_cache_gate() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_in(&temp_dir, false);
    assert!(!cache.is_enabled());

    cache.put("/tags", &[], &json!({"result": []})).unwrap();
    assert!(cache.get("/tags", &[]).is_bypassed());

    cache.put(FULL_CATALOG_ENDPOINT, &[], &snapshot()).unwrap();
    assert_eq!(hit(cache.get(FULL_CATALOG_ENDPOINT, &[])), snapshot());

    let stats = cache.stats().unwrap();
    assert_eq!(stats.total_files, 1);
}

#[test]
fn test_clear_leaves_foreign_directory_alone() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("projects");
    let cache = create_cache(CacheConfig::new(true, Duration::from_secs(60), dir.clone(), BASE));

    cache.put("/products", &[], &json!([])).unwrap();
    fs::write(dir.join("README.md"), "mine").unwrap();

    assert!(cache.clear().is_err());
    assert!(dir.join("products.eol_cache.json").exists());
    assert!(dir.join("README.md").exists());
}
