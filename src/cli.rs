//! Command line interface
//!
//! Argument definitions and the dispatcher behind the `eol` binary. Kept in
//! the library so routing can be tested without spawning the process.

use crate::cache::{create_cache, Cache, CacheOptions};
use crate::client::EolClient;
use crate::config::{parse_duration, Config};
use crate::output::{render, OutputFormat, Response};
use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "eol")]
#[command(about = "Query endoflife.date for product lifecycle information", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Do not read or write the response cache (the full catalog is still cached)
    #[arg(long, global = true)]
    pub disable_cache: bool,

    /// Cache directory
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// TTL for cached responses (e.g. 30m, 2h, 1d)
    #[arg(long, global = true, value_name = "DURATION")]
    pub cache_for: Option<String>,

    /// API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the main API endpoints
    Index,

    /// List all products
    Products {
        /// Include every product's full details and releases
        #[arg(long)]
        full: bool,
    },

    /// Show a product and its release cycles
    Product {
        #[arg(value_name = "PRODUCT")]
        name: String,
    },

    /// Show a release cycle (full versions such as 1.24.6 are accepted)
    Release {
        #[arg(value_name = "PRODUCT")]
        product: String,

        #[arg(value_name = "RELEASE")]
        release: String,
    },

    /// Show the latest release cycle of a product
    Latest {
        #[arg(value_name = "PRODUCT")]
        product: String,
    },

    /// List categories, or the products in one
    Categories {
        #[arg(value_name = "CATEGORY")]
        name: Option<String>,
    },

    /// List tags, or the products carrying one
    Tags {
        #[arg(value_name = "TAG")]
        name: Option<String>,
    },

    /// List identifier types, or the identifiers of one type
    Identifiers {
        #[arg(value_name = "TYPE")]
        kind: Option<String>,
    },

    /// Inspect or clean the response cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },

    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show cache statistics
    Stats,

    /// Remove every cached response
    Clear,

    /// Remove expired cached responses
    ClearExpired,
}

impl Cli {
    /// Runtime overrides carried by the global flags
    pub fn cache_options(&self) -> Result<CacheOptions> {
        let mut options = CacheOptions::new();

        if self.disable_cache {
            options = options.with_enabled(false);
        }
        if let Some(dir) = &self.cache_dir {
            options = options.with_location(dir.clone());
        }
        if let Some(ttl) = &self.cache_for {
            options = options.with_ttl(parse_duration(ttl)?);
        }
        if let Some(base_url) = &self.base_url {
            options = options.with_base_url(base_url);
        }

        Ok(options)
    }

    /// Config file layered under the command line flags
    pub fn resolve_config(&self) -> Result<Config> {
        Ok(Config::load()?.apply(self.cache_options()?))
    }

    /// Run a command against resolved configuration
    ///
    /// Returns `None` for commands that print nothing through the renderer.
    pub async fn execute(&self, config: &Config) -> Result<Option<Response>> {
        let response = match &self.command {
            Commands::Cache { action } => {
                let cache = cache_for(config);
                match action {
                    CacheCommand::Stats => Response::CacheStats(cache.stats()?),
                    CacheCommand::Clear => Response::CacheCleared {
                        removed: cache.clear()?,
                    },
                    CacheCommand::ClearExpired => Response::CacheExpiredCleared {
                        removed: cache.clear_expired()?,
                    },
                }
            }
            Commands::Completion { .. } => return Ok(None),
            command => {
                let client = EolClient::from_config(config)?;
                query(&client, command).await?
            }
        };

        Ok(Some(response))
    }
}

fn cache_for(config: &Config) -> Arc<dyn Cache> {
    let mut cache_config = config.cache.clone();
    cache_config.base_url = config.base_url.clone();
    create_cache(cache_config)
}

async fn query(client: &EolClient, command: &Commands) -> Result<Response> {
    let response = match command {
        Commands::Index => Response::Index(client.index().await?),
        Commands::Products { full: false } => Response::Products(client.products().await?),
        Commands::Products { full: true } => Response::FullProducts(client.products_full().await?),
        Commands::Product { name } => Response::Product(client.product(name).await?),
        Commands::Release { product, release } => {
            Response::Release(client.release(product, release).await?)
        }
        Commands::Latest { product } => Response::LatestRelease(client.latest_release(product).await?),
        Commands::Categories { name: None } => Response::Categories(client.categories().await?),
        Commands::Categories {
            name: Some(category),
        } => Response::CategoryProducts {
            category: category.clone(),
            products: client.products_by_category(category).await?,
        },
        Commands::Tags { name: None } => Response::Tags(client.tags().await?),
        Commands::Tags { name: Some(tag) } => Response::TagProducts {
            tag: tag.clone(),
            products: client.products_by_tag(tag).await?,
        },
        Commands::Identifiers { kind: None } => {
            Response::IdentifierTypes(client.identifier_types().await?)
        }
        Commands::Identifiers { kind: Some(kind) } => Response::Identifiers {
            kind: kind.clone(),
            identifiers: client.identifiers_by_type(kind).await?,
        },
        Commands::Cache { .. } | Commands::Completion { .. } => {
            bail!("{:?} does not query the API", command)
        }
    };

    Ok(response)
}

/// Entry point used by the binary: resolve configuration, execute, print
pub async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "eol", &mut io::stdout());
        return Ok(());
    }

    let config = cli.resolve_config()?;
    debug!("Using cache directory {:?}", config.cache.location);

    if let Some(response) = cli.execute(&config).await? {
        let rendered = render(&response, cli.format)?;
        io::stdout().write_all(rendered.as_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CACHE_FILE_EXT;
    use crate::error::EolError;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("eol").chain(args.iter().copied())).unwrap()
    }

    fn config_in(dir: PathBuf) -> Config {
        Config::default().apply(CacheOptions::new().with_location(dir))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&[
            "release",
            "go",
            "1.24.6",
            "--disable-cache",
            "--cache-for",
            "2h",
            "--format",
            "json",
        ]);

        assert!(matches!(cli.command, Commands::Release { .. }));
        assert_eq!(cli.format, OutputFormat::Json);

        let options = cli.cache_options().unwrap();
        assert_eq!(options.enabled, Some(false));
        assert_eq!(options.ttl, Some(Duration::from_secs(7200)));
    }

    #[test]
    fn test_invalid_cache_for_is_rejected() {
        let cli = parse(&["products", "--cache-for", "forever"]);
        let err = cli.cache_options().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EolError>(),
            Some(EolError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_cache_subcommands_parse() {
        assert!(matches!(
            parse(&["cache", "clear-expired"]).command,
            Commands::Cache {
                action: CacheCommand::ClearExpired
            }
        ));
        assert!(Cli::try_parse_from(["eol", "cache"]).is_err());
        assert!(Cli::try_parse_from(["eol", "release", "go"]).is_err());
    }

    #[tokio::test]
    async fn test_cache_stats_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path().join("eol"));
        cache_for(&config)
            .put("/products", &[], &json!({"result": []}))
            .unwrap();

        let stats = parse(&["cache", "stats"]).execute(&config).await.unwrap();
        match stats {
            Some(Response::CacheStats(stats)) => assert_eq!(stats.total_files, 1),
            other => panic!("unexpected response: {:?}", other),
        }

        let cleared = parse(&["cache", "clear"]).execute(&config).await.unwrap();
        assert!(matches!(cleared, Some(Response::CacheCleared { removed: 1 })));
        assert!(!temp_dir
            .path()
            .join("eol")
            .join(format!("products{}", CACHE_FILE_EXT))
            .exists());
    }

    #[tokio::test]
    async fn test_clear_refuses_foreign_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path().join("Documents"));

        let err = parse(&["cache", "clear"]).execute(&config).await.unwrap_err();
        assert!(EolError::is_refusal(&err));
    }

    #[tokio::test]
    async fn test_query_served_from_cached_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(temp_dir.path().join("eol"));
        config.base_url = "http://127.0.0.1:9/api/v1".to_string();

        cache_for(&config)
            .put(
                "/products/full",
                &[],
                &json!({
                    "schema_version": "1.2.0",
                    "total": 1,
                    "result": [{"name": "go", "category": "lang", "tags": ["google"], "releases": []}]
                }),
            )
            .unwrap();

        let response = parse(&["tags", "google"]).execute(&config).await.unwrap();
        match response {
            Some(Response::TagProducts { tag, products }) => {
                assert_eq!(tag, "google");
                assert_eq!(products.total, 1);
                assert_eq!(
                    products.result[0].uri.as_deref(),
                    Some("http://127.0.0.1:9/api/v1/products/go")
                );
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
