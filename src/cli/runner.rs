//! CLI runner - executes commands

use crate::aggregator::{Aggregator, AggregatorEvent, ChannelConsumer};
use crate::auth::credential_provider;
use crate::cli::commands::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::listing::{HttpListingClient, ListingClient, ServerEntry};
use crate::types::OutputFormat;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List { max_pages } => self.list(*max_pages).await,
            Commands::Check => self.check().await,
            Commands::Validate => self.validate(),
        }
    }

    fn load_config(&self) -> Result<AppConfig> {
        debug!(path = %self.cli.config.display(), "Loading config");
        AppConfig::load(&self.cli.config)
    }

    /// Page through the listing, printing each page's rows as it lands
    async fn list(&self, max_pages: Option<usize>) -> Result<()> {
        let config = self.load_config()?;
        let client = HttpListingClient::from_config(&config)?;

        let (consumer, mut events) = ChannelConsumer::new();
        let handle = Aggregator::spawn(
            Arc::new(client),
            config.listing.filter.clone(),
            config.listing.page_size,
            consumer,
        );

        if self.cli.format == OutputFormat::Pretty {
            println!("{}", pretty_header());
        }

        handle.reset()?;
        let mut pages = 0usize;

        let outcome = loop {
            let Some(event) = events.recv().await else {
                break Err(Error::AggregatorClosed);
            };

            match event {
                AggregatorEvent::Reset => {}
                AggregatorEvent::PageAppended(update) => {
                    pages += 1;
                    for entry in update.new_items() {
                        self.output_entry(entry);
                    }

                    if !update.has_more {
                        break Ok(update.snapshot.len());
                    }
                    if max_pages.is_some_and(|max| pages >= max) {
                        info!(pages, "Page limit reached");
                        break Ok(update.snapshot.len());
                    }
                    if let Err(e) = handle.request_more() {
                        break Err(e);
                    }
                }
                AggregatorEvent::FetchFailed(failure) => break Err(failure.into()),
            }
        };

        // The task may already have stopped on its own
        let _ = handle.shutdown();

        let total = outcome?;
        info!(total, pages, "Listing complete");
        Ok(())
    }

    /// Fetch the first page only
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = HttpListingClient::from_config(&config)?;
        let page_size = config.listing.page_size;

        info!(endpoint = %client.endpoint(), "Checking listing");

        match client.fetch_page(&config.listing.filter, page_size, 0).await {
            Ok(page) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "servers": page.count(),
                        "hasMore": page.is_full(page_size),
                    }
                }));
                Ok(())
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "kind": e.kind().to_string(),
                        "message": format!("Connection failed: {e}"),
                    }
                }));
                Err(e)
            }
        }
    }

    /// Load and validate the config without touching the network
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let credentials = credential_provider(&config.auth);

        self.output_message(&json!({
            "type": "VALIDATION",
            "validation": {
                "status": "VALID",
                "endpoint": config.listing.endpoint,
                "pageSize": config.listing.page_size,
                "filter": config.listing.filter,
                "credentials": credentials.describe(),
            }
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }

    fn output_entry(&self, entry: &ServerEntry) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(entry).unwrap_or_default());
            }
            OutputFormat::Pretty => println!("{}", pretty_row(entry)),
        }
    }
}

fn pretty_header() -> String {
    format!(
        "{:<32} {:<16} {:>7} {:<8} {}",
        "NAME", "MAP", "PLAYERS", "COUNTRY", "ADDRESS"
    )
}

fn pretty_row(entry: &ServerEntry) -> String {
    format!(
        "{:<32} {:<16} {:>7} {:<8} {}",
        truncate(&entry.name, 32),
        truncate(&entry.map, 16),
        entry.players_display(),
        entry.country,
        entry.socket_address()
    )
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_config(server: &MockServer, extra: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "listing:\n  endpoint: {}/servers\n  page_size: 2\nauth:\n  type: none\n{extra}",
            server.uri()
        )
        .unwrap();
        file
    }

    fn runner(config: &NamedTempFile, command: Commands) -> Runner {
        Runner::new(Cli {
            config: config.path().to_path_buf(),
            format: OutputFormat::Json,
            verbose: false,
            command,
        })
    }

    fn body(names: &[&str]) -> Value {
        let servers: Vec<_> = names.iter().map(|n| json!({"name": n})).collect();
        json!({ "servers": servers })
    }

    #[test]
    fn test_pretty_row() {
        let entry = ServerEntry {
            map: "q3dm17".to_string(),
            players: 3,
            max_players: 16,
            address: "10.0.0.9".to_string(),
            port: 27960,
            ..ServerEntry::named("Longest Yard")
        };
        let row = pretty_row(&entry);
        assert!(row.starts_with("Longest Yard "));
        assert!(row.contains("q3dm17"));
        assert!(row.contains("3/16"));
        assert!(row.contains("unknown"));
        assert!(row.ends_with("10.0.0.9:27960"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 8), "short");
        assert_eq!(truncate("much too long", 8), "much to~");
    }

    #[tokio::test]
    async fn test_list_pages_until_short_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(&["a", "b"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(&["c"])))
            .expect(1)
            .mount(&server)
            .await;

        let config = write_config(&server, "");
        runner(&config, Commands::List { max_pages: None })
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_respects_page_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(&["a", "b"])))
            .expect(1)
            .mount(&server)
            .await;

        let config = write_config(&server, "");
        runner(&config, Commands::List { max_pages: Some(1) })
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_fails_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let config = write_config(&server, "");
        let err = runner(&config, Commands::List { max_pages: None })
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FetchFailed { offset: 0, .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_check_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let config = write_config(&server, "");
        let err = runner(&config, Commands::Check).run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
    }

    #[tokio::test]
    async fn test_validate() {
        let server = MockServer::start().await;
        let config = write_config(&server, "http:\n  timeout_secs: 5\n");
        runner(&config, Commands::Validate).run().await.unwrap();

        let config = write_config(&server, "http:\n  timeout_secs: 0\n");
        assert!(runner(&config, Commands::Validate).run().await.is_err());
    }
}
