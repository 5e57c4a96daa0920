use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ragc")]
#[command(about = "RAGC - command-line client for a RAG document service", long_about = None)]
struct Cli {
    /// Service origin, e.g. http://localhost:8080 (overrides config and RAG_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where user/session identifiers are stored
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question and wait for the answer
    Query {
        query: String,
        #[arg(long)]
        top_k: Option<u32>,
        /// Extra parameters as a JSON object
        #[arg(long)]
        params: Option<String>,
    },
    /// Submit a question for background processing
    QueryAsync {
        query: String,
        #[arg(long)]
        top_k: Option<u32>,
        #[arg(long)]
        params: Option<String>,
    },
    /// Poll an async query task
    TaskStatus { task_id: String },
    /// Upload a local file
    Upload {
        path: PathBuf,
        /// Metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Ingest a document from a URL
    AddUrl {
        url: String,
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Ingest inline text, or the contents of --file
    AddText {
        title: String,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        metadata: Option<String>,
    },
    /// List documents
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one document
    Get { id: String },
    /// Show the chunks of a document
    Chunks { id: String },
    /// Delete a document
    Delete { id: String },
    /// Show query history
    History {
        #[arg(long, value_enum, default_value_t = HistoryScope::Session)]
        scope: HistoryScope,
        #[arg(long, default_value_t = ragc_interaction::rag_service_client::DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },
    /// Read or write user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show service status
    Status,
    /// Replace the stored user id
    SetUser { user_id: String },
    /// Print the identifiers in use
    Whoami,
    /// Manage intent routing rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HistoryScope {
    User,
    Session,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Get,
    /// Save settings given as a JSON object
    Save { settings: String },
}

#[derive(Subcommand, Debug)]
enum RulesAction {
    List,
    Create { rule: String },
    Update { id: String, rule: String },
    Delete { id: String },
    Refresh,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ragc_infrastructure::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(state) = cli.state {
        config.state_path = Some(state);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = Some(timeout);
    }

    tracing::debug!("Using service at {}", config.base_url);
    let client = ragc_interaction::RagServiceClient::from_config(&config)
        .await
        .context("Failed to initialize client")?;

    commands::run(&client, cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_with_params() {
        let cli = Cli::try_parse_from([
            "ragc",
            "--base-url",
            "http://rag:8080",
            "query",
            "What is RAG?",
            "--top-k",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://rag:8080"));
        match cli.command {
            Commands::Query { query, top_k, params } => {
                assert_eq!(query, "What is RAG?");
                assert_eq!(top_k, Some(5));
                assert!(params.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["ragc", "list"]).unwrap();
        match cli.command {
            Commands::List { page, size, status } => {
                assert_eq!((page, size), (1, 10));
                assert!(status.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_add_text_requires_content_or_file() {
        assert!(Cli::try_parse_from(["ragc", "add-text", "Title"]).is_err());
        assert!(Cli::try_parse_from(["ragc", "add-text", "Title", "--content", "x"]).is_ok());
        assert!(
            Cli::try_parse_from(["ragc", "add-text", "Title", "--content", "x", "--file", "a"])
                .is_err()
        );
    }

    #[test]
    fn test_history_scope_flag() {
        let cli = Cli::try_parse_from(["ragc", "history", "--scope", "user", "--limit", "3"]).unwrap();
        match cli.command {
            Commands::History { scope, limit } => {
                assert_eq!(scope, HistoryScope::User);
                assert_eq!(limit, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
