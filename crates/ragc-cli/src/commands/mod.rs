pub mod documents;
pub mod query;
pub mod rules;
pub mod user;
pub mod utils;

use crate::Commands;
use anyhow::Result;
use ragc_interaction::RagServiceClient;

/// Dispatches one parsed subcommand.
pub async fn run(client: &RagServiceClient, command: Commands) -> Result<()> {
    match command {
        Commands::Query {
            query,
            top_k,
            params,
        } => query::send(client, &query, params.as_deref(), top_k, false).await,
        Commands::QueryAsync {
            query,
            top_k,
            params,
        } => query::send(client, &query, params.as_deref(), top_k, true).await,
        Commands::TaskStatus { task_id } => query::task_status(client, &task_id).await,
        Commands::Upload { path, metadata } => {
            documents::upload(client, &path, metadata.as_deref()).await
        }
        Commands::AddUrl { url, metadata } => {
            documents::add_url(client, &url, metadata.as_deref()).await
        }
        Commands::AddText {
            title,
            content,
            file,
            metadata,
        } => documents::add_text(client, &title, content, file, metadata.as_deref()).await,
        Commands::List { page, size, status } => {
            documents::list(client, page, size, status).await
        }
        Commands::Get { id } => documents::get(client, &id).await,
        Commands::Chunks { id } => documents::chunks(client, &id).await,
        Commands::Delete { id } => documents::delete(client, &id).await,
        Commands::History { scope, limit } => user::history(client, scope, limit).await,
        Commands::Settings { action } => user::settings(client, action).await,
        Commands::Status => user::status(client).await,
        Commands::SetUser { user_id } => user::set_user(client, &user_id).await,
        Commands::Whoami => user::whoami(client).await,
        Commands::Rules { action } => rules::run(client, action).await,
    }
}
