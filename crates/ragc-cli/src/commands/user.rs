use super::utils::{parse_json_object, print_json};
use crate::{HistoryScope, SettingsAction};
use anyhow::Result;
use ragc_interaction::RagServiceClient;

pub async fn history(client: &RagServiceClient, scope: HistoryScope, limit: u32) -> Result<()> {
    let response = match scope {
        HistoryScope::User => client.get_user_query_history(limit).await?,
        HistoryScope::Session => client.get_session_query_history(limit).await?,
    };
    print_json(&response)
}

pub async fn settings(client: &RagServiceClient, action: SettingsAction) -> Result<()> {
    let response = match action {
        SettingsAction::Get => client.get_user_settings().await?,
        SettingsAction::Save { settings } => {
            let settings = parse_json_object("settings", &settings)?;
            client.save_user_settings(&settings).await?
        }
    };
    print_json(&response)
}

pub async fn status(client: &RagServiceClient) -> Result<()> {
    print_json(&client.get_system_status().await?)
}

pub async fn set_user(client: &RagServiceClient, user_id: &str) -> Result<()> {
    client.set_user_id(user_id).await?;
    println!("User id set to {}", user_id);
    Ok(())
}

pub async fn whoami(client: &RagServiceClient) -> Result<()> {
    let session = client.session().await;
    print_json(&serde_json::json!({
        "baseUrl": session.base_url,
        "userId": session.user_id,
        "sessionId": session.session_id,
    }))
}
