use super::utils::{build_query_params, print_json};
use anyhow::Result;
use ragc_interaction::RagServiceClient;

pub async fn send(
    client: &RagServiceClient,
    query: &str,
    params: Option<&str>,
    top_k: Option<u32>,
    background: bool,
) -> Result<()> {
    let params = build_query_params(params, top_k)?;
    let response = if background {
        client.send_query_async(query, params).await?
    } else {
        client.send_query(query, params).await?
    };
    print_json(&response)
}

pub async fn task_status(client: &RagServiceClient, task_id: &str) -> Result<()> {
    print_json(&client.get_query_task_status(task_id).await?)
}
