use super::utils::{parse_metadata, print_json};
use anyhow::{Context, Result};
use ragc_core::document::PagingParams;
use ragc_interaction::RagServiceClient;
use std::path::{Path, PathBuf};

pub async fn upload(client: &RagServiceClient, path: &Path, metadata: Option<&str>) -> Result<()> {
    let metadata = parse_metadata(metadata)?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;

    let response = client
        .upload_document(&file_name, bytes, Some(metadata))
        .await?;
    print_json(&response)
}

pub async fn add_url(client: &RagServiceClient, url: &str, metadata: Option<&str>) -> Result<()> {
    let metadata = parse_metadata(metadata)?;
    print_json(&client.add_document_from_url(url, metadata).await?)
}

pub async fn add_text(
    client: &RagServiceClient,
    title: &str,
    content: Option<String>,
    file: Option<PathBuf>,
    metadata: Option<&str>,
) -> Result<()> {
    let metadata = parse_metadata(metadata)?;
    let content = match (content, file) {
        (Some(content), _) => content,
        (None, Some(file)) => tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?,
        (None, None) => anyhow::bail!("Either --content or --file is required"),
    };
    print_json(&client.add_document_from_text(title, &content, metadata).await?)
}

pub async fn list(
    client: &RagServiceClient,
    page: u32,
    size: u32,
    status: Option<String>,
) -> Result<()> {
    let mut paging = PagingParams::new(page, size);
    if let Some(status) = status {
        paging = paging.with_status(status);
    }
    print_json(&client.list_documents(&paging).await?)
}

pub async fn get(client: &RagServiceClient, id: &str) -> Result<()> {
    print_json(&client.get_document(id).await?)
}

pub async fn chunks(client: &RagServiceClient, id: &str) -> Result<()> {
    print_json(&client.get_document_chunks(id).await?)
}

pub async fn delete(client: &RagServiceClient, id: &str) -> Result<()> {
    print_json(&client.delete_document(id).await?)
}
