use anyhow::{Context, Result, bail};
use ragc_core::document::DocumentMetadata;
use ragc_core::query::QueryParams;
use serde_json::Value;

/// Parses a command-line argument that must be a JSON object.
pub fn parse_json_object(label: &str, raw: &str) -> Result<DocumentMetadata> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("{} is not valid JSON", label))?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("{} must be a JSON object, got {}", label, other),
    }
}

pub fn parse_metadata(raw: Option<&str>) -> Result<DocumentMetadata> {
    match raw {
        Some(raw) => parse_json_object("metadata", raw),
        None => Ok(DocumentMetadata::new()),
    }
}

/// Combines `--params` and `--top-k`; the flag wins over the JSON value.
pub fn build_query_params(params: Option<&str>, top_k: Option<u32>) -> Result<QueryParams> {
    let mut query_params = match params {
        Some(raw) => QueryParams::from(parse_json_object("params", raw)?),
        None => QueryParams::new(),
    };
    if let Some(top_k) = top_k {
        query_params = query_params.top_k(top_k);
    }
    Ok(query_params)
}

pub fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render response")?;
    println!("{}", rendered);
    Ok(())
}
