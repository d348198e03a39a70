use anyhow::{Context, Result};

use opsdeck::client::ActivityLogger;
use opsdeck::config::OpsdeckConfig;
use opsdeck::store::types::NewActivity;

/// Post one activity event through the fire-and-forget client.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &OpsdeckConfig,
    action: &str,
    description: &str,
    duration_ms: i64,
    tokens_used: Option<i64>,
    cost: Option<f64>,
    status: &str,
    metadata: Option<&str>,
) -> Result<()> {
    let status = status
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let metadata = metadata
        .map(serde_json::from_str)
        .transpose()
        .context("--metadata must be valid JSON")?;

    let logger = match &config.client.base_url {
        Some(url) => ActivityLogger::new(url.as_str()),
        None => ActivityLogger::from_env(),
    };

    logger
        .log(&NewActivity {
            action: action.to_string(),
            description: description.to_string(),
            duration_ms,
            tokens_used,
            cost,
            status,
            metadata,
        })
        .await;

    Ok(())
}
