//! `httpdata eval <path>` – run the data source on a JSON configuration object.

use anyhow::{Context, Result};
use httpdata_core::config::HttpdataConfig;
use httpdata_core::datasource;
use httpdata_core::HttpClient;
use std::io::Read;
use std::sync::Arc;

use super::outcome::{fetch_context, print_outcome, run_blocking};

fn read_config_text(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read configuration from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read {}", path))
}

pub async fn run_eval(
    client: Arc<HttpClient>,
    cfg: &HttpdataConfig,
    path: &str,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let text = read_config_text(path)?;
    let config: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse JSON in {}", path))?;
    let (ctx, token) = fetch_context(cfg, timeout_secs);
    let outcome = run_blocking(client, ctx, token, move |client, ctx| {
        datasource::read(client, ctx, &config)
    })
    .await?;
    print_outcome(&outcome)
}
