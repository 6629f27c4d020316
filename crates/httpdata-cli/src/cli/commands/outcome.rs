//! Shared plumbing: build the fetch context, run the blocking read, print the outcome.

use anyhow::{Context, Result};
use httpdata_core::config::HttpdataConfig;
use httpdata_core::datasource::ReadOutcome;
use httpdata_core::{CancelToken, FetchContext, HttpClient};
use std::sync::Arc;
use std::time::Duration;

/// Context for one CLI read: Ctrl-C cancels it, `--timeout` or the config bounds it.
pub(super) fn fetch_context(cfg: &HttpdataConfig, timeout_secs: Option<u64>) -> (FetchContext, CancelToken) {
    let token = CancelToken::new();
    let mut ctx = FetchContext::background().with_cancel(token.clone());
    let timeout = timeout_secs
        .map(Duration::from_secs)
        .or_else(|| cfg.request_timeout());
    if let Some(t) = timeout {
        ctx = ctx.with_timeout(t);
    }
    (ctx, token)
}

/// Runs `read` on the blocking pool. An interrupt cancels the in-flight request
/// and the read then finishes with a cancellation diagnostic.
pub(super) async fn run_blocking<F>(
    client: Arc<HttpClient>,
    ctx: FetchContext,
    token: CancelToken,
    read: F,
) -> Result<ReadOutcome>
where
    F: FnOnce(&HttpClient, &FetchContext) -> ReadOutcome + Send + 'static,
{
    let mut task = tokio::task::spawn_blocking(move || read(&client, &ctx));
    tokio::select! {
        joined = &mut task => return joined.context("read task join"),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, cancelling request");
            token.cancel();
        }
    }
    task.await.context("read task join")
}

/// Print state JSON on success; print diagnostics and fail otherwise.
pub(super) fn print_outcome(outcome: &ReadOutcome) -> Result<()> {
    if let Some(state) = &outcome.state {
        println!("{}", serde_json::to_string_pretty(state)?);
    }
    if outcome.is_ok() {
        return Ok(());
    }
    for d in &outcome.diagnostics {
        eprintln!("{}\n", d);
    }
    anyhow::bail!(
        "data source read failed with {} diagnostic(s)",
        outcome.diagnostics.len()
    )
}
