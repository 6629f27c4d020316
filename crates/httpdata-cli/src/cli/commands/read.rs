//! `httpdata read <url>` – one request from command-line flags.

use anyhow::Result;
use httpdata_core::config::HttpdataConfig;
use httpdata_core::datasource;
use httpdata_core::{HttpClient, RequestDescriptor};
use std::sync::Arc;

use super::outcome::{fetch_context, print_outcome, run_blocking};

/// Request flags as parsed by clap.
#[derive(Debug, Clone)]
pub struct ReadArgs {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub status: u16,
}

impl ReadArgs {
    fn into_request(self) -> RequestDescriptor {
        let req = RequestDescriptor::get(self.url)
            .method(self.method)
            .body(self.body)
            .expect_status(self.status);
        self.headers
            .into_iter()
            .fold(req, |req, (name, value)| req.header(name, value))
    }
}

pub async fn run_read(
    client: Arc<HttpClient>,
    cfg: &HttpdataConfig,
    args: ReadArgs,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let req = args.into_request();
    let (ctx, token) = fetch_context(cfg, timeout_secs);
    let outcome = run_blocking(client, ctx, token, move |client, ctx| {
        datasource::read_request(client, ctx, &req)
    })
    .await?;
    print_outcome(&outcome)
}
