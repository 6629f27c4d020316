//! CLI for the httpdata data source.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use httpdata_core::{config, HttpClient};
use std::sync::Arc;

use commands::{run_eval, run_read, run_schema, ReadArgs};

/// Top-level CLI for httpdata.
#[derive(Debug, Parser)]
#[command(name = "httpdata")]
#[command(about = "httpdata: perform one HTTP request and fingerprint the response", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Perform a request and print the data source state as JSON.
    Read {
        /// Absolute request URL.
        url: String,
        /// Request method.
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// Request header, repeatable. A later header with the same name wins.
        #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        /// Request body. Sent for every method, GET included.
        #[arg(short = 'd', long, default_value = "")]
        body: String,
        /// Expected response status code.
        #[arg(long, default_value_t = 200)]
        status: u16,
        /// Give up after this many seconds (overrides request_timeout_secs).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Run the data source on a JSON configuration object read from a file ("-" for stdin).
    Eval {
        /// Path to the JSON configuration.
        path: String,
        /// Give up after this many seconds (overrides request_timeout_secs).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Print the data source schema as JSON.
    Schema,
}

/// Parse "Name: value" (or "Name:value") into a header pair.
fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got {:?}", s))?;
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }
    Ok((name.to_string(), value.trim_start().to_string()))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let client = Arc::new(HttpClient::from_config(&cfg));

        match cli.command {
            CliCommand::Read {
                url,
                method,
                headers,
                body,
                status,
                timeout,
            } => {
                let args = ReadArgs {
                    url,
                    method,
                    headers,
                    body,
                    status,
                };
                run_read(client, &cfg, args, timeout).await?
            }
            CliCommand::Eval { path, timeout } => run_eval(client, &cfg, &path, timeout).await?,
            CliCommand::Schema => run_schema()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
