//! Tests for the read subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_read_defaults() {
    match parse(&["httpdata", "read", "http://127.0.0.1:8080/"]) {
        CliCommand::Read {
            url,
            method,
            headers,
            body,
            status,
            timeout,
        } => {
            assert_eq!(url, "http://127.0.0.1:8080/");
            assert_eq!(method, "GET");
            assert!(headers.is_empty());
            assert_eq!(body, "");
            assert_eq!(status, 200);
            assert!(timeout.is_none());
        }
        _ => panic!("expected Read"),
    }
}

#[test]
fn cli_parse_read_all_flags() {
    match parse(&[
        "httpdata",
        "read",
        "https://example.com/api",
        "-X",
        "POST",
        "-H",
        "X-Test: test",
        "--header",
        "X-Empty:",
        "-d",
        "payload",
        "--status",
        "201",
        "--timeout",
        "10",
    ]) {
        CliCommand::Read {
            url,
            method,
            headers,
            body,
            status,
            timeout,
        } => {
            assert_eq!(url, "https://example.com/api");
            assert_eq!(method, "POST");
            assert_eq!(
                headers,
                vec![
                    ("X-Test".to_string(), "test".to_string()),
                    ("X-Empty".to_string(), String::new()),
                ]
            );
            assert_eq!(body, "payload");
            assert_eq!(status, 201);
            assert_eq!(timeout, Some(10));
        }
        _ => panic!("expected Read with flags"),
    }
}

#[test]
fn cli_parse_read_rejects_header_without_colon() {
    assert!(Cli::try_parse_from(["httpdata", "read", "http://x/", "-H", "NoColon"]).is_err());
}

#[test]
fn cli_parse_read_rejects_out_of_range_status() {
    assert!(Cli::try_parse_from(["httpdata", "read", "http://x/", "--status", "70000"]).is_err());
}
