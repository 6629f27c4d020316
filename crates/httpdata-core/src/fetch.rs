//! The single core operation: perform one request, check its status and
//! fingerprint the response.
//!
//! Blocking. Runs in the current thread; call from `spawn_blocking` if used
//! from async code. Bounded only by the caller's `FetchContext`.

use std::time::Duration;

use crate::client::HttpClient;
use crate::context::FetchContext;
use crate::error::{FetchError, RequestError, TransportError};
use crate::request::RequestDescriptor;
use crate::response::{ResponseDescriptor, ResponseHeaders};

/// Performs the request described by `req` and returns the response descriptor.
///
/// Errors are terminal: nothing is retried and no partial descriptor is
/// produced. The pooled transport handle is released on every exit path.
pub fn fetch_and_identify(
    client: &HttpClient,
    ctx: &FetchContext,
    req: &RequestDescriptor,
) -> Result<ResponseDescriptor, FetchError> {
    let span = tracing::debug_span!("fetch", method = %req.method, url = %req.url);
    let _enter = span.enter();

    let url = req.validate()?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(TransportError::UnsupportedScheme(other.to_string()).into()),
    }
    ctx.check()?;

    let mut easy = client.checkout().map_err(RequestError::Setup)?;
    configure(&mut easy, req, url.as_str(), ctx).map_err(RequestError::Setup)?;

    // A HEAD carrying a body has no `nobody` mode; the exchange ends with the final head.
    let stop_after_head = req.method == "HEAD" && !req.body.is_empty();
    let mut stopped_after_head = false;
    let mut headers = ResponseHeaders::new();
    let mut body: Vec<u8> = Vec::new();
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                headers.push_line(&String::from_utf8_lossy(line));
                if stop_after_head && headers.is_final() {
                    stopped_after_head = true;
                    return false;
                }
                true
            })
            .map_err(RequestError::Setup)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(RequestError::Setup)?;
        // Returning false aborts the exchange; polled while waiting on I/O too.
        transfer
            .progress_function(|_, _, _, _| ctx.check().is_ok())
            .map_err(RequestError::Setup)?;
        transfer.perform()
    };
    let performed = match performed {
        Err(e) if stopped_after_head && e.is_write_error() => Ok(()),
        other => other,
    };

    if let Err(e) = performed {
        let err = classify_failure(e, ctx, &headers, req.expected_status);
        tracing::warn!("{} {} failed: {}", req.method, req.url, err);
        return Err(err);
    }

    let actual = match headers.status() {
        Some(code) => code,
        None => easy.response_code().map_err(TransportError::Curl)? as u16,
    };
    if actual != req.expected_status {
        tracing::debug!(
            "status mismatch: expected {} actual {}",
            req.expected_status,
            actual
        );
        return Err(FetchError::StatusMismatch {
            expected: req.expected_status,
            actual,
        });
    }

    let descriptor = ResponseDescriptor::from_parts(&body, &headers);
    tracing::debug!(
        "HTTP {} with {} bytes and {} headers, id {}",
        actual,
        body.len(),
        headers.len(),
        descriptor.id()
    );
    Ok(descriptor)
}

/// Applies method, body, headers and the context deadline to a checked-out handle.
fn configure(
    easy: &mut curl::easy::Easy,
    req: &RequestDescriptor,
    url: &str,
    ctx: &FetchContext,
) -> Result<(), curl::Error> {
    easy.url(url)?;

    let body = req.body.as_bytes();
    let attach_body = !body.is_empty() || matches!(req.method.as_str(), "POST" | "PUT" | "PATCH");
    if attach_body {
        easy.post_fields_copy(body)?;
    }
    match req.method.as_str() {
        // libcurl would otherwise wait for a body that never comes.
        "HEAD" if !attach_body => {
            easy.nobody(true)?;
            easy.custom_request("HEAD")?;
        }
        "GET" if !attach_body => easy.get(true)?,
        // Plain POST lets libcurl switch to GET on 301/302/303 like other clients do.
        "POST" => {}
        method => easy.custom_request(method)?,
    }

    let mut list = curl::easy::List::new();
    for (name, value) in &req.headers {
        if value.is_empty() {
            // "Name;" sends an empty header, "Name:" would remove it.
            list.append(&format!("{};", name))?;
        } else {
            list.append(&format!("{}: {}", name, value))?;
        }
    }
    if attach_body {
        // Drop libcurl's implicit form content type and 100-continue handshake.
        for implicit in ["Content-Type", "Expect"] {
            if !has_header(req, implicit) {
                list.append(&format!("{}:", implicit))?;
            }
        }
    }
    easy.http_headers(list)?;

    easy.progress(true)?;
    if let Some(timeout) = ctx.remaining().and_then(transfer_timeout) {
        easy.timeout(timeout)?;
    }
    Ok(())
}

/// Longest timeout handed to libcurl, which takes milliseconds as a C `long`.
const MAX_TRANSFER_TIMEOUT_MS: u64 = i32::MAX as u64;

/// libcurl timeout for the time left on the context.
///
/// Rounded up so libcurl never fires before the deadline (0 would mean no
/// timeout). Longer deadlines are left to the progress poll alone.
fn transfer_timeout(remaining: Duration) -> Option<Duration> {
    let ms = u64::try_from(remaining.as_millis())
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    (ms <= MAX_TRANSFER_TIMEOUT_MS).then(|| Duration::from_millis(ms))
}

fn has_header(req: &RequestDescriptor, name: &str) -> bool {
    req.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// Maps a failed transfer onto the error taxonomy.
///
/// A failure after the final response head arrived is a status mismatch if
/// the status was wrong, otherwise a body read error. Aborts and timeouts
/// caused by the context report the context error.
fn classify_failure(
    e: curl::Error,
    ctx: &FetchContext,
    headers: &ResponseHeaders,
    expected: u16,
) -> FetchError {
    if e.is_aborted_by_callback() || e.is_operation_timedout() {
        if let Err(ctx_err) = ctx.check() {
            return ctx_err.into();
        }
    }
    if headers.is_complete() {
        if let Some(status) = headers.status() {
            if !headers.is_redirect() && !e.is_aborted_by_callback() {
                if status != expected {
                    return FetchError::StatusMismatch {
                        expected,
                        actual: status,
                    };
                }
                return FetchError::BodyRead(e);
            }
        }
    }
    TransportError::Curl(e).into()
}
