//! Long-lived HTTP transport shared by fetches.
//!
//! An `HttpClient` owns a small pool of libcurl easy handles. A handle keeps
//! its connection cache across `reset`, so returning it to the pool after a
//! fetch lets the next fetch to the same host reuse the connection. The pool
//! is the only shared state; its lock is held for checkout and checkin only.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;
use std::time::Duration;

use crate::config::HttpdataConfig;

/// Redirects followed before giving up, as the default client policy does.
pub const MAX_REDIRECTS: u32 = 10;

/// Transport settings fixed for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Idle handles kept for reuse; extra handles are dropped on checkin.
    pub max_idle_handles: usize,
    /// Sent as `User-Agent` unless the request carries its own.
    pub user_agent: String,
    /// Bound on the connect phase only. The fetch itself is bounded by its context.
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            max_idle_handles: 8,
            user_agent: default_user_agent(),
            connect_timeout: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("httpdata/{}", env!("CARGO_PKG_VERSION"))
}

/// Explicitly constructed transport. Cheap to share by reference across threads.
pub struct HttpClient {
    options: ClientOptions,
    idle: Mutex<Vec<curl::easy::Easy>>,
}

impl HttpClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(options.max_idle_handles)),
            options,
        }
    }

    pub fn from_config(cfg: &HttpdataConfig) -> Self {
        Self::new(ClientOptions {
            max_idle_handles: cfg.max_idle_handles,
            user_agent: cfg.user_agent.clone().unwrap_or_else(default_user_agent),
            connect_timeout: cfg.connect_timeout(),
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Number of handles currently parked in the pool.
    pub fn idle_handles(&self) -> usize {
        self.lock_idle().len()
    }

    fn lock_idle(&self) -> std::sync::MutexGuard<'_, Vec<curl::easy::Easy>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take a handle from the pool (or a fresh one) with the client defaults applied.
    pub(crate) fn checkout(&self) -> Result<PooledHandle<'_>, curl::Error> {
        let easy = self.lock_idle().pop().unwrap_or_else(curl::easy::Easy::new);
        let mut handle = PooledHandle {
            client: self,
            easy: Some(easy),
        };
        self.apply_defaults(&mut handle)?;
        Ok(handle)
    }

    fn apply_defaults(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.useragent(&self.options.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        if let Some(t) = self.options.connect_timeout {
            easy.connect_timeout(t)?;
        }
        Ok(())
    }

    fn checkin(&self, mut easy: curl::easy::Easy) {
        easy.reset();
        let mut idle = self.lock_idle();
        if idle.len() < self.options.max_idle_handles {
            idle.push(easy);
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(ClientOptions::default())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("options", &self.options)
            .field("idle_handles", &self.idle_handles())
            .finish()
    }
}

/// A checked-out handle. Goes back to the pool when dropped, on every exit path.
pub(crate) struct PooledHandle<'a> {
    client: &'a HttpClient,
    easy: Option<curl::easy::Easy>,
}

impl Deref for PooledHandle<'_> {
    type Target = curl::easy::Easy;

    fn deref(&self) -> &Self::Target {
        self.easy.as_ref().expect("handle present until drop")
    }
}

impl DerefMut for PooledHandle<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.easy.as_mut().expect("handle present until drop")
    }
}

impl Drop for PooledHandle<'_> {
    fn drop(&mut self) {
        if let Some(easy) = self.easy.take() {
            self.client.checkin(easy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_return_to_pool() {
        let client = HttpClient::default();
        assert_eq!(client.idle_handles(), 0);
        {
            let _a = client.checkout().unwrap();
            let _b = client.checkout().unwrap();
            assert_eq!(client.idle_handles(), 0);
        }
        assert_eq!(client.idle_handles(), 2);
        let _c = client.checkout().unwrap();
        assert_eq!(client.idle_handles(), 1);
    }

    #[test]
    fn pool_is_bounded() {
        let client = HttpClient::new(ClientOptions {
            max_idle_handles: 1,
            ..ClientOptions::default()
        });
        {
            let _a = client.checkout().unwrap();
            let _b = client.checkout().unwrap();
            let _c = client.checkout().unwrap();
        }
        assert_eq!(client.idle_handles(), 1);
    }

    #[test]
    fn from_config_overrides() {
        let cfg = HttpdataConfig {
            max_idle_handles: 3,
            user_agent: Some("custom/1".into()),
            connect_timeout_secs: Some(4),
            request_timeout_secs: None,
        };
        let client = HttpClient::from_config(&cfg);
        assert_eq!(client.options().max_idle_handles, 3);
        assert_eq!(client.options().user_agent, "custom/1");
        assert_eq!(client.options().connect_timeout, Some(Duration::from_secs(4)));
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(ClientOptions::default().user_agent.starts_with("httpdata/"));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
