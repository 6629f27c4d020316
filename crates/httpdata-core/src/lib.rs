pub mod config;
pub mod logging;

pub mod client;
pub mod context;
pub mod datasource;
pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod request;
pub mod response;

pub use client::{ClientOptions, HttpClient};
pub use context::{CancelToken, FetchContext};
pub use error::{FetchError, RequestError, TransportError, TransportKind};
pub use fetch::fetch_and_identify;
pub use request::RequestDescriptor;
pub use response::ResponseDescriptor;
