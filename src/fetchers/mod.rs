pub mod content;
pub mod http;
pub mod transport;

#[cfg(test)]
pub(crate) mod tests;

pub use content::ContentFetcher;
pub use http::HttpTransport;
pub use transport::{RawResponse, Reachability, Transport, TransportError};
