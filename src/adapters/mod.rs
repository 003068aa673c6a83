// Adapters layer: concrete implementations of the domain ports.

pub mod http_fetcher;

pub use http_fetcher::HttpFetcher;
