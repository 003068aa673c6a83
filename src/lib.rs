pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::HttpFetcher;
pub use crate::core::{
    custom_css::generate_custom_css,
    preview::PreviewService,
    rewriter::AccessibilityRewriter,
    styles::{RewriteConfig, StyleMode},
};
pub use crate::domain::model::{CustomStyleParams, PreviewRequest, Profile, RewrittenDocument};
pub use crate::utils::error::{PreviewError, Result};
