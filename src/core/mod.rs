pub mod custom_css;
pub mod preview;
pub mod rewriter;
pub mod styles;

pub use crate::domain::model::{CustomStyleParams, FetchedPage, PreviewRequest, Profile};
pub use crate::domain::ports::{ConfigProvider, PageFetcher};
pub use crate::utils::error::Result;
