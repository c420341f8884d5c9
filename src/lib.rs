pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod link;
pub mod logging;
pub mod resolve;
pub mod service;

pub use crate::config::Config;
pub use crate::error::{FailureKind, ResolutionFailure};
pub use crate::link::{LinkExtractor, Platform, PlatformLink};
pub use crate::resolve::ResolvedMedia;
pub use crate::service::{DownloadResult, VideoResolutionService};
