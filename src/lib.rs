//! Page thumbnail resolution service.
//!
//! Takes a page URL, asks an Embedly-compatible extraction API for candidate
//! images on that page (falling back to the favicon), fetches cropped
//! renditions, and returns everything base64-encoded in a single JSON report
//! together with a diagnostic log of the decisions taken.

pub mod config;
pub mod fetch;
pub mod models;
pub mod resolver;

pub use config::{AppConfig, ResolverConfig};
pub use models::{ThumbnailParams, ThumbnailReport};
pub use resolver::ThumbnailResolver;
