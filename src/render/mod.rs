//! Rendering module for converting block lists to output formats.
//!
//! The two primary renderers are [`ServiceRenderer`] (index-addressed
//! mutation requests for a remote document service) and
//! [`PaginatedRenderer`] (a fixed-page-size drawing plan). Markdown, plain
//! text and JSON renderers cover previews and dumps.

mod json;
mod markdown;
mod metrics;
mod options;
pub mod paginate;
pub mod service;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use metrics::{HelveticaMetrics, TextMeasure};
pub use options::{MarkdownOptions, PageOptions, ServiceOptions};
pub use paginate::{to_pages, DrawOp, PagePlan, PaginatedRenderer, PlanPage};
pub use service::{to_service_requests, ServiceBatch, ServiceRenderer, ServiceRequest};
pub use text::to_text;
