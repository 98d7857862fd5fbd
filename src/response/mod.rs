//! Response capture, normalization and diagnostics.
//!
//! The entry point is [`normalize`], which takes a [`RawResponse`] captured
//! off the wire and produces a [`NormalizedOutput`] or a
//! [`ResponseError`](crate::error::ResponseError) that has already been
//! logged with full transport context.

mod diagnostics;
mod normalize;
mod raw;
mod sse;
mod types;

pub use diagnostics::ResponseDetails;
pub use normalize::{normalize, NormalizedOutput};
pub use raw::RawResponse;
pub use sse::{coalesce_stream_chunks, looks_like_sse_stream};
pub use types::{ChatCompletion, Choice, ResponseMessage, Usage, UsageMetrics};
