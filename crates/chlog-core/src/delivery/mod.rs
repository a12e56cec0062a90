//! Webhook delivery
//!
//! Message lines are packed into chunks by [`chunk_lines`], then each chunk
//! is driven through the [`DeliveryState`] machine by a [`Deliverer`].
//! Chunks go out strictly in order, one at a time, with a fixed pause
//! between consecutive chunks.

pub mod chunk;
pub mod pipeline;
pub mod retry;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use chunk::chunk_lines;
pub use pipeline::{ChunkReport, Deliverer, DeliveryReport};
pub use retry::{rate_limit_delay, DeliveryState, RetryPolicy};
pub use transport::{
    AllowedMentions, Sleeper, ThreadSleeper, WebhookPayload, WebhookResponse, WebhookTransport,
};
