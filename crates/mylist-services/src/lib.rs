//! # mylist Services
//!
//! Implementations of the collaborator traits the registration core talks to:
//!
//! - [`AesGcmCredentialCodec`] - AES-GCM password payloads
//! - [`WebPushNotifier`] - completion push notifications over HTTP
//! - [`HttpContinuationTransport`] - fire-and-forget chain hand-off
//! - [`FileCompletionTracker`] - marker files for parallel chunks
//! - [`FileScreenshotSink`] - failure screenshots on disk

mod continuation;
mod credentials;
mod notifier;
mod screenshots;
mod tracker;

pub use continuation::HttpContinuationTransport;
pub use credentials::AesGcmCredentialCodec;
pub use notifier::{completion_message, WebPushNotifier};
pub use screenshots::FileScreenshotSink;
pub use tracker::FileCompletionTracker;
