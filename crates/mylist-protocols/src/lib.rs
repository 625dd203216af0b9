//! # mylist Protocols
//!
//! Protocol definitions (traits) and shared types for mylist registration.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`BrowserSession`] - One live, stateful browser instance
//! - [`SessionFactory`] - Opens fresh browser sessions
//! - [`CredentialCodec`] - Decrypts boundary credentials
//! - [`Notifier`] - Delivers the completion notification
//! - [`ContinuationTransport`] - Hands a chain step to the next invocation
//! - [`CompletionTracker`] - Tracks parallel chunks of one job
//! - [`ScreenshotSink`] - Stores diagnostic screenshots

pub mod browser;
pub mod chain;
pub mod error;
pub mod services;
pub mod types;

pub use browser::{BrowserSession, SessionFactory};
pub use chain::{ContinuationRequest, CHAIN_ACTION};
pub use error::{
    ChainInvocationError, DecryptionError, NotificationError, RegistrationError,
    ScreenshotError, SessionError, TrackerError,
};
pub use services::{
    ChunkMarker, CompletionTracker, ContinuationTransport, CredentialCodec, Notifier,
    ScreenshotSink,
};
pub use types::*;
