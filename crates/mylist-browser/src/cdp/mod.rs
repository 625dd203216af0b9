//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! A small CDP client: one browser-level WebSocket, flattened page sessions
//! multiplexed over it, and JSON-RPC request/response matching by id.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("ws://127.0.0.1:9222/devtools/browser/…", timeout).await?;
//! let page = client.open_page().await?;
//! page.navigate("https://example.com", load_timeout).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;
mod transport;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
