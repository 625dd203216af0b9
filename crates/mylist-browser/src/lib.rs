//! # mylist Browser
//!
//! Headless Chrome sessions for mylist registration.
//!
//! Each session launches its own Chrome process with a private profile
//! directory and talks to it over the Chrome DevTools Protocol. Elements are
//! located by CSS selector or XPath, clicked through synthesized mouse events
//! and JavaScript dialogs are tracked from page events.

pub mod cdp;
mod factory;
mod launcher;
mod locator_js;
mod session;

pub use factory::ChromeSessionFactory;
pub use launcher::{parse_devtools_active_port, ChromeLauncher, ChromeProcess};
pub use session::CdpBrowserSession;
