//! Shared data types.

mod credentials;
mod locator;
mod outcome;
mod title;

pub use credentials::*;
pub use locator::*;
pub use outcome::*;
pub use title::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
