mod action;
mod base;
mod interface;
mod middleware;
mod printer;
mod resolver;
mod validate;
mod vararg;

pub use base::{ConfigError, ParseError};
pub(crate) use base::Session;
pub use interface::{ConsoleInterface, UserInterface};
pub use middleware::GeneralParser;
pub(crate) use printer::Printer;

#[cfg(any(test, feature = "unit_test"))]
pub use interface::util;
