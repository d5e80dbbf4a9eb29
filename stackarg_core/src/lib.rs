//! The core of `stackarg`: the builder, the registry, and the stack based parse engine.
//! See [documentation root](https://docs.rs/stackarg/latest/stackarg/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use model::*;
pub use parser::{ConfigError, ConsoleInterface, GeneralParser, ParseError, UserInterface};

#[cfg(feature = "unit_test")]
pub use parser::util::InMemoryInterface;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
