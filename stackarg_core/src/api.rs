pub(crate) mod capture;
mod core;
mod field;
pub(crate) mod parameter;

pub use self::core::*;
pub use capture::{
    BoxError, CliArgument, CliOption, Converter, FromStrConverter, GenericCapturable,
    InvalidConversion, Variants,
};
pub use field::*;
pub use parameter::Parameter;
