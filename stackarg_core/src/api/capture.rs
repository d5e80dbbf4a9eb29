use std::str::FromStr;
use thiserror::Error;

use crate::model::{Action, Arity};

/// The boxed cause attached to a failed conversion.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Marker trait for fields that can formulate an option in the Cli.
pub trait CliOption {}

/// Marker trait for fields that can formulate a (positional) argument in the Cli.
pub trait CliArgument {}

/// A failed `&str -> V` conversion.
#[derive(Debug, Error)]
#[error("cannot convert '{token}' to {type_name}: {message}")]
pub struct InvalidConversion {
    token: String,
    type_name: &'static str,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl InvalidConversion {
    /// Describe a failed conversion of `token` into the type named `type_name`.
    pub fn new(
        token: impl Into<String>,
        type_name: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            type_name,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source.replace(source.into());
        self
    }

    /// The token that failed to convert.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn into_parts(self) -> (String, String, Option<BoxError>) {
        let message = format!("{t} ({m})", t = self.type_name, m = self.message);
        (self.token, message, self.source)
    }
}

/// Capability to convert a raw Cli token into a value `V`.
///
/// Every field uses [`FromStrConverter`] unless given a custom converter.
/// Closures of the form `Fn(&str) -> Result<V, E>` are converters too, so long as `E` can become a boxed error
/// (ex: any `std::error::Error`, `String`, or `&str`).
///
/// ### Example
/// ```
/// # use stackarg_core as stackarg;
/// use stackarg::Converter;
///
/// let hex = |token: &str| u32::from_str_radix(token.trim_start_matches("0x"), 16);
/// assert_eq!(hex.convert("0xff").unwrap(), 255);
/// assert!(hex.convert("0xzz").is_err());
/// ```
pub trait Converter<V>: Send + Sync {
    /// Convert the token, or explain why not.
    fn convert(&self, token: &str) -> Result<V, InvalidConversion>;
}

/// The default converter: anything implementing [`std::str::FromStr`] (numbers, strings, booleans, paths, ..).
/// The `FromStr` error is kept as the conversion's source.
#[derive(Debug, Default, Clone, Copy)]
pub struct FromStrConverter;

impl<V> Converter<V> for FromStrConverter
where
    V: FromStr,
    <V as FromStr>::Err: Into<BoxError>,
{
    fn convert(&self, token: &str) -> Result<V, InvalidConversion> {
        V::from_str(token).map_err(|error| {
            let source: BoxError = error.into();
            InvalidConversion::new(token, std::any::type_name::<V>(), source.to_string())
                .with_source(source)
        })
    }
}

impl<V, E, F> Converter<V> for F
where
    F: Fn(&str) -> Result<V, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn convert(&self, token: &str) -> Result<V, InvalidConversion> {
        self(token).map_err(|error| {
            let source: BoxError = error.into();
            InvalidConversion::new(token, std::any::type_name::<V>(), source.to_string())
                .with_source(source)
        })
    }
}

/// An enumeration converter: maps a fixed set of names onto values, ignoring ASCII case.
///
/// ### Example
/// ```
/// # use stackarg_core as stackarg;
/// use stackarg::{Converter, Variants};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Mode {
///     Fast,
///     Safe,
/// }
///
/// let modes = Variants::new()
///     .variant("fast", Mode::Fast)
///     .variant("safe", Mode::Safe);
/// assert_eq!(modes.convert("FAST").unwrap(), Mode::Fast);
/// assert!(modes.convert("slow").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Variants<V> {
    variants: Vec<(String, V)>,
}

impl<V> Default for Variants<V> {
    fn default() -> Self {
        Self {
            variants: Vec::default(),
        }
    }
}

impl<V> Variants<V> {
    /// Create an empty enumeration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `name` as the Cli spelling of `value`.
    /// If repeated for the same name, the first registration wins.
    pub fn variant(mut self, name: impl Into<String>, value: V) -> Self {
        self.variants.push((name.into(), value));
        self
    }

    /// The accepted names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl<V> Converter<V> for Variants<V>
where
    V: Clone + Send + Sync,
{
    fn convert(&self, token: &str) -> Result<V, InvalidConversion> {
        self.variants
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                InvalidConversion::new(
                    token,
                    std::any::type_name::<V>(),
                    format!("expected one of {{{}}}", self.names().join(", ")),
                )
            })
    }
}

/// Behaviour to apply an action against a field of the target `T`.
///
/// We use this at the bottom of the command line parser object graph so the compiler can maintain each field's type.
/// Above this, every parameter of `T` is handled alike regardless of its value type.
#[doc(hidden)]
pub trait GenericCapturable<T>: Send + Sync {
    /// The action applied when the parameter is matched.
    fn action(&self) -> Action;

    /// The number of values consumed by value actions.
    fn arity(&self) -> Arity;

    /// Apply a value-less action (constant, boolean, count).
    fn matched(&self, target: &mut T);

    /// Convert a single token and store/append it.
    fn capture(&self, target: &mut T, token: &str) -> Result<(), InvalidConversion>;
}
