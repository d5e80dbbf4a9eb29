use std::collections::HashSet;
use thiserror::Error;

use crate::api::capture::BoxError;
use crate::api::parameter::Binding;
use crate::api::Registry;
use crate::model::Outcome;
use crate::parser::action;
use crate::parser::interface::UserInterface;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A misconfigured command line parser, found while building the registry.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// A failed parse.
///
/// Every variant except the two "missing required" variants aborts the parse at the offending token.
/// Those two are deferred until all tokens are consumed, and list every violation at once.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A short or long option name not found in the registry.
    #[error("Unknown argument '{0}'.")]
    UnknownArgument(String),

    /// The bare prefix character was used as a token.
    #[error("Unexpected '{prefix}' on its own; use '{prefix}{prefix}' to pass the remaining tokens as positional arguments.")]
    BadPrefixUsage {
        /// The configured prefix character.
        prefix: char,
    },

    /// A single-value parameter had no token left to consume.
    #[error("Missing value for '{0}'.")]
    MissingValue(String),

    /// A token could not be converted to the parameter's type.
    #[error("'{name}' cannot convert '{token}' to {message}.")]
    ConversionError {
        /// The parameter's display name.
        name: String,
        /// The offending token.
        token: String,
        /// The target type with the converter's reason.
        message: String,
        /// The converter's underlying error, when it reported one.
        #[source]
        source: Option<BoxError>,
    },

    /// A multi-value parameter received fewer values than its minimum.
    #[error("Not enough values provided to '{name}' (provided={provided}, expected at least {minimum}).")]
    ArityViolation {
        /// The parameter's display name.
        name: String,
        /// The fewest values the parameter accepts.
        minimum: usize,
        /// The number of values actually consumed.
        provided: usize,
    },

    /// A value-consuming option appeared inside a cluster of short options (ex: `-vn` where `-n` takes a value).
    #[error("'{0}' requires a value and cannot be grouped with other short options.")]
    GroupedArgumentRequiresValue(String),

    /// A second member of an already satisfied mutually exclusive group was matched.
    #[error("'{name}' conflicts with an earlier argument from the mutually exclusive group '{group}'.")]
    MutuallyExclusiveViolation {
        /// The display name of the conflicting parameter.
        name: String,
        /// The group already satisfied.
        group: String,
    },

    /// Tokens remained after every positional argument was satisfied.
    #[error("Extra positional arguments: {}.", .0.join(" "))]
    ExtraPositionalArguments(Vec<String>),

    /// Required mutually exclusive groups with no member present.
    #[error("Missing required group(s): {}.", .0.join(", "))]
    MissingRequiredGroup(Vec<String>),

    /// Required options which were not present.
    #[error("Missing required argument(s): {}.", .0.join(", "))]
    MissingRequiredArgument(Vec<String>),

    /// A post-parse hook rejected the parsed result.
    #[error("{0}")]
    Validation(String),
}

impl ParseError {
    /// Create the error a post-parse hook uses to reject the parsed result.
    pub fn validation(message: impl Into<String>) -> Self {
        ParseError::Validation(message.into())
    }
}

/// The unconsumed tokens, top first.
/// Handlers may push a partially consumed token back on top.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct TokenStack(Vec<String>);

impl TokenStack {
    pub(crate) fn new(mut tokens: Vec<String>) -> Self {
        tokens.reverse();
        Self(tokens)
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    pub(crate) fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every remaining token, in input order.
    pub(crate) fn drain(&mut self) -> Vec<String> {
        let mut remaining = std::mem::take(&mut self.0);
        remaining.reverse();
        remaining
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit(String),
}

/// The state of a single parse against one registry.
/// Created per parse and discarded once it returns; verbs get a fresh session of their own.
pub(crate) struct Session<'r, T> {
    pub(super) registry: &'r Registry<T>,
    pub(super) user_interface: &'r dyn UserInterface,
    pub(super) positionals: Vec<String>,
    pub(super) satisfied_groups: HashSet<&'r str>,
    pub(super) satisfied_arguments: HashSet<&'r str>,
}

impl<'r, T> Session<'r, T> {
    pub(crate) fn new(registry: &'r Registry<T>, user_interface: &'r dyn UserInterface) -> Self {
        Self {
            registry,
            user_interface,
            positionals: Vec::default(),
            satisfied_groups: HashSet::default(),
            satisfied_arguments: HashSet::default(),
        }
    }

    pub(crate) fn consume(
        mut self,
        target: &mut T,
        tokens: Vec<String>,
    ) -> Result<Outcome, ParseError> {
        let registry: &'r Registry<T> = self.registry;
        let config = *registry.config();
        let delimiter = config.delimiter();
        let mut stack = TokenStack::new(tokens);

        while let Some(raw) = stack.pop() {
            let token = raw.trim();

            if token.is_empty() {
                continue;
            }

            if token == delimiter {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Delimiter '{token}' found; remaining tokens are positional.");
                }

                let remaining = stack.drain();
                self.positionals.extend(remaining);
                break;
            }

            if let Some(flag) = token.strip_prefix(config.prefix) {
                if let Flow::Exit(trigger) = self.consume_flag(target, token, flag, &mut stack)? {
                    return Ok(Outcome::EarlyExit(trigger));
                }

                continue;
            }

            if self.positionals.is_empty() {
                if let Some(verb) = registry.verb(token) {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Dispatching verb '{token}'.");
                    }

                    // A verb takes everything after it; this level has no positionals left to fill.
                    return match verb.dispatch(target, stack.drain(), self.user_interface)? {
                        Outcome::Complete => {
                            self.validate(target)?;
                            Ok(Outcome::Complete)
                        }
                        early_exit => Ok(early_exit),
                    };
                }
            }

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Positional token '{token}'.");
            }

            self.positionals.push(token.to_string());
        }

        self.consume_positionals(target)?;
        self.validate(target)?;
        Ok(Outcome::Complete)
    }

    // The three short option forms are told apart by the matched descriptor, never by what happened to the stack:
    //  -v          a single option
    //  -n5 / -n=5  a value-consuming option with its inline value
    //  -vqx        a cluster of value-less options
    fn consume_flag(
        &mut self,
        target: &mut T,
        token: &str,
        flag: &str,
        stack: &mut TokenStack,
    ) -> Result<Flow, ParseError> {
        let config = *self.registry.config();
        let mut characters = flag.chars();

        let first = match characters.next() {
            Some(first) => first,
            None => {
                return Err(ParseError::BadPrefixUsage {
                    prefix: config.prefix,
                })
            }
        };

        if first == config.prefix {
            let long = characters.as_str();
            let name = match long.split_once(config.separator) {
                Some((name, value)) => {
                    stack.push(value);
                    name
                }
                None => long,
            };
            let descriptor = self.lookup_long(name)?;
            return self.resolve(target, descriptor, Some(stack));
        }

        if first.is_ascii_digit() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Token '{token}' looks numeric; treating it as positional.");
            }

            self.positionals.push(token.to_string());
            return Ok(Flow::Continue);
        }

        let trailing = characters.as_str();
        let descriptor = self.lookup_short(first)?;

        if trailing.is_empty() {
            self.resolve(target, descriptor, Some(stack))
        } else if descriptor.consumes_values() {
            let value = trailing
                .strip_prefix(config.separator)
                .unwrap_or(trailing);
            stack.push(value);
            self.resolve(target, descriptor, Some(stack))
        } else {
            if let Flow::Exit(trigger) = self.resolve(target, descriptor, Some(stack))? {
                return Ok(Flow::Exit(trigger));
            }

            for short in trailing.chars() {
                let descriptor = self.lookup_short(short)?;

                if let Flow::Exit(trigger) = self.resolve(target, descriptor, None)? {
                    return Ok(Flow::Exit(trigger));
                }
            }

            Ok(Flow::Continue)
        }
    }

    fn consume_positionals(&mut self, target: &mut T) -> Result<(), ParseError> {
        let registry: &'r Registry<T> = self.registry;
        let mut stack = TokenStack::new(std::mem::take(&mut self.positionals));

        for descriptor in registry.arguments() {
            match descriptor.binding() {
                // Everything here was already classified positional (ex: after '--'), so nothing stops the values early.
                Binding::Field(field) => action::apply(
                    descriptor.display(),
                    field.as_ref(),
                    target,
                    Some(&mut stack),
                    None,
                )?,
                Binding::Trigger(_) => {
                    unreachable!("internal error - an argument cannot be a trigger")
                }
            }
        }

        if stack.is_empty() {
            Ok(())
        } else {
            Err(ParseError::ExtraPositionalArguments(stack.drain()))
        }
    }
}
