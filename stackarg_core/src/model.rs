use crate::constant::{DEFAULT_PREFIX, DEFAULT_SEPARATOR};

/// The cardinality of values to consume for a multi-value argument/option.
///
/// Inspired by argparse: <https://docs.python.org/3/library/argparse.html#nargs>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// `N`: Precisely `N` values.
    Exactly(u8),
    /// `N..`: At least `N` values, consumed greedily.
    AtLeast(u8),
    /// `..=N`: Up to `N` values, including `0`.
    AtMost(u8),
}

impl Arity {
    pub(crate) fn is_single(&self) -> bool {
        matches!(self, Arity::Exactly(1))
    }

    pub(crate) fn minimum(&self) -> usize {
        match self {
            Arity::Exactly(n) | Arity::AtLeast(n) => *n as usize,
            Arity::AtMost(_) => 0,
        }
    }

    /// `None` means unbounded.
    pub(crate) fn maximum(&self) -> Option<usize> {
        match self {
            Arity::Exactly(n) | Arity::AtMost(n) => Some(*n as usize),
            Arity::AtLeast(_) => None,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What happens to the target when a parameter is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Convert value(s) and store them.
    Store,
    /// Store a preset constant.
    StoreConst,
    /// Store `true`.
    StoreTrue,
    /// Store `false`.
    StoreFalse,
    /// Convert value(s) and append them to a collection.
    Append,
    /// Append a preset constant to a collection.
    AppendConst,
    /// Increment an integer by one.
    Count,
    /// Run a side effect and stop parsing (ex: `--help`).
    Trigger,
}

impl Action {
    /// Whether this action pulls values off the token stack.
    pub fn consumes_values(&self) -> bool {
        matches!(self, Action::Store | Action::Append)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The token conventions of a command line parser.
/// Fixed for the lifetime of a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// The option prefix character; doubled it introduces long options (`--name`) and the positional delimiter (`--`).
    pub prefix: char,
    /// The character separating a long option from its inline value (`--name=value`).
    pub separator: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl ParserConfig {
    pub(crate) fn delimiter(&self) -> String {
        format!("{p}{p}", p = self.prefix)
    }
}

/// The successful result of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every token was consumed and validation passed.
    Complete,
    /// A trigger (ex: `--help`) fired and parsing stopped intentionally.
    /// Holds the display name of the trigger.
    EarlyExit(String),
}

#[cfg(test)]
mod sample {
    use super::Arity;
    use rand::{distributions::Standard, prelude::Distribution, Rng};

    impl Distribution<Arity> for Standard {
        fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Arity {
            match rng.gen_range(0..3) {
                0 => Arity::Exactly(rng.gen_range(1..=u8::MAX)),
                1 => Arity::AtLeast(rng.gen()),
                2 => Arity::AtMost(rng.gen_range(1..=u8::MAX)),
                _ => unreachable!("internal error - impossible gen_range()"),
            }
        }
    }
}
