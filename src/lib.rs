//! `stackarg` is a command line parser for Rust.
//!
//! It follows the familiar argparse style (`-v`, `--name value`, `--name=value`, `-abc`, `--`), and adds a few things we found ourselves wanting:
//! * *Typed field bindings*:
//! Every parameter is bound to a field of your own struct, and converted via [`std::str::FromStr`] or a custom [`Converter`].
//! The user never calls a `&str -> T` conversion directly.
//! * *Reusable registries*:
//! The result of configuration is an immutable [`Registry`], which may be parsed against any number of times (and from any number of threads).
//! * *Verbs*:
//! Sub-commands with their own nested parser and their own struct.
//! * *Mutually exclusive groups* and *required options*.
//! * *Triggers*:
//! Options which run a callback and stop parsing (ex: `--help`, `--version`).
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/summer.rs")]
//! ```
//!
//! ```console
//! $ summer -h
//! usage: summer [-h] [--version] [-v] ITEM [...]
//!
//! Add up the items.
//!
//! positional arguments:
//!  ITEM [...]      The items to sum.
//!
//! options:
//!  -h, --help      Show this help message and exit.
//!  --version       Show the version and exit.
//!  -v, --verbose   Show every item as it is added.
//!
//! $ summer 1 2 3
//! Sum: 6
//!
//! $ summer
//! Parse error: Not enough values provided to 'ITEM' (provided=0, expected at least 1).
//!
//! $ summer 1 blah
//! Parse error: 'ITEM' cannot convert 'blah' to u32 (invalid digit found in string).
//! ```
//!
//! # Builder Api
//! Configure `stackarg` by starting with a [`CommandLineParser`] and `add`ing parameters.
//! There are two classes of parameters: [`Parameter::argument`] (matched by position) and [`Parameter::option`] (matched by name).
//! Once configured, [`CommandLineParser::build_registry`] checks the configuration and produces the [`Registry`].
//! Alternatively, [`CommandLineParser::build`] produces a console [`GeneralParser`], which prints errors and exits for you.
//!
//! Each parameter takes a *field*, which decides:
//! * Which field of the target struct is written (via an [`Accessor`], ex: `|p: &mut Params| &mut p.verbose`).
//! * The action applied when the parameter is matched (see [`Action`]).
//! * The number of values consumed (see [`Arity`]).
//!
//! ### Fields
//! * [`Scalar`]: a single value (options & arguments).
//! * [`Optional`]: a single value into an `Option<V>` (options only).
//! * [`Collection`]: many values into any [`Collectable`](./prelude/trait.Collectable.html) (options & arguments).
//! Use [`Collection::append`] for the repeated option style (`-i a -i b`).
//! * [`Switch`]: a constant, no value consumed (options only).
//! [`Switch::store_true`] is the common `--verbose` flag.
//! * [`Counter`]: an integer incremented per occurrence (options only, ex: `-vvv`).
//! * [`ConstAppend`]: a constant appended per occurrence (options only).
//!
//! ### Verbs
//! A verb is a named sub-command with its own nested parser.
//! When the verb's name appears as the first positional token, everything after it is parsed by the nested parser into a fresh value, which is then stored on the parent.
//!
//! ```no_run
#![doc = include_str!("../demos/remote.rs")]
//! ```
//!
//! ```console
//! $ remote --plain add origin git@host:repo --protocol ssh
//! added origin -> git@host:repo (Some(Ssh))
//!
//! $ remote --plain remove
//! Parse error: Not enough values provided to 'NAME' (provided=0, expected at least 1).
//!
//! $ remote add origin git@host:repo
//! Parse error: Missing required group(s): format.
//! ```
//!
//! ### Defaults
//! `stackarg` has nothing to do with default values; they come from the initial value of the target.
//! Scalar fields are overwritten when matched.
//! Collection fields are *extended*, so any initial items are kept.
//!
//! # Cli Semantics
//! `stackarg` consumes the tokens left to right, as a stack.
//! * `--name value` and `--name=value` are equivalent (the separator is configurable, via [`CommandLineParser::separator`]).
//! * `-n value`, `-nvalue`, and `-n=value` are equivalent, when `-n` takes a value.
//! * `-abc` is the cluster `-a -b -c`, when `-a` takes no value.
//! Only the first member of a cluster may take a value.
//! * A single value option always takes the next token, even when it looks like an option (ex: `--offset -5`).
//! * A multi value option takes tokens until its arity is satisfied, or until the next token starts with the prefix.
//! * Tokens that start with the prefix followed by a digit (ex: `-1`) are positional, never options.
//! * `--` ends option processing; every later token is positional.
//! * Positional tokens are gathered up and then handed out to the arguments, in the order they were added.
//! * Verbs are only recognized before any positional token.
//! * Triggers (`-h`/`--help`, `--version`, or any [`Parameter::trigger`]) run immediately and end the parse with [`Outcome::EarlyExit`].
//! * Once every token is consumed, missing required groups and options are reported, then any [`CommandLineParser::post_parse`] hooks run.
//!
//! The prefix itself is configurable, via [`CommandLineParser::prefix`].
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events from the parse engine.
//! * `unit_test`: expose [`InMemoryInterface`] for testing your own parsers.
#![deny(missing_docs)]

pub use stackarg_core::*;
