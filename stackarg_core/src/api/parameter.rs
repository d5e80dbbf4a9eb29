use crate::api::capture::{CliArgument, CliOption, GenericCapturable};
use crate::api::core::Registry;
use crate::model::{Action, Arity, ParserConfig};
use crate::parser::UserInterface;

pub(crate) type TriggerFn<T> = Box<dyn Fn(&Registry<T>, &dyn UserInterface) + Send + Sync>;

// We need a (dyn .. [ignoring V] ..) here in order to put all the fields of varying value types V under one registry.
// In other words, we want the bottom of the object graph to include the types V, but up here we want to work across all V.
pub(crate) enum Binding<T> {
    Field(Box<dyn GenericCapturable<T>>),
    Trigger(TriggerFn<T>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterClass {
    Opt,
    Arg,
}

/// A built parameter, owned by its [`Registry`].
/// Immutable for the duration of a parse.
pub(crate) struct Descriptor<T> {
    class: ParameterClass,
    binding: Binding<T>,
    name: Option<String>,
    short: Option<char>,
    help: Option<String>,
    meta: Option<String>,
    groups: Vec<String>,
    required: bool,
    display: String,
}

impl<T> Descriptor<T> {
    pub(crate) fn class(&self) -> ParameterClass {
        self.class
    }

    pub(crate) fn binding(&self) -> &Binding<T> {
        &self.binding
    }

    /// The long name of an option, or the name of an argument.
    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn short(&self) -> Option<char> {
        self.short
    }

    pub(crate) fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub(crate) fn groups(&self) -> &[String] {
        &self.groups
    }

    pub(crate) fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn action(&self) -> Action {
        match &self.binding {
            Binding::Field(field) => field.action(),
            Binding::Trigger(_) => Action::Trigger,
        }
    }

    pub(crate) fn arity(&self) -> Arity {
        match &self.binding {
            Binding::Field(field) => field.arity(),
            Binding::Trigger(_) => Arity::Exactly(0),
        }
    }

    pub(crate) fn consumes_values(&self) -> bool {
        self.action().consumes_values()
    }

    /// How the user refers to this parameter: `--name`, `-n`, or `NAME`.
    /// Also the identity used for required-argument tracking.
    pub(crate) fn display(&self) -> &str {
        &self.display
    }

    /// The placeholder shown for this parameter's values in help output.
    pub(crate) fn metavar(&self) -> String {
        match (&self.meta, &self.name) {
            (Some(meta), _) => meta.clone(),
            (None, Some(name)) => name.to_ascii_uppercase().replace('-', "_"),
            (None, None) => "VALUE".to_string(),
        }
    }

    pub(crate) fn finalize(&mut self, config: &ParserConfig) {
        let prefix = config.prefix;
        self.display = match (self.class, &self.name, self.short) {
            (ParameterClass::Opt, Some(name), _) => format!("{prefix}{prefix}{name}"),
            (ParameterClass::Opt, None, Some(short)) => format!("{prefix}{short}"),
            (ParameterClass::Arg, Some(name), _) => name.to_ascii_uppercase(),
            _ => unreachable!("internal error - a parameter must be nameable"),
        };
    }
}

/// An argument/option for the command line parser.
///
/// Options are matched by name (`--name`/`-n`), in any order, and may be omitted unless [`Parameter::required`].
/// Arguments are matched by position, in the order they are added.
pub struct Parameter<T>(Descriptor<T>);

impl<T> std::fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = &self.0;
        let class = match &inner.class {
            ParameterClass::Opt => "Opt",
            ParameterClass::Arg => "Arg",
        };
        let name = match (&inner.class, &inner.name) {
            (ParameterClass::Opt, Some(n)) => format!("--{n}"),
            (ParameterClass::Arg, Some(n)) => n.to_string(),
            (_, None) => "".to_string(),
        };
        let short = match &inner.short {
            Some(s) => format!(" -{s},"),
            None => "".to_string(),
        };
        let help = if let Some(d) = &inner.help {
            format!(", {d}")
        } else {
            "".to_string()
        };

        write!(
            f,
            "{class}[{action}, {arity}, {name},{short} {help}]",
            action = inner.action(),
            arity = inner.arity(),
        )
    }
}

impl<T> Parameter<T> {
    fn new(
        class: ParameterClass,
        binding: Binding<T>,
        name: Option<String>,
        short: Option<char>,
    ) -> Self {
        Self(Descriptor {
            class,
            binding,
            name,
            short,
            help: None,
            meta: None,
            groups: Vec::default(),
            required: false,
            display: String::default(),
        })
    }

    /// Create an option parameter, matched by `--name` (or `-s` when a short name is given).
    ///
    /// ### Example
    /// ```
    /// # use stackarg_core as stackarg;
    /// use stackarg::{CommandLineParser, Parameter, Scalar};
    ///
    /// #[derive(Default)]
    /// struct Params {
    ///     size: u32,
    /// }
    ///
    /// let registry = CommandLineParser::new("program")
    ///     .add(Parameter::option(Scalar::new(|p: &mut Params| &mut p.size), "size", Some('s')))
    ///     .build_registry()
    ///     .unwrap();
    ///
    /// let mut params = Params::default();
    /// registry.parse(&mut params, &["-s", "3"]).unwrap();
    /// assert_eq!(params.size, 3);
    /// ```
    pub fn option(
        field: impl GenericCapturable<T> + CliOption + 'static,
        name: impl Into<String>,
        short: Option<char>,
    ) -> Self {
        Self::new(
            ParameterClass::Opt,
            Binding::Field(Box::new(field)),
            Some(name.into()),
            short,
        )
    }

    /// Create an option parameter known only by its short name (`-s`).
    pub fn short(field: impl GenericCapturable<T> + CliOption + 'static, short: char) -> Self {
        Self::new(
            ParameterClass::Opt,
            Binding::Field(Box::new(field)),
            None,
            Some(short),
        )
    }

    /// Create a positional argument parameter.
    ///
    /// ### Example
    /// ```
    /// # use stackarg_core as stackarg;
    /// use stackarg::{Arity, Collection, CommandLineParser, Parameter};
    ///
    /// #[derive(Default)]
    /// struct Params {
    ///     items: Vec<u32>,
    /// }
    ///
    /// let registry = CommandLineParser::new("program")
    ///     .add(Parameter::argument(Collection::new(|p: &mut Params| &mut p.items, Arity::AtLeast(1)), "item"))
    ///     .build_registry()
    ///     .unwrap();
    ///
    /// let mut params = Params::default();
    /// registry.parse(&mut params, &["1", "2", "3"]).unwrap();
    /// assert_eq!(params.items, vec![1, 2, 3]);
    /// ```
    pub fn argument(
        field: impl GenericCapturable<T> + CliArgument + 'static,
        name: impl Into<String>,
    ) -> Self {
        Self::new(
            ParameterClass::Arg,
            Binding::Field(Box::new(field)),
            Some(name.into()),
            None,
        )
    }

    /// Create a trigger option: when matched, `callback` runs with the live registry and parsing stops early.
    /// Used for `--help` style parameters.
    ///
    /// ### Example
    /// ```
    /// # use stackarg_core as stackarg;
    /// use stackarg::{CommandLineParser, Outcome, Parameter};
    ///
    /// let registry = CommandLineParser::<()>::new("program")
    ///     .add(Parameter::trigger(|_, ui| ui.print("licensed MIT".to_string()), "license", None))
    ///     .build_registry()
    ///     .unwrap();
    ///
    /// let outcome = registry.parse(&mut (), &["--license", "ignored"]).unwrap();
    /// assert_eq!(outcome, Outcome::EarlyExit("--license".to_string()));
    /// ```
    pub fn trigger(
        callback: impl Fn(&Registry<T>, &dyn UserInterface) + Send + Sync + 'static,
        name: impl Into<String>,
        short: Option<char>,
    ) -> Self {
        Self::new(
            ParameterClass::Opt,
            Binding::Trigger(Box::new(callback)),
            Some(name.into()),
            short,
        )
    }

    /// Document the help message for this parameter.
    /// If repeated, only the final message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.0.help.replace(description.into());
        self
    }

    /// Document the value placeholder for this parameter (defaults to the upper-cased name).
    /// If repeated, only the final placeholder will apply.
    pub fn meta(mut self, placeholder: impl Into<String>) -> Self {
        self.0.meta.replace(placeholder.into());
        self
    }

    /// Place this parameter in the mutually exclusive group `group`.
    /// May be repeated to join multiple groups; joining the same group twice has no further effect.
    /// At most one member of a group may be matched per parse (including repeats of the same member).
    pub fn group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();

        if !self.0.groups.contains(&group) {
            self.0.groups.push(group);
        }

        self
    }

    /// Require this option to be present.
    /// Every missing required option is reported together, once parsing completes.
    pub fn required(mut self) -> Self {
        self.0.required = true;
        self
    }

    pub(crate) fn consume(self) -> Descriptor<T> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Collection, Counter, Scalar, Switch};

    #[derive(Default)]
    struct Target {
        number: u32,
        flag: bool,
        level: u8,
        items: Vec<u32>,
    }

    fn finalized(parameter: Parameter<Target>) -> Descriptor<Target> {
        let mut descriptor = parameter.consume();
        descriptor.finalize(&ParserConfig::default());
        descriptor
    }

    #[test]
    fn option() {
        let descriptor = finalized(
            Parameter::option(Scalar::new(|t: &mut Target| &mut t.number), "number", Some('n'))
                .help("a number")
                .group("g1")
                .group("g2")
                .required(),
        );
        assert_eq!(descriptor.class(), ParameterClass::Opt);
        assert_eq!(descriptor.name(), Some("number"));
        assert_eq!(descriptor.short(), Some('n'));
        assert_eq!(descriptor.help(), Some("a number"));
        assert_eq!(descriptor.groups(), &["g1".to_string(), "g2".to_string()]);
        assert!(descriptor.is_required());
        assert_eq!(descriptor.action(), Action::Store);
        assert!(descriptor.consumes_values());
        assert_eq!(descriptor.display(), "--number");
        assert_eq!(descriptor.metavar(), "NUMBER");
    }

    #[test]
    fn group_repeated() {
        let descriptor = finalized(
            Parameter::option(Switch::store_true(|t: &mut Target| &mut t.flag), "flag", None)
                .group("g1")
                .group("g2")
                .group("g1"),
        );
        assert_eq!(descriptor.groups(), &["g1".to_string(), "g2".to_string()]);
    }

    #[test]
    fn short_only() {
        let descriptor = finalized(Parameter::short(
            Switch::store_true(|t: &mut Target| &mut t.flag),
            'f',
        ));
        assert_eq!(descriptor.name(), None);
        assert_eq!(descriptor.display(), "-f");
        assert!(!descriptor.consumes_values());
    }

    #[test]
    fn argument() {
        let descriptor = finalized(
            Parameter::argument(
                Collection::new(|t: &mut Target| &mut t.items, Arity::AtLeast(2)),
                "item-list",
            )
            .meta("N"),
        );
        assert_eq!(descriptor.class(), ParameterClass::Arg);
        assert_eq!(descriptor.display(), "ITEM-LIST");
        assert_eq!(descriptor.metavar(), "N");
        assert_eq!(descriptor.arity(), Arity::AtLeast(2));
    }

    #[test]
    fn trigger() {
        let descriptor = finalized(Parameter::trigger(|_, _| {}, "about", None));
        assert_eq!(descriptor.action(), Action::Trigger);
        assert_eq!(descriptor.arity(), Arity::Exactly(0));
        assert!(!descriptor.consumes_values());
    }

    #[test]
    fn display_follows_prefix() {
        let mut descriptor =
            Parameter::option(Counter::new(|t: &mut Target| &mut t.level), "verbose", Some('v'))
                .consume();
        descriptor.finalize(&ParserConfig {
            prefix: '+',
            separator: ':',
        });
        assert_eq!(descriptor.display(), "++verbose");
    }

    #[test]
    fn debug() {
        let option =
            Parameter::option(Scalar::new(|t: &mut Target| &mut t.number), "number", Some('n'));
        assert_eq!(format!("{option:?}"), "Opt[Store, Exactly(1), --number, -n, ]");

        let argument =
            Parameter::argument(Scalar::new(|t: &mut Target| &mut t.number), "number").help("abc");
        assert_eq!(format!("{argument:?}"), "Arg[Store, Exactly(1), number, , abc]");
    }
}
