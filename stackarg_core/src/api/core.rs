use std::collections::{BTreeMap, HashMap, HashSet};

use crate::api::parameter::{Descriptor, Parameter, ParameterClass};
use crate::constant::*;
use crate::model::{Action, Outcome, ParserConfig};
use crate::parser::{
    ConfigError, ConsoleInterface, GeneralParser, ParseError, Printer, Session, UserInterface,
};

pub(crate) type Hook<T> = Box<dyn Fn(&mut T) -> Result<(), ParseError> + Send + Sync>;

/// A nested registry reached through a verb token, together with how its result is stored on the parent target.
pub(crate) trait Dispatch<T>: Send + Sync {
    fn about(&self) -> Option<&str>;

    fn dispatch(
        &self,
        target: &mut T,
        tokens: Vec<String>,
        user_interface: &dyn UserInterface,
    ) -> Result<Outcome, ParseError>;
}

struct Verb<T, U> {
    registry: Registry<U>,
    store: fn(&mut T, U),
}

impl<T, U: Default> Dispatch<T> for Verb<T, U> {
    fn about(&self) -> Option<&str> {
        self.registry.about.as_deref()
    }

    fn dispatch(
        &self,
        target: &mut T,
        tokens: Vec<String>,
        user_interface: &dyn UserInterface,
    ) -> Result<Outcome, ParseError> {
        let mut nested = U::default();

        match Session::new(&self.registry, user_interface).consume(&mut nested, tokens)? {
            Outcome::Complete => {
                (self.store)(target, nested);
                Ok(Outcome::Complete)
            }
            early_exit => Ok(early_exit),
        }
    }
}

/// The configured, immutable argument registry for target type `T`.
/// Built via [`CommandLineParser::build_registry`].
///
/// A registry may be reused across any number of parses, including from multiple threads at once;
/// each parse owns its own session state.
pub struct Registry<T> {
    program: String,
    about: Option<String>,
    config: ParserConfig,
    options: Vec<Descriptor<T>>,
    long_names: HashMap<String, usize>,
    short_names: HashMap<char, usize>,
    arguments: Vec<Descriptor<T>>,
    verbs: BTreeMap<String, Box<dyn Dispatch<T>>>,
    required_arguments: Vec<String>,
    required_groups: Vec<String>,
    hooks: Vec<Hook<T>>,
}

impl<T> std::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("program", &self.program)
            .field("config", &self.config)
            .field("verbs", &self.verbs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<T> Registry<T> {
    /// Parse `tokens` into `target`.
    ///
    /// Triggers (ex: `--help`) print to the console and yield [`Outcome::EarlyExit`].
    /// All other failures are returned as a [`ParseError`]; `target` may be partially updated in that case.
    ///
    /// ### Example
    /// ```
    /// # use stackarg_core as stackarg;
    /// use stackarg::{CommandLineParser, Outcome, Parameter, Switch};
    ///
    /// #[derive(Default)]
    /// struct Params {
    ///     verbose: bool,
    /// }
    ///
    /// let registry = CommandLineParser::new("program")
    ///     .add(Parameter::option(Switch::store_true(|p: &mut Params| &mut p.verbose), "verbose", Some('v')))
    ///     .build_registry()
    ///     .unwrap();
    ///
    /// let mut params = Params::default();
    /// assert_eq!(registry.parse(&mut params, &["-v"]).unwrap(), Outcome::Complete);
    /// assert!(params.verbose);
    /// ```
    pub fn parse(&self, target: &mut T, tokens: &[&str]) -> Result<Outcome, ParseError> {
        self.parse_with(target, tokens, &ConsoleInterface::default())
    }

    /// Parse `tokens` into `target`, sending any trigger output through `user_interface`.
    pub fn parse_with(
        &self,
        target: &mut T,
        tokens: &[&str],
        user_interface: &dyn UserInterface,
    ) -> Result<Outcome, ParseError> {
        let tokens = tokens.iter().map(|token| token.to_string()).collect();
        Session::new(self, user_interface).consume(target, tokens)
    }

    /// The program name (including the verb path, for nested registries).
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The token conventions of this registry.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Render the help message, wrapped to the terminal width.
    pub fn help(&self) -> String {
        Printer::terminal().render(self)
    }

    pub(crate) fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub(crate) fn options(&self) -> &[Descriptor<T>] {
        &self.options
    }

    pub(crate) fn long_option(&self, name: &str) -> Option<&Descriptor<T>> {
        self.long_names.get(name).map(|index| &self.options[*index])
    }

    pub(crate) fn short_option(&self, short: char) -> Option<&Descriptor<T>> {
        self.short_names.get(&short).map(|index| &self.options[*index])
    }

    pub(crate) fn arguments(&self) -> &[Descriptor<T>] {
        &self.arguments
    }

    pub(crate) fn verb(&self, name: &str) -> Option<&dyn Dispatch<T>> {
        self.verbs.get(name).map(|verb| verb.as_ref())
    }

    /// Verb names (sorted) with their about messages.
    pub(crate) fn verbs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.verbs
            .iter()
            .map(|(name, verb)| (name.as_str(), verb.about()))
    }

    pub(crate) fn required_arguments(&self) -> &[String] {
        &self.required_arguments
    }

    pub(crate) fn required_groups(&self) -> &[String] {
        &self.required_groups
    }

    pub(crate) fn hooks(&self) -> &[Hook<T>] {
        &self.hooks
    }
}

/// The command line parser builder.
///
/// ### Example
/// ```
/// # use stackarg_core as stackarg;
/// use stackarg::CommandLineParser;
///
/// let registry = CommandLineParser::<()>::new("program")
///     // Configure with CommandLineParser::add, CommandLineParser::verb, etc.
///     .build_registry()
///     .unwrap();
/// registry.parse(&mut (), &[]).unwrap();
/// ```
pub struct CommandLineParser<T> {
    program: String,
    about: Option<String>,
    version: Option<String>,
    config: ParserConfig,
    options: Vec<Descriptor<T>>,
    arguments: Vec<Descriptor<T>>,
    verbs: Vec<(String, Box<dyn Dispatch<T>>)>,
    required_groups: Vec<String>,
    hooks: Vec<Hook<T>>,
    deferred_error: Option<ConfigError>,
}

impl<T: 'static> CommandLineParser<T> {
    /// Create a command line parser.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            version: None,
            config: ParserConfig::default(),
            options: Vec::default(),
            arguments: Vec::default(),
            verbs: Vec::default(),
            required_groups: Vec::default(),
            hooks: Vec::default(),
            deferred_error: None,
        }
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add a `--version` trigger which prints `"{program} {version}"`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Set the option prefix character (default `-`).
    /// Verbs added afterwards inherit it.
    pub fn prefix(mut self, prefix: char) -> Self {
        self.config.prefix = prefix;
        self
    }

    /// Set the long option inline value separator (default `=`).
    /// Verbs added afterwards inherit it.
    pub fn separator(mut self, separator: char) -> Self {
        self.config.separator = separator;
        self
    }

    /// Add an argument/option to the command line parser.
    ///
    /// The order of argument parameters corresponds to their positional order during parsing.
    /// The order of option parameters does not affect the command parser semantics.
    pub fn add(mut self, parameter: Parameter<T>) -> Self {
        let descriptor = parameter.consume();

        match descriptor.class() {
            ParameterClass::Opt => self.options.push(descriptor),
            ParameterClass::Arg => self.arguments.push(descriptor),
        }

        self
    }

    /// Require that one member of the mutually exclusive group `group` is present.
    pub fn require_group(mut self, group: impl Into<String>) -> Self {
        self.required_groups.push(group.into());
        self
    }

    /// Register a hook to run against the target once parsing and validation succeed.
    /// Hooks run in registration order; the first failure is returned as-is.
    pub fn post_parse(
        mut self,
        hook: impl Fn(&mut T) -> Result<(), ParseError> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Add a verb (sub-command).
    ///
    /// When `name` appears as the first positional token, every remaining token is parsed by the nested parser into a fresh `U::default()`,
    /// which is then handed to `store` along with the parent target.
    ///
    /// ### Example
    /// ```
    /// # use stackarg_core as stackarg;
    /// use stackarg::{CommandLineParser, Parameter, Scalar};
    ///
    /// #[derive(Default)]
    /// struct Push {
    ///     remote: String,
    /// }
    ///
    /// #[derive(Default)]
    /// struct Params {
    ///     push: Option<Push>,
    /// }
    ///
    /// let registry = CommandLineParser::new("git")
    ///     .verb(
    ///         "push",
    ///         |sub| sub.add(Parameter::argument(Scalar::new(|p: &mut Push| &mut p.remote), "remote")),
    ///         |params: &mut Params, push| params.push = Some(push),
    ///     )
    ///     .build_registry()
    ///     .unwrap();
    ///
    /// let mut params = Params::default();
    /// registry.parse(&mut params, &["push", "origin"]).unwrap();
    /// assert_eq!(params.push.unwrap().remote, "origin");
    /// ```
    pub fn verb<U>(
        mut self,
        name: impl Into<String>,
        setup_fn: impl FnOnce(CommandLineParser<U>) -> CommandLineParser<U>,
        store: fn(&mut T, U),
    ) -> Self
    where
        U: Default + 'static,
    {
        let name = name.into();
        let mut inner = CommandLineParser::new(format!("{p} {name}", p = self.program));
        inner.config = self.config;

        match setup_fn(inner).build_registry() {
            Ok(registry) => {
                self.verbs.push((name, Box::new(Verb { registry, store })));
            }
            Err(error) => {
                if self.deferred_error.is_none() {
                    self.deferred_error.replace(error);
                }
            }
        }

        self
    }

    /// Build the registry.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_registry(self) -> Result<Registry<T>, ConfigError> {
        let CommandLineParser {
            program,
            about,
            version,
            config,
            options,
            arguments,
            verbs,
            required_groups,
            hooks,
            deferred_error,
        } = self;

        if let Some(error) = deferred_error {
            return Err(error);
        }

        validate_config(&config)?;
        let mut builtins = vec![Parameter::trigger(
            |registry: &Registry<T>, user_interface: &dyn UserInterface| {
                user_interface.print(registry.help())
            },
            HELP_NAME,
            Some(HELP_SHORT),
        )
        .help("Show this help message and exit.")
        .consume()];

        if let Some(version) = version {
            builtins.push(
                Parameter::trigger(
                    move |registry: &Registry<T>, user_interface: &dyn UserInterface| {
                        user_interface.print(format!("{p} {version}", p = registry.program()))
                    },
                    VERSION_NAME,
                    None,
                )
                .help("Show the version and exit.")
                .consume(),
            );
        }

        let mut registry = Registry {
            program,
            about,
            config,
            options: Vec::default(),
            long_names: HashMap::default(),
            short_names: HashMap::default(),
            arguments: Vec::default(),
            verbs: BTreeMap::default(),
            required_arguments: Vec::default(),
            required_groups: Vec::default(),
            hooks,
        };
        let mut positional_names = HashSet::new();
        let mut exclusive_groups = HashSet::new();

        for mut descriptor in builtins.into_iter().chain(options) {
            validate_option(&config, &descriptor)?;
            descriptor.finalize(&config);
            let index = registry.options.len();

            if let Some(name) = descriptor.name() {
                if registry.long_names.insert(name.to_string(), index).is_some() {
                    return Err(ConfigError(format!(
                        "Cannot duplicate the option '{}'.",
                        descriptor.display()
                    )));
                }
            }

            if let Some(short) = descriptor.short() {
                if registry.short_names.insert(short, index).is_some() {
                    return Err(ConfigError(format!(
                        "Cannot duplicate the short option '{p}{short}'.",
                        p = config.prefix
                    )));
                }
            }

            if descriptor.is_required() {
                registry
                    .required_arguments
                    .push(descriptor.display().to_string());
            }

            exclusive_groups.extend(descriptor.groups().iter().cloned());
            registry.options.push(descriptor);
        }

        for mut descriptor in arguments {
            validate_argument(&descriptor)?;
            descriptor.finalize(&config);

            if !positional_names.insert(descriptor.display().to_string()) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the argument '{}'.",
                    descriptor.display()
                )));
            }

            registry.arguments.push(descriptor);
        }

        for group in required_groups {
            if !exclusive_groups.contains(&group) {
                return Err(ConfigError(format!(
                    "Required group '{group}' has no members."
                )));
            }

            if !registry.required_groups.contains(&group) {
                registry.required_groups.push(group);
            }
        }

        for (name, verb) in verbs {
            if name.is_empty() || name.starts_with(config.prefix) {
                return Err(ConfigError(format!(
                    "Verb '{name}' must be non-empty and must not start with '{p}'.",
                    p = config.prefix
                )));
            }

            if registry.verbs.insert(name.clone(), verb).is_some() {
                return Err(ConfigError(format!("Cannot duplicate the verb '{name}'.")));
            }
        }

        Ok(registry)
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser<T>, ConfigError> {
        let registry = self.build_registry()?;
        Ok(GeneralParser::new(registry, user_interface))
    }

    /// Build the console command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<GeneralParser<T>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the console command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser<T> {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn build_for_test(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser<T>, ConfigError> {
        self.build_with_interface(user_interface)
    }
}

fn validate_config(config: &ParserConfig) -> Result<(), ConfigError> {
    if config.prefix == config.separator {
        return Err(ConfigError(format!(
            "The prefix and separator must differ (both are '{}').",
            config.prefix
        )));
    }

    if config.prefix.is_whitespace() || config.prefix.is_ascii_digit() {
        return Err(ConfigError(format!(
            "The prefix '{}' must not be whitespace or a digit.",
            config.prefix
        )));
    }

    Ok(())
}

fn validate_option<T>(
    config: &ParserConfig,
    descriptor: &Descriptor<T>,
) -> Result<(), ConfigError> {
    if let Some(name) = descriptor.name() {
        if name.is_empty()
            || name.starts_with(config.prefix)
            || name.contains(config.separator)
            || name.contains(char::is_whitespace)
        {
            return Err(ConfigError(format!(
                "Option '{name}' must be non-empty, must not start with '{p}', and must not contain '{s}' or whitespace.",
                p = config.prefix,
                s = config.separator,
            )));
        }
    }

    if let Some(short) = descriptor.short() {
        // Digits are reserved for negative numbers (ex: '-1').
        if short.is_ascii_digit() || short == config.prefix || short.is_whitespace() {
            return Err(ConfigError(format!(
                "Short option '{short}' must not be a digit, whitespace, or the prefix '{p}'.",
                p = config.prefix
            )));
        }
    }

    if let Some(maximum) = descriptor.arity().maximum() {
        if descriptor.consumes_values() && maximum == 0 {
            return Err(ConfigError(format!(
                "Option '{}' must accept at least one value.",
                descriptor.name().map_or_else(
                    || descriptor.short().map(String::from).unwrap_or_default(),
                    String::from
                )
            )));
        }
    }

    if descriptor.is_required() && descriptor.action() == Action::Trigger {
        return Err(ConfigError(
            "A trigger option cannot be required.".to_string(),
        ));
    }

    Ok(())
}

fn validate_argument<T>(descriptor: &Descriptor<T>) -> Result<(), ConfigError> {
    let name = descriptor.name().unwrap_or_default();

    if name.is_empty() {
        return Err(ConfigError("Argument names must be non-empty.".to_string()));
    }

    if !descriptor.consumes_values() {
        return Err(ConfigError(format!(
            "Argument '{name}' must store or append values."
        )));
    }

    if descriptor.arity().maximum() == Some(0) {
        return Err(ConfigError(format!(
            "Argument '{name}' must accept at least one value."
        )));
    }

    if descriptor.is_required() || !descriptor.groups().is_empty() {
        return Err(ConfigError(format!(
            "Argument '{name}' cannot be required or grouped; its arity decides whether it must be present."
        )));
    }

    Ok(())
}
