use std::env;

use crate::api::Registry;
use crate::model::Outcome;
use crate::parser::interface::UserInterface;

/// A [`Registry`] bound to a [`UserInterface`]; the console facing command line parser.
/// Built via [`CommandLineParser::build`](crate::CommandLineParser::build) or [`CommandLineParser::build_parser`](crate::CommandLineParser::build_parser).
pub struct GeneralParser<T> {
    registry: Registry<T>,
    user_interface: Box<dyn UserInterface>,
}

impl<T> GeneralParser<T> {
    pub(crate) fn new(registry: Registry<T>, user_interface: Box<dyn UserInterface>) -> Self {
        Self {
            registry,
            user_interface,
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }

    /// Run the command line parser against the input tokens.
    ///
    /// If the parser encounters an error (ex: an unknown option, an unconvertible value, etc), it prints the error and returns `Err(1)`.
    ///
    /// If a trigger (ex: `-h` or `--help`) is encountered, it runs and parsing stops with `Err(0)`.
    /// Any options/arguments after the trigger are left untouched on `target`.
    pub fn parse_tokens(&self, target: &mut T, tokens: &[&str]) -> Result<(), i32> {
        match self
            .registry
            .parse_with(target, tokens, &*self.user_interface)
        {
            Ok(Outcome::Complete) => Ok(()),
            Ok(Outcome::EarlyExit(_)) => Err(0),
            Err(error) => {
                self.user_interface.print_error(&error);
                Err(1)
            }
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// If the parser encounters an error, it exits with error code `1` (via [`std::process::exit`]).
    /// If a trigger (ex: `--help`) is encountered, it exits with error code `0`.
    pub fn parse(&self, target: &mut T) {
        let command_input: Vec<String> = env::args().skip(1).collect();

        if let Err(exit_code) = self.parse_tokens(
            target,
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            std::process::exit(exit_code);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{CommandLineParser, Parameter, Scalar};
    use crate::parser::util::InMemoryInterface;
    use crate::parser::{ParseError, UserInterface};
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::rc::Rc;

    // Lets a test keep hold of the interface the parser owns.
    #[derive(Clone, Default)]
    struct SharedInterface(Rc<InMemoryInterface>);

    impl UserInterface for SharedInterface {
        fn print(&self, message: String) {
            self.0.print(message);
        }

        fn print_error(&self, error: &ParseError) {
            self.0.print_error(error);
        }
    }

    #[derive(Debug, Default)]
    struct Params {
        value: u32,
    }

    #[rstest]
    #[case(vec!["1"], Ok(()), 1)]
    #[case(vec!["--help"], Err(0), 0)]
    #[case(vec!["1", "-h"], Err(0), 0)]
    #[case(vec!["x"], Err(1), 0)]
    #[case(vec![], Err(1), 0)]
    #[case(vec!["1", "2"], Err(1), 1)]
    fn parse_tokens(
        #[case] tokens: Vec<&str>,
        #[case] expected: Result<(), i32>,
        #[case] expected_value: u32,
    ) {
        // Setup
        let interface = SharedInterface::default();
        let parser = CommandLineParser::new("program")
            .add(Parameter::argument(Scalar::new(|p: &mut Params| &mut p.value), "value"))
            .build_for_test(Box::new(interface.clone()))
            .unwrap();
        let mut params = Params::default();

        // Execute
        let result = parser.parse_tokens(&mut params, &tokens);

        // Verify
        assert_eq!(result, expected);
        assert_eq!(params.value, expected_value);
        let (message, error) = interface.0.consume();

        match expected {
            Ok(()) => assert_eq!((message, error), (None, None)),
            Err(0) => {
                let message = message.unwrap();
                assert_contains!(message, "usage: program [-h] VALUE");
            }
            Err(_) => {
                assert_eq!(message, None);
                assert!(error.is_some());
            }
        }
    }

    #[test]
    fn parse_tokens_reports_error() {
        // Setup
        let interface = SharedInterface::default();
        let parser = CommandLineParser::new("program")
            .add(Parameter::option(Scalar::new(|p: &mut Params| &mut p.value), "value", None))
            .build_for_test(Box::new(interface.clone()))
            .unwrap();

        // Execute
        let result = parser.parse_tokens(&mut Params::default(), &["--value", "abc"]);

        // Verify
        assert_eq!(result, Err(1));
        assert_eq!(
            interface.0.consume_error(),
            "'--value' cannot convert 'abc' to u32 (invalid digit found in string)."
        );
        assert!(parser.registry().long_option("value").is_some());
    }
}
