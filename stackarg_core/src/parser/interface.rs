use crate::parser::base::ParseError;

/// Where a parser's output goes.
///
/// Triggers (ex: `--help`) write through [`UserInterface::print`].
/// [`GeneralParser`](crate::GeneralParser) reports failed parses through [`UserInterface::print_error`].
pub trait UserInterface {
    /// Show a message to the user.
    fn print(&self, message: String);

    /// Show a parse failure to the user.
    fn print_error(&self, error: &ParseError);
}

/// Prints messages to stdout, and errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: &ParseError) {
        eprintln!("Parse error: {error}");
    }
}

/// In-memory [`UserInterface`]s for testing.
#[cfg(any(test, feature = "unit_test"))]
pub mod util {
    use crate::parser::{ParseError, UserInterface};
    use std::cell::RefCell;

    /// Collects every message and the last error, for inspection after a parse.
    #[derive(Debug, Default)]
    pub struct InMemoryInterface {
        message: RefCell<Option<Vec<String>>>,
        error: RefCell<Option<String>>,
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            // Allows for print() to be called many times, concatenating the messages.
            self.message
                .borrow_mut()
                .get_or_insert_with(Vec::default)
                .push(message);
        }

        fn print_error(&self, error: &ParseError) {
            self.error.borrow_mut().replace(error.to_string());
        }
    }

    impl InMemoryInterface {
        /// Take the (newline joined) messages and the error.
        pub fn consume(&self) -> (Option<String>, Option<String>) {
            (
                self.message.take().map(|messages| messages.join("\n")),
                self.error.take(),
            )
        }

        /// Take the messages, asserting that no error was printed.
        pub fn consume_message(&self) -> String {
            let (message, error) = self.consume();
            assert_eq!(error, None);
            message.expect("no message was printed")
        }

        /// Take the error, asserting that no message was printed.
        pub fn consume_error(&self) -> String {
            let (message, error) = self.consume();
            assert_eq!(message, None);
            error.expect("no error was printed")
        }
    }
}
