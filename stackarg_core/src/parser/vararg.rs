use crate::api::capture::GenericCapturable;
use crate::model::Arity;
use crate::parser::action;
use crate::parser::base::{ParseError, TokenStack};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug)]
struct ValueCount {
    arity: Arity,
    consumed: usize,
}

impl ValueCount {
    fn new(arity: Arity) -> Self {
        Self { arity, consumed: 0 }
    }

    fn push(&mut self) {
        self.consumed += 1;
    }

    fn is_open(&self) -> bool {
        match self.arity.maximum() {
            Some(maximum) => self.consumed < maximum,
            None => true,
        }
    }

    fn can_close(&self) -> bool {
        self.consumed >= self.arity.minimum()
    }

    fn close(self, name: &str) -> Result<(), ParseError> {
        if self.can_close() {
            Ok(())
        } else {
            Err(ParseError::ArityViolation {
                name: name.to_string(),
                minimum: self.arity.minimum(),
                provided: self.consumed,
            })
        }
    }
}

/// Consume up to the arity's maximum values off `stack` into `field`.
/// Stops early at an exhausted stack, or at a token starting with `stop` (which stays on the stack).
pub(super) fn consume<T>(
    name: &str,
    field: &dyn GenericCapturable<T>,
    target: &mut T,
    stack: &mut TokenStack,
    stop: Option<char>,
) -> Result<(), ParseError> {
    let mut count = ValueCount::new(field.arity());

    while count.is_open() {
        let token = match stack.pop() {
            Some(token) => token,
            None => break,
        };

        if let Some(prefix) = stop {
            if token.starts_with(prefix) {
                stack.push(token);
                break;
            }
        }

        action::capture(name, field, target, &token)?;
        count.push();
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("'{name}' consumed {} value(s).", count.consumed);
    }

    count.close(name)
}
