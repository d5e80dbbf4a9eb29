use crate::api::capture::GenericCapturable;
use crate::model::Action;
use crate::parser::base::{ParseError, TokenStack};
use crate::parser::vararg;

/// Apply `field`'s action to `target`, pulling any values it needs from `stack`.
///
/// Value-less actions never touch the stack.
/// Single value actions pop exactly one token, whatever it looks like (ex: `--count -5`).
/// Multi value actions hand off to the vararg consumer, which stops early at `stop`-prefixed tokens.
pub(super) fn apply<T>(
    name: &str,
    field: &dyn GenericCapturable<T>,
    target: &mut T,
    stack: Option<&mut TokenStack>,
    stop: Option<char>,
) -> Result<(), ParseError> {
    match field.action() {
        Action::StoreConst
        | Action::StoreTrue
        | Action::StoreFalse
        | Action::AppendConst
        | Action::Count => {
            field.matched(target);
            Ok(())
        }
        Action::Store | Action::Append => {
            let stack = match stack {
                Some(stack) => stack,
                None => {
                    unreachable!("internal error - value actions are always given the token stack")
                }
            };

            if field.arity().is_single() {
                let token = stack
                    .pop()
                    .ok_or_else(|| ParseError::MissingValue(name.to_string()))?;
                capture(name, field, target, &token)
            } else {
                vararg::consume(name, field, target, stack, stop)
            }
        }
        Action::Trigger => unreachable!("internal error - triggers are resolved, never applied"),
    }
}

pub(super) fn capture<T>(
    name: &str,
    field: &dyn GenericCapturable<T>,
    target: &mut T,
    token: &str,
) -> Result<(), ParseError> {
    field.capture(target, token).map_err(|error| {
        let (token, message, source) = error.into_parts();
        ParseError::ConversionError {
            name: name.to_string(),
            token,
            message,
            source,
        }
    })
}
