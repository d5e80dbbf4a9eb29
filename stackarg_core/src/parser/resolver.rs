use crate::api::parameter::{Binding, Descriptor};
use crate::parser::action;
use crate::parser::base::{Flow, ParseError, Session, TokenStack};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl<'r, T> Session<'r, T> {
    pub(super) fn lookup_long(&self, name: &str) -> Result<&'r Descriptor<T>, ParseError> {
        let registry = self.registry;
        registry.long_option(name).ok_or_else(|| {
            ParseError::UnknownArgument(format!("{p}{p}{name}", p = registry.config().prefix))
        })
    }

    pub(super) fn lookup_short(&self, short: char) -> Result<&'r Descriptor<T>, ParseError> {
        let registry = self.registry;
        registry.short_option(short).ok_or_else(|| {
            ParseError::UnknownArgument(format!("{p}{short}", p = registry.config().prefix))
        })
    }

    /// Apply a matched option.
    /// `stack` is `None` for the trailing members of a short option cluster, which may not consume values.
    pub(super) fn resolve(
        &mut self,
        target: &mut T,
        descriptor: &'r Descriptor<T>,
        stack: Option<&mut TokenStack>,
    ) -> Result<Flow, ParseError> {
        let field = match descriptor.binding() {
            Binding::Trigger(callback) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Trigger '{}' fired; stopping.", descriptor.display());
                }

                callback(self.registry, self.user_interface);
                return Ok(Flow::Exit(descriptor.display().to_string()));
            }
            Binding::Field(field) => field.as_ref(),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Matched '{}' ({}).", descriptor.display(), descriptor.action());
        }

        self.satisfied_arguments.insert(descriptor.display());

        for group in descriptor.groups() {
            if !self.satisfied_groups.insert(group.as_str()) {
                return Err(ParseError::MutuallyExclusiveViolation {
                    name: descriptor.display().to_string(),
                    group: group.clone(),
                });
            }
        }

        if stack.is_none() && descriptor.consumes_values() {
            return Err(ParseError::GroupedArgumentRequiresValue(
                descriptor.display().to_string(),
            ));
        }

        let stop = Some(self.registry.config().prefix);
        action::apply(descriptor.display(), field, target, stack, stop)?;
        Ok(Flow::Continue)
    }
}
