use crate::parser::base::{ParseError, Session};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl<'r, T> Session<'r, T> {
    /// Post-scan checks, in order: required groups, required options, then the post-parse hooks.
    pub(super) fn validate(&self, target: &mut T) -> Result<(), ParseError> {
        let registry = self.registry;
        let missing_groups: Vec<String> = registry
            .required_groups()
            .iter()
            .filter(|group| !self.satisfied_groups.contains(group.as_str()))
            .cloned()
            .collect();

        if !missing_groups.is_empty() {
            return Err(ParseError::MissingRequiredGroup(missing_groups));
        }

        let missing_arguments: Vec<String> = registry
            .required_arguments()
            .iter()
            .filter(|argument| !self.satisfied_arguments.contains(argument.as_str()))
            .cloned()
            .collect();

        if !missing_arguments.is_empty() {
            return Err(ParseError::MissingRequiredArgument(missing_arguments));
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Running {} post-parse hook(s).", registry.hooks().len());
        }

        for hook in registry.hooks() {
            hook(target)?;
        }

        Ok(())
    }
}
