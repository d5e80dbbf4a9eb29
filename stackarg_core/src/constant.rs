pub(crate) const DEFAULT_PREFIX: char = '-';
pub(crate) const DEFAULT_SEPARATOR: char = '=';
pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const VERSION_NAME: &str = "version";
