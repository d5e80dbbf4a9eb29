use terminal_size::{terminal_size, Width};

use crate::api::parameter::Descriptor;
use crate::api::Registry;
use crate::model::Arity;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_MIDDLE_WIDTH: usize = 17;
// Used when the output isn't a terminal (ex: piped to a file).
const DEFAULT_TOTAL_WIDTH: usize = 80;
// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

#[derive(Debug, PartialEq, Eq)]
struct ColumnRenderer {
    left: usize,
    middle: usize,
}

impl ColumnRenderer {
    /// Produce a renderer which fits `middle` next to `left` within `total`, if possible.
    fn guided(left: usize, middle: usize, total: usize) -> Self {
        let non_middle = MAIN_INDENT + left + PADDING_WIDTH;
        let target_total = (total as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle, MINIMUM_MIDDLE_WIDTH);

        let middle = if guided_middle + non_middle <= target_total {
            guided_middle
        } else if non_middle < total {
            std::cmp::max(total - non_middle, MINIMUM_MIDDLE_WIDTH)
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns left={left}, middle={middle} for total width {total}.");
        }

        Self { left, middle }
    }

    fn render(&self, left: &str, middle: &str) -> Vec<String> {
        let width = self.left;
        let indent = " ".repeat(MAIN_INDENT);
        let padding = " ".repeat(PADDING_WIDTH);
        let parts = chunk(middle, self.middle);

        if parts.is_empty() {
            return vec![format!("{indent}{left}")];
        }

        parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| {
                if i == 0 {
                    format!("{indent}{left:width$}{padding}{part}")
                } else {
                    format!("{indent}{:width$}{padding}{part}", "")
                }
            })
            .collect()
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

fn grammar(arity: Arity, consumes_values: bool, metavar: &str) -> String {
    if !consumes_values {
        return String::default();
    }

    let repeat = |n: u8| vec![metavar; n as usize].join(" ");

    match arity {
        Arity::Exactly(n) => repeat(n),
        Arity::AtLeast(0) => format!("[{metavar} ...]"),
        Arity::AtLeast(n) => format!("{} [...]", repeat(n)),
        Arity::AtMost(1) => format!("[{metavar}]"),
        Arity::AtMost(_) => format!("[{metavar} ...]"),
    }
}

fn option_flags<T>(descriptor: &Descriptor<T>, prefix: char) -> String {
    let grammar = grammar(
        descriptor.arity(),
        descriptor.consumes_values(),
        &descriptor.metavar(),
    );
    let with_grammar = |flag: String| {
        if grammar.is_empty() {
            flag
        } else {
            format!("{flag} {grammar}")
        }
    };

    match (descriptor.short(), descriptor.name()) {
        (Some(short), Some(name)) => format!(
            "{}, {}",
            with_grammar(format!("{prefix}{short}")),
            with_grammar(format!("{prefix}{prefix}{name}"))
        ),
        (Some(short), None) => with_grammar(format!("{prefix}{short}")),
        (None, Some(name)) => with_grammar(format!("{prefix}{prefix}{name}")),
        (None, None) => unreachable!("internal error - an option must be nameable"),
    }
}

fn option_summary<T>(descriptor: &Descriptor<T>, prefix: char) -> String {
    let grammar = grammar(
        descriptor.arity(),
        descriptor.consumes_values(),
        &descriptor.metavar(),
    );
    let flag = match descriptor.short() {
        Some(short) => format!("{prefix}{short}"),
        None => descriptor.display().to_string(),
    };
    let flag = if grammar.is_empty() {
        flag
    } else {
        format!("{flag} {grammar}")
    };

    if descriptor.is_required() {
        flag
    } else {
        format!("[{flag}]")
    }
}

/// Renders the help message of a registry.
pub(crate) struct Printer {
    total_width: usize,
}

impl Printer {
    pub(crate) fn terminal() -> Self {
        match terminal_size() {
            Some((Width(width), _)) => Self::new(width as usize),
            None => Self::new(DEFAULT_TOTAL_WIDTH),
        }
    }

    pub(crate) fn new(total_width: usize) -> Self {
        Self { total_width }
    }

    pub(crate) fn render<T>(&self, registry: &Registry<T>) -> String {
        let prefix = registry.config().prefix;
        let mut summary = Vec::default();
        let mut option_rows = Vec::default();
        let mut argument_rows = Vec::default();
        let mut verb_rows = Vec::default();

        for descriptor in registry.options() {
            summary.push(option_summary(descriptor, prefix));
            option_rows.push((
                option_flags(descriptor, prefix),
                descriptor.help().unwrap_or_default().to_string(),
            ));
        }

        for descriptor in registry.arguments() {
            let grammar = grammar(descriptor.arity(), true, &descriptor.metavar());
            summary.push(grammar.clone());
            argument_rows.push((grammar, descriptor.help().unwrap_or_default().to_string()));
        }

        for (name, about) in registry.verbs() {
            verb_rows.push((name.to_string(), about.unwrap_or_default().to_string()));
        }

        if !verb_rows.is_empty() {
            let names: Vec<&str> = verb_rows.iter().map(|(name, _)| name.as_str()).collect();
            summary.push(format!("{{{}}} ...", names.join(",")));
        }

        let rows = option_rows.iter().chain(&argument_rows).chain(&verb_rows);
        let left = rows.clone().map(|(left, _)| left.chars().count()).max().unwrap_or(0);
        let middle = rows.map(|(_, middle)| middle.chars().count()).max().unwrap_or(0);
        let renderer = ColumnRenderer::guided(left, middle, self.total_width);

        let mut lines = vec![format!(
            "usage: {p} {s}",
            p = registry.program(),
            s = summary.join(" ")
        )];

        if let Some(about) = registry.about() {
            lines.push(String::default());
            let width = std::cmp::max(self.total_width, MINIMUM_MIDDLE_WIDTH);
            lines.extend(chunk(about, width));
        }

        for (title, rows) in [
            ("positional arguments:", &argument_rows),
            ("options:", &option_rows),
            ("verbs:", &verb_rows),
        ] {
            if rows.is_empty() {
                continue;
            }

            lines.push(String::default());
            lines.push(title.to_string());

            for (left, middle) in rows {
                lines.extend(renderer.render(left, middle));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Collection, CommandLineParser, Optional, Parameter, Scalar, Switch};
    use crate::test::assert_contains;
    use rstest::rstest;

    #[derive(Default)]
    struct Params {
        verbose: bool,
        name: String,
        maybe: Option<u32>,
        items: Vec<u32>,
        pair: Vec<u32>,
        sub: Option<Sub>,
    }

    #[derive(Default)]
    struct Sub {
        value: u32,
    }

    #[rstest]
    #[case("", 10, vec![])]
    #[case("abc", 10, vec!["abc"])]
    #[case("abc def", 7, vec!["abc def"])]
    #[case("abc def", 6, vec!["abc", "def"])]
    #[case("  abc   def ", 10, vec!["abc def"])]
    #[case("abcdefghij", 5, vec!["abcd-", "efgh-", "ij"])]
    #[case("ab abcdefghij", 5, vec!["ab", "abcd-", "efgh-", "ij"])]
    #[case("abcde", 5, vec!["abcde"])]
    fn chunk_paragraph(#[case] paragraph: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(chunk(paragraph, width), expected);
    }

    #[rstest]
    #[case(Arity::Exactly(1), true, "N")]
    #[case(Arity::Exactly(2), true, "N N")]
    #[case(Arity::AtLeast(0), true, "[N ...]")]
    #[case(Arity::AtLeast(1), true, "N [...]")]
    #[case(Arity::AtLeast(2), true, "N N [...]")]
    #[case(Arity::AtMost(1), true, "[N]")]
    #[case(Arity::AtMost(3), true, "[N ...]")]
    #[case(Arity::Exactly(0), false, "")]
    fn grammar_arity(#[case] arity: Arity, #[case] consumes: bool, #[case] expected: &str) {
        assert_eq!(grammar(arity, consumes, "N"), expected);
    }

    #[rstest]
    #[case(10, 32, 80, 32)]
    #[case(10, 5, 80, MINIMUM_MIDDLE_WIDTH)]
    #[case(10, 32, 30, MINIMUM_MIDDLE_WIDTH)]
    #[case(10, 32, 40, 26)]
    #[case(50, 32, 40, MINIMUM_MIDDLE_WIDTH)]
    fn column_renderer_guided(
        #[case] left: usize,
        #[case] middle: usize,
        #[case] total: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(
            ColumnRenderer::guided(left, middle, total),
            ColumnRenderer {
                left,
                middle: expected
            }
        );
    }

    #[test]
    fn render_empty() {
        // Setup
        let registry = CommandLineParser::<Params>::new("program")
            .build_registry()
            .unwrap();

        // Execute
        let message = Printer::new(80).render(&registry);

        // Verify
        assert_eq!(
            message,
            r#"usage: program [-h]

options:
 -h, --help   Show this help message and exit."#
        );
    }

    #[test]
    fn render_narrow() {
        // Setup
        let registry = CommandLineParser::<Params>::new("program")
            .build_registry()
            .unwrap();

        // Execute
        let message = Printer::new(30).render(&registry);

        // Verify
        assert_eq!(
            message,
            r#"usage: program [-h]

options:
 -h, --help   Show this help
              message and exit."#
        );
    }

    #[test]
    fn render_full() {
        // Setup
        let registry = CommandLineParser::new("program")
            .about("Process the items.")
            .add(
                Parameter::option(
                    Switch::store_true(|p: &mut Params| &mut p.verbose),
                    "verbose",
                    Some('v'),
                )
                .help("Be chatty."),
            )
            .add(
                Parameter::option(Scalar::new(|p: &mut Params| &mut p.name), "name", None)
                    .required(),
            )
            .add(Parameter::short(Optional::new(|p: &mut Params| &mut p.maybe), 'm').meta("M"))
            .add(
                Parameter::argument(
                    Collection::new(|p: &mut Params| &mut p.items, Arity::AtLeast(1)),
                    "item",
                )
                .help("The items."),
            )
            .add(Parameter::argument(
                Collection::new(|p: &mut Params| &mut p.pair, Arity::Exactly(2)),
                "pair",
            ))
            .verb(
                "sub",
                |sub| {
                    sub.about("Run the sub command.")
                        .add(Parameter::argument(Scalar::new(|s: &mut Sub| &mut s.value), "value"))
                },
                |p: &mut Params, s| p.sub = Some(s),
            )
            .build_registry()
            .unwrap();

        // Execute
        let message = Printer::new(100).render(&registry);

        // Verify
        assert_eq!(
            message,
            r#"usage: program [-h] [-v] --name NAME [-m M] ITEM [...] PAIR PAIR {sub} ...

Process the items.

positional arguments:
 ITEM [...]      The items.
 PAIR PAIR

options:
 -h, --help      Show this help message and exit.
 -v, --verbose   Be chatty.
 --name NAME
 -m M

verbs:
 sub             Run the sub command."#
        );
    }

    #[test]
    fn render_custom_prefix() {
        // Setup
        let registry = CommandLineParser::new("program")
            .prefix('+')
            .add(Parameter::option(
                Switch::store_true(|p: &mut Params| &mut p.verbose),
                "verbose",
                Some('v'),
            ))
            .build_registry()
            .unwrap();

        // Execute
        let message = Printer::new(80).render(&registry);

        // Verify
        assert_contains!(message, "usage: program [+h] [+v]");
        assert_contains!(message, " +v, ++verbose");
    }
}
