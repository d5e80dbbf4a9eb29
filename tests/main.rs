use std::cell::RefCell;
use std::sync::Arc;
use std::thread;

use rstest::rstest;
use stackarg::prelude::*;
use stackarg::{
    Arity, Collection, CommandLineParser, Counter, Optional, Outcome, ParseError, Parameter,
    Registry, Scalar, Switch, UserInterface, Variants,
};

#[macro_use]
extern crate assert_matches;

#[derive(Default)]
struct Recorder {
    messages: RefCell<Vec<String>>,
}

impl UserInterface for Recorder {
    fn print(&self, message: String) {
        self.messages.borrow_mut().push(message);
    }

    fn print_error(&self, error: &ParseError) {
        self.messages.borrow_mut().push(format!("error: {error}"));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Level {
    #[default]
    Low,
    High,
}

#[derive(Debug, Default, PartialEq)]
struct Params {
    a: bool,
    b: bool,
    c: bool,
    x: bool,
    y: bool,
    verbosity: u8,
    name: String,
    level: Level,
    limit: Option<i64>,
    items: Vec<String>,
    tags: Vec<String>,
    positionals: Vec<String>,
    sub: Option<Sub>,
}

#[derive(Debug, Default, PartialEq)]
struct Sub {
    x: u32,
    rest: Vec<String>,
}

fn registry() -> Registry<Params> {
    CommandLineParser::new("cmd")
        .add(Parameter::short(Switch::store_true(|p: &mut Params| &mut p.a), 'a'))
        .add(Parameter::short(Switch::store_true(|p: &mut Params| &mut p.b), 'b'))
        .add(Parameter::short(Switch::store_true(|p: &mut Params| &mut p.c), 'c'))
        .add(
            Parameter::option(Switch::store_true(|p: &mut Params| &mut p.x), "x", None)
                .group("xy"),
        )
        .add(
            Parameter::option(Switch::store_true(|p: &mut Params| &mut p.y), "y", None)
                .group("xy"),
        )
        .add(Parameter::option(
            Counter::new(|p: &mut Params| &mut p.verbosity),
            "verbose",
            Some('v'),
        ))
        .add(Parameter::option(Scalar::new(|p: &mut Params| &mut p.name), "name", Some('n')))
        .add(Parameter::option(
            Scalar::with_converter(
                |p: &mut Params| &mut p.level,
                Variants::new().variant("low", Level::Low).variant("high", Level::High),
            ),
            "level",
            None,
        ))
        .add(Parameter::option(Optional::new(|p: &mut Params| &mut p.limit), "limit", Some('l')))
        .add(Parameter::option(
            Collection::new(|p: &mut Params| &mut p.items, Arity::AtLeast(2)),
            "items",
            None,
        ))
        .add(Parameter::option(Collection::append(|p: &mut Params| &mut p.tags), "tag", Some('t')))
        .add(Parameter::argument(
            Collection::new(|p: &mut Params| &mut p.positionals, Arity::AtLeast(0)),
            "positional",
        ))
        .verb(
            "sub",
            |sub| {
                sub.add(Parameter::short(Scalar::new(|s: &mut Sub| &mut s.x), 'x'))
                    .add(Parameter::argument(
                        Collection::new(|s: &mut Sub| &mut s.rest, Arity::AtLeast(0)),
                        "rest",
                    ))
            },
            |p: &mut Params, sub| p.sub = Some(sub),
        )
        .build_registry()
        .unwrap()
}

fn parse(tokens: &[&str]) -> Result<Params, ParseError> {
    let mut params = Params::default();
    let outcome = registry().parse_with(&mut params, tokens, &Recorder::default())?;
    assert_eq!(outcome, Outcome::Complete);
    Ok(params)
}

// Formats the parsed values back into (one possible) canonical token sequence.
fn format(params: &Params) -> Vec<String> {
    let mut tokens = Vec::default();

    let switches = [
        ("-a", params.a),
        ("-b", params.b),
        ("-c", params.c),
        ("--x", params.x),
        ("--y", params.y),
    ];

    for (flag, set) in switches {
        if set {
            tokens.push(flag.to_string());
        }
    }

    for _ in 0..params.verbosity {
        tokens.push("--verbose".to_string());
    }

    tokens.push(format!("--name={}", params.name));
    tokens.push("--level".to_string());
    tokens.push(format!("{:?}", params.level).to_ascii_lowercase());

    if let Some(limit) = params.limit {
        tokens.push("--limit".to_string());
        tokens.push(limit.to_string());
    }

    if !params.items.is_empty() {
        tokens.push("--items".to_string());
        tokens.extend(params.items.iter().cloned());
    }

    for tag in &params.tags {
        tokens.push(format!("-t{tag}"));
    }

    tokens.push("--".to_string());
    tokens.extend(params.positionals.iter().cloned());
    tokens
}

#[test]
fn deterministic() {
    // Setup
    let tokens = ["-abv", "--name", "n", "--items", "i", "j", "-t", "t", "p", "q", "--", "-r"];

    // Execute
    let first = parse(&tokens).unwrap();
    let second = parse(&tokens).unwrap();

    // Verify
    assert_eq!(first, second);
    assert_eq!(first.positionals, vec!["p", "q", "-r"]);
}

#[rstest]
#[case(vec!["-vv", "--name", "n", "--level", "HIGH", "-l", "-3", "--items", "i", "j", "-ta", "-t", "b", "p", "-5"])]
#[case(vec!["-ab", "--x", "--name=with space", "--", "--p"])]
#[case(vec!["-c", "--y", "--items", "1", "2", "3"])]
fn round_trip(#[case] tokens: Vec<&str>) {
    // Setup
    let parsed = parse(&tokens).unwrap();
    let formatted = format(&parsed);
    let formatted: Vec<&str> = formatted.iter().map(String::as_str).collect();

    // Execute
    let reparsed = parse(&formatted).unwrap();

    // Verify
    assert_eq!(parsed, reparsed);
}

#[rstest]
#[case(vec!["-abc"])]
#[case(vec!["-cba"])]
#[case(vec!["-a", "-b", "-c"])]
#[case(vec!["-c", "-ab"])]
fn cluster_equivalence(#[case] tokens: Vec<&str>) {
    // Execute
    let params = parse(&tokens).unwrap();

    // Verify
    assert_eq!(
        params,
        Params {
            a: true,
            b: true,
            c: true,
            ..Params::default()
        }
    );
}

#[rstest]
#[case(vec!["-1"], vec!["-1"])]
#[case(vec!["-42", "-0.5"], vec!["-42", "-0.5"])]
#[case(vec!["-a", "-9x"], vec!["-9x"])]
fn negative_numbers_are_positional(#[case] tokens: Vec<&str>, #[case] expected: Vec<&str>) {
    // Execute
    let params = parse(&tokens).unwrap();

    // Verify
    assert_eq!(params.positionals, expected);
}

#[test]
fn exclusive_group() {
    assert!(parse(&["--x"]).unwrap().x);
    assert!(parse(&["--y"]).unwrap().y);
    assert_matches!(
        parse(&["--x", "--y"]).unwrap_err(),
        ParseError::MutuallyExclusiveViolation { name, group } if name == "--y" && group == "xy"
    );
}

#[rstest]
#[case(vec!["--items", "a", "--x"], Err(1))]
#[case(vec!["--items", "a"], Err(1))]
#[case(vec!["--items", "a", "b"], Ok(vec!["a", "b"]))]
#[case(vec!["--items", "a", "b", "--x"], Ok(vec!["a", "b"]))]
fn vararg_minimum(#[case] tokens: Vec<&str>, #[case] expected: Result<Vec<&str>, usize>) {
    // Execute
    let result = parse(&tokens);

    // Verify
    match expected {
        Ok(items) => assert_eq!(result.unwrap().items, items),
        Err(provided) => assert_matches!(
            result.unwrap_err(),
            ParseError::ArityViolation { name, minimum: 2, provided: p }
                if name == "--items" && p == provided
        ),
    }
}

#[test]
fn delimiter() {
    // Execute
    let params = parse(&["--", "--not-an-option", "-a", "-"]).unwrap();

    // Verify
    assert_eq!(params.positionals, vec!["--not-an-option", "-a", "-"]);
    assert!(!params.a);
}

#[test]
fn verb_consumes_everything() {
    // Execute
    let params = parse(&["-a", "sub", "-x", "1", "extra", "more"]).unwrap();

    // Verify
    assert!(params.a);
    assert!(params.positionals.is_empty());
    assert_eq!(
        params.sub,
        Some(Sub {
            x: 1,
            rest: vec!["extra".to_string(), "more".to_string()],
        })
    );
}

#[test]
fn verb_replaces_outer_positionals() {
    // Setup
    #[derive(Debug, Default)]
    struct Outer {
        first: String,
        sub: Option<Inner>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Inner {
        v: bool,
    }

    let registry = CommandLineParser::new("outer")
        .add(Parameter::argument(Scalar::new(|o: &mut Outer| &mut o.first), "first"))
        .verb(
            "sub",
            |sub| sub.add(Parameter::short(Switch::store_true(|i: &mut Inner| &mut i.v), 'v')),
            |o: &mut Outer, inner| o.sub = Some(inner),
        )
        .build_registry()
        .unwrap();
    let mut outer = Outer::default();

    // Execute
    let outcome = registry.parse_with(&mut outer, &["sub", "-v"], &Recorder::default()).unwrap();

    // Verify
    assert_eq!(outcome, Outcome::Complete);
    assert_eq!(outer.first, "");
    assert_eq!(outer.sub, Some(Inner { v: true }));
}

#[test]
fn verb_rejects_outer_options() {
    assert_matches!(
        parse(&["sub", "-a"]).unwrap_err(),
        ParseError::UnknownArgument(name) if name == "-a"
    );
}

#[test]
fn missing_requirements_are_aggregated() {
    // Setup
    #[derive(Default)]
    struct Connection {
        host: String,
        port: u16,
        user: String,
        tcp: bool,
        udp: bool,
        json: bool,
        text: bool,
    }

    let registry = CommandLineParser::new("connect")
        .add(
            Parameter::option(Scalar::new(|c: &mut Connection| &mut c.host), "host", None)
                .required(),
        )
        .add(
            Parameter::option(Scalar::new(|c: &mut Connection| &mut c.port), "port", None)
                .required(),
        )
        .add(
            Parameter::option(Scalar::new(|c: &mut Connection| &mut c.user), "user", Some('u'))
                .required(),
        )
        .add(
            Parameter::option(Switch::store_true(|c: &mut Connection| &mut c.tcp), "tcp", None)
                .group("transport"),
        )
        .add(
            Parameter::option(Switch::store_true(|c: &mut Connection| &mut c.udp), "udp", None)
                .group("transport"),
        )
        .add(
            Parameter::option(Switch::store_true(|c: &mut Connection| &mut c.json), "json", None)
                .group("format"),
        )
        .add(
            Parameter::option(Switch::store_true(|c: &mut Connection| &mut c.text), "text", None)
                .group("format"),
        )
        .require_group("transport")
        .require_group("format")
        .build_registry()
        .unwrap();
    let recorder = Recorder::default();

    // Execute
    let groups = registry
        .parse_with(&mut Connection::default(), &["--host", "h"], &recorder)
        .unwrap_err();
    let arguments = registry
        .parse_with(&mut Connection::default(), &["--port", "1", "--udp", "--json"], &recorder)
        .unwrap_err();

    // Verify
    assert_matches!(
        groups,
        ParseError::MissingRequiredGroup(groups) if groups == vec!["transport", "format"]
    );
    assert_matches!(
        arguments,
        ParseError::MissingRequiredArgument(arguments) if arguments == vec!["--host", "--user"]
    );
}

#[test]
fn help_exits_early() {
    // Setup
    let recorder = Recorder::default();
    let mut params = Params::default();

    // Execute
    let outcome = registry()
        .parse_with(&mut params, &["-a", "--help", "--unknown"], &recorder)
        .unwrap();

    // Verify
    assert_eq!(outcome, Outcome::EarlyExit("--help".to_string()));
    assert!(params.a);
    let messages = recorder.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("usage: cmd [-h] [-a] [-b] [-c] [--x] [--y] [-v] [-n NAME]"));
}

#[test]
fn custom_conventions() {
    // Setup
    let registry = CommandLineParser::new("dos")
        .prefix('/')
        .separator(':')
        .add(Parameter::option(Scalar::new(|p: &mut Params| &mut p.name), "name", Some('n')))
        .add(Parameter::short(Switch::store_true(|p: &mut Params| &mut p.a), 'a'))
        .add(Parameter::argument(
            Collection::new(|p: &mut Params| &mut p.positionals, Arity::AtLeast(0)),
            "positional",
        ))
        .build_registry()
        .unwrap();
    let mut params = Params::default();

    // Execute
    registry
        .parse_with(&mut params, &["//name:x", "/a", "-1", "//", "/b"], &Recorder::default())
        .unwrap();

    // Verify
    assert_eq!(params.name, "x");
    assert!(params.a);
    assert_eq!(params.positionals, vec!["-1", "/b"]);
}

#[test]
fn custom_converter_source() {
    // Setup
    let registry = CommandLineParser::new("cmd")
        .add(Parameter::option(
            Scalar::with_converter(|p: &mut Params| &mut p.verbosity, |token: &str| {
                u8::from_str_radix(token.trim_start_matches("0x"), 16)
            }),
            "mask",
            None,
        ))
        .build_registry()
        .unwrap();
    let mut params = Params::default();

    // Execute
    registry
        .parse_with(&mut params, &["--mask", "0x1f"], &Recorder::default())
        .unwrap();
    let error = registry
        .parse_with(&mut params, &["--mask", "0xzz"], &Recorder::default())
        .unwrap_err();

    // Verify
    assert_eq!(params.verbosity, 31);
    assert!(std::error::Error::source(&error).is_some());
    assert_matches!(
        error,
        ParseError::ConversionError { name, token, .. } if name == "--mask" && token == "0xzz"
    );
}

#[test]
fn shared_across_threads() {
    // Setup
    let registry = Arc::new(registry());

    // Execute
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let mut params = Params::default();
                let name = format!("n{i}");
                let tokens = ["--name", name.as_str(), "-t", "x"];
                registry
                    .parse_with(&mut params, &tokens, &Recorder::default())
                    .unwrap();
                params
            })
        })
        .collect();

    // Verify
    for (i, handle) in handles.into_iter().enumerate() {
        let params = handle.join().unwrap();
        assert_eq!(params.name, format!("n{i}"));
        assert_eq!(params.tags, vec!["x"]);
    }
}

#[test]
fn collectable_initial_values_are_extended() {
    // Setup
    let mut params = Params {
        tags: vec!["initial".to_string()],
        ..Params::default()
    };
    params.tags.add("added".to_string());

    // Execute
    registry()
        .parse_with(&mut params, &["-t", "parsed"], &Recorder::default())
        .unwrap();

    // Verify
    assert_eq!(params.tags, vec!["initial", "added", "parsed"]);
}
