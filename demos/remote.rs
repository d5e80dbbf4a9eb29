use stackarg::{
    Arity, Collection, CommandLineParser, Counter, Optional, ParseError, Parameter, Scalar, Switch,
    Variants,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Protocol {
    Https,
    Ssh,
}

#[derive(Debug, Default)]
struct Add {
    name: String,
    url: String,
    protocol: Option<Protocol>,
}

#[derive(Debug, Default)]
struct Remove {
    names: Vec<String>,
    force: bool,
}

#[derive(Debug, Default)]
struct Params {
    verbosity: u8,
    json: bool,
    plain: bool,
    add: Option<Add>,
    remove: Option<Remove>,
}

fn main() {
    let parser = CommandLineParser::new("remote")
        .about("Manage the set of tracked repositories.")
        .add(
            Parameter::option(Counter::new(|p: &mut Params| &mut p.verbosity), "verbose", Some('v'))
                .help("Increase the output detail (repeatable)."),
        )
        .add(
            Parameter::option(Switch::store_true(|p: &mut Params| &mut p.json), "json", None)
                .group("format")
                .help("Report as json."),
        )
        .add(
            Parameter::option(Switch::store_true(|p: &mut Params| &mut p.plain), "plain", None)
                .group("format")
                .help("Report as plain text."),
        )
        .require_group("format")
        .verb(
            "add",
            |add| {
                add.about("Track a new repository.")
                    .add(
                        Parameter::option(
                            Optional::with_converter(
                                |a: &mut Add| &mut a.protocol,
                                Variants::new()
                                    .variant("https", Protocol::Https)
                                    .variant("ssh", Protocol::Ssh),
                            ),
                            "protocol",
                            Some('p'),
                        )
                        .help("The transport protocol (https or ssh)."),
                    )
                    .add(Parameter::argument(Scalar::new(|a: &mut Add| &mut a.name), "name"))
                    .add(Parameter::argument(Scalar::new(|a: &mut Add| &mut a.url), "url"))
                    .post_parse(|a: &mut Add| {
                        if a.url.contains("://") || a.url.contains('@') {
                            Ok(())
                        } else {
                            let message = format!("'{}' does not look like a url.", a.url);
                            Err(ParseError::validation(message))
                        }
                    })
            },
            |p: &mut Params, add| p.add = Some(add),
        )
        .verb(
            "remove",
            |remove| {
                remove
                    .about("Stop tracking repositories.")
                    .add(Parameter::option(
                        Switch::store_true(|r: &mut Remove| &mut r.force),
                        "force",
                        Some('f'),
                    ))
                    .add(Parameter::argument(
                        Collection::new(|r: &mut Remove| &mut r.names, Arity::AtLeast(1)),
                        "name",
                    ))
            },
            |p: &mut Params, remove| p.remove = Some(remove),
        )
        .build();
    let mut params = Params::default();
    parser.parse(&mut params);

    if params.verbosity > 0 {
        println!("{params:?}");
    }

    let summary = match (&params.add, &params.remove) {
        (Some(add), _) => format!("added {} -> {} ({:?})", add.name, add.url, add.protocol),
        (_, Some(remove)) => {
            format!("removed {} (force={})", remove.names.join(", "), remove.force)
        }
        (None, None) => "nothing to do".to_string(),
    };

    if params.json {
        println!("{{\"result\": \"{summary}\"}}");
    } else {
        println!("{summary}");
    }
}
