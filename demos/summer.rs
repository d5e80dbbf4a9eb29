use stackarg::{Arity, Collection, CommandLineParser, Parameter, Switch};

#[derive(Debug, Default)]
struct Params {
    verbose: bool,
    items: Vec<u32>,
}

fn main() {
    let parser = CommandLineParser::new("summer")
        .about("Add up the items.")
        .version(env!("CARGO_PKG_VERSION"))
        .add(
            Parameter::option(
                Switch::store_true(|p: &mut Params| &mut p.verbose),
                "verbose",
                Some('v'),
            )
            .help("Show every item as it is added."),
        )
        .add(
            Parameter::argument(
                Collection::new(|p: &mut Params| &mut p.items, Arity::AtLeast(1)),
                "item",
            )
            .help("The items to sum."),
        )
        .build();
    let mut params = Params::default();
    parser.parse(&mut params);

    if params.verbose {
        for item in &params.items {
            println!("+ {item}");
        }
    }

    println!("Sum: {}", params.items.iter().sum::<u32>());
}
