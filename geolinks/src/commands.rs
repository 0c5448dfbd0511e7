use clap::{ArgAction, arg, command, value_parser};
use std::path::PathBuf;
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("geolinks")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("geolinks")
        .about("Load geotagged linked data for a map viewport from a SPARQL endpoint")
        .arg(
            arg!(-q --"quiet" "Suppress progress spinners and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("load")
                .about("Places markers for the resources inside a bounding box")
                .arg(
                    arg!(-b --"bbox" <BBOX>)
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Viewport as west,south,east,north in degrees"),
                )
                .arg(
                    arg!(-c --"config" <FILE>)
                        .required(false)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with map options; flags below override it"),
                )
                .arg(
                    arg!(-e --"endpoint" <URL>)
                        .required(false)
                        .value_parser(value_parser!(Url))
                        .help("SPARQL endpoint returning RDF/XML"),
                )
                .arg(
                    arg!(-s --"select" <QUERY>)
                        .required(false)
                        .conflicts_with("select-file")
                        .help("Base SELECT query choosing the resources to map"),
                )
                .arg(
                    arg!(--"select-file" <PATH>)
                        .required(false)
                        .value_parser(value_parser!(PathBuf))
                        .help("File containing the base SELECT query"),
                )
                .arg(
                    arg!(--"focus-var" <NAME>)
                        .required(false)
                        .help("Variable of the SELECT query bound to mapped resources"),
                )
                .arg(
                    arg!(--"graph-var" <NAME>)
                        .required(false)
                        .help("Also match coordinates inside named graphs bound to this variable"),
                )
                .arg(
                    arg!(--"optional-titles" "Place markers for resources without a title")
                        .required(false),
                )
                .arg(
                    arg!(--"click-resource" "Open info-windows for the resource itself instead of its primary topic document")
                        .required(false),
                )
                .arg(
                    arg!(--"viewer" <URL>)
                        .required(false)
                        .value_parser(value_parser!(Url))
                        .help("Load info-windows through this viewer URL"),
                )
                .arg(
                    arg!(--"timeout" <SECS>)
                        .required(false)
                        .value_parser(value_parser!(u64))
                        .help("Abort requests after this many seconds"),
                )
                .arg(
                    arg!(-i --"info" "Also load the info-window of every placed marker")
                        .required(false),
                )
                .arg(arg!(--"json" "Print placed markers as JSON").required(false)),
        )
        .subcommand(
            command!("info")
                .about("Fetches the info-window fragment of a resource")
                .arg(
                    arg!(<URI>)
                        .required(true)
                        .value_parser(value_parser!(Url))
                        .help("Resource or document to load"),
                )
                .arg(
                    arg!(--"viewer" <URL>)
                        .required(false)
                        .value_parser(value_parser!(Url))
                        .help("Load through this viewer URL, passing the resource as ?uri="),
                )
                .arg(
                    arg!(--"mode" <URI>)
                        .required(false)
                        .help("Render mode passed as ?mode="),
                )
                .arg(arg!(--"xhtml" "Request XHTML instead of HTML").required(false)),
        )
}
