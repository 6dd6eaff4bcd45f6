//! # cosmotex
//!
//! Write cosmological models as LaTeX tables from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Write a built-in realization to stdout
//! cosmotex write Planck18
//!
//! # Several models in one table, written to a file
//! cosmotex write Planck18 WMAP9 -o params.tex --caption "CMB cosmologies"
//!
//! # Models from parameter files, as an AASTeX deluxetable
//! cosmotex write my_model.toml --format aastex
//!
//! # Replace an existing file
//! cosmotex write Planck18 -o params.tex --overwrite
//!
//! # Pass-through writer options
//! cosmotex write Planck18 --option tablealign=h --option exclude_names=m_nu
//!
//! # List realizations, read a table back
//! cosmotex list --output json
//! cosmotex read params.tex
//! ```

mod logging;
mod render;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use cosmotexlib::{
    read_latex_file, realizations, write_table, Cosmology, Destination, Format, LatexOptions,
};
use tracing::debug;

use crate::render::{output_mode, render_realizations, render_table};

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .value_parser(["auto", "term", "text", "json"])
        .default_value("auto")
        .help("Output format")
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("cosmotex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Write cosmological models as LaTeX tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug events to stderr"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
        .subcommand(
            Command::new("write")
                .about("Write one or more models as a LaTeX table")
                .arg(
                    Arg::new("cosmology")
                        .required(true)
                        .num_args(1..)
                        .help("Realization name or .json/.toml parameter file"),
                )
                .arg(
                    Arg::new("output-file")
                        .short('o')
                        .long("output-file")
                        .help("Destination file (stdout when absent or '-')"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Replace the destination file if it exists"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["latex", "aastex"])
                        .default_value("latex")
                        .help("Table markup"),
                )
                .arg(
                    Arg::new("caption")
                        .long("caption")
                        .help("Table caption"),
                )
                .arg(
                    Arg::new("latexdict")
                        .long("latexdict")
                        .value_parser(["AA", "doublelines"])
                        .help("Rule-line preset"),
                )
                .arg(
                    Arg::new("options-file")
                        .long("options-file")
                        .help("Writer options from a .json or .toml file"),
                )
                .arg(
                    Arg::new("option")
                        .long("option")
                        .action(ArgAction::Append)
                        .value_name("KEY=VALUE")
                        .help("Writer option (can be specified multiple times)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List built-in realizations")
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("read")
                .about("Read a LaTeX table back")
                .arg(Arg::new("file").required(true).help("LaTeX file to read"))
                .arg(output_arg()),
        )
}

/// A model argument is a parameter file when it has a parameter-file
/// extension or more than one path component; otherwise it names a
/// realization, even if a file of that name exists.
fn is_model_file(arg: &str) -> bool {
    let path = Path::new(arg);
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json" | "toml")
    ) || path.components().count() > 1
}

fn resolve_model(arg: &str) -> Result<Cosmology> {
    let path = Path::new(arg);
    if is_model_file(arg) {
        debug!(path = %path.display(), "loading cosmology file");
        Cosmology::load(path).with_context(|| format!("failed to load {}", path.display()))
    } else {
        Ok(realizations::get(arg)?)
    }
}

fn build_options(matches: &ArgMatches) -> Result<LatexOptions> {
    let mut options = match matches.get_one::<String>("options-file") {
        Some(file) => LatexOptions::load(file)
            .with_context(|| format!("failed to load options from {file}"))?,
        None => LatexOptions::new(),
    };

    if let Some(caption) = matches.get_one::<String>("caption") {
        options.set("caption", caption)?;
    }
    if let Some(preset) = matches.get_one::<String>("latexdict") {
        options.set("latexdict", preset)?;
    }
    if let Some(pairs) = matches.get_many::<String>("option") {
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{pair}'"))?;
            options.set(key.trim(), value)?;
        }
    }
    Ok(options)
}

fn write_handler(matches: &ArgMatches) -> Result<()> {
    let models = matches
        .get_many::<String>("cosmology")
        .into_iter()
        .flatten()
        .map(|arg| resolve_model(arg))
        .collect::<Result<Vec<_>>>()?;
    let options = build_options(matches)?;
    let format: Format = matches
        .get_one::<String>("format")
        .map(|f| f.parse())
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or_default();
    let overwrite = matches.get_flag("overwrite");

    match matches.get_one::<String>("output-file").map(String::as_str) {
        Some(file) if file != "-" => {
            write_table(
                models.as_slice(),
                Destination::path(file),
                format,
                overwrite,
                &options,
            )?;
        }
        _ => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_table(
                models.as_slice(),
                Destination::from(&mut lock),
                format,
                overwrite,
                &options,
            )?;
        }
    }
    Ok(())
}

fn list_handler(matches: &ArgMatches) -> Result<()> {
    let models = realizations::available()
        .iter()
        .map(|name| realizations::get(name))
        .collect::<cosmotexlib::Result<Vec<_>>>()?;

    let mode = output_mode(matches.get_one::<String>("output").map(String::as_str));
    emit(&render_realizations(&models, mode)?);
    Ok(())
}

fn read_handler(matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow!("missing file argument"))?;
    let table = read_latex_file(file).with_context(|| format!("failed to read {file}"))?;

    let mode = output_mode(matches.get_one::<String>("output").map(String::as_str));
    emit(&render_table(&table, mode)?);
    Ok(())
}

/// Print rendered output, ending with a newline.
fn emit(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    logging::initialize_logging(matches.get_flag("verbose"), matches.get_flag("quiet"))?;

    match matches.subcommand() {
        Some(("write", sub)) => write_handler(sub),
        Some(("list", sub)) => list_handler(sub),
        Some(("read", sub)) => read_handler(sub),
        _ => Err(anyhow!("unknown command")),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
