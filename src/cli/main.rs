//! CLI support for non-command bits

use crate::cli::common::{resolve_profile, Command};
use crate::{cli, project};
use clap::{AppSettings, Arg, ArgSettings};
use std::io;
use std::str::FromStr;

pub fn main() -> io::Result<()> {
    let mut app = app_from_crate!().setting(AppSettings::SubcommandRequiredElseHelp);
    app = app
        .arg(
            Arg::with_name("project")
                .long("project")
                .value_name(project::DEFAULT_PROJECT)
                .takes_value(true)
                .help("The project file to load")
                .set(ArgSettings::Global),
        )
        .arg(
            Arg::with_name("profile")
                .long("profile")
                .value_name("crash")
                .takes_value(true)
                .help("Which profile in the project file to use")
                .set(ArgSettings::Global),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("Log every executed instruction")
                .set(ArgSettings::Global),
        );
    app = project::Profile::configure_app(app);

    for cmd in Command::enumerate().iter() {
        app = app.subcommand(cmd.into_clap_subcommand());
    }

    let matches = app.get_matches();
    let (command, submatches) = matches.subcommand();

    // Global arguments are propagated down into the subcommand's matches.
    let args = submatches.unwrap_or(&matches);

    let level = if args.is_present("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("snapreplay", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let command = Command::from_str(command)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Please enter a command"))?;

    let profile = resolve_profile(args)?;

    match command {
        Command::Info => cli::info(&profile),
        Command::Replay => cli::replay(&profile),
    }
}
