//! Common utilities for command implementations

use crate::project::{self, Profile, Project};
use crate::snapshot::Snapshot;
use clap::{App, ArgMatches, SubCommand};
use std::io;
use std::str::FromStr;

/// Enumeration of all CLI commands
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Info,
    Replay,
}

impl Command {
    /// Enumerate all commands that we recognize.
    pub fn enumerate() -> Vec<Self> {
        vec![Command::Info, Command::Replay]
    }

    /// Construct the subcommand object for this particular `Command`.
    pub fn into_clap_subcommand<'a, 'b>(self) -> App<'a, 'b> {
        match self {
            Command::Info => SubCommand::with_name("info")
                .about("Describe a snapshot's process, memory layout, and registers"),
            Command::Replay => SubCommand::with_name("replay")
                .about("Replay a snapshot, paging in memory as execution touches it"),
        }
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "info" => Ok(Command::Info),
            "replay" => Ok(Command::Replay),
            _ => Err(()),
        }
    }
}

/// Combine the selected project profile with command line overrides.
///
/// A missing project file is only an error if the user named it.
pub fn resolve_profile(matches: &ArgMatches) -> io::Result<Profile> {
    Profile::validate_args(matches).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let overrides = Profile::from_arg_matches(matches);
    let project = match matches.value_of("project") {
        Some(filename) => Project::read(filename)?,
        None => match Project::read(project::DEFAULT_PROJECT) {
            Ok(project) => project,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Project::default(),
            Err(e) => return Err(e),
        },
    };

    let base = match matches.value_of("profile") {
        Some(name) => project.profile(name).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("The specified profile {} does not exist.", name),
            )
        })?,
        None => project
            .default_profile()
            .map(|(_, profile)| profile.clone())
            .unwrap_or_default(),
    };

    Ok(base.apply_override(&overrides))
}

/// Load the snapshot a profile points to.
pub fn load_snapshot(profile: &Profile) -> io::Result<Snapshot> {
    let path = profile.snapshot().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "Did not specify a snapshot, replay cannot continue.",
        )
    })?;

    Ok(Snapshot::read(path)?)
}
