//! Replay profiles

use crate::arch::ArchName;
use crate::project::repr;
use clap::{App, Arg, ArgMatches, ArgSettings};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything needed to locate and replay one snapshot.
///
/// Every field is optional so that profiles can be layered; see
/// `apply_override`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    snapshot: Option<PathBuf>,
    regions: Option<PathBuf>,
    arch: Option<ArchName>,
    steps: Option<u64>,
    watch: Vec<String>,
}

impl Profile {
    /// Resolve a profile from a project file against the file's directory.
    pub(super) fn from_repr(repr: repr::Profile, base: &Path) -> Self {
        Profile {
            snapshot: repr.snapshot.map(|p| p.to_path(base)),
            regions: repr.regions.map(|p| p.to_path(base)),
            arch: repr.arch,
            steps: repr.steps,
            watch: repr.watch,
        }
    }

    pub fn configure_app<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
        app.arg(
            Arg::with_name("snapshot")
                .long("snapshot")
                .value_name("dump.json")
                .help("The snapshot file to replay.")
                .takes_value(true)
                .set(ArgSettings::Global),
        )
        .arg(
            Arg::with_name("regions")
                .long("regions")
                .value_name("regions")
                .help("Directory of compressed region contents. Defaults to regions/ beside the snapshot.")
                .takes_value(true)
                .set(ArgSettings::Global),
        )
        .arg(
            Arg::with_name("arch")
                .long("arch")
                .value_name("ARCH")
                .help("What architecture the snapshot was captured on.")
                .takes_value(true)
                .set(ArgSettings::Global),
        )
        .arg(
            Arg::with_name("steps")
                .long("steps")
                .value_name("N")
                .help("How many instructions to replay.")
                .takes_value(true)
                .set(ArgSettings::Global),
        )
        .arg(
            Arg::with_name("watch")
                .long("watch")
                .value_name("REG")
                .help("Registers to print before and after replay.")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .set(ArgSettings::Global),
        )
    }

    /// Construct a Profile from clap ArgMatches.
    ///
    /// Unparseable architecture names or step counts are ignored here; use
    /// `validate_args` to reject them first.
    pub fn from_arg_matches(args: &ArgMatches) -> Profile {
        Profile {
            snapshot: args.value_of("snapshot").map(PathBuf::from),
            regions: args.value_of("regions").map(PathBuf::from),
            arch: args
                .value_of("arch")
                .and_then(|s| ArchName::from_str(s).ok()),
            steps: args.value_of("steps").and_then(|s| u64::from_str(s).ok()),
            watch: args
                .values_of("watch")
                .map_or(Vec::new(), |v| v.map(|s| s.to_string()).collect()),
        }
    }

    /// Check arguments that `from_arg_matches` would otherwise drop.
    pub fn validate_args(args: &ArgMatches) -> Result<(), String> {
        if let Some(arch) = args.value_of("arch") {
            ArchName::from_str(arch).map_err(|_| format!("Unknown architecture {}", arch))?;
        }

        if let Some(steps) = args.value_of("steps") {
            u64::from_str(steps).map_err(|_| format!("Invalid step count {}", steps))?;
        }

        Ok(())
    }

    /// The snapshot file, if one was specified.
    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// The region content directory.
    ///
    /// Falls back to `regions/` next to the snapshot file.
    pub fn regions(&self) -> Option<PathBuf> {
        match (&self.regions, &self.snapshot) {
            (Some(regions), _) => Some(regions.clone()),
            (None, Some(snapshot)) => Some(
                snapshot
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join("regions"),
            ),
            (None, None) => None,
        }
    }

    pub fn arch(&self) -> ArchName {
        self.arch.unwrap_or_default()
    }

    /// How many driver steps to take. Defaults to one.
    pub fn steps(&self) -> u64 {
        self.steps.unwrap_or(1)
    }

    /// Registers to display. Defaults to the program counter.
    pub fn iter_watch(&self) -> impl Iterator<Item = &str> {
        let default: &'static [&'static str] = if self.watch.is_empty() { &["pc"] } else { &[] };

        self.watch
            .iter()
            .map(|s| s.as_str())
            .chain(default.iter().copied())
    }

    pub fn apply_override(&self, other: &Profile) -> Profile {
        Profile {
            snapshot: other.snapshot.clone().or_else(|| self.snapshot.clone()),
            regions: other.regions.clone().or_else(|| self.regions.clone()),
            arch: other.arch.or(self.arch),
            steps: other.steps.or(self.steps),
            watch: match other.watch.len() {
                0 => self.watch.clone(),
                _ => other.watch.clone(),
            },
        }
    }
}
