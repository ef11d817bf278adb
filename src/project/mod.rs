//! Project files and replay configuration.
//!
//! A project file (`replay.json` by default) names one or more profiles, each
//! describing where a snapshot lives and how to replay it. Command line
//! arguments override whatever the selected profile says.

mod profile;
mod repr;

pub use profile::Profile;

use std::collections::BTreeMap;
use std::path::Path;
use std::{fs, io};

/// The default project filename.
pub const DEFAULT_PROJECT: &str = "replay.json";

/// In-memory representation of a project file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    profiles: BTreeMap<String, Profile>,
}

impl Project {
    /// Read a project file. Relative paths within it are resolved against the
    /// directory the file is in.
    pub fn read<P: AsRef<Path>>(filename: P) -> io::Result<Self> {
        let filename = filename.as_ref();
        let project_file = fs::File::open(filename)?;

        Self::from_reader(
            io::BufReader::new(project_file),
            filename.parent().unwrap_or_else(|| Path::new("")),
        )
    }

    pub fn from_reader<R: io::Read>(reader: R, base: &Path) -> io::Result<Self> {
        let repr: repr::Project = serde_json::from_reader(reader)?;

        Ok(Project {
            profiles: repr
                .profiles
                .into_iter()
                .map(|(name, profile)| (name, Profile::from_repr(profile, base)))
                .collect(),
        })
    }

    /// Get the profile with the given name.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Get the project's default profile: the first one, by name.
    pub fn default_profile(&self) -> Option<(&String, &Profile)> {
        self.profiles.iter().next()
    }
}
