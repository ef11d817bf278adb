//! Project file representation

use crate::arch::ArchName;
use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A profile as it is written in the project file.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Profile {
    #[serde(default)]
    pub snapshot: Option<RelativePathBuf>,

    #[serde(default)]
    pub regions: Option<RelativePathBuf>,

    #[serde(default)]
    pub arch: Option<ArchName>,

    #[serde(default)]
    pub steps: Option<u64>,

    #[serde(default)]
    pub watch: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Project {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}
