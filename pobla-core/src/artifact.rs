//! # Build Artifacts
//!
//! Describes the artifact code or schemas were loaded from, and answers two questions about
//! it: was it generated dynamically, and is it a debug build. Both answers are always
//! definite; when the platform cannot tell where an artifact lives, it is treated as
//! dynamically generated.
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    location: Option<PathBuf>,
    generated: bool,
    debuggable: Option<bool>,
}

impl Artifact {
    /// The running executable.
    ///
    /// Debug information follows the profile this crate was compiled with, which may differ
    /// from the profile of the executable linking it.
    pub fn current() -> Self {
        let location = match std::env::current_exe() {
            Ok(path) => Some(path),
            Err(error) => {
                debug!(%error, "Executable location is unavailable");
                None
            }
        };

        Self {
            location,
            generated: false,
            debuggable: Some(cfg!(debug_assertions)),
        }
    }

    /// An artifact stored at `location`, with unknown debug information.
    pub fn at(location: impl Into<PathBuf>) -> Self {
        Self {
            location: Some(location.into()),
            generated: false,
            debuggable: None,
        }
    }

    /// An artifact built in memory at runtime.
    pub fn generated() -> Self {
        Self {
            location: None,
            generated: true,
            debuggable: None,
        }
    }

    pub fn with_debug_info(mut self, debuggable: bool) -> Self {
        self.debuggable = Some(debuggable);
        self
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Whether the artifact was generated at runtime or has no fixed location.
    pub fn is_dynamic(&self) -> bool {
        self.generated
            || self
                .location
                .as_deref()
                .is_none_or(|path| path.as_os_str().is_empty())
    }

    /// Whether the artifact carries debug information. `false` when unknown.
    pub fn is_debug_build(&self) -> bool {
        self.debuggable.unwrap_or(false)
    }
}
