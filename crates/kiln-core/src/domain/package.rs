//! Package value objects: requirements, the composer source, and the Node
//! package managers selected by lockfile.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── PackageRequirement ───────────────────────────────────────────────────────

/// A package name paired with a version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRequirement {
    pub name: String,
    pub constraint: String,
}

impl PackageRequirement {
    pub fn new(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
        }
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.constraint)
    }
}

impl FromStr for PackageRequirement {
    type Err = DomainError;

    /// Parse `name:constraint`. Scoped npm names (`@scope/name`) never contain
    /// a colon, so the last colon is the separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, constraint) = s.rsplit_once(':').ok_or_else(|| {
            DomainError::InvalidRequirement {
                value: s.into(),
                reason: "missing ':' between name and constraint".into(),
            }
        })?;

        if name.trim().is_empty() || constraint.trim().is_empty() {
            return Err(DomainError::InvalidRequirement {
                value: s.into(),
                reason: "name and constraint must both be non-empty".into(),
            });
        }

        Ok(Self::new(name.trim(), constraint.trim()))
    }
}

// ── ComposerSource ───────────────────────────────────────────────────────────

/// Where the backend package installer comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposerSource {
    /// `composer` on `PATH`.
    #[default]
    Global,
    /// A `composer.phar` run through the PHP binary.
    Phar(PathBuf),
}

impl ComposerSource {
    /// `"global"` selects the binary on `PATH`, anything else is a phar path.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "global" => Self::Global,
            path => Self::Phar(PathBuf::from(path)),
        }
    }

    /// Program and leading arguments that precede `require`.
    pub fn command_prefix(&self, php: &str) -> (String, Vec<String>) {
        match self {
            Self::Global => ("composer".into(), Vec::new()),
            Self::Phar(path) => (php.into(), vec![path.display().to_string()]),
        }
    }
}

impl fmt::Display for ComposerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Phar(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── PackageManager ───────────────────────────────────────────────────────────

/// Node package manager, chosen by the lockfile present in the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Npm,
}

impl PackageManager {
    /// Detection order. The first manager whose lockfile exists wins.
    pub const DETECTION_ORDER: [PackageManager; 3] = [Self::Pnpm, Self::Yarn, Self::Npm];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Npm => "npm",
        }
    }

    pub const fn lockfile(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm-lock.yaml",
            Self::Yarn => "yarn.lock",
            Self::Npm => "package-lock.json",
        }
    }

    /// Arguments for the install step.
    pub fn install_args(&self) -> Vec<String> {
        vec!["install".into()]
    }

    /// Arguments for the build step.
    pub fn build_args(&self) -> Vec<String> {
        vec!["run".into(), "build".into()]
    }

    /// Pick a manager for the project at `root`; npm when no lockfile exists.
    pub fn detect(root: &Path, exists: impl Fn(&Path) -> bool) -> Self {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|pm| exists(&root.join(pm.lockfile())))
            .unwrap_or(Self::Npm)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
