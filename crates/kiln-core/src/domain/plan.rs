//! Install plans.
//!
//! A stack never touches the filesystem. It produces an [`InstallPlan`], an
//! ordered list of [`Operation`]s that the install service executes one by
//! one. Because the plan is plain data it can be printed for a dry run or
//! serialised as JSON.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    command::Invocation,
    manifest::DependencySection,
    package::{ComposerSource, PackageRequirement},
    paths::{ProjectPaths, StubRoot},
};

/// Environment passed to every composer run.
const COMPOSER_ENV: (&str, &str) = ("COMPOSER_MEMORY_LIMIT", "-1");

/// Selects files by extension, minus one excluded file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFilter {
    pub extension: String,
    pub except: Option<String>,
}

impl FileFilter {
    pub fn extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            except: None,
        }
    }

    pub fn except(mut self, file_name: impl Into<String>) -> Self {
        self.except = Some(file_name.into());
        self
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.except.as_deref() == Some(name) {
            return false;
        }
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }
}

/// A single step of an install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Install backend packages. A failure aborts the whole install.
    RequireBackend {
        packages: Vec<PackageRequirement>,
        invocation: Invocation,
    },
    /// Merge packages into a section of `package.json`. Skipped when the
    /// manifest is absent.
    MergeNodePackages {
        manifest: PathBuf,
        section: DependencySection,
        packages: Vec<PackageRequirement>,
    },
    /// Recursively copy a stub directory.
    CopyDirectory { from: PathBuf, to: PathBuf },
    /// Copy a single stub file.
    CopyFile { from: PathBuf, to: PathBuf },
    /// Add a middleware class after an anchor inside a kernel middleware group.
    InsertMiddleware {
        kernel: PathBuf,
        group: String,
        after: String,
        name: String,
    },
    /// Replace every literal occurrence of `search`.
    ReplaceInFile {
        path: PathBuf,
        search: String,
        replace: String,
    },
    /// Insert text right after every occurrence of `marker`.
    AppendAfterMarker {
        path: PathBuf,
        marker: String,
        addition: String,
    },
    /// Insert a whole line at a zero-based line index.
    InsertLine {
        path: PathBuf,
        index: usize,
        line: String,
    },
    RenameFile { from: PathBuf, to: PathBuf },
    /// Rename `from` to `to` when it exists, otherwise copy `fallback` to `to`.
    RenameOrCopy {
        from: PathBuf,
        to: PathBuf,
        fallback: PathBuf,
    },
    /// Remove `dark:` classes from matching files below `root`.
    StripDarkClasses { root: PathBuf, filter: FileFilter },
    /// Detect the Node package manager in `root`, then install and build.
    InstallNodeDependencies { root: PathBuf },
    /// A milestone message for the user.
    Notice { message: String },
}

impl Operation {
    /// One-line human description, with paths shown relative to their roots.
    pub fn describe(&self, paths: &ProjectPaths, stubs: &StubRoot) -> String {
        let p = |path: &Path| paths.display_relative(path);
        let s = |path: &Path| stubs.display_relative(path);

        match self {
            Self::RequireBackend { invocation, .. } => format!("run `{invocation}`"),
            Self::MergeNodePackages {
                manifest,
                section,
                packages,
            } => format!(
                "merge {} package(s) into {} of {}",
                packages.len(),
                section.key(),
                p(manifest)
            ),
            Self::CopyDirectory { from, to } => format!("copy dir  {} -> {}", s(from), p(to)),
            Self::CopyFile { from, to } => format!("copy file {} -> {}", s(from), p(to)),
            Self::InsertMiddleware {
                kernel,
                group,
                after,
                name,
            } => format!("insert {name} after {after} in '{group}' group of {}", p(kernel)),
            Self::ReplaceInFile {
                path,
                search,
                replace,
            } => format!("replace {search:?} with {replace:?} in {}", p(path)),
            Self::AppendAfterMarker {
                path,
                marker,
                addition,
            } => format!("append {addition:?} after {marker:?} in {}", p(path)),
            Self::InsertLine { path, index, line } => {
                format!("insert line {index} {line:?} into {}", p(path))
            }
            Self::RenameFile { from, to } => format!("rename {} -> {}", p(from), p(to)),
            Self::RenameOrCopy { from, to, fallback } => format!(
                "rename {} -> {} (or copy {})",
                p(from),
                p(to),
                s(fallback)
            ),
            Self::StripDarkClasses { root, filter } => match &filter.except {
                Some(except) => format!(
                    "strip dark classes from *.{} in {} (except {except})",
                    filter.extension,
                    p(root)
                ),
                None => format!(
                    "strip dark classes from *.{} in {}",
                    filter.extension,
                    p(root)
                ),
            },
            Self::InstallNodeDependencies { root } => {
                format!("install and build Node dependencies in {}", root.display())
            }
            Self::Notice { message } => format!("notice: {message}"),
        }
    }
}

/// Ordered list of operations for one stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    pub stack: String,
    pub operations: Vec<Operation>,
}

impl InstallPlan {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            operations: Vec::new(),
        }
    }

    pub fn push(&mut self, operation: Operation) -> &mut Self {
        self.operations.push(operation);
        self
    }

    pub fn require_backend(
        &mut self,
        paths: &ProjectPaths,
        composer: &ComposerSource,
        php: &str,
        packages: Vec<PackageRequirement>,
        dev: bool,
    ) -> &mut Self {
        let (program, prefix) = composer.command_prefix(php);
        let mut invocation = Invocation::new(program, paths.base())
            .args(prefix)
            .arg("require")
            .args(packages.iter().map(ToString::to_string))
            .env(COMPOSER_ENV.0, COMPOSER_ENV.1);
        if dev {
            invocation = invocation.arg("--dev");
        }
        self.push(Operation::RequireBackend {
            packages,
            invocation,
        })
    }

    pub fn merge_node_packages(
        &mut self,
        manifest: PathBuf,
        packages: Vec<PackageRequirement>,
        dev: bool,
    ) -> &mut Self {
        self.push(Operation::MergeNodePackages {
            manifest,
            section: DependencySection::for_dev(dev),
            packages,
        })
    }

    pub fn copy_dir(&mut self, from: PathBuf, to: PathBuf) -> &mut Self {
        self.push(Operation::CopyDirectory { from, to })
    }

    pub fn copy_file(&mut self, from: PathBuf, to: PathBuf) -> &mut Self {
        self.push(Operation::CopyFile { from, to })
    }

    pub fn insert_middleware(
        &mut self,
        kernel: PathBuf,
        group: &str,
        after: &str,
        name: &str,
    ) -> &mut Self {
        self.push(Operation::InsertMiddleware {
            kernel,
            group: group.into(),
            after: after.into(),
            name: name.into(),
        })
    }

    pub fn replace(&mut self, path: PathBuf, search: &str, replace: &str) -> &mut Self {
        self.push(Operation::ReplaceInFile {
            path,
            search: search.into(),
            replace: replace.into(),
        })
    }

    pub fn append_after(&mut self, path: PathBuf, marker: &str, addition: &str) -> &mut Self {
        self.push(Operation::AppendAfterMarker {
            path,
            marker: marker.into(),
            addition: addition.into(),
        })
    }

    pub fn insert_line(&mut self, path: PathBuf, index: usize, line: &str) -> &mut Self {
        self.push(Operation::InsertLine {
            path,
            index,
            line: line.into(),
        })
    }

    pub fn rename(&mut self, from: PathBuf, to: PathBuf) -> &mut Self {
        self.push(Operation::RenameFile { from, to })
    }

    pub fn rename_or_copy(&mut self, from: PathBuf, to: PathBuf, fallback: PathBuf) -> &mut Self {
        self.push(Operation::RenameOrCopy { from, to, fallback })
    }

    pub fn strip_dark_classes(&mut self, root: PathBuf, filter: FileFilter) -> &mut Self {
        self.push(Operation::StripDarkClasses { root, filter })
    }

    pub fn install_node_dependencies(&mut self, root: PathBuf) -> &mut Self {
        self.push(Operation::InstallNodeDependencies { root })
    }

    pub fn notice(&mut self, message: &str) -> &mut Self {
        self.push(Operation::Notice {
            message: message.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }
}
