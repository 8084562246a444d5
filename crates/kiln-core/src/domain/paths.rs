//! Path roots for the host project and the bundled stub tree.
//!
//! Every root is resolved once at startup and handed to the stack that builds
//! the plan. Nothing in the core looks paths up from ambient state.

use std::path::{Path, PathBuf};

/// Roots of the host application.
///
/// `app` and `resources` default to `base/app` and `base/resources`, the
/// layout the host framework expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    base: PathBuf,
    app: PathBuf,
    resources: PathBuf,
}

impl ProjectPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            app: base.join("app"),
            resources: base.join("resources"),
            base,
        }
    }

    /// Override the resources directory.
    pub fn with_resources_dir(mut self, resources: impl Into<PathBuf>) -> Self {
        self.resources = resources.into();
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn base_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.base.join(rel)
    }

    pub fn app_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.app.join(rel)
    }

    pub fn resource_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.resources.join(rel)
    }

    /// Render `path` relative to the project base when possible.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.base)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Root of the bundled stub tree (`stubs/<set>/...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRoot(PathBuf);

impl StubRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Path of `rel` inside the stub set `set` (e.g. `inertia-svelte`).
    pub fn stub(&self, set: &str, rel: impl AsRef<Path>) -> PathBuf {
        self.0.join(set).join(rel)
    }

    /// Render `path` relative to the stub root when possible.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.0)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_derive_from_base() {
        let paths = ProjectPaths::new("/srv/app");
        assert_eq!(
            paths.app_path("Http/Kernel.php"),
            PathBuf::from("/srv/app/app/Http/Kernel.php")
        );
        assert_eq!(
            paths.resource_path("js/app.js"),
            PathBuf::from("/srv/app/resources/js/app.js")
        );
        assert_eq!(
            paths.base_path("package.json"),
            PathBuf::from("/srv/app/package.json")
        );
    }

    #[test]
    fn overridden_roots_are_used() {
        let paths = ProjectPaths::new("/srv/app").with_resources_dir("/srv/res");
        assert_eq!(
            paths.resource_path("css/app.css"),
            PathBuf::from("/srv/res/css/app.css")
        );
    }

    #[test]
    fn display_relative_strips_base() {
        let paths = ProjectPaths::new("/srv/app");
        let shown = paths.display_relative(Path::new("/srv/app/routes/web.php"));
        assert_eq!(shown, PathBuf::from("routes/web.php").display().to_string());
    }

    #[test]
    fn stub_paths_are_namespaced_by_set() {
        let stubs = StubRoot::new("/opt/kiln/stubs");
        assert_eq!(
            stubs.stub("inertia-svelte", "vite.config.js"),
            PathBuf::from("/opt/kiln/stubs/inertia-svelte/vite.config.js")
        );
    }
}
