//! Install Service - runs a stack's plan against a host project.
//!
//! The workflow is:
//! 1. Check the project directory exists
//! 2. Ask the stack for its plan
//! 3. Execute every operation in order through the ports
//!
//! Execution halts on the first fatal error. Nothing is rolled back.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, InstallObserver},
        stacks::Stack,
    },
    domain::{
        FileFilter, InstallOptions, InstallPlan, Invocation, Operation, PackageManager,
        ProjectPaths, StubRoot, merge_packages, patch,
    },
    error::{KilnError, KilnResult},
};

/// How the Node install/build step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "manager", rename_all = "snake_case")]
pub enum NodeOutcome {
    Built(PackageManager),
    InstallFailed(PackageManager),
    BuildFailed(PackageManager),
}

impl NodeOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Built(_))
    }

    pub fn manager(&self) -> PackageManager {
        match self {
            Self::Built(pm) | Self::InstallFailed(pm) | Self::BuildFailed(pm) => *pm,
        }
    }
}

/// Summary of an executed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub stack: String,
    /// Files created or rewritten, copies included.
    pub files_written: usize,
    pub patches_applied: usize,
    /// Patches whose anchor or search text was absent, plus skipped merges.
    pub patches_unchanged: usize,
    pub node: Option<NodeOutcome>,
}

/// Executes install plans.
pub struct InstallService {
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
}

impl InstallService {
    pub fn new(filesystem: Box<dyn Filesystem>, runner: Box<dyn CommandRunner>) -> Self {
        Self { filesystem, runner }
    }

    /// Build the plan for `stack` without executing it.
    pub fn plan(
        &self,
        stack: &dyn Stack,
        paths: &ProjectPaths,
        stubs: &StubRoot,
        options: &InstallOptions,
    ) -> KilnResult<InstallPlan> {
        if !self.filesystem.is_dir(paths.base()) {
            return Err(ApplicationError::ProjectNotFound {
                path: paths.base().to_path_buf(),
            }
            .into());
        }
        stack.plan(paths, stubs, options)
    }

    /// Plan and execute `stack` in one go.
    #[instrument(skip_all, fields(stack = stack.name(), project = %paths.base().display()))]
    pub fn install(
        &self,
        stack: &dyn Stack,
        paths: &ProjectPaths,
        stubs: &StubRoot,
        options: &InstallOptions,
        observer: &dyn InstallObserver,
    ) -> KilnResult<InstallReport> {
        let plan = self.plan(stack, paths, stubs, options)?;
        self.execute(&plan, observer)
    }

    /// Execute every operation of `plan` in order.
    #[instrument(skip_all, fields(stack = %plan.stack, operations = plan.len()))]
    pub fn execute(
        &self,
        plan: &InstallPlan,
        observer: &dyn InstallObserver,
    ) -> KilnResult<InstallReport> {
        let mut report = InstallReport {
            stack: plan.stack.clone(),
            ..InstallReport::default()
        };

        for operation in plan.iter() {
            self.apply(operation, observer, &mut report)?;
        }

        info!(
            files = report.files_written,
            applied = report.patches_applied,
            unchanged = report.patches_unchanged,
            "Install finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    fn apply(
        &self,
        operation: &Operation,
        observer: &dyn InstallObserver,
        report: &mut InstallReport,
    ) -> KilnResult<()> {
        match operation {
            Operation::RequireBackend { invocation, .. } => self.require_backend(invocation),
            Operation::MergeNodePackages {
                manifest,
                section,
                packages,
            } => {
                if !self.filesystem.exists(manifest) {
                    debug!(path = %manifest.display(), "No package.json, skipping merge");
                    report.patches_unchanged += 1;
                    return Ok(());
                }
                let source = self.filesystem.read_to_string(manifest)?;
                let merged = merge_packages(&source, *section, packages)?;
                self.filesystem.write_file(manifest, &merged)?;
                report.files_written += 1;
                report.patches_applied += 1;
                Ok(())
            }
            Operation::CopyDirectory { from, to } => self.copy_directory(from, to, report),
            Operation::CopyFile { from, to } => {
                self.ensure_stub(from)?;
                self.filesystem.copy_file(from, to)?;
                report.files_written += 1;
                Ok(())
            }
            Operation::InsertMiddleware {
                kernel,
                group,
                after,
                name,
            } => self.patch_file(kernel, report, |text| {
                patch::insert_middleware_after(text, group, after, name)
            }),
            Operation::ReplaceInFile {
                path,
                search,
                replace,
            } => self.patch_file(path, report, |text| {
                patch::replace_literal(text, search, replace)
            }),
            Operation::AppendAfterMarker {
                path,
                marker,
                addition,
            } => self.patch_file(path, report, |text| {
                patch::append_after_marker(text, marker, addition)
            }),
            Operation::InsertLine { path, index, line } => self.patch_file(path, report, |text| {
                Some(patch::insert_line(text, *index, line))
            }),
            Operation::RenameFile { from, to } => {
                self.filesystem.rename(from, to)?;
                Ok(())
            }
            Operation::RenameOrCopy { from, to, fallback } => {
                if self.filesystem.exists(from) {
                    self.filesystem.rename(from, to)?;
                } else {
                    self.ensure_stub(fallback)?;
                    self.filesystem.copy_file(fallback, to)?;
                    report.files_written += 1;
                }
                Ok(())
            }
            Operation::StripDarkClasses { root, filter } => {
                self.strip_dark_classes(root, filter, report)
            }
            Operation::InstallNodeDependencies { root } => {
                report.node = Some(self.install_node_dependencies(root, observer));
                Ok(())
            }
            Operation::Notice { message } => {
                observer.notice(message);
                Ok(())
            }
        }
    }

    #[instrument(skip_all, fields(command = %invocation))]
    fn require_backend(&self, invocation: &Invocation) -> KilnResult<()> {
        let status = self.runner.run(invocation)?;
        if !status.success() {
            return Err(ApplicationError::BackendInstallFailed {
                command: invocation.to_string(),
                status: describe_status(status.code),
            }
            .into());
        }
        info!("Backend packages installed");
        Ok(())
    }

    fn copy_directory(&self, from: &Path, to: &Path, report: &mut InstallReport) -> KilnResult<()> {
        if !self.filesystem.is_dir(from) {
            return Err(ApplicationError::StubMissing {
                path: from.to_path_buf(),
            }
            .into());
        }

        self.filesystem.create_dir_all(to)?;
        for file in self.filesystem.list_files(from)? {
            let relative = file.strip_prefix(from).map_err(|_| KilnError::Internal {
                message: format!("{} is not below {}", file.display(), from.display()),
            })?;
            self.filesystem.copy_file(&file, &to.join(relative))?;
            report.files_written += 1;
        }
        Ok(())
    }

    /// Read, transform, and write back a file. `None` from `change` leaves
    /// the file untouched.
    fn patch_file(
        &self,
        path: &Path,
        report: &mut InstallReport,
        change: impl FnOnce(&str) -> Option<String>,
    ) -> KilnResult<()> {
        let text = self.filesystem.read_to_string(path)?;
        match change(&text) {
            Some(patched) => {
                self.filesystem.write_file(path, &patched)?;
                report.files_written += 1;
                report.patches_applied += 1;
            }
            None => {
                debug!(path = %path.display(), "Patch anchor not found, file unchanged");
                report.patches_unchanged += 1;
            }
        }
        Ok(())
    }

    fn strip_dark_classes(
        &self,
        root: &Path,
        filter: &FileFilter,
        report: &mut InstallReport,
    ) -> KilnResult<()> {
        for file in self.filesystem.list_files(root)? {
            if !filter.matches(&file) {
                continue;
            }
            let text = self.filesystem.read_to_string(&file)?;
            let stripped = patch::strip_dark_classes(&text);
            if stripped != text {
                self.filesystem.write_file(&file, &stripped)?;
                report.files_written += 1;
            }
        }
        Ok(())
    }

    /// Install then build. Failures become warnings; the install carries on.
    #[instrument(skip_all, fields(root = %root.display()))]
    fn install_node_dependencies(&self, root: &Path, observer: &dyn InstallObserver) -> NodeOutcome {
        let manager = PackageManager::detect(root, |path| self.filesystem.exists(path));
        info!(manager = %manager, "Detected Node package manager");

        let install = Invocation::new(manager.as_str(), root).args(manager.install_args());
        if !self.run_node_step(&install, observer) {
            return NodeOutcome::InstallFailed(manager);
        }

        let build = Invocation::new(manager.as_str(), root).args(manager.build_args());
        if !self.run_node_step(&build, observer) {
            return NodeOutcome::BuildFailed(manager);
        }

        NodeOutcome::Built(manager)
    }

    fn run_node_step(&self, invocation: &Invocation, observer: &dyn InstallObserver) -> bool {
        let message = match self.runner.run(invocation) {
            Ok(status) if status.success() => return true,
            Ok(status) => format!("`{invocation}` exited with {}", describe_status(status.code)),
            Err(e) => e.to_string(),
        };
        warn!(command = %invocation, "{message}");
        observer.warning(&message);
        false
    }

    fn ensure_stub(&self, path: &Path) -> KilnResult<()> {
        if self.filesystem.exists(path) {
            Ok(())
        } else {
            Err(ApplicationError::StubMissing {
                path: path.to_path_buf(),
            }
            .into())
        }
    }
}

fn describe_status(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("status {c}"))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;
    use crate::{
        application::ports::{MockCommandRunner, MockFilesystem, SilentObserver},
        domain::{CommandStatus, ComposerSource, PackageRequirement},
    };

    #[derive(Default)]
    struct Recorder {
        notices: RefCell<Vec<String>>,
        warnings: RefCell<Vec<String>>,
    }

    impl InstallObserver for Recorder {
        fn notice(&self, message: &str) {
            self.notices.borrow_mut().push(message.into());
        }

        fn warning(&self, message: &str) {
            self.warnings.borrow_mut().push(message.into());
        }
    }

    fn service(fs: MockFilesystem, runner: MockCommandRunner) -> InstallService {
        InstallService::new(Box::new(fs), Box::new(runner))
    }

    fn backend_plan() -> InstallPlan {
        let mut plan = InstallPlan::new("test");
        plan.require_backend(
            &ProjectPaths::new("/app"),
            &ComposerSource::Global,
            "php",
            vec![PackageRequirement::new("laravel/sanctum", "^3.2")],
            false,
        )
        .copy_file("/stubs/a.php".into(), "/app/a.php".into());
        plan
    }

    #[test]
    fn backend_failure_stops_before_any_copy() {
        let mut fs = MockFilesystem::new();
        fs.expect_copy_file().never();
        fs.expect_write_file().never();

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandStatus::from_code(Some(1))));

        let err = service(fs, runner)
            .execute(&backend_plan(), &SilentObserver)
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::BackendInstallFailed { .. })
        ));
    }

    #[test]
    fn backend_spawn_error_is_fatal() {
        let mut fs = MockFilesystem::new();
        fs.expect_copy_file().never();

        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|inv| {
            Err(ApplicationError::CommandSpawn {
                command: inv.to_string(),
                reason: "not found".into(),
            }
            .into())
        });

        assert!(
            service(fs, runner)
                .execute(&backend_plan(), &SilentObserver)
                .is_err()
        );
    }

    #[test]
    fn missing_manifest_is_skipped() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_read_to_string().never();

        let mut plan = InstallPlan::new("test");
        plan.merge_node_packages(
            "/app/package.json".into(),
            vec![PackageRequirement::new("svelte", "^3.55.1")],
            true,
        );

        let report = service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap();
        assert_eq!(report.patches_unchanged, 1);
        assert_eq!(report.files_written, 0);
    }

    #[test]
    fn absent_search_text_leaves_file_alone() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("nothing to see".into()));
        fs.expect_write_file().never();

        let mut plan = InstallPlan::new("test");
        plan.replace("/app/routes/web.php".into(), "/home", "/dashboard");

        let report = service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap();
        assert_eq!(report.patches_unchanged, 1);
        assert_eq!(report.patches_applied, 0);
    }

    #[test]
    fn replacement_is_written_back() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("redirect('/home')".into()));
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("/app/routes/web.php") && content == "redirect('/dashboard')"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut plan = InstallPlan::new("test");
        plan.replace("/app/routes/web.php".into(), "/home", "/dashboard");

        let report = service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap();
        assert_eq!(report.patches_applied, 1);
    }

    #[test]
    fn missing_stub_directory_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| false);

        let mut plan = InstallPlan::new("test");
        plan.copy_dir("/stubs/missing".into(), "/app/dest".into());

        let err = service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::StubMissing { .. })
        ));
    }

    #[test]
    fn directory_copy_keeps_relative_layout() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_list_files().returning(|_| {
            Ok(vec![
                PathBuf::from("/stubs/Pages/Auth/Login.svelte"),
                PathBuf::from("/stubs/Pages/Welcome.svelte"),
            ])
        });
        fs.expect_copy_file()
            .withf(|_, to| to == Path::new("/app/Pages/Auth/Login.svelte"))
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_copy_file()
            .withf(|_, to| to == Path::new("/app/Pages/Welcome.svelte"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut plan = InstallPlan::new("test");
        plan.copy_dir("/stubs/Pages".into(), "/app/Pages".into());

        let report = service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap();
        assert_eq!(report.files_written, 2);
    }

    #[test]
    fn rename_or_copy_falls_back_to_stub() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/app/postcss.config.js"))
            .returning(|_| false);
        fs.expect_exists()
            .withf(|p| p == Path::new("/stubs/postcss.config.cjs"))
            .returning(|_| true);
        fs.expect_rename().never();
        fs.expect_copy_file().times(1).returning(|_, _| Ok(()));

        let mut plan = InstallPlan::new("test");
        plan.rename_or_copy(
            "/app/postcss.config.js".into(),
            "/app/postcss.config.cjs".into(),
            "/stubs/postcss.config.cjs".into(),
        );

        service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap();
    }

    #[test]
    fn dark_classes_stripped_only_from_matching_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_list_files().returning(|_| {
            Ok(vec![
                PathBuf::from("/app/js/Pages/Welcome.svelte"),
                PathBuf::from("/app/js/Components/Button.svelte"),
                PathBuf::from("/app/js/app.js"),
            ])
        });
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/app/js/Components/Button.svelte"))
            .times(1)
            .returning(|_| Ok(r#"<b class="bg-white dark:bg-gray-800">"#.into()));
        fs.expect_write_file()
            .withf(|_, content| content == r#"<b class="bg-white">"#)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut plan = InstallPlan::new("test");
        plan.strip_dark_classes(
            "/app/js".into(),
            FileFilter::extension("svelte").except("Welcome.svelte"),
        );

        service(fs, MockCommandRunner::new())
            .execute(&plan, &SilentObserver)
            .unwrap();
    }

    #[test]
    fn node_install_failure_skips_build_and_warns() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/app/pnpm-lock.yaml"));

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|inv| inv.program == "pnpm" && inv.args == ["install"])
            .times(1)
            .returning(|_| Ok(CommandStatus::from_code(Some(1))));
        runner
            .expect_run()
            .withf(|inv| inv.args == ["run", "build"])
            .never();

        let mut plan = InstallPlan::new("test");
        plan.install_node_dependencies("/app".into());

        let recorder = Recorder::default();
        let report = service(fs, runner).execute(&plan, &recorder).unwrap();
        assert_eq!(
            report.node,
            Some(NodeOutcome::InstallFailed(PackageManager::Pnpm))
        );
        assert_eq!(recorder.warnings.borrow().len(), 1);
    }

    #[test]
    fn node_build_runs_after_install() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|_| Ok(CommandStatus::SUCCESS));

        let mut plan = InstallPlan::new("test");
        plan.install_node_dependencies("/app".into());

        let report = service(fs, runner).execute(&plan, &SilentObserver).unwrap();
        assert_eq!(report.node, Some(NodeOutcome::Built(PackageManager::Npm)));
    }

    #[test]
    fn notices_reach_the_observer() {
        let mut plan = InstallPlan::new("test");
        plan.notice("one").notice("two");

        let recorder = Recorder::default();
        service(MockFilesystem::new(), MockCommandRunner::new())
            .execute(&plan, &recorder)
            .unwrap();
        assert_eq!(*recorder.notices.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn missing_project_directory_is_rejected() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| false);

        let err = service(fs, MockCommandRunner::new())
            .plan(
                &crate::application::stacks::InertiaSvelte,
                &ProjectPaths::new("/nowhere"),
                &StubRoot::new("/stubs"),
                &InstallOptions::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ProjectNotFound { .. })
        ));
    }
}
