//! Inertia + Svelte stack.

use tracing::instrument;

use crate::{
    application::stacks::{
        Stack,
        common::{self, DEFAULT_STUBS, SUCCESS_NOTICE},
    },
    domain::{FileFilter, InstallOptions, InstallPlan, ProjectPaths, StubRoot},
    error::KilnResult,
};

const COMMON_STUBS: &str = "inertia-common";
const SVELTE_STUBS: &str = "inertia-svelte";

const BACKEND_PACKAGES: [&str; 3] = [
    "inertiajs/inertia-laravel:^0.6.8",
    "laravel/sanctum:^3.2",
    "tightenco/ziggy:^1.0",
];

const NODE_PACKAGES: [&str; 7] = [
    "@inertiajs/svelte:^1.0.0",
    "@tailwindcss/forms:^0.5.3",
    "@sveltejs/vite-plugin-svelte:^2.0.2",
    "autoprefixer:^10.4.12",
    "postcss:^8.4.18",
    "tailwindcss:^3.2.1",
    "svelte:^3.55.1",
];

const SUBSTITUTE_BINDINGS: &str = "SubstituteBindings::class";
const HANDLE_INERTIA_REQUESTS: &str = "\\App\\Http\\Middleware\\HandleInertiaRequests::class";
const ADD_LINK_HEADERS: &str =
    "\\Illuminate\\Http\\Middleware\\AddLinkHeadersForPreloadedAssets::class";

const VITE_INPUT: &str = "input: 'resources/js/app.js',";
const VITE_SSR_INPUT: &str = "\n            ssr: 'resources/js/ssr.js',";

/// Inertia with Svelte components, Tailwind, Vite, and Ziggy.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertiaSvelte;

impl Stack for InertiaSvelte {
    fn name(&self) -> &'static str {
        "svelte"
    }

    fn description(&self) -> &'static str {
        "Inertia + Svelte with Tailwind CSS and Vite"
    }

    #[instrument(skip_all, fields(stack = "svelte", dark = options.dark, ssr = options.ssr))]
    fn plan(
        &self,
        paths: &ProjectPaths,
        stubs: &StubRoot,
        options: &InstallOptions,
    ) -> KilnResult<InstallPlan> {
        let mut plan = InstallPlan::new(self.name());
        let common_stub = |rel: &str| stubs.stub(COMMON_STUBS, rel);
        let svelte_stub = |rel: &str| stubs.stub(SVELTE_STUBS, rel);
        let default_stub = |rel: &str| stubs.stub(DEFAULT_STUBS, rel);

        // Inertia
        plan.require_backend(
            paths,
            &options.composer,
            &options.php,
            common::requirements(&BACKEND_PACKAGES)?,
            false,
        );

        // NPM packages
        plan.merge_node_packages(
            paths.base_path("package.json"),
            common::requirements(&NODE_PACKAGES)?,
            true,
        );

        // Controllers and requests
        plan.copy_dir(
            common_stub("app/Http/Controllers"),
            paths.app_path("Http/Controllers"),
        )
        .copy_dir(
            default_stub("app/Http/Requests"),
            paths.app_path("Http/Requests"),
        );

        // Middleware
        let kernel = paths.app_path("Http/Kernel.php");
        plan.insert_middleware(kernel.clone(), "web", SUBSTITUTE_BINDINGS, HANDLE_INERTIA_REQUESTS)
            .insert_middleware(kernel, "web", HANDLE_INERTIA_REQUESTS, ADD_LINK_HEADERS)
            .copy_file(
                common_stub("app/Http/Middleware/HandleInertiaRequests.php"),
                paths.app_path("Http/Middleware/HandleInertiaRequests.php"),
            );

        // Views, components, layouts, pages
        plan.copy_file(
            svelte_stub("resources/views/app.blade.php"),
            paths.resource_path("views/app.blade.php"),
        );
        for dir in ["Components", "Layouts", "Pages"] {
            plan.copy_dir(
                svelte_stub(&format!("resources/js/{dir}")),
                paths.resource_path(format!("js/{dir}")),
            );
        }

        if !options.dark {
            plan.strip_dark_classes(
                paths.resource_path("js"),
                FileFilter::extension("svelte").except("Welcome.svelte"),
            );
        }

        // Tests
        common::install_tests(&mut plan, paths, stubs, options)?;
        plan.copy_dir(
            common_stub("tests/Feature"),
            paths.base_path("tests/Feature"),
        );

        // Routes
        plan.copy_file(common_stub("routes/web.php"), paths.base_path("routes/web.php"))
            .copy_file(common_stub("routes/auth.php"), paths.base_path("routes/auth.php"));

        // "Dashboard" route
        let welcome = paths.resource_path("js/Pages/Welcome.svelte");
        plan.replace(welcome.clone(), "/home", "/dashboard")
            .replace(welcome, "Home", "Dashboard")
            .replace(
                paths.app_path("Providers/RouteServiceProvider.php"),
                "/home",
                "/dashboard",
            );

        // Tailwind, Vite, Ziggy
        plan.copy_file(
            default_stub("resources/css/app.css"),
            paths.resource_path("css/app.css"),
        )
        .copy_file(
            default_stub("postcss.config.js"),
            paths.base_path("postcss.config.js"),
        )
        .copy_file(
            common_stub("tailwind.config.js"),
            paths.base_path("tailwind.config.js"),
        )
        .copy_file(common_stub("jsconfig.json"), paths.base_path("jsconfig.json"))
        .copy_file(svelte_stub("vite.config.js"), paths.base_path("vite.config.js"))
        .copy_file(
            svelte_stub("resources/js/app.js"),
            paths.resource_path("js/app.js"),
        )
        .copy_file(
            svelte_stub("resources/js/ziggy.js"),
            paths.resource_path("js/ziggy.js"),
        );

        plan.rename(
            paths.base_path("tailwind.config.js"),
            paths.base_path("tailwind.config.cjs"),
        )
        .replace(paths.base_path("tailwind.config.cjs"), ".vue", ".svelte");

        // ES modules
        plan.insert_line(paths.base_path("package.json"), 1, "    \"type\": \"module\",")
            .rename_or_copy(
                paths.base_path("postcss.config.js"),
                paths.base_path("postcss.config.cjs"),
                svelte_stub("postcss.config.cjs"),
            );

        if options.ssr {
            plan_ssr(&mut plan, paths, stubs);
        }

        common::install_node_dependencies(&mut plan, paths);
        plan.notice(SUCCESS_NOTICE);

        Ok(plan)
    }
}

/// Server-side rendering entry point, build config, and ignore rule.
fn plan_ssr(plan: &mut InstallPlan, paths: &ProjectPaths, stubs: &StubRoot) {
    plan.copy_file(
        stubs.stub(SVELTE_STUBS, "resources/js/ssr.js"),
        paths.resource_path("js/ssr.js"),
    )
    .append_after(paths.base_path("vite.config.js"), VITE_INPUT, VITE_SSR_INPUT)
    .append_after(
        paths.base_path("package.json"),
        "vite build",
        " && vite build --ssr",
    )
    .replace(
        paths.base_path(".gitignore"),
        "/node_modules",
        "/bootstrap/ssr\n/node_modules",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComposerSource, Operation};

    fn plan_with(options: InstallOptions) -> InstallPlan {
        InertiaSvelte
            .plan(
                &ProjectPaths::new("/app"),
                &StubRoot::new("/stubs"),
                &options,
            )
            .unwrap()
    }

    fn has_dark_strip(plan: &InstallPlan) -> bool {
        plan.iter()
            .any(|op| matches!(op, Operation::StripDarkClasses { .. }))
    }

    #[test]
    fn backend_install_comes_first() {
        let plan = plan_with(InstallOptions::new());
        match &plan.operations[0] {
            Operation::RequireBackend { packages, invocation } => {
                assert_eq!(packages.len(), 3);
                assert_eq!(invocation.program, "composer");
                assert!(!invocation.args.contains(&"--dev".to_string()));
            }
            other => panic!("unexpected first operation: {other:?}"),
        }
    }

    #[test]
    fn node_packages_go_to_dev_dependencies() {
        let plan = plan_with(InstallOptions::new());
        match &plan.operations[1] {
            Operation::MergeNodePackages {
                section, packages, ..
            } => {
                assert_eq!(section.key(), "devDependencies");
                assert!(packages.iter().any(|p| p.name == "@inertiajs/svelte"));
            }
            other => panic!("unexpected second operation: {other:?}"),
        }
    }

    #[test]
    fn dark_flag_skips_class_stripping() {
        assert!(has_dark_strip(&plan_with(InstallOptions::new())));
        assert!(!has_dark_strip(&plan_with(InstallOptions::new().dark(true))));
    }

    #[test]
    fn ssr_flag_adds_entry_point_and_patches() {
        let without = plan_with(InstallOptions::new());
        let with = plan_with(InstallOptions::new().ssr(true));
        assert_eq!(with.len(), without.len() + 4);

        assert!(with.iter().any(|op| matches!(
            op,
            Operation::CopyFile { to, .. } if to.ends_with("js/ssr.js")
        )));
        assert!(with.iter().any(|op| matches!(
            op,
            Operation::ReplaceInFile { path, .. } if path.ends_with(".gitignore")
        )));
    }

    #[test]
    fn phar_composer_is_used_for_backend() {
        let plan = plan_with(
            InstallOptions::new()
                .composer(ComposerSource::parse("/opt/composer.phar"))
                .php("php8.1"),
        );
        let Operation::RequireBackend { invocation, .. } = &plan.operations[0] else {
            panic!("expected RequireBackend");
        };
        assert_eq!(invocation.program, "php8.1");
        assert_eq!(invocation.args[0], "/opt/composer.phar");
    }

    #[test]
    fn plan_ends_with_node_build_and_success_notice() {
        let plan = plan_with(InstallOptions::new());
        let tail: Vec<_> = plan.operations.iter().rev().take(2).collect();
        assert_eq!(
            tail[0],
            &Operation::Notice {
                message: SUCCESS_NOTICE.into()
            }
        );
        assert!(matches!(tail[1], Operation::InstallNodeDependencies { .. }));
    }

    #[test]
    fn tailwind_config_is_renamed_before_patch() {
        let plan = plan_with(InstallOptions::new());
        let rename = plan
            .iter()
            .position(|op| matches!(op, Operation::RenameFile { to, .. } if to.ends_with("tailwind.config.cjs")))
            .unwrap();
        let patch = plan
            .iter()
            .position(|op| matches!(op, Operation::ReplaceInFile { path, search, .. } if path.ends_with("tailwind.config.cjs") && search == ".vue"))
            .unwrap();
        assert!(rename < patch);
    }
}
