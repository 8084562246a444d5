//! Plan fragments shared by every stack.

use crate::{
    domain::{InstallOptions, InstallPlan, PackageRequirement, ProjectPaths, StubRoot},
    error::KilnResult,
};

/// Stub set holding files every stack uses.
pub const DEFAULT_STUBS: &str = "default";

/// Printed before the Node install/build step.
pub const NODE_NOTICE: &str = "Installing and building Node dependencies.";

/// Printed once the plan has run to the end.
pub const SUCCESS_NOTICE: &str = "Scaffolding installed successfully.";

const PEST_PACKAGES: [&str; 2] = ["pestphp/pest:^1.22", "pestphp/pest-plugin-laravel:^1.2"];

/// Parse a fixed list of `name:constraint` strings.
pub fn requirements(specs: &[&str]) -> KilnResult<Vec<PackageRequirement>> {
    specs
        .iter()
        .map(|spec| spec.parse::<PackageRequirement>().map_err(Into::into))
        .collect()
}

/// Feature tests: PHPUnit by default, the Pest suite when requested.
pub fn install_tests(
    plan: &mut InstallPlan,
    paths: &ProjectPaths,
    stubs: &StubRoot,
    options: &InstallOptions,
) -> KilnResult<()> {
    if options.pest {
        plan.require_backend(
            paths,
            &options.composer,
            &options.php,
            requirements(&PEST_PACKAGES)?,
            true,
        );
        plan.copy_dir(
            stubs.stub(DEFAULT_STUBS, "pest-tests/Feature"),
            paths.base_path("tests/Feature"),
        )
        .copy_dir(
            stubs.stub(DEFAULT_STUBS, "pest-tests/Unit"),
            paths.base_path("tests/Unit"),
        )
        .copy_file(
            stubs.stub(DEFAULT_STUBS, "pest-tests/Pest.php"),
            paths.base_path("tests/Pest.php"),
        );
    } else {
        plan.copy_dir(
            stubs.stub(DEFAULT_STUBS, "tests/Feature"),
            paths.base_path("tests/Feature"),
        );
    }
    Ok(())
}

/// Detect the Node package manager, install, then build.
pub fn install_node_dependencies(plan: &mut InstallPlan, paths: &ProjectPaths) {
    plan.notice(NODE_NOTICE)
        .install_node_dependencies(paths.base().to_path_buf());
}
