//! Stack definitions.
//!
//! A stack turns project paths, the stub root, and install options into an
//! [`InstallPlan`]. Stacks share plan fragments through [`common`] instead of
//! inheriting from each other.

pub mod common;
pub mod svelte;

use crate::{
    domain::{DomainError, InstallOptions, InstallPlan, ProjectPaths, StubRoot},
    error::KilnResult,
};

pub use svelte::InertiaSvelte;

/// A frontend stack that can be installed into a host application.
pub trait Stack: Send + Sync {
    /// Name used on the command line.
    fn name(&self) -> &'static str;

    /// One-line summary for listings.
    fn description(&self) -> &'static str;

    /// Build the ordered plan for this stack.
    fn plan(
        &self,
        paths: &ProjectPaths,
        stubs: &StubRoot,
        options: &InstallOptions,
    ) -> KilnResult<InstallPlan>;
}

/// Every stack this build knows about.
pub fn registry() -> Vec<Box<dyn Stack>> {
    vec![Box::new(InertiaSvelte)]
}

/// Look a stack up by name (case-insensitive).
pub fn find(name: &str) -> KilnResult<Box<dyn Stack>> {
    let wanted = name.to_ascii_lowercase();
    let mut stacks = registry();
    let available: Vec<&'static str> = stacks.iter().map(|s| s.name()).collect();

    match stacks.iter().position(|s| s.name() == wanted) {
        Some(index) => Ok(stacks.swap_remove(index)),
        None => Err(DomainError::UnknownStack {
            name: name.into(),
            available,
        }
        .into()),
    }
}
