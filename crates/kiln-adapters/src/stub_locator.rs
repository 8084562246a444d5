//! Stub tree discovery.
//!
//! Stubs are searched in this priority order, stopping at the first
//! directory that exists:
//!
//! 1. **Configured path** (`stubs.path` in the config file). When set it must
//!    exist; there is no fallback.
//! 2. **`$KILN_STUBS_DIR`**, the environment override.
//! 3. **`<executable-dir>/stubs`**, next to the `kiln` binary.
//! 4. **`./stubs`**, relative to the working directory.
//! 5. **The workspace `stubs/` directory** recorded at compile time, so
//!    `cargo run` and the test suite work from any directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use kiln_core::{application::ApplicationError, domain::StubRoot, error::KilnResult};

/// Environment variable naming a stub directory.
pub const STUBS_ENV: &str = "KILN_STUBS_DIR";

/// Stub directory of the source tree this binary was built from.
pub const BUNDLED_STUBS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../stubs");

/// Find the stub root, honouring an explicitly configured path first.
#[instrument(skip_all)]
pub fn locate_stubs(configured: Option<&Path>) -> KilnResult<StubRoot> {
    if let Some(path) = configured {
        return if path.is_dir() {
            info!(path = %path.display(), "using configured stubs");
            Ok(StubRoot::new(path))
        } else {
            Err(ApplicationError::StubMissing {
                path: path.to_path_buf(),
            }
            .into())
        };
    }

    first_existing(candidate_paths()).ok_or_else(|| {
        ApplicationError::StubMissing {
            path: PathBuf::from("stubs"),
        }
        .into()
    })
}

/// Ordered candidates after the configured path. Unset env vars and
/// unresolvable exe paths are omitted.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Ok(env_dir) = std::env::var(STUBS_ENV) {
        paths.push(PathBuf::from(env_dir));
    }

    if let Some(exe_sibling) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("stubs")))
    {
        paths.push(exe_sibling);
    }

    paths.push(PathBuf::from("stubs"));
    paths.push(PathBuf::from(BUNDLED_STUBS));
    paths
}

fn first_existing(candidates: Vec<PathBuf>) -> Option<StubRoot> {
    candidates.into_iter().find_map(|candidate| {
        if candidate.is_dir() {
            info!(path = %candidate.display(), "stubs found");
            Some(StubRoot::new(candidate))
        } else {
            debug!(path = %candidate.display(), "no stubs here, skipping");
            None
        }
    })
}
