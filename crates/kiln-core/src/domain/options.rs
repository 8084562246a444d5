use serde::{Deserialize, Serialize};

use crate::domain::package::ComposerSource;

/// Flags that gate optional install steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    /// Keep `dark:` utility classes in the copied components.
    pub dark: bool,
    /// Provision server-side rendering support.
    pub ssr: bool,
    /// Install the Pest test suite instead of PHPUnit feature tests.
    pub pest: bool,
    /// Backend package installer.
    pub composer: ComposerSource,
    /// PHP binary used when `composer` is a phar.
    pub php: String,
}

impl InstallOptions {
    pub fn new() -> Self {
        Self {
            php: "php".into(),
            ..Self::default()
        }
    }

    pub fn dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    pub fn ssr(mut self, ssr: bool) -> Self {
        self.ssr = ssr;
        self
    }

    pub fn pest(mut self, pest: bool) -> Self {
        self.pest = pest;
        self
    }

    pub fn composer(mut self, composer: ComposerSource) -> Self {
        self.composer = composer;
        self
    }

    pub fn php(mut self, php: impl Into<String>) -> Self {
        self.php = php.into();
        self
    }
}
