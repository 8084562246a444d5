//! `package.json` dependency merging.
//!
//! The manifest is parsed as an order-preserving JSON object. Only the
//! targeted dependency section is rebuilt; every other key keeps its position.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::domain::{error::DomainError, package::PackageRequirement};

/// Which dependency section of the manifest to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
}

impl DependencySection {
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        }
    }

    pub const fn for_dev(dev: bool) -> Self {
        if dev {
            Self::DevDependencies
        } else {
            Self::Dependencies
        }
    }
}

/// Merge `packages` into `section` of the manifest `source`.
///
/// New entries win over existing entries with the same name. The section is
/// sorted by package name, and the document is re-encoded with four-space
/// indentation, unescaped slashes, `\uXXXX` escapes for non-ASCII text, and a
/// trailing newline.
pub fn merge_packages(
    source: &str,
    section: DependencySection,
    packages: &[PackageRequirement],
) -> Result<String, DomainError> {
    let mut document: Map<String, Value> =
        serde_json::from_str(source).map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })?;

    let mut merged: BTreeMap<String, Value> = match document.get(section.key()) {
        None => BTreeMap::new(),
        Some(Value::Object(existing)) => existing
            .iter()
            .map(|(name, constraint)| (name.clone(), constraint.clone()))
            .collect(),
        Some(_) => {
            return Err(DomainError::ManifestFieldNotObject {
                field: section.key().into(),
            });
        }
    };

    for package in packages {
        merged.insert(
            package.name.clone(),
            Value::String(package.constraint.clone()),
        );
    }

    document.insert(
        section.key().into(),
        Value::Object(merged.into_iter().collect()),
    );

    encode(&document)
}

fn encode(document: &Map<String, Value>) -> Result<String, DomainError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })?;

    let encoded = String::from_utf8(buffer).map_err(|e| DomainError::InvalidManifest {
        reason: e.to_string(),
    })?;
    let mut out = escape_non_ascii(&encoded);
    out.push('\n');
    Ok(out)
}

/// Escape every non-ASCII character as lowercase `\uXXXX` UTF-16 units.
///
/// JSON structure is pure ASCII, so anything outside it sits inside a string.
fn escape_non_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len() + 16);
    let mut units = [0u16; 2];
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, constraint: &str) -> PackageRequirement {
        PackageRequirement::new(name, constraint)
    }

    #[test]
    fn new_versions_win_and_existing_entries_survive() {
        let source = r#"{
    "private": true,
    "devDependencies": {
        "vite": "^4.0.0",
        "svelte": "^3.0.0"
    }
}"#;
        let out = merge_packages(
            source,
            DependencySection::DevDependencies,
            &[req("svelte", "^3.55.1"), req("tailwindcss", "^3.2.1")],
        )
        .unwrap();

        let parsed: Value = serde_json::from_str(&out).unwrap();
        let dev = &parsed["devDependencies"];
        assert_eq!(dev["svelte"], "^3.55.1");
        assert_eq!(dev["tailwindcss"], "^3.2.1");
        assert_eq!(dev["vite"], "^4.0.0");
    }

    #[test]
    fn section_is_sorted_and_top_level_order_kept() {
        let source = r#"{"scripts": {"build": "vite build"}, "private": true}"#;
        let out = merge_packages(
            source,
            DependencySection::DevDependencies,
            &[req("vite", "^4.0.0"), req("@inertiajs/svelte", "^1.0.0")],
        )
        .unwrap();

        let scripts = out.find("\"scripts\"").unwrap();
        let private = out.find("\"private\"").unwrap();
        let dev = out.find("\"devDependencies\"").unwrap();
        assert!(scripts < private && private < dev);

        let inertia = out.find("@inertiajs/svelte").unwrap();
        let vite = out.find("\"vite\"").unwrap();
        assert!(inertia < vite);
    }

    #[test]
    fn output_uses_four_space_indent_unescaped_slashes_and_newline() {
        let out = merge_packages(
            "{}",
            DependencySection::DevDependencies,
            &[req("@sveltejs/vite-plugin-svelte", "^2.0.2")],
        )
        .unwrap();

        assert_eq!(
            out,
            "{\n    \"devDependencies\": {\n        \"@sveltejs/vite-plugin-svelte\": \"^2.0.2\"\n    }\n}\n"
        );
    }

    #[test]
    fn non_ascii_text_is_escaped() {
        let source = "{\"description\": \"café 🎨\", \"private\": true}";
        let out = merge_packages(source, DependencySection::Dependencies, &[]).unwrap();

        assert!(out.is_ascii());
        assert!(out.contains(r#""description": "caf\u00e9 \ud83c\udfa8""#));

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["description"], "café 🎨");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            merge_packages("{", DependencySection::DevDependencies, &[]),
            Err(DomainError::InvalidManifest { .. })
        ));
    }

    #[test]
    fn non_object_section_is_rejected() {
        assert!(matches!(
            merge_packages(
                r#"{"dependencies": []}"#,
                DependencySection::Dependencies,
                &[]
            ),
            Err(DomainError::ManifestFieldNotObject { .. })
        ));
    }
}
