//! Named text patches.
//!
//! Every patch is a pure function over an in-memory buffer. Patches that find
//! nothing to change return `None` (or `false`) so the caller can leave the
//! file byte-identical and skip the write entirely.

use std::sync::OnceLock;

use regex::Regex;

/// Indentation used for entries inside a kernel middleware group.
const MIDDLEWARE_INDENT: &str = "            ";

/// Replace every literal occurrence of `search` with `replace`.
///
/// Returns `None` when `search` is empty or absent.
pub fn replace_literal(text: &str, search: &str, replace: &str) -> Option<String> {
    if search.is_empty() || !text.contains(search) {
        return None;
    }
    Some(text.replace(search, replace))
}

/// Insert `addition` directly after every occurrence of `marker`.
pub fn append_after_marker(text: &str, marker: &str, addition: &str) -> Option<String> {
    replace_literal(text, marker, &format!("{marker}{addition}"))
}

/// Insert `line` so that it becomes line number `index` (zero-based).
///
/// The buffer is split on `\n` and joined back with `\n`, so every other byte
/// is preserved. `index` past the end appends.
pub fn insert_line(text: &str, index: usize, line: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let index = index.min(lines.len());
    lines.insert(index, line);
    lines.join("\n")
}

/// Insert `entry` immediately after the first item matching `is_anchor`.
///
/// Returns `false`, leaving `list` untouched, when nothing matches.
pub fn insert_after<T>(list: &mut Vec<T>, is_anchor: impl Fn(&T) -> bool, entry: T) -> bool {
    match list.iter().position(is_anchor) {
        Some(pos) => {
            list.insert(pos + 1, entry);
            true
        }
        None => false,
    }
}

/// Insert a middleware class into a group of an HTTP kernel source file.
///
/// Looks for `$middlewareGroups = [ ... ];`, then `'<group>' => [ ... ],`
/// inside it, and adds `<indent><name>,` on the line after the first line of
/// that group containing `<after>,`.
///
/// Returns `None` when the groups block, the group, or the anchor is missing,
/// or when the group already lists `name`.
pub fn insert_middleware_after(
    kernel: &str,
    group: &str,
    after: &str,
    name: &str,
) -> Option<String> {
    let (groups_start, groups_end) = section(kernel, 0, "$middlewareGroups = [", "];")?;
    let group_marker = format!("'{group}' => [");
    let (group_start, group_end) = section(kernel, groups_start, &group_marker, "],")?;
    if group_start > groups_end {
        return None;
    }
    let group_end = group_end.min(groups_end);

    let body = &kernel[group_start..group_end];
    if body.contains(name) {
        return None;
    }

    let anchor = format!("{after},");
    let entry = format!("{MIDDLEWARE_INDENT}{name},");
    let mut lines: Vec<&str> = body.split('\n').collect();
    if !insert_after(&mut lines, |line| line.contains(&anchor), entry.as_str()) {
        return None;
    }
    let patched = lines.join("\n");

    let mut out = String::with_capacity(kernel.len() + name.len() + MIDDLEWARE_INDENT.len() + 2);
    out.push_str(&kernel[..group_start]);
    out.push_str(&patched);
    out.push_str(&kernel[group_end..]);
    Some(out)
}

/// Remove `dark:` utility classes from markup.
///
/// Each class is removed together with the whitespace character before it.
pub fn strip_dark_classes(text: &str) -> String {
    dark_class_pattern().replace_all(text, "").into_owned()
}

fn dark_class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"\sdark:[^\s"']+"#).expect("dark class pattern compiles"))
}

/// Byte range between `open` and the next `close`, searching from `from`.
///
/// A missing `close` extends the range to the end of `text`.
fn section(text: &str, from: usize, open: &str, close: &str) -> Option<(usize, usize)> {
    let start = from + text[from..].find(open)? + open.len();
    let end = text[start..]
        .find(close)
        .map_or(text.len(), |offset| start + offset);
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KERNEL: &str = r#"<?php

class Kernel extends HttpKernel
{
    protected $middleware = [
        \App\Http\Middleware\TrustProxies::class,
    ];

    protected $middlewareGroups = [
        'web' => [
            \App\Http\Middleware\EncryptCookies::class,
            \Illuminate\Routing\Middleware\SubstituteBindings::class,
        ],

        'api' => [
            \Illuminate\Routing\Middleware\SubstituteBindings::class,
        ],
    ];
}
"#;

    // ── replace_literal ───────────────────────────────────────────────────

    #[test]
    fn replace_literal_replaces_all_occurrences() {
        let out = replace_literal("/home and /home", "/home", "/dashboard").unwrap();
        assert_eq!(out, "/dashboard and /dashboard");
    }

    #[test]
    fn replace_literal_absent_is_none() {
        assert_eq!(replace_literal("nothing here", "/home", "/dashboard"), None);
    }

    #[test]
    fn replace_literal_empty_search_is_none() {
        assert_eq!(replace_literal("abc", "", "x"), None);
    }

    // ── append_after_marker ───────────────────────────────────────────────

    #[test]
    fn append_after_marker_keeps_marker() {
        let out = append_after_marker(r#""build": "vite build""#, "vite build", " && vite build --ssr")
            .unwrap();
        assert_eq!(out, r#""build": "vite build && vite build --ssr""#);
    }

    // ── insert_line ───────────────────────────────────────────────────────

    #[test]
    fn insert_line_at_index_one() {
        let text = "{\n    \"private\": true\n}\n";
        let out = insert_line(text, 1, "    \"type\": \"module\",");
        assert_eq!(out, "{\n    \"type\": \"module\",\n    \"private\": true\n}\n");
    }

    #[test]
    fn insert_line_past_end_appends() {
        assert_eq!(insert_line("a", 10, "b"), "a\nb");
    }

    // ── insert_after ──────────────────────────────────────────────────────

    #[test]
    fn insert_after_anchor() {
        let mut list = vec!["A", "B"];
        assert!(insert_after(&mut list, |item| *item == "A", "C"));
        assert_eq!(list, vec!["A", "C", "B"]);
    }

    #[test]
    fn insert_after_first_match_only() {
        let mut list = vec!["A", "B", "A"];
        assert!(insert_after(&mut list, |item| *item == "A", "C"));
        assert_eq!(list, vec!["A", "C", "B", "A"]);
    }

    #[test]
    fn insert_after_missing_anchor_is_noop() {
        let mut list = vec!["A", "B"];
        assert!(!insert_after(&mut list, |item| *item == "Z", "C"));
        assert_eq!(list, vec!["A", "B"]);
    }

    // ── insert_middleware_after ───────────────────────────────────────────

    #[test]
    fn middleware_is_inserted_into_web_group_only() {
        let out = insert_middleware_after(
            KERNEL,
            "web",
            "SubstituteBindings::class",
            "\\App\\Http\\Middleware\\HandleInertiaRequests::class",
        )
        .unwrap();

        assert!(out.contains(
            "SubstituteBindings::class,\n            \\App\\Http\\Middleware\\HandleInertiaRequests::class,\n        ],\n\n        'api'"
        ));
        assert_eq!(out.matches("HandleInertiaRequests").count(), 1);
    }

    #[test]
    fn middleware_chain_follows_previous_insert() {
        let first = insert_middleware_after(
            KERNEL,
            "web",
            "SubstituteBindings::class",
            "\\App\\Http\\Middleware\\HandleInertiaRequests::class",
        )
        .unwrap();
        let second = insert_middleware_after(
            &first,
            "web",
            "\\App\\Http\\Middleware\\HandleInertiaRequests::class",
            "\\Illuminate\\Http\\Middleware\\AddLinkHeadersForPreloadedAssets::class",
        )
        .unwrap();

        let inertia = second.find("HandleInertiaRequests").unwrap();
        let preload = second.find("AddLinkHeadersForPreloadedAssets").unwrap();
        assert!(inertia < preload);
    }

    #[test]
    fn middleware_goes_below_the_whole_anchor_line() {
        let kernel = KERNEL.replace(
            "SubstituteBindings::class,\n        ],\n\n        'api'",
            "SubstituteBindings::class, // bindings\n        ],\n\n        'api'",
        );
        let out = insert_middleware_after(&kernel, "web", "SubstituteBindings::class", "New::class")
            .unwrap();

        assert!(out.contains(
            "SubstituteBindings::class, // bindings\n            New::class,\n        ],\n\n        'api'"
        ));
    }

    #[test]
    fn middleware_missing_anchor_is_noop() {
        assert_eq!(
            insert_middleware_after(KERNEL, "web", "Missing::class", "New::class"),
            None
        );
    }

    #[test]
    fn middleware_already_present_is_noop() {
        assert_eq!(
            insert_middleware_after(
                KERNEL,
                "web",
                "SubstituteBindings::class",
                "\\App\\Http\\Middleware\\EncryptCookies::class"
            ),
            None
        );
    }

    #[test]
    fn middleware_missing_group_is_noop() {
        assert_eq!(
            insert_middleware_after(KERNEL, "admin", "SubstituteBindings::class", "X::class"),
            None
        );
    }

    // ── strip_dark_classes ────────────────────────────────────────────────

    #[test]
    fn dark_classes_are_removed() {
        let input = r#"<div class="bg-white dark:bg-gray-800 text-sm dark:text-gray-200">"#;
        assert_eq!(
            strip_dark_classes(input),
            r#"<div class="bg-white text-sm">"#
        );
    }

    #[test]
    fn dark_class_at_end_of_attribute() {
        let input = "<p class='text-gray-600 dark:text-gray-400'>";
        assert_eq!(strip_dark_classes(input), "<p class='text-gray-600'>");
    }

    #[test]
    fn markup_without_dark_classes_is_unchanged() {
        let input = "<a href=\"/dashboard\">Dashboard</a>";
        assert_eq!(strip_dark_classes(input), input);
    }
}
