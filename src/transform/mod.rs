//! SVG to Svelte component transform.
//!
//! Pure functions mapping a source icon's path and content to the generated
//! component's path and content:
//!
//! - `account-alert-outline.svg` becomes `<out>/AccountAlertOutline.svelte`
//! - the XML prologue before `<svg` is dropped
//! - `{...$$props}` is spliced into the `<svg>` tag ahead of its first `<path`
//! - the first `id="..."` attribute is removed
//!
//! Malformed input never errors; the affected step simply leaves the content
//! unchanged. The content transform is not idempotent: applying it to its own
//! output injects a second props spread.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::files::FileHandle;

/// Extension given to generated components.
pub const DEFAULT_EXTENSION: &str = "svelte";

/// Marker spliced into the root `<svg>` tag to forward component props.
pub const PROPS_SPREAD: &str = "{...$$props}";

const SVG_OPEN: &str = "<svg";

fn svg_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<svg (.*)><path").expect("Invalid regex for svg tag"))
}

fn id_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\sid="[^"]*""#).expect("Invalid regex for id attribute"))
}

/// Converts a hyphen-delimited name to concatenated capitalized words.
///
/// Each segment keeps its first character upper-cased and the remainder
/// lower-cased: `account-alert-outline` becomes `AccountAlertOutline`.
pub fn convert_case(input: &str) -> String {
    input
        .split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Destination path of a generated component for `file`.
pub fn transform_path(file: &FileHandle, out_dir: &Path, extension: &str) -> PathBuf {
    out_dir.join(format!("{}.{}", convert_case(&file.name(false)), extension))
}

/// Rewrites SVG markup into component markup.
pub fn transform_content(content: &str) -> String {
    let body = content
        .find(SVG_OPEN)
        .map_or(content, |start| &content[start..]);

    let spread = format!("<svg ${{1}} {} ><path", PROPS_SPREAD.replace('$', "$$"));
    let with_props = svg_tag_regex().replace(body, spread.as_str());

    id_attr_regex().replace(&with_props, "").into_owned()
}

/// Applies both transforms to `file` in place.
pub fn apply(file: &mut FileHandle, out_dir: &Path, extension: &str) {
    file.path = transform_path(file, out_dir, extension);
    file.content = transform_content(&file.content);
}
