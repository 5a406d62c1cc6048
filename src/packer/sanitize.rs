//! Folder label to pack file name conversion.

use std::sync::LazyLock;

/// Characters outside the safe set for pack file names.
static UNSAFE_CHARS_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[^a-zA-Z0-9_-]").expect("unsafe chars regex is invalid")
});

static HYPHEN_RUN_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"-+").expect("hyphen run regex is invalid"));

/// Convert a folder label into a lowercase, hyphen-delimited identifier.
///
/// `"My Folder / Sub-Dir!!"` becomes `"my-folder-sub-dir"`. The result may be
/// empty when the label has no letters, digits or underscores.
pub fn sanitize_pack_name(label: &str) -> String {
    let replaced = UNSAFE_CHARS_RE.replace_all(label, "-").to_lowercase();
    let collapsed = HYPHEN_RUN_RE.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}
