use std::fmt::{self, Debug, Formatter};

/// Writes the contained string as is, for use in [`Debug`] implementations which build their own
/// multi-line output.
pub struct DebugRaw(pub String);

impl Debug for DebugRaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefixes every line of `text` with `prefix`.
pub fn indent_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
