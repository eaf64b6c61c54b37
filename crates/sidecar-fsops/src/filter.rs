//! Entry filter: only JSON entries are mirrored.

/// Literal suffix an entry name must carry to be mirrored. Case-sensitive.
pub const JSON_SUFFIX: &str = ".json";

/// Whether a data entry should be materialised on disk.
#[must_use]
pub fn accepts_entry(entry_name: &str) -> bool {
    entry_name.ends_with(JSON_SUFFIX)
}
