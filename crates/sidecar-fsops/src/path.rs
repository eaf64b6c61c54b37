//! Target directory resolution for a resource's mirrored entries.
//!
//! # Design
//! - The folder annotation is looked up on every call; annotation values can change
//!   between events so nothing is cached.
//! - Annotation values are joined component-wise. Leading separators and `.` segments
//!   are dropped so the result always stays under the base folder; `..` segments are
//!   rejected outright.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{FsOpsError, FsOpsResult};

/// Resolve the folder a resource's entries are written to.
///
/// An empty `annotation_key` or a missing annotation yields `base` unchanged.
///
/// # Errors
///
/// Returns [`FsOpsError::InvalidInput`] when the annotation value tries to escape
/// `base` through a parent-directory segment or a platform path prefix.
pub fn resolve_target_folder(
    base: &Path,
    annotation_key: &str,
    annotations: &BTreeMap<String, String>,
) -> FsOpsResult<PathBuf> {
    if annotation_key.is_empty() {
        return Ok(base.to_path_buf());
    }
    let Some(subdir) = annotations.get(annotation_key) else {
        return Ok(base.to_path_buf());
    };

    let mut target = base.to_path_buf();
    for component in Path::new(subdir).components() {
        match component {
            Component::Normal(segment) => target.push(segment),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                return Err(FsOpsError::invalid_input(
                    "folder_annotation",
                    "parent_segment",
                    subdir.as_str(),
                ));
            }
            Component::Prefix(_) => {
                return Err(FsOpsError::invalid_input(
                    "folder_annotation",
                    "path_prefix",
                    subdir.as_str(),
                ));
            }
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn empty_key_returns_base() -> FsOpsResult<()> {
        let base = Path::new("/data");
        let resolved = resolve_target_folder(base, "", &annotations(&[("k", "sub")]))?;
        assert_eq!(resolved, PathBuf::from("/data"));
        Ok(())
    }

    #[test]
    fn annotation_value_becomes_subdirectory() -> FsOpsResult<()> {
        let base = Path::new("/data");
        let resolved = resolve_target_folder(base, "k", &annotations(&[("k", "sub")]))?;
        assert_eq!(resolved, PathBuf::from("/data/sub"));

        let nested = resolve_target_folder(base, "k", &annotations(&[("k", "a/b/")]))?;
        assert_eq!(nested, PathBuf::from("/data/a/b"));
        Ok(())
    }

    #[test]
    fn missing_or_empty_annotation_keeps_depth() -> FsOpsResult<()> {
        let base = Path::new("/data");
        assert_eq!(
            resolve_target_folder(base, "k", &annotations(&[]))?,
            PathBuf::from("/data")
        );
        assert_eq!(
            resolve_target_folder(base, "k", &annotations(&[("k", "")]))?,
            PathBuf::from("/data")
        );
        Ok(())
    }

    #[test]
    fn absolute_and_dot_segments_stay_under_base() -> FsOpsResult<()> {
        let base = Path::new("/data");
        let resolved = resolve_target_folder(base, "k", &annotations(&[("k", "/etc/./grafana")]))?;
        assert_eq!(resolved, PathBuf::from("/data/etc/grafana"));
        Ok(())
    }

    #[test]
    fn parent_segments_are_rejected() {
        let base = Path::new("/data");
        let err = resolve_target_folder(base, "k", &annotations(&[("k", "../../etc")]));
        assert!(matches!(
            err,
            Err(FsOpsError::InvalidInput {
                field: "folder_annotation",
                reason: "parent_segment",
                ..
            })
        ));
    }
}
