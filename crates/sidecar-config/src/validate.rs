//! Parsing helpers turning raw option strings into typed values.

use std::time::Duration;

use sidecar_core::{NamespaceScope, ResourceKind};

use crate::defaults::{ALL_NAMESPACES, BOTH_RESOURCES};
use crate::error::{ConfigError, ConfigResult};
use crate::model::RunMode;

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn required(field: &'static str, value: Option<String>) -> ConfigResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::missing(field)),
    }
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_run_mode(value: &str) -> ConfigResult<RunMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "watch" => Ok(RunMode::Watch),
        "sleep" => Ok(RunMode::Sleep),
        "list" => Ok(RunMode::List),
        _ => Err(ConfigError::invalid("METHOD", "unknown_mode", value)),
    }
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_namespaces(value: Option<&str>) -> NamespaceScope {
    let Some(raw) = value.map(str::trim) else {
        return NamespaceScope::All;
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_NAMESPACES) {
        return NamespaceScope::All;
    }
    let namespaces: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|namespace| !namespace.is_empty())
        .map(str::to_string)
        .collect();
    if namespaces.is_empty() {
        NamespaceScope::All
    } else {
        NamespaceScope::Named(namespaces)
    }
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_resources(value: &str) -> ConfigResult<Vec<ResourceKind>> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized == BOTH_RESOURCES {
        return Ok(ResourceKind::ALL.to_vec());
    }
    normalized
        .parse::<ResourceKind>()
        .map(|kind| vec![kind])
        .map_err(|_| ConfigError::invalid("RESOURCE", "unknown_resource", value))
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_flag(field: &'static str, value: Option<&str>) -> ConfigResult<bool> {
    let Some(raw) = value.map(str::trim) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(ConfigError::invalid(field, "not_a_boolean", raw)),
    }
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_timeout(seconds: u64) -> ConfigResult<Duration> {
    if seconds == 0 {
        return Err(ConfigError::invalid(
            "REQ_TIMEOUT",
            "must_be_positive",
            &seconds.to_string(),
        ));
    }
    Ok(Duration::from_secs(seconds))
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_is_case_insensitive() -> ConfigResult<()> {
        assert_eq!(parse_run_mode("WATCH")?, RunMode::Watch);
        assert_eq!(parse_run_mode("list")?, RunMode::List);
        assert_eq!(parse_run_mode("Sleep")?, RunMode::Sleep);
        assert!(matches!(
            parse_run_mode("poll"),
            Err(ConfigError::InvalidField {
                field: "METHOD",
                reason: "unknown_mode",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn namespace_all_variants_mean_cluster_wide() {
        for raw in [None, Some(""), Some("ALL"), Some("all"), Some(" , ")] {
            assert_eq!(parse_namespaces(raw), NamespaceScope::All, "{raw:?}");
        }
    }

    #[test]
    fn namespace_list_is_split_and_trimmed() {
        assert_eq!(
            parse_namespaces(Some("monitoring, default,,")),
            NamespaceScope::Named(vec!["monitoring".to_string(), "default".to_string()])
        );
    }

    #[test]
    fn resources_expand_both() -> ConfigResult<()> {
        assert_eq!(
            parse_resources("both")?,
            vec![ResourceKind::ConfigMap, ResourceKind::Secret]
        );
        assert_eq!(parse_resources("configmap")?, vec![ResourceKind::ConfigMap]);
        assert_eq!(parse_resources("Secret")?, vec![ResourceKind::Secret]);
        assert!(parse_resources("pods").is_err());
        Ok(())
    }

    #[test]
    fn flags_accept_common_spellings() -> ConfigResult<()> {
        assert!(!parse_flag("REQ_SKIP_INIT", None)?);
        assert!(!parse_flag("REQ_SKIP_INIT", Some("false"))?);
        assert!(parse_flag("REQ_SKIP_INIT", Some("TRUE"))?);
        assert!(parse_flag("REQ_SKIP_INIT", Some("1"))?);
        assert!(parse_flag("REQ_SKIP_INIT", Some("maybe")).is_err());
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(parse_timeout(0).is_err());
        assert_eq!(parse_timeout(3).ok(), Some(Duration::from_secs(3)));
    }
}
