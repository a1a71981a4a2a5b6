//! Declaration loading and validation

use crate::{DeclarationError, Result, ServiceDeclaration};
use std::path::Path;

/// The declaration file name inside every service directory
pub const DECLARATION_FILE: &str = "service.json";

/// Load and validate the declaration from a service directory
pub fn load(service_dir: impl AsRef<Path>) -> Result<ServiceDeclaration> {
    let path = service_dir.as_ref().join(DECLARATION_FILE);
    let content = std::fs::read_to_string(&path)?;
    parse_str(&content)
}

/// Parse a declaration from a JSON string
pub fn parse_str(content: &str) -> Result<ServiceDeclaration> {
    let declaration: ServiceDeclaration = serde_json::from_str(content)?;
    validate(&declaration)?;
    Ok(declaration)
}

/// Validate a parsed declaration
fn validate(declaration: &ServiceDeclaration) -> Result<()> {
    if declaration.tag.is_empty() {
        return Err(DeclarationError::InvalidDeclaration(
            "`tag` must not be empty".to_string(),
        ));
    }

    if declaration.service_name().is_empty() {
        return Err(DeclarationError::InvalidDeclaration(format!(
            "cannot derive a service name from tag '{}'",
            declaration.tag
        )));
    }

    for (local, container) in &declaration.mounts {
        if !container.starts_with('/') {
            return Err(DeclarationError::InvalidDeclaration(format!(
                "mount '{}' must target an absolute container path, got '{}'",
                local, container
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_declaration() {
        let decl = parse_str(
            r#"{
                "tag": "library/nginx",
                "deps": ["api"],
                "optDeps": ["metrics"],
                "ports": [80, 443],
                "mounts": {"www": "/var/www"},
                "configs": {"nginx": {"conf.d": {}}}
            }"#,
        )
        .unwrap();

        assert_eq!(decl.service_name(), "nginx");
        assert_eq!(decl.deps, vec!["api"]);
        assert_eq!(decl.opt_deps, vec!["metrics"]);
        assert_eq!(decl.ports, vec![80, 443]);
        assert_eq!(decl.mounts.get("www").unwrap(), "/var/www");
        assert_eq!(decl.configs.flatten(), vec!["/nginx/conf.d"]);
    }

    #[test]
    fn test_missing_tag_is_rejected() {
        let err = parse_str(r#"{"ports": [80]}"#).unwrap_err();
        assert!(matches!(err, DeclarationError::Parse(_)));
    }

    #[test]
    fn test_empty_tag_is_rejected() {
        let err = parse_str(r#"{"tag": ""}"#).unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidDeclaration(_)));
    }

    #[test]
    fn test_list_field_with_wrong_shape_is_rejected() {
        let err = parse_str(r#"{"tag": "redis", "deps": "api"}"#).unwrap_err();
        assert!(matches!(err, DeclarationError::Parse(_)));
    }

    #[test]
    fn test_relative_mount_target_is_rejected() {
        let err =
            parse_str(r#"{"tag": "redis", "mounts": {"data": "var/lib/redis"}}"#).unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidDeclaration(_)));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DECLARATION_FILE),
            r#"{"tag": "library/redis"}"#,
        )
        .unwrap();

        let decl = load(dir.path()).unwrap();
        assert_eq!(decl.tag, "library/redis");
    }
}
