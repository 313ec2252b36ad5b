//! Boundary configuration generated from command-line parameters

/// Parameters for the generated `boundary.hcl` used by `database init`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryConfig {
    pub database_url: Option<String>,
    pub root_key: Option<String>,
}

impl BoundaryConfig {
    pub fn has_database_url(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }

    pub fn has_root_key(&self) -> bool {
        self.root_key.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// True when any generated-config parameter was supplied
    pub fn is_set(&self) -> bool {
        self.has_database_url() || self.has_root_key()
    }

    /// Render the controller configuration needed to initialize the database
    pub fn generate_db_config_file(&self) -> String {
        let database_url = self.database_url.as_deref().unwrap_or_default();
        let root_key = self.root_key.as_deref().unwrap_or_default();

        let mut hcl = String::new();
        hcl.push_str("disable_mlock = true\n\n");
        hcl.push_str("controller {\n");
        hcl.push_str("  name = \"hashiup-db-init\"\n");
        hcl.push_str("  database {\n");
        hcl.push_str(&format!("    url = {}\n", hcl_string(database_url)));
        hcl.push_str("  }\n");
        hcl.push_str("}\n\n");
        hcl.push_str("kms \"aead\" {\n");
        hcl.push_str("  purpose   = \"root\"\n");
        hcl.push_str("  aead_type = \"aes-gcm\"\n");
        hcl.push_str(&format!("  key       = {}\n", hcl_string(root_key)));
        hcl.push_str("  key_id    = \"global_root\"\n");
        hcl.push_str("}\n");
        hcl
    }
}

/// Quote a value as an HCL string literal
fn hcl_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace("${", "$${")
        .replace("%{", "%%{");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_checks() {
        let empty = BoundaryConfig::default();
        assert!(!empty.has_database_url());
        assert!(!empty.has_root_key());
        assert!(!empty.is_set());

        let blank = BoundaryConfig {
            database_url: Some("  ".into()),
            root_key: None,
        };
        assert!(!blank.has_database_url());

        let full = BoundaryConfig {
            database_url: Some("postgres://x".into()),
            root_key: Some("abc".into()),
        };
        assert!(full.has_database_url());
        assert!(full.has_root_key());
        assert!(full.is_set());
    }

    #[test]
    fn test_generated_config_contains_values() {
        let config = BoundaryConfig {
            database_url: Some("postgres://x".into()),
            root_key: Some("abc".into()),
        };
        let hcl = config.generate_db_config_file();
        assert!(hcl.contains("url = \"postgres://x\""));
        assert!(hcl.contains("key       = \"abc\""));
        assert!(hcl.contains("purpose   = \"root\""));
        assert!(hcl.contains("disable_mlock = true"));
    }

    #[test]
    fn test_hcl_string_escaping() {
        assert_eq!(hcl_string("plain"), "\"plain\"");
        assert_eq!(hcl_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(hcl_string("${env}"), "\"$${env}\"");
        assert_eq!(hcl_string("pa$$word"), "\"pa$$word\"");
    }
}
