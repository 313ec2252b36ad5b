//! Install scripts compiled into the binary

use crate::error::{ProvisionError, Result};
use std::io::{Cursor, Read};

pub const INSTALL_BOUNDARY_DB: &str = "install_boundary_db.sh";

const EMBEDDED: &[(&str, &str)] = &[(
    INSTALL_BOUNDARY_DB,
    include_str!("../scripts/install_boundary_db.sh"),
)];

/// Opens install scripts by name
pub trait ScriptSource {
    fn open(&self, name: &str) -> Result<Box<dyn Read>>;
}

/// Scripts bundled at build time
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedScripts;

impl ScriptSource for EmbeddedScripts {
    fn open(&self, name: &str) -> Result<Box<dyn Read>> {
        EMBEDDED
            .iter()
            .find(|(script, _)| *script == name)
            .map(|(_, body)| Box::new(Cursor::new(body.as_bytes())) as Box<dyn Read>)
            .ok_or_else(|| ProvisionError::Asset(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_bundled_script() {
        let mut script = EmbeddedScripts.open(INSTALL_BOUNDARY_DB).unwrap();
        let mut body = String::new();
        script.read_to_string(&mut body).unwrap();
        assert!(body.starts_with("#!/bin/sh"));
        assert!(body.contains("TMP_DIR"));
        assert!(body.contains("BOUNDARY_VERSION"));
        assert!(body.contains("config/boundary.hcl"));
    }

    #[test]
    fn test_missing_script_is_asset_error() {
        let err = EmbeddedScripts.open("install_nothing.sh").err().unwrap();
        assert!(matches!(err, ProvisionError::Asset(name) if name == "install_nothing.sh"));
    }
}
