use crate::error::{ProvisionError, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::path::{Path, PathBuf};

/// Convert bytes to a string, handling UTF-8 conversion errors gracefully
pub fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}

/// Escape a string for safe use in shell commands
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    // If string contains no special characters, return as-is
    if s
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
    {
        return s.to_string();
    }

    // Escape single quotes by ending quote, adding escaped quote, starting new quote
    let escaped = s.replace('\'', "'\"'\"'");
    format!("'{}'", escaped)
}

/// Random alphanumeric suffix for temporary paths. Not cryptographic.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Parse an octal permission string such as "0640" or "755"
pub fn parse_mode(mode: &str) -> Result<u32> {
    let trimmed = mode.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    let parsed = u32::from_str_radix(digits, 8).map_err(|_| {
        ProvisionError::configuration(format!("invalid file mode '{}', expected octal", mode))
    })?;
    if digits.is_empty() || parsed > 0o7777 {
        return Err(ProvisionError::configuration(format!(
            "invalid file mode '{}', expected octal",
            mode
        )));
    }
    Ok(parsed)
}

/// Expand a leading `~` to the given home directory
pub fn expand_path(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
