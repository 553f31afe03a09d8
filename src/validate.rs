//! File and branch names share one lexical rule:
//! `^[A-Za-z0-9][A-Za-z0-9._-]*$`, case-sensitive, no directory separators.

use anyhow::{anyhow, bail};

use crate::constants::MESSAGE_KEY;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
}

/// Returns true if `name` matches the shared file/branch lexical rule.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(is_name_char)
}

/// Validates a user-supplied file name, rejecting the reserved `_MESSAGE` name.
pub fn validate_file_name(name: &str) -> crate::Result<()> {
    if name == MESSAGE_KEY {
        bail!("'{}' is a reserved name and cannot be used as a file", MESSAGE_KEY);
    }
    if !is_valid_name(name) {
        return Err(anyhow!("invalid file name: '{}'", name));
    }
    Ok(())
}

/// Validates a user-supplied branch name.
pub fn validate_branch_name(name: &str) -> crate::Result<()> {
    if !is_valid_name(name) {
        return Err(anyhow!("invalid branch name: '{}'", name));
    }
    Ok(())
}
