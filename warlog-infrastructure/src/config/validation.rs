use anyhow::{anyhow, Result};

/// Server names become file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn validate_server_name(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("server name is empty"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(anyhow!(
            "server name '{}' may only contain letters, digits, '_' and '-'",
            value
        ));
    }
    Ok(())
}
