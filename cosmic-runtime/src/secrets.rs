use anyhow::Context;

/// Where we store secrets in the OS keyring.
const SERVICE: &str = "cosmic";

pub const API_KEY_ENV: &str = "COSMIC_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKey {
    GeminiApiKey,
}

impl SecretKey {
    fn user(self) -> &'static str {
        match self {
            SecretKey::GeminiApiKey => "gemini_api_key",
        }
    }
}

pub fn set_secret(key: SecretKey, value: &str) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    entry.set_password(value).context("set secret")
}

pub fn get_secret(key: SecretKey) -> anyhow::Result<Option<String>> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;

    match entry.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)).context("get secret"),
    }
}

/// Returns whether a stored value was actually removed.
pub fn delete_secret(key: SecretKey) -> anyhow::Result<bool> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    match entry.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(anyhow::Error::new(e)).context("delete secret"),
    }
}

/// Environment first, then the keyring. An unavailable keyring is not fatal:
/// the request goes out without a key and the endpoint rejects it.
pub fn resolve_api_key() -> String {
    pick_api_key(std::env::var(API_KEY_ENV).ok(), || get_secret(SecretKey::GeminiApiKey))
}

fn pick_api_key(
    from_env: Option<String>,
    from_keyring: impl FnOnce() -> anyhow::Result<Option<String>>,
) -> String {
    if let Some(v) = from_env.filter(|v| !v.trim().is_empty()) {
        return v.trim().to_string();
    }
    match from_keyring() {
        Ok(Some(v)) => v,
        Ok(None) => {
            log::warn!("no API key configured (set {API_KEY_ENV} or run `cosmic set-key`)");
            String::new()
        }
        Err(e) => {
            log::warn!("keyring unavailable: {e:#}");
            String::new()
        }
    }
}
