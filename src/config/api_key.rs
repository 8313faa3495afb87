//! Secret values in the configuration file.
//!
//! A key can be given three ways:
//!
//! - `env:GITHUB_TOKEN` reads the named environment variable
//! - `text:my-secret-key` takes the value verbatim
//! - `file:/path/to/key` reads (and trims) the file
//!
//! Deserialization fails loudly if the source is missing, so a typo'd
//! variable name surfaces at startup instead of as a 401 later.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone)]
pub struct ApiKey(SecretString);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl ApiKey {
    pub fn new(secret: SecretString) -> Self {
        ApiKey(secret)
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl<T: AsRef<str>> From<T> for ApiKey {
    fn from(secret: T) -> Self {
        ApiKey(SecretString::from(secret.as_ref()))
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        if let Some(var_name) = s.strip_prefix("env:") {
            let secret = std::env::var(var_name).map_err(|err| {
                serde::de::Error::custom(format!("reading secret from ${var_name}: {err}"))
            })?;
            Ok(ApiKey(SecretString::from(secret)))
        } else if let Some(secret) = s.strip_prefix("text:") {
            Ok(ApiKey(SecretString::from(secret)))
        } else if let Some(path) = s.strip_prefix("file:") {
            let secret = std::fs::read_to_string(path).map_err(serde::de::Error::custom)?;
            Ok(ApiKey(SecretString::from(secret.trim().to_string())))
        } else {
            Err(serde::de::Error::custom(
                "Invalid API key format; expected env:, text: or file:",
            ))
        }
    }
}

impl Serialize for ApiKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        "ApiKey(****)".serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    #[derive(Deserialize)]
    struct Wrapper {
        key: ApiKey,
    }

    #[test]
    fn test_text_key() {
        let wrapper: Wrapper = toml::from_str(r#"key = "text:super-secret""#).unwrap();
        assert_eq!(wrapper.key.expose_secret(), "super-secret");
    }

    #[test]
    fn test_env_key() {
        std::env::set_var("REPOFIX_TEST_KEY", "from-env");
        let wrapper: Wrapper = toml::from_str(r#"key = "env:REPOFIX_TEST_KEY""#).unwrap();
        assert_eq!(wrapper.key.expose_secret(), "from-env");
    }

    #[test]
    fn test_file_key_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "from-file").unwrap();

        let toml = format!("key = \"file:{}\"", file.path().display());
        let wrapper: Wrapper = toml::from_str(&toml).unwrap();
        assert_eq!(wrapper.key.expose_secret(), "from-file");
    }

    #[test]
    fn test_unknown_scheme_fails() {
        let result: Result<Wrapper, _> = toml::from_str(r#"key = "vault:nope""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_does_not_leak() {
        let key = ApiKey::from("super-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(****)");
    }
}
