//! Connection profiles and their on-disk location.
//!
//! Profiles live in an INI file, one section per profile, each carrying
//! the `server` base URL of the key-value store API:
//!
//! ```ini
//! [default]
//! server = http://localhost:8080/api
//! ```

use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;

/// Default profile file path.
pub const DEFAULT_PROFILE_PATH: &str = "~/.keyline/profile";

/// Environment variable overriding the profile path.
pub const PROFILE_PATH_ENV_VAR: &str = "KEYLINE_PROFILE_PATH";

/// Base address used when no profile provides one.
pub const DEFAULT_SERVER: &str = "http://localhost:8080/api";

/// Get the profile file path, checking the environment variable first.
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// A named connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    name: String,
    server: String,
}

impl ConnectionProfile {
    pub fn with_server(name: &str, server: &str) -> Self {
        Self {
            name: name.to_string(),
            server: server.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL of the API, without a trailing slash.
    pub fn server(&self) -> &str {
        &self.server
    }
}

/// INI-backed profile storage.
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Load one profile by section name. A missing file or missing
    /// section is `Ok(None)`; a file that exists but cannot be parsed is
    /// an error.
    pub fn load_profile(&self, name: &str) -> Result<Option<ConnectionProfile>> {
        let expanded = shellexpand::tilde(&self.path).into_owned();
        if !Path::new(&expanded).exists() {
            return Ok(None);
        }

        let ini = Ini::load_from_file(&expanded)
            .with_context(|| format!("failed to parse profile file '{expanded}'"))?;

        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let server = section
            .get("server")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        Ok(Some(ConnectionProfile {
            name: name.to_string(),
            server,
        }))
    }
}

/// Resolve a profile by name, falling back to the default server when the
/// profile file or section does not exist.
pub fn resolve_profile(name: &str, path: &str) -> Result<ConnectionProfile> {
    let store = IniProfileStore::new(path);
    match store.load_profile(name)? {
        Some(profile) => {
            tracing::debug!("profile '{name}' loaded from '{path}'");
            Ok(profile)
        }
        None => {
            tracing::debug!("profile '{name}' not found in '{path}', using default server");
            Ok(ConnectionProfile::with_server(name, DEFAULT_SERVER))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_profile_path() {
        assert_eq!(DEFAULT_PROFILE_PATH, "~/.keyline/profile");
    }

    #[test]
    fn test_get_profile_path_env_override_and_default() {
        // Save current env var state; both branches live in one test so
        // parallel test threads never race on the variable.
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        std::env::remove_var(PROFILE_PATH_ENV_VAR);
        assert_eq!(get_profile_path(), DEFAULT_PROFILE_PATH);

        std::env::set_var(PROFILE_PATH_ENV_VAR, "/custom/profile/path");
        assert_eq!(get_profile_path(), "/custom/profile/path");

        match original {
            Some(val) => std::env::set_var(PROFILE_PATH_ENV_VAR, val),
            None => std::env::remove_var(PROFILE_PATH_ENV_VAR),
        }
    }

    #[test]
    fn test_load_profile_from_ini_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default]").unwrap();
        writeln!(file, "server = http://example.test:9000/api/").unwrap();
        writeln!(file, "[staging]").unwrap();
        writeln!(file, "server = http://staging.test/api").unwrap();

        let store = IniProfileStore::new(file.path().to_str().unwrap());
        let profile = store.load_profile("default").unwrap().unwrap();
        assert_eq!(profile.name(), "default");
        // Trailing slash is normalized away.
        assert_eq!(profile.server(), "http://example.test:9000/api");

        let staging = store.load_profile("staging").unwrap().unwrap();
        assert_eq!(staging.server(), "http://staging.test/api");
    }

    #[test]
    fn test_load_profile_missing_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default]").unwrap();
        writeln!(file, "server = http://example.test/api").unwrap();

        let store = IniProfileStore::new(file.path().to_str().unwrap());
        assert!(store.load_profile("missing").unwrap().is_none());
    }

    #[test]
    fn test_load_profile_missing_file() {
        let store = IniProfileStore::new("/nonexistent/keyline/profile");
        assert!(store.load_profile("default").unwrap().is_none());
    }

    #[test]
    fn test_resolve_profile_falls_back_to_default_server() {
        let profile = resolve_profile("default", "/nonexistent/keyline/profile").unwrap();
        assert_eq!(profile.server(), DEFAULT_SERVER);
    }

    #[test]
    fn test_profile_without_server_key_uses_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default]").unwrap();
        writeln!(file, "insecure = true").unwrap();

        let store = IniProfileStore::new(file.path().to_str().unwrap());
        let profile = store.load_profile("default").unwrap().unwrap();
        assert_eq!(profile.server(), DEFAULT_SERVER);
    }
}
