//! Session cookie configuration.
//!
//! Session toggles arrive as raw strings from `STOREFRONT_SESSION_*`
//! variables. Release builds reject missing or malformed values; debug builds
//! fall back to safe defaults and log a warning instead.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use cap_std::{ambient_authority, fs::Dir};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

/// Key file read when no override is configured.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` needs at least 256 bits of master key.
const DERIVE_MIN_LEN: usize = 32;

pub(crate) const KEY_FILE_SETTING: &str = "STOREFRONT_SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_SETTING: &str = "STOREFRONT_SESSION_COOKIE_SECURE";
pub(crate) const SAME_SITE_SETTING: &str = "STOREFRONT_SESSION_SAME_SITE";
pub(crate) const ALLOW_EPHEMERAL_SETTING: &str = "STOREFRONT_SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use storefront::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as read from `STOREFRONT_SESSION_*` variables.
#[derive(Debug, Clone, Default)]
pub struct SessionToggles {
    /// Path of the cookie signing key.
    pub key_file: Option<PathBuf>,
    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: Option<String>,
    /// `SameSite` policy name.
    pub same_site: Option<String>,
    /// Whether a generated key may stand in for an unreadable key file.
    pub allow_ephemeral: Option<String>,
}

impl SessionToggles {
    /// Read the toggles from the environment.
    pub fn from_env<E: Env>(env: &E) -> Self {
        Self {
            key_file: env.string(KEY_FILE_SETTING).map(PathBuf::from),
            cookie_secure: env.string(COOKIE_SECURE_SETTING),
            same_site: env.string(SAME_SITE_SETTING),
            allow_ephemeral: env.string(ALLOW_EPHEMERAL_SETTING),
        }
    }
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required setting is missing.
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without `Secure` in a release build.
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
    /// Release builds must not fall back to generated keys.
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Validate the toggles for the given build mode and load the key.
///
/// # Examples
///
/// ```rust
/// use storefront::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let key_path = dir.path().join("session_key");
/// std::fs::write(&key_path, vec![b'k'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: Some(key_path),
///     cookie_secure: Some("1".into()),
///     same_site: Some("Strict".into()),
///     allow_ephemeral: Some("0".into()),
/// };
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_toggle(
        toggles.cookie_secure.as_deref(),
        COOKIE_SECURE_SETTING,
        true,
        mode,
    )?;
    let same_site = same_site_toggle(toggles.same_site.as_deref(), cookie_secure, mode)?;
    let allow_ephemeral = bool_toggle(
        toggles.allow_ephemeral.as_deref(),
        ALLOW_EPHEMERAL_SETTING,
        false,
        mode,
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let path = toggles
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
    let key = load_key(path, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn bool_toggle(
    raw: Option<&str>,
    name: &'static str,
    fallback: bool,
    mode: BuildMode,
) -> Result<bool, SessionConfigError> {
    let Some(value) = raw else {
        if mode.is_debug() {
            warn!(setting = name, fallback, "session setting not set; using default");
            return Ok(fallback);
        }
        return Err(SessionConfigError::MissingSetting { name });
    };
    match parse_bool(value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(setting = name, value, fallback, "invalid session setting; using default");
            Ok(fallback)
        }
        None => Err(SessionConfigError::InvalidSetting {
            name,
            value: value.to_owned(),
            expected: BOOL_EXPECTED,
        }),
    }
}

fn same_site_toggle(
    raw: Option<&str>,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<SameSite, SessionConfigError> {
    let fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = raw else {
        if mode.is_debug() {
            warn!(setting = SAME_SITE_SETTING, "session setting not set; using Lax");
            return Ok(fallback);
        }
        return Err(SessionConfigError::MissingSetting {
            name: SAME_SITE_SETTING,
        });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without Secure; browsers may drop the session cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(setting = SAME_SITE_SETTING, value, "invalid session setting; using Lax");
            Ok(fallback)
        }
        _ => Err(SessionConfigError::InvalidSetting {
            name: SAME_SITE_SETTING,
            value: value.to_owned(),
            expected: SAME_SITE_EXPECTED,
        }),
    }
}

fn load_key(path: PathBuf, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match read_key_file(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(
                    path = %path.display(),
                    length,
                    "session key too short to derive from; using temporary key (dev only)"
                );
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn read_key_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "session key path must name a file",
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(Path::new(file_name))
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "session_config_tests.rs"]
mod tests;
