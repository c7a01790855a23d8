//! Catalogue seeding configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

pub(crate) const DEFAULT_SEED_NAME: &str = "yamaha-parts";

pub(crate) fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("catalogue")
        .join("seeds.json")
}

/// Configuration values controlling catalogue seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOGUE_SEED")]
pub struct CatalogueSeedSettings {
    /// Seed the catalogue on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Product set to load from the registry.
    pub seed_name: Option<String>,
    /// Optional registry path override.
    pub registry_path: Option<PathBuf>,
}

impl CatalogueSeedSettings {
    /// Return the configured set name, falling back to the shipped set.
    pub fn seed_name(&self) -> &str {
        self.seed_name.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Return the configured registry path, falling back to the fixture.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> CatalogueSeedSettings {
        CatalogueSeedSettings::load_from_iter([OsString::from("storefront")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("CATALOGUE_SEED_ENABLED", None::<String>),
            ("CATALOGUE_SEED_SEED_NAME", None::<String>),
            ("CATALOGUE_SEED_REGISTRY_PATH", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.enabled);
        assert_eq!(settings.seed_name(), DEFAULT_SEED_NAME);
        assert_eq!(settings.registry_path(), default_registry_path());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CATALOGUE_SEED_ENABLED", Some("true".to_owned())),
            ("CATALOGUE_SEED_SEED_NAME", Some("brakes-only".to_owned())),
            (
                "CATALOGUE_SEED_REGISTRY_PATH",
                Some("/tmp/catalogue_registry.json".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.enabled);
        assert_eq!(settings.seed_name(), "brakes-only");
        assert_eq!(
            settings.registry_path(),
            PathBuf::from("/tmp/catalogue_registry.json")
        );
    }
}
