//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading platform and
//! tenant configuration from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{PlatformError, PlatformResult};

use super::types::{
    PlatformConfig, PlatformFile, PlatformMetadata, TenantConfig, VipTierRates,
};

/// Loads and provides access to platform configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── platform.yaml        # Platform metadata, pagination, VIP defaults
/// └── tenants/
///     ├── acme-logistics.yaml
///     └── smile-dental.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use bizhub::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let tenant = loader.tenant("acme-logistics").unwrap();
/// println!("Tenant: {}", tenant.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PlatformConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `platform.yaml` or the `tenants/` directory is
    /// missing, if any file contains invalid YAML or an out-of-range rate
    /// or percentage, or if two tenant files declare the same client
    /// identifier.
    pub fn load<P: AsRef<Path>>(path: P) -> PlatformResult<Self> {
        let path = path.as_ref();

        let platform_path = path.join("platform.yaml");
        let platform = Self::load_yaml::<PlatformFile>(&platform_path)?;
        platform
            .vip_tiers
            .validate(&platform_path.display().to_string())?;
        let tenants = Self::load_tenants(&path.join("tenants"))?;

        debug!(
            platform = %platform.platform.name,
            tenants = tenants.len(),
            "Loaded platform configuration"
        );

        Ok(Self {
            config: PlatformConfig::new(platform, tenants),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PlatformResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PlatformError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PlatformError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every tenant file from the tenants directory.
    fn load_tenants(tenants_dir: &Path) -> PlatformResult<HashMap<String, TenantConfig>> {
        let dir_str = tenants_dir.display().to_string();

        let entries = fs::read_dir(tenants_dir).map_err(|_| PlatformError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| PlatformError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut tenants = HashMap::new();
        for path in paths {
            let tenant = Self::load_yaml::<TenantConfig>(&path)?;
            tenant.validate(&path.display().to_string())?;
            let client = tenant.client_identifier.clone();
            if tenants.insert(client.clone(), tenant).is_some() {
                return Err(PlatformError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate client_identifier '{}'", client),
                });
            }
        }

        if tenants.is_empty() {
            return Err(PlatformError::ConfigNotFound {
                path: format!("{} (no tenant files found)", dir_str),
            });
        }

        Ok(tenants)
    }

    /// Returns the underlying platform configuration.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Returns the platform metadata.
    pub fn platform(&self) -> &PlatformMetadata {
        self.config.metadata()
    }

    /// Gets a tenant by its client identifier.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bizhub::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let tenant = loader.tenant("smile-dental")?;
    /// assert_eq!(tenant.codes.arn_prefix, "SMD");
    /// # Ok::<(), bizhub::error::PlatformError>(())
    /// ```
    pub fn tenant(&self, client_identifier: &str) -> PlatformResult<&TenantConfig> {
        self.config
            .tenants()
            .get(client_identifier)
            .ok_or_else(|| PlatformError::TenantNotFound {
                client_identifier: client_identifier.to_string(),
            })
    }

    /// Gets the VIP tier discounts for a tenant, falling back to the
    /// platform defaults when the tenant does not override them.
    pub fn vip_tier_rates(&self, client_identifier: &str) -> PlatformResult<VipTierRates> {
        let tenant = self.tenant(client_identifier)?;
        Ok(tenant
            .vip_tiers
            .unwrap_or_else(|| self.config.default_vip_tiers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.platform().name, "BizHub");
        assert_eq!(loader.config().tenants().len(), 3);
    }

    #[test]
    fn test_get_tenant() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let tenant = loader.tenant("acme-logistics").unwrap();
        assert_eq!(tenant.name, "Acme Logistics");
        assert_eq!(tenant.currency, "PHP");
    }

    #[test]
    fn test_unknown_tenant_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.tenant("unknown") {
            Err(PlatformError::TenantNotFound { client_identifier }) => {
                assert_eq!(client_identifier, "unknown");
            }
            other => panic!("Expected TenantNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_transportation_rates_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let rates = loader
            .tenant("acme-logistics")
            .unwrap()
            .transportation_rates()
            .unwrap();
        assert_eq!(rates.minimum_charge, dec("500.00"));
        let van = rates.vehicles.get("van").unwrap();
        assert_eq!(van.base_rate, dec("300.00"));
        assert_eq!(van.per_km, dec("15.00"));
        assert_eq!(rates.surcharges.peak_hours.len(), 2);
    }

    #[test]
    fn test_module_not_configured_for_clinic() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.tenant("smile-dental").unwrap().transportation_rates() {
            Err(PlatformError::ModuleNotConfigured { module, .. }) => {
                assert_eq!(module, "transportation");
            }
            other => panic!("Expected ModuleNotConfigured error, got {:?}", other),
        }
    }

    #[test]
    fn test_vip_tiers_fall_back_to_platform_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let defaults = loader.vip_tier_rates("acme-logistics").unwrap();
        assert_eq!(defaults.gold, dec("10.00"));

        let overridden = loader.vip_tier_rates("smile-dental").unwrap();
        assert_eq!(overridden.gold, dec("12.00"));
    }

    #[test]
    fn test_is_holiday() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let christmas = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        let ordinary = NaiveDate::from_ymd_opt(2026, 12, 22).unwrap();
        let tenant = loader.tenant("acme-logistics").unwrap();
        assert!(tenant.is_holiday(christmas));
        assert!(!tenant.is_holiday(ordinary));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(PlatformError::ConfigNotFound { path }) => {
                assert!(path.contains("platform.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_tenants_directory_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::copy(
            Path::new(config_path()).join("platform.yaml"),
            dir.path().join("platform.yaml"),
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("tenants")).unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(PlatformError::ConfigNotFound { path }) => {
                assert!(path.contains("no tenant files found"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_client_identifier_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::copy(
            Path::new(config_path()).join("platform.yaml"),
            dir.path().join("platform.yaml"),
        )
        .unwrap();
        let tenants = dir.path().join("tenants");
        std::fs::create_dir(&tenants).unwrap();
        let body = "client_identifier: \"twin\"\nname: \"Twin\"\ncurrency: \"PHP\"\n";
        std::fs::write(tenants.join("a.yaml"), body).unwrap();
        std::fs::write(tenants.join("b.yaml"), body).unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(PlatformError::ConfigParseError { message, .. }) => {
                assert!(message.contains("duplicate client_identifier 'twin'"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_vip_tier_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::copy(
            Path::new(config_path()).join("platform.yaml"),
            dir.path().join("platform.yaml"),
        )
        .unwrap();
        let tenants = dir.path().join("tenants");
        std::fs::create_dir(&tenants).unwrap();
        std::fs::write(
            tenants.join("generous.yaml"),
            "client_identifier: \"generous\"\nname: \"Generous\"\ncurrency: \"PHP\"\n\
             vip_tiers:\n  silver: \"5\"\n  gold: \"150\"\n  platinum: \"20\"\n",
        )
        .unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(PlatformError::ConfigParseError { path, message }) => {
                assert!(path.contains("generous.yaml"));
                assert!(message.contains("vip_tiers.gold must be between 0 and 100"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("platform.yaml"), "platform: [unclosed").unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(PlatformError::ConfigParseError { path, .. }) => {
                assert!(path.contains("platform.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
