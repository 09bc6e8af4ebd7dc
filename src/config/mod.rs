//! Configuration loading and management for the platform.
//!
//! This module loads the platform file and the per-tenant configuration
//! rows (code prefixes, holidays, VIP discounts and delivery rate tables)
//! from YAML.
//!
//! # Example
//!
//! ```no_run
//! use bizhub::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded platform: {}", config.platform().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CodeFormats, MaintenanceSettings, PaginationSettings, ParcelDeliveryRates, PlatformConfig,
    PlatformFile, PlatformMetadata, ServiceLevelRate, SurchargeRates, TenantConfig, TimeWindow,
    TransportationRates, VehicleRate, VipTierRates,
};
