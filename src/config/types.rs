//! Configuration types for the platform.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the platform and per-tenant YAML files.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PlatformError, PlatformResult};
use crate::models::PublicHoliday;
use crate::pricing::MAX_AMOUNT;

/// Checks that a configured value lies in `[min, max]`.
fn check_range(path: &str, key: &str, value: Decimal, min: i64, max: i64) -> PlatformResult<()> {
    if value < Decimal::from(min) || value > Decimal::from(max) {
        return Err(PlatformError::ConfigParseError {
            path: path.to_string(),
            message: format!("{} must be between {} and {}, got {}", key, min, max, value),
        });
    }
    Ok(())
}

fn check_amount(path: &str, key: &str, value: Decimal) -> PlatformResult<()> {
    check_range(path, key, value, 0, MAX_AMOUNT)
}

/// Metadata about the platform deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformMetadata {
    /// The human-readable platform name.
    pub name: String,
    /// The configuration version.
    pub version: String,
}

/// Pagination defaults for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationSettings {
    /// Page size used when a request does not specify one.
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
    /// Upper bound on a requested page size.
    #[serde(default = "max_per_page")]
    pub max_per_page: u32,
}

fn default_per_page() -> u32 {
    15
}

fn max_per_page() -> u32 {
    100
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: max_per_page(),
        }
    }
}

/// Discount percentage for each VIP tier.
///
/// Regular patients have no tier discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct VipTierRates {
    /// Discount percentage for silver patients.
    pub silver: Decimal,
    /// Discount percentage for gold patients.
    pub gold: Decimal,
    /// Discount percentage for platinum patients.
    pub platinum: Decimal,
}

impl VipTierRates {
    /// Rejects tier percentages outside 0 to 100.
    pub fn validate(&self, path: &str) -> PlatformResult<()> {
        check_range(path, "vip_tiers.silver", self.silver, 0, 100)?;
        check_range(path, "vip_tiers.gold", self.gold, 0, 100)?;
        check_range(path, "vip_tiers.platinum", self.platinum, 0, 100)
    }
}

/// Settings used by the console maintenance commands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceSettings {
    /// Cache directories (relative to the storage root) that must exist.
    #[serde(default)]
    pub cache_directories: Vec<String>,
}

/// The contents of `platform.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformFile {
    /// Platform metadata.
    pub platform: PlatformMetadata,
    /// Pagination defaults.
    #[serde(default)]
    pub pagination: PaginationSettings,
    /// Default VIP tier discounts, used unless a tenant overrides them.
    pub vip_tiers: VipTierRates,
    /// Maintenance settings.
    #[serde(default)]
    pub maintenance: MaintenanceSettings,
}

/// Prefixes for generated identifiers.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeFormats {
    /// Prefix for patient account reference numbers.
    #[serde(default = "default_arn_prefix")]
    pub arn_prefix: String,
    /// Prefix for bill numbers.
    #[serde(default = "default_bill_prefix")]
    pub bill_prefix: String,
    /// Prefix for order numbers.
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,
}

fn default_arn_prefix() -> String {
    "ARN".to_string()
}

fn default_bill_prefix() -> String {
    "BILL".to_string()
}

fn default_order_prefix() -> String {
    "ORD".to_string()
}

impl Default for CodeFormats {
    fn default() -> Self {
        Self {
            arn_prefix: default_arn_prefix(),
            bill_prefix: default_bill_prefix(),
            order_prefix: default_order_prefix(),
        }
    }
}

/// A time-of-day window, `[start, end)`.
///
/// A window whose start is after its end wraps past midnight
/// (e.g. 22:00 to 02:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeWindow {
    /// The start of the window (inclusive).
    pub start: NaiveTime,
    /// The end of the window (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Returns true if `time` falls inside the window.
    ///
    /// # Example
    ///
    /// ```
    /// use bizhub::config::TimeWindow;
    /// use chrono::NaiveTime;
    ///
    /// let night = TimeWindow {
    ///     start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
    /// };
    /// assert!(night.contains(NaiveTime::from_hms_opt(23, 30, 0).unwrap()));
    /// assert!(night.contains(NaiveTime::from_hms_opt(1, 0, 0).unwrap()));
    /// assert!(!night.contains(NaiveTime::from_hms_opt(2, 0, 0).unwrap()));
    /// ```
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// Percentage surcharges shared by the delivery rate tables.
#[derive(Debug, Clone, Deserialize)]
pub struct SurchargeRates {
    /// Windows during which the peak-hour surcharge applies.
    #[serde(default)]
    pub peak_hours: Vec<TimeWindow>,
    /// Peak-hour surcharge percentage.
    pub peak_hour_percent: Decimal,
    /// Weekend surcharge percentage.
    pub weekend_percent: Decimal,
    /// Holiday surcharge percentage.
    pub holiday_percent: Decimal,
    /// Urgent surcharge percentage.
    pub urgent_percent: Decimal,
}

impl SurchargeRates {
    fn validate(&self, path: &str, section: &str) -> PlatformResult<()> {
        for (key, value) in [
            ("peak_hour_percent", self.peak_hour_percent),
            ("weekend_percent", self.weekend_percent),
            ("holiday_percent", self.holiday_percent),
            ("urgent_percent", self.urgent_percent),
        ] {
            check_range(path, &format!("{}.surcharges.{}", section, key), value, 0, 1000)?;
        }
        Ok(())
    }
}

/// Checks one rate row: amounts within limits and a multiplier up to 100.
fn check_rate_row(
    path: &str,
    row: &str,
    base_rate: Decimal,
    per_km: Decimal,
    per_kg: Decimal,
    multiplier: Decimal,
) -> PlatformResult<()> {
    check_amount(path, &format!("{}.base_rate", row), base_rate)?;
    check_amount(path, &format!("{}.per_km", row), per_km)?;
    check_amount(path, &format!("{}.per_kg", row), per_kg)?;
    check_range(path, &format!("{}.multiplier", row), multiplier, 0, 100)
}

/// Rate row for one vehicle type.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleRate {
    /// Flat base rate per booking.
    pub base_rate: Decimal,
    /// Rate per kilometre.
    pub per_km: Decimal,
    /// Rate per kilogram of cargo.
    pub per_kg: Decimal,
    /// Multiplier applied to the base, distance and weight components.
    #[serde(default = "unit_multiplier")]
    pub multiplier: Decimal,
}

/// Transportation rate table for a tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportationRates {
    /// The lowest amount a booking is charged.
    pub minimum_charge: Decimal,
    /// Fee per additional drop-off stop.
    #[serde(default)]
    pub per_stop_fee: Decimal,
    /// Map of vehicle type to rates.
    pub vehicles: HashMap<String, VehicleRate>,
    /// Surcharge percentages.
    pub surcharges: SurchargeRates,
}

/// Rate row for one parcel service level.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceLevelRate {
    /// Flat base rate per parcel.
    pub base_rate: Decimal,
    /// Rate per kilometre.
    pub per_km: Decimal,
    /// Rate per chargeable kilogram.
    pub per_kg: Decimal,
    /// Multiplier applied to the base, distance and weight components.
    #[serde(default = "unit_multiplier")]
    pub multiplier: Decimal,
}

/// Parcel delivery rate table for a tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct ParcelDeliveryRates {
    /// The lowest amount a delivery is charged.
    pub minimum_charge: Decimal,
    /// Divisor turning cubic centimetres into volumetric kilograms.
    #[serde(default = "default_volumetric_divisor")]
    pub volumetric_divisor: Decimal,
    /// Flat handling fee for fragile parcels.
    #[serde(default)]
    pub fragile_fee: Decimal,
    /// Insurance percentage of the declared value.
    #[serde(default)]
    pub insurance_percent: Decimal,
    /// Map of service level to rates.
    pub service_levels: HashMap<String, ServiceLevelRate>,
    /// Surcharge percentages.
    pub surcharges: SurchargeRates,
}

fn unit_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_volumetric_divisor() -> Decimal {
    Decimal::from(5000)
}

/// Configuration row for one tenant, loaded from `tenants/<client>.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantConfig {
    /// The tenant-scoping key.
    pub client_identifier: String,
    /// The tenant's business name.
    pub name: String,
    /// ISO currency code for all amounts.
    pub currency: String,
    /// Holidays observed by the tenant.
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
    /// Prefixes for generated identifiers.
    #[serde(default)]
    pub codes: CodeFormats,
    /// Tenant-specific VIP discounts overriding the platform defaults.
    #[serde(default)]
    pub vip_tiers: Option<VipTierRates>,
    /// Transportation rates, if the tenant runs dispatch.
    #[serde(default)]
    pub transportation: Option<TransportationRates>,
    /// Parcel delivery rates, if the tenant runs parcel delivery.
    #[serde(default)]
    pub parcel_delivery: Option<ParcelDeliveryRates>,
}

impl TenantConfig {
    /// Returns true if `date` is one of the tenant's holidays.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.date == date)
    }

    /// Returns the transportation rate table, or `ModuleNotConfigured`.
    pub fn transportation_rates(&self) -> PlatformResult<&TransportationRates> {
        self.transportation
            .as_ref()
            .ok_or_else(|| self.module_not_configured("transportation"))
    }

    /// Returns the parcel delivery rate table, or `ModuleNotConfigured`.
    pub fn parcel_delivery_rates(&self) -> PlatformResult<&ParcelDeliveryRates> {
        self.parcel_delivery
            .as_ref()
            .ok_or_else(|| self.module_not_configured("parcel_delivery"))
    }

    /// Rejects rates, percentages and divisors outside their allowed ranges.
    ///
    /// `path` names the file the tenant was loaded from.
    pub fn validate(&self, path: &str) -> PlatformResult<()> {
        if let Some(tiers) = &self.vip_tiers {
            tiers.validate(path)?;
        }

        if let Some(rates) = &self.transportation {
            check_amount(path, "transportation.minimum_charge", rates.minimum_charge)?;
            check_amount(path, "transportation.per_stop_fee", rates.per_stop_fee)?;
            for (code, v) in &rates.vehicles {
                let row = format!("transportation.vehicles.{}", code);
                check_rate_row(path, &row, v.base_rate, v.per_km, v.per_kg, v.multiplier)?;
            }
            rates.surcharges.validate(path, "transportation")?;
        }

        if let Some(rates) = &self.parcel_delivery {
            check_amount(path, "parcel_delivery.minimum_charge", rates.minimum_charge)?;
            check_amount(path, "parcel_delivery.fragile_fee", rates.fragile_fee)?;
            check_range(path, "parcel_delivery.insurance_percent", rates.insurance_percent, 0, 100)?;
            check_range(
                path,
                "parcel_delivery.volumetric_divisor",
                rates.volumetric_divisor,
                1,
                MAX_AMOUNT,
            )?;
            for (code, l) in &rates.service_levels {
                let row = format!("parcel_delivery.service_levels.{}", code);
                check_rate_row(path, &row, l.base_rate, l.per_km, l.per_kg, l.multiplier)?;
            }
            rates.surcharges.validate(path, "parcel_delivery")?;
        }

        Ok(())
    }

    fn module_not_configured(&self, module: &str) -> PlatformError {
        PlatformError::ModuleNotConfigured {
            client_identifier: self.client_identifier.clone(),
            module: module.to_string(),
        }
    }
}

/// The complete platform configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    platform: PlatformFile,
    tenants: HashMap<String, TenantConfig>,
}

impl PlatformConfig {
    /// Creates a new PlatformConfig from its component parts.
    pub fn new(platform: PlatformFile, tenants: HashMap<String, TenantConfig>) -> Self {
        Self { platform, tenants }
    }

    /// Returns the platform metadata.
    pub fn metadata(&self) -> &PlatformMetadata {
        &self.platform.platform
    }

    /// Returns the pagination defaults.
    pub fn pagination(&self) -> PaginationSettings {
        self.platform.pagination
    }

    /// Returns the default VIP tier rates.
    pub fn default_vip_tiers(&self) -> VipTierRates {
        self.platform.vip_tiers
    }

    /// Returns the maintenance settings.
    pub fn maintenance(&self) -> &MaintenanceSettings {
        &self.platform.maintenance
    }

    /// Returns all tenants keyed by client identifier.
    pub fn tenants(&self) -> &HashMap<String, TenantConfig> {
        &self.tenants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_window_is_half_open() {
        let window = TimeWindow {
            start: time(7, 0),
            end: time(9, 0),
        };
        assert!(window.contains(time(7, 0)));
        assert!(window.contains(time(8, 59)));
        assert!(!window.contains(time(9, 0)));
        assert!(!window.contains(time(6, 59)));
    }

    #[test]
    fn test_time_window_wraps_midnight() {
        let window = TimeWindow {
            start: time(22, 0),
            end: time(2, 0),
        };
        assert!(window.contains(time(22, 0)));
        assert!(window.contains(time(0, 30)));
        assert!(!window.contains(time(12, 0)));
    }

    #[test]
    fn test_tenant_defaults_when_optional_sections_missing() {
        let yaml = r#"
client_identifier: "corner-cafe"
name: "Corner Cafe"
currency: "PHP"
"#;
        let tenant: TenantConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tenant.codes.arn_prefix, "ARN");
        assert_eq!(tenant.codes.bill_prefix, "BILL");
        assert_eq!(tenant.codes.order_prefix, "ORD");
        assert!(tenant.transportation.is_none());
        assert!(tenant.parcel_delivery.is_none());
        assert!(tenant.vip_tiers.is_none());
        assert!(tenant.holidays.is_empty());
    }

    #[test]
    fn test_vehicle_multiplier_defaults_to_one() {
        let yaml = r#"
base_rate: "300.00"
per_km: "15.00"
per_kg: "0.50"
"#;
        let rate: VehicleRate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rate.multiplier, Decimal::ONE);
    }

    #[test]
    fn test_vip_tier_above_100_is_rejected() {
        let tiers = VipTierRates {
            silver: Decimal::from(5),
            gold: Decimal::from(120),
            platinum: Decimal::from(15),
        };
        match tiers.validate("platform.yaml") {
            Err(PlatformError::ConfigParseError { path, message }) => {
                assert_eq!(path, "platform.yaml");
                assert!(message.contains("vip_tiers.gold"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_tenant_rate_limits() {
        let yaml = r#"
client_identifier: "fast-freight"
name: "Fast Freight"
currency: "PHP"
parcel_delivery:
  minimum_charge: "60.00"
  volumetric_divisor: "0.001"
  service_levels:
    standard:
      base_rate: "50.00"
      per_km: "2.00"
      per_kg: "12.00"
  surcharges:
    peak_hour_percent: "10"
    weekend_percent: "15"
    holiday_percent: "30"
    urgent_percent: "25"
"#;
        let mut tenant: TenantConfig = serde_yaml::from_str(yaml).unwrap();
        match tenant.validate("fast-freight.yaml") {
            Err(PlatformError::ConfigParseError { message, .. }) => {
                assert!(message.contains("volumetric_divisor"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        let parcel = tenant.parcel_delivery.as_mut().unwrap();
        parcel.volumetric_divisor = Decimal::from(5000);
        assert!(tenant.validate("fast-freight.yaml").is_ok());

        let parcel = tenant.parcel_delivery.as_mut().unwrap();
        parcel.surcharges.urgent_percent = Decimal::from(-5);
        assert!(tenant.validate("fast-freight.yaml").is_err());
    }

    #[test]
    fn test_pagination_defaults() {
        let settings = PaginationSettings::default();
        assert_eq!(settings.default_per_page, 15);
        assert_eq!(settings.max_per_page, 100);
    }
}
