//! High-level service facade in front of the driver registry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{Plate, ValidationResult};
use crate::ports::{ParkingValidator, SostaError};
use crate::registry::DriverRegistry;

/// Public entry point for plate checks across all configured drivers.
pub struct SostaService {
    registry: Arc<DriverRegistry>,
}

impl SostaService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<DriverRegistry>) -> Self {
        Self { registry }
    }

    /// Names of all configured drivers.
    #[must_use]
    pub fn drivers(&self) -> Vec<String> {
        self.registry.driver_names().map(str::to_owned).collect()
    }

    /// The configured default driver name.
    ///
    /// # Errors
    ///
    /// Returns [`SostaError::DefaultDriverNotConfigured`] when unset or blank.
    pub fn default_driver(&self) -> Result<&str, SostaError> {
        self.registry.default_driver()
    }

    /// Resolve a driver by name, or the default driver when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`SostaError`] when the driver cannot be resolved.
    pub fn driver(&self, name: Option<&str>) -> Result<Arc<dyn ParkingValidator>, SostaError> {
        self.registry.resolve(name)
    }

    /// Check a plate through the default driver.
    ///
    /// Provider-side failures are data inside the returned result; only
    /// resolution problems surface as errors.
    ///
    /// # Errors
    ///
    /// Returns a [`SostaError`] when the default driver cannot be resolved.
    pub async fn check_plate(
        &self,
        plate: &Plate,
        verification_time: DateTime<Utc>,
    ) -> Result<ValidationResult, SostaError> {
        let validator = self.registry.resolve(None)?;
        debug!(%plate, "checking plate through default driver");
        Ok(validator.check_plate(plate, verification_time).await)
    }

    /// Check a plate through a named driver.
    ///
    /// # Errors
    ///
    /// Returns a [`SostaError`] when the named driver cannot be resolved.
    pub async fn check_plate_with(
        &self,
        driver: &str,
        plate: &Plate,
        verification_time: DateTime<Utc>,
    ) -> Result<ValidationResult, SostaError> {
        let validator = self.registry.resolve(Some(driver))?;
        debug!(driver, %plate, "checking plate through named driver");
        Ok(validator.check_plate(plate, verification_time).await)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use crate::config::{DriverConfig, HubConfig};
    use crate::model::{ProviderStatus, PurchasedInterval};
    use crate::registry::DriverFactory;

    use super::*;

    struct ScriptedValidator {
        status: ProviderStatus,
    }

    #[async_trait]
    impl ParkingValidator for ScriptedValidator {
        async fn check_plate(
            &self,
            plate: &Plate,
            verification_time: DateTime<Utc>,
        ) -> ValidationResult {
            let window = PurchasedInterval {
                start: verification_time - Duration::minutes(30),
                end: verification_time + Duration::minutes(30),
            };
            ValidationResult {
                status: self.status,
                plate: plate.clone(),
                request_timestamp: verification_time,
                verification_timestamp: verification_time,
                is_valid: true,
                parking_end_time: Some(window.end),
                purchased_intervals: Some(vec![window]),
            }
        }
    }

    fn service() -> SostaService {
        let hub_config: HubConfig = serde_json::from_value(json!({
            "default_driver": "easypark",
            "drivers": {
                "easypark": { "provider": "easypark" },
                "mycicero": { "provider": "mycicero" },
            },
        }))
        .expect("test config deserializes");

        let mut registry = DriverRegistry::new(hub_config);
        registry.register(
            "easypark",
            DriverFactory::new(|_: &DriverConfig| ScriptedValidator {
                status: ProviderStatus::Ok,
            }),
        );
        registry.register(
            "mycicero",
            DriverFactory::new(|_: &DriverConfig| ScriptedValidator {
                status: ProviderStatus::PlateNotFound,
            }),
        );

        SostaService::new(Arc::new(registry))
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[tokio::test]
    async fn check_plate_routes_through_the_default_driver() {
        let service = service();
        let result = service
            .check_plate(&Plate("AA123BB".to_owned()), noon())
            .await
            .expect("default driver resolves");

        assert_eq!(result.status, ProviderStatus::Ok);
        assert_eq!(result.plate, Plate("AA123BB".to_owned()));
        assert!(result.is_valid);

        let answer = result.find_closest_interval(noon());
        assert_eq!(answer.duration_minutes, Some(60));
        assert!(!answer.is_expired);
    }

    #[tokio::test]
    async fn check_plate_with_routes_through_the_named_driver() {
        let service = service();
        let result = service
            .check_plate_with("mycicero", &Plate("AA123BB".to_owned()), noon())
            .await
            .expect("named driver resolves");

        assert_eq!(result.status, ProviderStatus::PlateNotFound);
    }

    #[tokio::test]
    async fn unknown_driver_surfaces_a_resolution_error() {
        let service = service();
        let failed = service
            .check_plate_with("parkeon", &Plate("AA123BB".to_owned()), noon())
            .await;

        assert!(matches!(
            failed,
            Err(SostaError::DriverNotConfigured { driver }) if driver == "parkeon"
        ));
    }

    #[test]
    fn drivers_lists_the_configured_names() {
        assert_eq!(service().drivers(), ["easypark", "mycicero"]);
    }
}
