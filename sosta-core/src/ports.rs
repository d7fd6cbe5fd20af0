//! Provider contract, error taxonomy, and shared status mapping helpers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Error as ReqwestError, StatusCode};

use crate::model::{Plate, ProviderStatus, ValidationResult};

#[derive(thiserror::Error, Debug)]
/// Local configuration and contract errors raised by the core.
///
/// These abort the operation at the detecting call; they are never used for
/// provider-side failures, which travel as [`ProviderStatus`] error values
/// inside an ordinarily returned [`ValidationResult`].
pub enum SostaError {
    /// No default driver name is configured, or the configured value is blank.
    #[error("default parking driver not specified in the hub configuration")]
    DefaultDriverNotConfigured,
    /// The requested driver has no configuration block.
    #[error("driver [{driver}] is not configured")]
    DriverNotConfigured {
        /// Requested driver name.
        driver: String,
    },
    /// The driver block exists but names no provider implementation.
    #[error("driver [{driver}] does not have a provider implementation defined")]
    DriverImplementationMissing {
        /// Requested driver name.
        driver: String,
    },
    /// The referenced provider implementation is not registered.
    #[error("driver [{driver}] provider [{implementation}] does not exist")]
    DriverImplementationNotFound {
        /// Requested driver name.
        driver: String,
        /// Implementation reference from the driver block.
        implementation: String,
    },
    /// The registered implementation does not satisfy [`ParkingValidator`].
    #[error("driver [{driver}] provider [{implementation}] does not implement the ParkingValidator contract")]
    DriverContractViolation {
        /// Requested driver name.
        driver: String,
        /// Implementation reference from the driver block.
        implementation: String,
    },
    /// A failure result was requested for a success status.
    #[error("interaction status {status} is a success, but the response indicates failure")]
    InvalidFailureConstruction {
        /// The offending success status.
        status: ProviderStatus,
    },
}

#[async_trait]
/// Contract every parking provider adapter implements.
///
/// Implementations talk to one concrete backend (EasyPark, MyCicero, Parkeon,
/// ...) and normalize its answers. Obligations:
///
/// - stamp [`ValidationResult::request_timestamp`] with the moment processing
///   begins, not when the network call returns;
/// - map every provider-side outcome onto a [`ProviderStatus`] and return it
///   inside the result, building error outcomes via
///   [`ValidationResult::failure`] — the signature has no error channel on
///   purpose;
/// - report local misconfiguration discovered at call time as
///   [`ProviderStatus::ProviderConfiguration`].
pub trait ParkingValidator: Send + Sync {
    /// Check the parking status of `plate` at `verification_time`.
    async fn check_plate(&self, plate: &Plate, verification_time: DateTime<Utc>)
    -> ValidationResult;
}

/// Classify a transport-layer failure into the shared status taxonomy.
///
/// Adapters built on `reqwest` funnel their request errors through here so
/// every provider reports timeouts, auth rejections, and outages the same way.
#[must_use]
pub fn status_for_transport_error(error: &ReqwestError) -> ProviderStatus {
    if error.is_timeout() {
        return ProviderStatus::ConnectionTimeout;
    }
    if error.is_decode() {
        return ProviderStatus::InvalidResponse;
    }
    match error.status() {
        Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            ProviderStatus::ProviderAuthentication
        }
        Some(StatusCode::BAD_REQUEST) => ProviderStatus::ProviderBadRequest,
        Some(status) if status.is_server_error() => ProviderStatus::ProviderUnavailable,
        Some(_) => ProviderStatus::ProviderUnknown,
        None if error.is_connect() => ProviderStatus::ProviderUnavailable,
        None => ProviderStatus::ProviderUnknown,
    }
}
