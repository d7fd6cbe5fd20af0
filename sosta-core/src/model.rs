//! Domain data structures for plates, purchased parking, and normalized
//! provider responses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::SostaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Outcome classification for a single provider interaction.
///
/// Every call to a provider ends in exactly one of these states. The two
/// `SUCCESS_*` members mean the provider answered the question, even when the
/// answer is "plate unknown"; the `ERROR_*` members mean the question could
/// not be answered and travel inside a failure [`ValidationResult`].
pub enum ProviderStatus {
    /// Provider answered and reported parking data for the plate.
    #[serde(rename = "SUCCESS_OK")]
    Ok,
    /// Provider answered but has no record of the plate.
    #[serde(rename = "SUCCESS_PLATE_NOT_FOUND")]
    PlateNotFound,
    /// Provider service is unreachable or returned a server-side failure.
    #[serde(rename = "ERROR_PROVIDER_UNAVAILABLE")]
    ProviderUnavailable,
    /// Provider rejected the configured credentials.
    #[serde(rename = "ERROR_PROVIDER_AUTHENTICATION")]
    ProviderAuthentication,
    /// Provider rejected the plate as malformed for its format rules.
    #[serde(rename = "ERROR_INVALID_PLATE_FORMAT")]
    InvalidPlateFormat,
    /// Provider rejected the request as malformed.
    #[serde(rename = "ERROR_PROVIDER_BAD_REQUEST")]
    ProviderBadRequest,
    /// Local driver configuration is incomplete or inconsistent.
    #[serde(rename = "ERROR_PROVIDER_CONFIGURATION")]
    ProviderConfiguration,
    /// Connection to the provider timed out.
    #[serde(rename = "ERROR_CONNECTION_TIMEOUT")]
    ConnectionTimeout,
    /// Provider response could not be parsed into the expected shape.
    #[serde(rename = "ERROR_INVALID_RESPONSE")]
    InvalidResponse,
    /// Any provider failure with no more precise classification.
    #[serde(rename = "ERROR_PROVIDER_UNKNOWN")]
    ProviderUnknown,
}

impl ProviderStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Ok,
        Self::PlateNotFound,
        Self::ProviderUnavailable,
        Self::ProviderAuthentication,
        Self::InvalidPlateFormat,
        Self::ProviderBadRequest,
        Self::ProviderConfiguration,
        Self::ConnectionTimeout,
        Self::InvalidResponse,
        Self::ProviderUnknown,
    ];

    /// Stable identifier used as the key for external message lookup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "SUCCESS_OK",
            Self::PlateNotFound => "SUCCESS_PLATE_NOT_FOUND",
            Self::ProviderUnavailable => "ERROR_PROVIDER_UNAVAILABLE",
            Self::ProviderAuthentication => "ERROR_PROVIDER_AUTHENTICATION",
            Self::InvalidPlateFormat => "ERROR_INVALID_PLATE_FORMAT",
            Self::ProviderBadRequest => "ERROR_PROVIDER_BAD_REQUEST",
            Self::ProviderConfiguration => "ERROR_PROVIDER_CONFIGURATION",
            Self::ConnectionTimeout => "ERROR_CONNECTION_TIMEOUT",
            Self::InvalidResponse => "ERROR_INVALID_RESPONSE",
            Self::ProviderUnknown => "ERROR_PROVIDER_UNKNOWN",
        }
    }

    /// True for the two statuses where the provider answered the question.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::PlateNotFound)
    }

    /// True for every status that is not a success; the two predicates
    /// partition the enum.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identifier = self.as_str();
        write!(formatter, "{identifier}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Vehicle license-plate identifier, in whatever format the provider expects.
pub struct Plate(pub String);

impl fmt::Display for Plate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Plate(plate) = self;
        write!(formatter, "{plate}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// One purchased parking window as reported by a provider.
///
/// Providers are trusted to return `start <= end`; equal bounds are accepted.
pub struct PurchasedInterval {
    /// Start of the paid window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the paid window (inclusive).
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Outcome of [`ValidationResult::find_closest_interval`].
///
/// The default value is the "nothing relevant" answer: no interval, no
/// durations, not expired.
pub struct ClosestInterval {
    /// The interval closest to the reference time, if any qualified.
    pub interval: Option<PurchasedInterval>,
    /// Paid duration of the selected interval, truncated to whole minutes.
    pub duration_minutes: Option<i64>,
    /// Whole minutes elapsed past the selected interval's end; zero while the
    /// interval is still running.
    pub overflow_minutes: Option<i64>,
    /// Whether the reference time lies strictly after the selected interval.
    pub is_expired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Normalized answer to "is this plate legally parked?", produced by a
/// provider adapter after every [`check_plate`] call.
///
/// Success results are built directly by the adapter, which owns the richer
/// data (validity, end time, purchased intervals). Failure results go through
/// [`ValidationResult::failure`].
///
/// [`check_plate`]: crate::ports::ParkingValidator::check_plate
pub struct ValidationResult {
    /// How the provider interaction ended.
    pub status: ProviderStatus,
    /// Plate the question was asked about.
    pub plate: Plate,
    /// Moment the adapter began processing the request.
    pub request_timestamp: DateTime<Utc>,
    /// Instant for which parking validity was evaluated.
    pub verification_timestamp: DateTime<Utc>,
    /// Whether the plate was legally parked at the verification instant.
    pub is_valid: bool,
    /// End of the currently relevant paid window, when the provider knows it.
    pub parking_end_time: Option<DateTime<Utc>>,
    /// Paid windows reported by the provider, most relevant first or not;
    /// reconciliation does not assume any ordering.
    pub purchased_intervals: Option<Vec<PurchasedInterval>>,
}

impl ValidationResult {
    /// Build a result for a failed provider interaction.
    ///
    /// `verification_timestamp` falls back to `request_timestamp` when the
    /// failure happened before the adapter knew the verification instant.
    ///
    /// # Errors
    ///
    /// Returns [`SostaError::InvalidFailureConstruction`] when `status` is a
    /// success value; a success result needs data this path cannot supply.
    pub fn failure(
        status: ProviderStatus,
        plate: Plate,
        request_timestamp: DateTime<Utc>,
        verification_timestamp: Option<DateTime<Utc>>,
    ) -> Result<Self, SostaError> {
        if status.is_success() {
            return Err(SostaError::InvalidFailureConstruction { status });
        }

        Ok(Self {
            status,
            plate,
            request_timestamp,
            verification_timestamp: verification_timestamp.unwrap_or(request_timestamp),
            is_valid: false,
            parking_end_time: None,
            purchased_intervals: None,
        })
    }

    /// Find the purchased interval closest to `reference_time` and how far
    /// past its end the reference time is.
    ///
    /// Intervals starting after `reference_time` are never selected. Among the
    /// rest, an interval containing the reference time (bounds inclusive) has
    /// distance zero; otherwise the distance is the whole-minute gap between
    /// the interval's end and the reference time. Ties keep the interval seen
    /// first. Pure; safe to call concurrently.
    #[must_use]
    pub fn find_closest_interval(&self, reference_time: DateTime<Utc>) -> ClosestInterval {
        let Some(intervals) = self.purchased_intervals.as_deref() else {
            return ClosestInterval::default();
        };

        let mut closest: Option<PurchasedInterval> = None;
        let mut min_distance = i64::MAX;

        for interval in intervals {
            // skip intervals that have not started yet
            if reference_time < interval.start {
                continue;
            }

            let distance = distance_from_interval(reference_time, *interval);

            if distance < min_distance {
                min_distance = distance;
                closest = Some(*interval);
            }
        }

        let Some(interval) = closest else {
            return ClosestInterval::default();
        };

        let duration_minutes = (interval.end - interval.start).num_minutes();

        let (overflow_minutes, is_expired) = if reference_time > interval.end {
            ((reference_time - interval.end).num_minutes(), true)
        } else {
            (0, false)
        };

        ClosestInterval {
            interval: Some(interval),
            duration_minutes: Some(duration_minutes),
            overflow_minutes: Some(overflow_minutes),
            is_expired,
        }
    }
}

/// Whole-minute distance between a timestamp and an interval.
///
/// Zero inside the interval; otherwise measured from the interval's end. The
/// before-start case never reaches this point because callers filter out
/// intervals that start after the timestamp.
fn distance_from_interval(reference_time: DateTime<Utc>, interval: PurchasedInterval) -> i64 {
    if reference_time >= interval.start && reference_time <= interval.end {
        return 0;
    }

    (reference_time - interval.end).num_minutes()
}
