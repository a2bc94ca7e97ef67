//! Delivery fee estimate.
//!
//! There is no geocoding here. Distance is guessed from how far the
//! customer's postal code is numerically from the shop's, with a random
//! spread inside each band, so the same address can quote different fees.
//! Callers pass the random source in.

use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;

/// Shop postal code used when none is configured (Denver, CO).
pub const DEFAULT_BUSINESS_POSTAL_CODE: &str = "80202";

/// Dollars charged per estimated mile.
const RATE_PER_MILE: Decimal = Decimal::TWO;
/// Fee floor in dollars.
const MIN_FEE: Decimal = Decimal::TEN;
/// Fee ceiling in dollars.
const MAX_FEE: Decimal = Decimal::ONE_HUNDRED;

/// Digits of a postal code that take part in the distance estimate.
const ZIP_DIGITS: usize = 5;

/// In-region distance bands in miles, keyed by the exclusive upper bound on
/// the postal code difference. The last band catches everything else.
const REGION_BANDS: [(u32, f64, f64); 3] = [(10, 2.0, 7.0), (50, 5.0, 20.0), (100, 15.0, 40.0)];
const REGION_FAR_BAND: (f64, f64) = (40.0, 70.0);
const OUT_OF_REGION_BAND: (f64, f64) = (50.0, 100.0);

/// Errors raised before any estimate is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Please fill in all required address fields")]
    MissingField(&'static str),
    #[error("Please enter a valid ZIP code (got {0:?})")]
    InvalidPostalCode(String),
}

/// Where the tires go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    /// Optional; only used in the one-line form.
    pub state: String,
    pub postal_code: String,
}

impl DeliveryAddress {
    /// Street, city and postal code must be present.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        for (name, value) in [
            ("street", &self.street),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ] {
            if value.trim().is_empty() {
                return Err(DeliveryError::MissingField(name));
            }
        }
        Ok(())
    }

    /// `"street, city, state postal"`.
    #[must_use]
    pub fn one_line(&self) -> String {
        let state = self.state.trim();
        let region = if state.is_empty() {
            self.postal_code.trim().to_string()
        } else {
            format!("{state} {}", self.postal_code.trim())
        };
        format!("{}, {}, {region}", self.street.trim(), self.city.trim())
    }
}

/// A computed delivery estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryQuote {
    /// Estimated miles, one decimal place.
    pub distance: Decimal,
    /// Dollars, clamped to the fee floor and ceiling.
    pub fee: Decimal,
    /// One-line address the quote was made for.
    pub address: String,
}

/// Source of the random spread inside a distance band.
///
/// Every [`rand::Rng`] is a sampler. Tests can pin the draw.
pub trait DistanceSampler {
    /// A value in `[low, high)`.
    fn sample(&mut self, low: f64, high: f64) -> f64;
}

impl<R: Rng + ?Sized> DistanceSampler for R {
    fn sample(&mut self, low: f64, high: f64) -> f64 {
        self.random_range(low..high)
    }
}

/// Postal-code distance heuristic and fee schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryEstimator {
    business_code: u32,
    region_prefix: String,
}

impl Default for DeliveryEstimator {
    fn default() -> Self {
        Self {
            business_code: 80202,
            region_prefix: "80".to_string(),
        }
    }
}

impl DeliveryEstimator {
    /// Estimator centred on the given shop postal code. The region is its
    /// first two digits.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidPostalCode`] if the code has fewer
    /// than two leading digits.
    pub fn new(business_postal_code: &str) -> Result<Self, DeliveryError> {
        let trimmed = business_postal_code.trim();
        let invalid = || DeliveryError::InvalidPostalCode(trimmed.to_string());
        let business_code = leading_number(trimmed).ok_or_else(invalid)?;
        let region_prefix = trimmed.get(..2).filter(|p| p.bytes().all(|b| b.is_ascii_digit()));

        Ok(Self {
            business_code,
            region_prefix: region_prefix.ok_or_else(invalid)?.to_string(),
        })
    }

    /// Guess the driving distance in miles, rounded to one decimal.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidPostalCode`] if the code does not start
    /// with a digit.
    pub fn estimate_distance<S: DistanceSampler + ?Sized>(
        &self,
        postal_code: &str,
        sampler: &mut S,
    ) -> Result<Decimal, DeliveryError> {
        let trimmed = postal_code.trim();
        let code = leading_number(trimmed)
            .ok_or_else(|| DeliveryError::InvalidPostalCode(trimmed.to_string()))?;
        let diff = code.abs_diff(self.business_code);

        let (low, high) = if trimmed.starts_with(&self.region_prefix) {
            REGION_BANDS
                .iter()
                .find(|(bound, _, _)| diff < *bound)
                .map_or(REGION_FAR_BAND, |&(_, low, high)| (low, high))
        } else {
            OUT_OF_REGION_BAND
        };

        let miles = sampler.sample(low, high);
        Ok(round_tenth(miles))
    }

    /// `distance * $2`, clamped to `[$10, $100]`.
    #[must_use]
    pub fn fee_for_distance(&self, distance: Decimal) -> Decimal {
        (distance * RATE_PER_MILE).clamp(MIN_FEE, MAX_FEE)
    }

    /// Validate the address and produce a quote.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the address is incomplete or the postal
    /// code cannot be read.
    pub fn quote<S: DistanceSampler + ?Sized>(
        &self,
        address: &DeliveryAddress,
        sampler: &mut S,
    ) -> Result<DeliveryQuote, DeliveryError> {
        address.validate()?;
        let distance = self.estimate_distance(&address.postal_code, sampler)?;
        let fee = self.fee_for_distance(distance);
        tracing::debug!(%distance, %fee, postal_code = %address.postal_code, "delivery quoted");

        Ok(DeliveryQuote {
            distance,
            fee,
            address: address.one_line(),
        })
    }
}

/// Parse at most the first five leading ASCII digits, so `80202-1234` and
/// `802021234` both read as 80202.
fn leading_number(s: &str) -> Option<u32> {
    let end = s.bytes().take_while(u8::is_ascii_digit).take(ZIP_DIGITS).count();
    s.get(..end).filter(|d| !d.is_empty())?.parse().ok()
}

#[allow(clippy::cast_possible_truncation)] // band bounds keep miles far below i64 range
fn round_tenth(miles: f64) -> Decimal {
    let tenths = (miles * 10.0).round() as i64;
    Decimal::new(tenths, 1)
}
