//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep daily series columns from being mixed up: an air
//! temperature cannot be added to a precipitation rate, and a temperature
//! anomaly is distinct from an absolute temperature.
//!
//! # Design Philosophy
//! - All quantities use f64; daily series are small and precision matters for
//!   reproducible CSV output
//! - Total ordering via `Ord` (NaN handled as greater than all values) so
//!   columns can be sorted for percentile calculations
//! - `Deref<Target = f64>` for direct use in arithmetic
//! - Serde support; each type serializes as its bare number
//!
//! # Usage
//! ```
//! use heatwave_baseline_core::core_types::units::{Celsius, CelsiusDelta};
//!
//! let base = Celsius::new(24.0);
//! let warmed = base + CelsiusDelta::new(8.0);
//! assert_eq!(*warmed, 32.0);
//! assert_eq!(warmed - base, CelsiusDelta::new(8.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Mul, Sub};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Create a new Celsius temperature
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Celsius(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Celsius {
    fn from(v: f64) -> Self {
        Celsius(v)
    }
}

impl From<Celsius> for f64 {
    fn from(c: Celsius) -> f64 {
        c.0
    }
}

/// Temperature difference in Celsius (anomalies, injected bumps)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CelsiusDelta(f64);

impl Eq for CelsiusDelta {}

impl PartialOrd for CelsiusDelta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CelsiusDelta {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for CelsiusDelta {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl CelsiusDelta {
    /// Create a temperature delta (can be any value, positive or negative)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        CelsiusDelta(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for CelsiusDelta {
    fn from(v: f64) -> Self {
        CelsiusDelta(v)
    }
}

impl Mul<f64> for CelsiusDelta {
    type Output = CelsiusDelta;
    fn mul(self, rhs: f64) -> CelsiusDelta {
        CelsiusDelta(self.0 * rhs)
    }
}

impl fmt::Display for CelsiusDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.1}°C", self.0)
    }
}

// Celsius + CelsiusDelta = Celsius (adding an anomaly to an absolute temperature)
impl Add<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn add(self, rhs: CelsiusDelta) -> Celsius {
        Celsius(self.0 + rhs.0)
    }
}

impl AddAssign<CelsiusDelta> for Celsius {
    fn add_assign(&mut self, rhs: CelsiusDelta) {
        self.0 += rhs.0;
    }
}

// Celsius - Celsius = CelsiusDelta
impl Sub for Celsius {
    type Output = CelsiusDelta;
    fn sub(self, rhs: Celsius) -> CelsiusDelta {
        CelsiusDelta(self.0 - rhs.0)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// MOISTURE AND PRECIPITATION TYPES
// ============================================================================

/// Specific humidity proxy in grams of water vapour per kilogram of air
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct GramsPerKilogram(f64);

impl Eq for GramsPerKilogram {}

impl PartialOrd for GramsPerKilogram {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GramsPerKilogram {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for GramsPerKilogram {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl GramsPerKilogram {
    /// Create a new humidity value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        GramsPerKilogram(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for GramsPerKilogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} g/kg", self.0)
    }
}

/// Precipitation rate in millimetres per day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MillimetersPerDay(f64);

impl Eq for MillimetersPerDay {}

impl PartialOrd for MillimetersPerDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MillimetersPerDay {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for MillimetersPerDay {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl MillimetersPerDay {
    /// No precipitation
    pub const ZERO: MillimetersPerDay = MillimetersPerDay(0.0);

    /// Create a new precipitation rate
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MillimetersPerDay(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Add for MillimetersPerDay {
    type Output = MillimetersPerDay;
    fn add(self, rhs: MillimetersPerDay) -> MillimetersPerDay {
        MillimetersPerDay(self.0 + rhs.0)
    }
}

impl fmt::Display for MillimetersPerDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mm/day", self.0)
    }
}

// ============================================================================
// ENERGY TYPES
// ============================================================================

/// Specific energy in joules per kilogram (convective available potential energy)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct JoulesPerKilogram(f64);

impl Eq for JoulesPerKilogram {}

impl PartialOrd for JoulesPerKilogram {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JoulesPerKilogram {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for JoulesPerKilogram {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl JoulesPerKilogram {
    /// Create a new specific energy
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        JoulesPerKilogram(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for JoulesPerKilogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} J/kg", self.0)
    }
}
