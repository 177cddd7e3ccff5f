//! Type-safe wrappers for physical units
//!
//! Replay positions are stored in native engine units and velocities in
//! native units per second. The constants below convert them to the metric
//! values the touch heuristics are tuned on.
//!
//! All unit types serialize with 4 decimal places to keep reports compact.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Native replay units in one meter
pub const UNITS_PER_METER: f32 = 100.0;

/// Seconds per hour divided by meters per kilometer
const MPS_TO_KMH: f32 = 3.6;

/// Round f32 to 4 decimal places for compact JSON serialization
fn round4<S: serde::Serializer>(val: &f32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f32((*val * 10000.0).round() / 10000.0)
}

/// Meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Meters(#[serde(serialize_with = "round4")] pub f32);

impl Meters {
    /// Convert a distance in native replay units
    pub fn from_units(units: f32) -> Self {
        Self(units / UNITS_PER_METER)
    }
}

/// Kilometers per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct KilometersPerHour(#[serde(serialize_with = "round4")] pub f32);

impl KilometersPerHour {
    /// Convert a speed in native replay units per second
    pub fn from_units_per_second(units_per_second: f32) -> Self {
        Self(units_per_second / UNITS_PER_METER * MPS_TO_KMH)
    }
}

/// Seconds (timestamps, durations)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(#[serde(serialize_with = "round4")] pub f32);

impl Add for Seconds {
    type Output = Seconds;

    fn add(self, rhs: Self) -> Self::Output {
        Seconds(self.0 + rhs.0)
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Seconds {
    type Output = Seconds;

    fn sub(self, rhs: Self) -> Self::Output {
        Seconds(self.0 - rhs.0)
    }
}

impl Sum for Seconds {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Seconds(0.0), Add::add)
    }
}

impl<'a> Sum<&'a Seconds> for Seconds {
    fn sum<I: Iterator<Item = &'a Seconds>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Percentage (0.0 to 100.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Percent(#[serde(serialize_with = "round4")] pub f32);

impl Percent {
    /// `100 * part / whole`, or zero when `whole` is zero
    pub fn of(part: f32, whole: f32) -> Self {
        if whole == 0.0 {
            Self(0.0)
        } else {
            Self(100.0 * part / whole)
        }
    }
}
