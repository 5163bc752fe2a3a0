//! Typed lengths
//!
//! Room dimensions arrive in feet or meters. The calculation itself runs in
//! meters, so every crossing between the two goes through `Length<U>` and a
//! mixed-unit expression fails to compile instead of producing a wrong PPFD.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};

/// Feet to meters
pub const FEET_TO_METERS: f64 = 0.3048;

/// A unit of length with a fixed factor to meters
pub trait Unit: Copy + fmt::Debug {
    const TO_METERS: f64;
    const SYMBOL: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub struct Meters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub struct Feet;

impl Unit for Meters {
    const TO_METERS: f64 = 1.0;
    const SYMBOL: &'static str = "m";
}

impl Unit for Feet {
    const TO_METERS: f64 = FEET_TO_METERS;
    const SYMBOL: &'static str = "ft";
}

/// A length tagged with its unit at the type level
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Length<U: Unit> {
    value: f64,
    unit: PhantomData<U>,
}

impl<U: Unit> Length<U> {
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            unit: PhantomData,
        }
    }

    pub const fn value(self) -> f64 {
        self.value
    }

    /// Convert into another unit
    pub fn to<V: Unit>(self) -> Length<V> {
        Length::new(self.value * U::TO_METERS / V::TO_METERS)
    }

    pub fn to_meters(self) -> Length<Meters> {
        self.to::<Meters>()
    }
}

impl<U: Unit> Add for Length<U> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value)
    }
}

impl<U: Unit> Sub for Length<U> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value)
    }
}

impl<U: Unit> Mul<f64> for Length<U> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.value * rhs)
    }
}

impl<U: Unit> Div<f64> for Length<U> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.value / rhs)
    }
}

/// Area in square meters, only obtainable from two meter lengths
impl Mul for Length<Meters> {
    type Output = f64;
    fn mul(self, rhs: Self) -> f64 {
        self.value * rhs.value
    }
}

impl<U: Unit> fmt::Display for Length<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, U::SYMBOL)
    }
}

/// Runtime unit tag carried by a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Feet,
    #[default]
    Meters,
}

impl LengthUnit {
    /// Convert a raw value in this unit to meters
    pub fn to_meters(self, value: f64) -> Length<Meters> {
        match self {
            Self::Feet => Length::<Feet>::new(value).to_meters(),
            Self::Meters => Length::<Meters>::new(value),
        }
    }

    /// Convert meters back to a raw value in this unit
    pub fn from_meters(self, length: Length<Meters>) -> f64 {
        match self {
            Self::Feet => length.to::<Feet>().value(),
            Self::Meters => length.value(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Feet => Feet::SYMBOL,
            Self::Meters => Meters::SYMBOL,
        }
    }
}
