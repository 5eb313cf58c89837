//! [`Car`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::shop;
#[cfg(doc)]
use crate::domain::{Rental, Shop};

/// Vehicle offered for rent by a [`Shop`].
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: Id,

    /// ID of the [`Shop`] owning this [`Car`].
    pub shop_id: shop::Id,

    /// [`Brand`] of this [`Car`].
    pub brand: Brand,

    /// [`Model`] of this [`Car`].
    pub model: Model,

    /// Manufacturing year of this [`Car`].
    pub year: Year,

    /// [`LicensePlate`] of this [`Car`].
    pub license_plate: LicensePlate,

    /// [`Kind`] of this [`Car`].
    pub kind: Kind,

    /// [`Transmission`] of this [`Car`].
    pub transmission: Transmission,

    /// [`Fuel`] this [`Car`] runs on.
    pub fuel: Fuel,

    /// Number of seats in this [`Car`].
    pub seats: Seats,

    /// [`Color`] of this [`Car`].
    pub color: Color,

    /// Optional free-form [`Description`] of this [`Car`].
    pub description: Option<Description>,

    /// Price of renting this [`Car`] for one day.
    pub daily_rate: Money,

    /// Optional daily insurance surcharge.
    ///
    /// Counts as zero when absent.
    pub insurance_rate: Option<Money>,

    /// [`Status`] of this [`Car`].
    pub status: Status,

    /// [`DateTime`](common::DateTime) when this [`Car`] was created.
    pub created_at: CreationDateTime,
}

impl Car {
    /// Checks whether this [`Car`] can be booked for a new [`Rental`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }
}

/// ID of a [`Car`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Brand of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Brand(String);

impl Brand {
    /// Creates a new [`Brand`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `brand` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(brand: impl Into<String>) -> Self {
        Self(brand.into())
    }

    /// Creates a new [`Brand`] if the given `brand` is valid.
    #[must_use]
    pub fn new(brand: impl Into<String>) -> Option<Self> {
        let brand = brand.into();
        Self::check(&brand).then_some(Self(brand))
    }

    /// Checks whether the given `brand` is a valid [`Brand`].
    fn check(brand: impl AsRef<str>) -> bool {
        let brand = brand.as_ref();
        brand.trim() == brand && !brand.is_empty() && brand.len() <= 128
    }
}

impl FromStr for Brand {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Brand`")
    }
}

/// Model of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `model` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        model.trim() == model && !model.is_empty() && model.len() <= 128
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Manufacturing year of a [`Car`].
pub type Year = u16;

/// Number of seats in a [`Car`].
pub type Seats = u16;

/// License plate of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Creates a new [`LicensePlate`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `plate` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(plate: impl Into<String>) -> Self {
        Self(plate.into())
    }

    /// Creates a new [`LicensePlate`] if the given `plate` is valid.
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Option<Self> {
        let plate = plate.into();
        Self::check(&plate).then_some(Self(plate))
    }

    /// Checks whether the given `plate` is a valid [`LicensePlate`].
    fn check(plate: impl AsRef<str>) -> bool {
        let plate = plate.as_ref();
        plate.trim() == plate && !plate.is_empty() && plate.len() <= 32
    }
}

impl FromStr for LicensePlate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `LicensePlate`")
    }
}

/// Color of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Color(String);

impl Color {
    /// Creates a new [`Color`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `color` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    /// Creates a new [`Color`] if the given `color` is valid.
    #[must_use]
    pub fn new(color: impl Into<String>) -> Option<Self> {
        let color = color.into();
        Self::check(&color).then_some(Self(color))
    }

    /// Checks whether the given `color` is a valid [`Color`].
    fn check(color: impl AsRef<str>) -> bool {
        let color = color.as_ref();
        color.trim() == color && !color.is_empty() && color.len() <= 64
    }
}

impl FromStr for Color {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Color`")
    }
}

/// Free-form description of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 2048
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Car`]."]
    enum Kind {
        #[doc = "Sedan."]
        Sedan = 1,

        #[doc = "Sport utility vehicle."]
        Suv = 2,

        #[doc = "Hatchback."]
        Hatchback = 3,

        #[doc = "Pickup truck."]
        Pickup = 4,

        #[doc = "Van."]
        Van = 5,

        #[doc = "Luxury car."]
        Luxury = 6,
    }
}

define_kind! {
    #[doc = "Transmission of a [`Car`]."]
    enum Transmission {
        #[doc = "Manual gearbox."]
        Manual = 1,

        #[doc = "Automatic gearbox."]
        Automatic = 2,
    }
}

define_kind! {
    #[doc = "Fuel a [`Car`] runs on."]
    enum Fuel {
        #[doc = "Gasoline."]
        Gasoline = 1,

        #[doc = "Diesel."]
        Diesel = 2,

        #[doc = "Hybrid."]
        Hybrid = 3,

        #[doc = "Electric."]
        Electric = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Car`]."]
    enum Status {
        #[doc = "Free to be booked."]
        Available = 1,

        #[doc = "Held by an approved `Rental`."]
        Rented = 2,

        #[doc = "Taken out of service by the `Shop`."]
        Maintenance = 3,
    }
}

/// [`DateTime`](common::DateTime) when a [`Car`] was created.
pub type CreationDateTime = DateTimeOf<(Car, unit::Creation)>;
