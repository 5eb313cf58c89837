//! [`Review`] definitions.

use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, rental, shop};
#[cfg(doc)]
use crate::domain::{Customer, Rental, Shop};

/// Review left by a [`Customer`] for a returned [`Rental`].
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the reviewed [`Rental`].
    pub rental_id: rental::Id,

    /// ID of the [`Customer`] who filed this [`Review`].
    pub customer_id: customer::Id,

    /// ID of the [`Shop`] this [`Review`] is about.
    pub shop_id: shop::Id,

    /// [`Rating`] given by the [`Customer`].
    pub rating: Rating,

    /// Optional free-form [`Comment`].
    pub comment: Option<Comment>,

    /// [`DateTime`](common::DateTime) when this [`Review`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Review`].
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

/// Star rating of a [`Review`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Rating(u8);

impl Rating {
    /// Minimum allowed [`Rating`] value.
    pub const MIN: u8 = 1;

    /// Maximum allowed [`Rating`] value.
    pub const MAX: u8 = 5;

    /// Creates a new [`Rating`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `rating` is within bounds.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(rating: u8) -> Self {
        Self(rating)
    }

    /// Creates a new [`Rating`] if the given `rating` is within bounds.
    #[must_use]
    pub fn new(rating: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&rating).then_some(Self(rating))
    }

    /// Returns the numeric value of this [`Rating`].
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Free-form comment of a [`Review`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `comment` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(comment: impl Into<String>) -> Self {
        Self(comment.into())
    }

    /// Creates a new [`Comment`] if the given `comment` is valid.
    #[must_use]
    pub fn new(comment: impl Into<String>) -> Option<Self> {
        let comment = comment.into();
        Self::check(&comment).then_some(Self(comment))
    }

    /// Checks whether the given `comment` is a valid [`Comment`].
    fn check(comment: impl AsRef<str>) -> bool {
        let comment = comment.as_ref();
        comment.trim() == comment
            && !comment.is_empty()
            && comment.len() <= 2048
    }
}

impl FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

/// [`DateTime`](common::DateTime) when a [`Review`] was created.
pub type CreationDateTime = DateTimeOf<(Review, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Rating;

    #[test]
    fn rating_is_bounded() {
        assert!(Rating::new(0).is_none());
        assert_eq!(Rating::new(1).map(Rating::get), Some(1));
        assert_eq!(Rating::new(5).map(Rating::get), Some(5));
        assert!(Rating::new(6).is_none());
    }
}
