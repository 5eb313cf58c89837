//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Attempts to create a new [`Money`] amount from the provided [`f64`].
    ///
    /// # Errors
    ///
    /// If the provided value is not a finite number representable as a
    /// [`Decimal`] (`NaN`, infinite, or out-of-range values are rejected
    /// rather than being coerced to zero).
    pub fn try_from_f64(
        amount: f64,
        currency: Currency,
    ) -> Result<Self, InvalidAmountError> {
        Decimal::from_f64(amount)
            .map(|amount| Self { amount, currency })
            .ok_or(InvalidAmountError)
    }
}

/// Error of a numeric value not representing a valid [`Money`] amount.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("not a finite `Money` amount")]
pub struct InvalidAmountError;

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Thai Baht."]
        Thb = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45THB").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Thb,
            },
        );

        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );

        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Th").is_err());
        assert!(Money::from_str("123.45Thbaht").is_err());

        assert!(Money::from_str("123.00THB").is_ok());
        assert!(Money::from_str("123.0THB").is_ok());
        assert!(Money::from_str("123THB").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Thb,
            }
            .to_string(),
            "123.45THB",
        );

        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123.45USD",
        );

        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            }
            .to_string(),
            "123.45EUR",
        );

        assert_eq!(
            Money {
                amount: decimal("123.00"),
                currency: Currency::Thb,
            }
            .to_string(),
            "123THB",
        );
        assert_eq!(
            Money {
                amount: decimal("123.0"),
                currency: Currency::Thb,
            }
            .to_string(),
            "123THB",
        );
        assert_eq!(
            Money {
                amount: decimal("123"),
                currency: Currency::Thb,
            }
            .to_string(),
            "123THB",
        );
    }

    #[test]
    fn try_from_f64() {
        assert_eq!(
            Money::try_from_f64(1500.5, Currency::Thb).unwrap(),
            Money {
                amount: decimal("1500.5"),
                currency: Currency::Thb,
            },
        );
        assert_eq!(
            Money::try_from_f64(0.0, Currency::Thb).unwrap(),
            Money {
                amount: decimal("0"),
                currency: Currency::Thb,
            },
        );

        assert!(Money::try_from_f64(f64::NAN, Currency::Thb).is_err());
        assert!(Money::try_from_f64(f64::INFINITY, Currency::Thb).is_err());
        assert!(
            Money::try_from_f64(f64::NEG_INFINITY, Currency::Thb).is_err()
        );
    }
}
