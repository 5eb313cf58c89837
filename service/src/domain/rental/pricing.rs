//! Price calculation for a [`Rental`].

use common::{money, Date, Money};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;

#[cfg(doc)]
use super::Rental;
use super::{EndDate, StartDate};
#[cfg(doc)]
use crate::domain::Car;

/// Number of days a [`Rental`] is charged for.
pub type Days = u32;

/// Counts the [`Days`] a [`Rental`] over the provided period is charged for.
///
/// # Errors
///
/// If the period contains no whole day.
pub fn days(start: StartDate, end: EndDate) -> Result<Days, ValidationError> {
    use ValidationError as E;

    let span = start.coerce::<()>().days_until(end.coerce());
    if span <= 0 {
        return Err(E::EmptyPeriod {
            start: start.coerce(),
            end: end.coerce(),
        });
    }
    Days::try_from(span).map_err(|_| E::PeriodTooLong(span))
}

/// Calculates the total price of a [`Rental`] charged for the provided
/// [`Days`] at the provided rates.
///
/// A missing `insurance_rate` counts as zero.
///
/// # Errors
///
/// If any rate is negative, or the rates are denominated in different
/// currencies.
pub fn total(
    days: Days,
    daily_rate: Money,
    insurance_rate: Option<Money>,
) -> Result<Money, ValidationError> {
    use ValidationError as E;

    let insurance = insurance_rate.unwrap_or(Money {
        amount: Decimal::ZERO,
        currency: daily_rate.currency,
    });
    for rate in [daily_rate, insurance] {
        if rate.amount < Decimal::ZERO {
            return Err(E::NegativeRate(rate));
        }
    }
    if insurance.currency != daily_rate.currency {
        return Err(E::CurrencyMismatch {
            daily: daily_rate.currency,
            insurance: insurance.currency,
        });
    }
    Ok(Money {
        amount: Decimal::from(days) * (daily_rate.amount + insurance.amount),
        currency: daily_rate.currency,
    })
}

/// Price of a [`Rental`] quoted at its submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quote {
    /// Number of [`Days`] the [`Rental`] is charged for.
    pub days: Days,

    /// Total price of the [`Rental`].
    pub total: Money,
}

impl Quote {
    /// Quotes a [`Rental`] over the provided period at the provided rates of
    /// the booked [`Car`], validating everything a submission requires.
    ///
    /// # Errors
    ///
    /// If the period starts in the past or contains no whole day, any rate is
    /// malformed, or the resulting price is not positive.
    pub fn for_submission(
        start: StartDate,
        end: EndDate,
        today: Date,
        daily_rate: Money,
        insurance_rate: Option<Money>,
    ) -> Result<Self, ValidationError> {
        use ValidationError as E;

        if start.coerce() < today {
            return Err(E::StartDateInPast {
                start: start.coerce(),
                today,
            });
        }
        let days = days(start, end)?;
        let total = total(days, daily_rate, insurance_rate)?;
        if total.amount <= Decimal::ZERO {
            return Err(E::NonPositiveTotal(total));
        }
        Ok(Self { days, total })
    }
}

/// Error of a [`Rental`] price failing to validate.
#[derive(Clone, Copy, Debug, Display, Error, From)]
pub enum ValidationError {
    /// [`Rental`] period contains no whole day.
    #[display("rental period from `{start}` to `{end}` contains no day")]
    #[from(ignore)]
    EmptyPeriod {
        /// First [`Date`] of the period.
        start: Date,

        /// Last [`Date`] of the period.
        end: Date,
    },

    /// [`Rental`] period spans more days than is representable.
    #[display("rental period of {_0} days is too long")]
    #[from(ignore)]
    PeriodTooLong(#[error(not(source))] i64),

    /// Daily or insurance rate is negative.
    #[display("negative rate: {_0}")]
    #[from(ignore)]
    NegativeRate(#[error(not(source))] Money),

    /// Daily and insurance rates are denominated in different currencies.
    #[display("rates mix `{daily}` and `{insurance}` currencies")]
    #[from(ignore)]
    CurrencyMismatch {
        /// [`money::Currency`] of the daily rate.
        daily: money::Currency,

        /// [`money::Currency`] of the insurance rate.
        insurance: money::Currency,
    },

    /// [`Rental`] period starts in the past.
    #[display("start date `{start}` is before today `{today}`")]
    #[from(ignore)]
    StartDateInPast {
        /// First [`Date`] of the period.
        start: Date,

        /// Today's [`Date`].
        today: Date,
    },

    /// Total price of a [`Rental`] is zero or negative.
    #[display("total price {_0} is not positive")]
    #[from(ignore)]
    NonPositiveTotal(#[error(not(source))] Money),

    /// Rate is not a finite number.
    #[display("invalid rate: {_0}")]
    InvalidAmount(money::InvalidAmountError),
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, Money};
    use rust_decimal::Decimal;

    use super::{days, total, Quote, ValidationError};

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    fn thb(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Thb,
        }
    }

    #[test]
    fn three_day_rental_at_1100_costs_3300() {
        let days =
            days(date(2024, 6, 1).coerce(), date(2024, 6, 4).coerce()).unwrap();
        assert_eq!(days, 3);

        let total = total(days, thb(1000), Some(thb(100))).unwrap();
        assert_eq!(total, thb(3300));
    }

    #[test]
    fn missing_insurance_rate_counts_as_zero() {
        assert_eq!(total(3, thb(1000), None).unwrap(), thb(3000));
    }

    #[test]
    fn fractional_rates_are_exact() {
        let daily = Money {
            amount: "999.99".parse().unwrap(),
            currency: Currency::Thb,
        };
        let insurance = Money {
            amount: "0.01".parse().unwrap(),
            currency: Currency::Thb,
        };

        assert_eq!(total(3, daily, Some(insurance)).unwrap(), thb(3000));
    }

    #[test]
    fn empty_period_is_rejected() {
        let d = date(2024, 6, 1);

        assert!(matches!(
            days(d.coerce(), d.coerce()),
            Err(ValidationError::EmptyPeriod { .. }),
        ));
        assert!(matches!(
            days(d.coerce(), date(2024, 5, 30).coerce()),
            Err(ValidationError::EmptyPeriod { .. }),
        ));
    }

    #[test]
    fn negative_rate_is_rejected() {
        assert!(matches!(
            total(3, thb(-1000), None),
            Err(ValidationError::NegativeRate(_)),
        ));
        assert!(matches!(
            total(3, thb(1000), Some(thb(-100))),
            Err(ValidationError::NegativeRate(_)),
        ));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let usd = Money {
            amount: Decimal::from(100),
            currency: Currency::Usd,
        };

        assert!(matches!(
            total(3, thb(1000), Some(usd)),
            Err(ValidationError::CurrencyMismatch { .. }),
        ));
    }

    #[test]
    fn submission_quote_covers_all_validations() {
        let today = date(2024, 6, 1);

        let quote = Quote::for_submission(
            date(2024, 6, 1).coerce(),
            date(2024, 6, 4).coerce(),
            today,
            thb(1000),
            Some(thb(100)),
        )
        .unwrap();
        assert_eq!(quote.days, 3);
        assert_eq!(quote.total, thb(3300));

        assert!(matches!(
            Quote::for_submission(
                date(2024, 5, 31).coerce(),
                date(2024, 6, 4).coerce(),
                today,
                thb(1000),
                None,
            ),
            Err(ValidationError::StartDateInPast { .. }),
        ));
        assert!(matches!(
            Quote::for_submission(
                date(2024, 6, 4).coerce(),
                date(2024, 6, 4).coerce(),
                today,
                thb(1000),
                None,
            ),
            Err(ValidationError::EmptyPeriod { .. }),
        ));
        assert!(matches!(
            Quote::for_submission(
                date(2024, 6, 1).coerce(),
                date(2024, 6, 4).coerce(),
                today,
                thb(0),
                None,
            ),
            Err(ValidationError::NonPositiveTotal(_)),
        ));
    }

    #[test]
    fn non_finite_rate_surfaces_as_validation_error() {
        let err = ValidationError::from(
            Money::try_from_f64(f64::NAN, Currency::Thb).unwrap_err(),
        );
        assert!(matches!(err, ValidationError::InvalidAmount(_)));
    }
}
