//! [`Rental`] definitions.

pub mod lifecycle;
pub mod payment;
pub mod pricing;

use std::time::Duration;

#[cfg(doc)]
use common::Date;
use common::{define_kind, unit, DateOf, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{car, customer, shop};
#[cfg(doc)]
use crate::domain::{Car, Customer, Shop};

/// Booking of a [`Car`] by a [`Customer`] for a period of days.
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the booked [`Car`].
    pub car_id: car::Id,

    /// ID of the [`Shop`] owning the booked [`Car`].
    pub shop_id: shop::Id,

    /// ID of the [`Customer`] who booked the [`Car`].
    pub customer_id: customer::Id,

    /// First [`Date`] of the rental period.
    pub start_date: StartDate,

    /// [`Date`] the [`Car`] is due back, strictly after the [`StartDate`].
    pub end_date: EndDate,

    /// [`Status`] of this [`Rental`].
    pub status: Status,

    /// [`payment::Status`] of this [`Rental`].
    ///
    /// Varies independently from the [`Status`].
    pub payment_status: payment::Status,

    /// [`payment::Proof`] uploaded by the [`Customer`], if any.
    pub payment_proof: Option<payment::Proof>,

    /// Total price of this [`Rental`].
    ///
    /// Calculated once at creation and never recalculated afterwards.
    pub total_amount: Money,

    /// [`Location`] where the [`Car`] is picked up, if specified.
    pub pickup_location: Option<Location>,

    /// [`Location`] where the [`Car`] is returned, if specified.
    pub return_location: Option<Location>,

    /// Indicator whether a review has been filed for this [`Rental`].
    pub has_review: bool,

    /// [`Status`] this [`Rental`] had when its return was requested.
    ///
    /// Filled on a return request and used to revert the [`Rental`] if the
    /// [`Shop`] rejects the return.
    pub status_before_return: Option<Status>,

    /// [`DateTime`] when this [`Rental`] was created.
    pub created_at: CreationDateTime,
}

impl Rental {
    /// Period since creation during which a pending [`Rental`] may be
    /// cancelled by its [`Customer`] free of charge.
    pub const FEE_FREE_CANCELLATION_WINDOW: Duration =
        Duration::from_secs(2 * 60 * 60);

    /// Returns the [`lifecycle::State`] snapshot of this [`Rental`].
    #[must_use]
    pub fn state(&self) -> lifecycle::State {
        lifecycle::State {
            status: self.status,
            payment_status: self.payment_status,
            status_before_return: self.status_before_return,
        }
    }

    /// Replaces the [`lifecycle::State`] of this [`Rental`] with the provided
    /// one.
    pub fn set_state(&mut self, state: lifecycle::State) {
        self.status = state.status;
        self.payment_status = state.payment_status;
        self.status_before_return = state.status_before_return;
    }

    /// Checks whether this [`Rental`] may be cancelled by its [`Customer`].
    ///
    /// Cancellation is allowed while the [`Rental`] remains unpaid and the
    /// [`Car`] has not been taken out yet.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        use payment::Status as P;

        matches!(self.payment_status, P::Pending | P::Failed)
            && matches!(self.status, Status::Pending | Status::Confirmed)
    }

    /// Checks whether this [`Rental`] may be cancelled by its [`Customer`]
    /// free of charge at the provided moment.
    ///
    /// Only a pending [`Rental`] within its
    /// [`FEE_FREE_CANCELLATION_WINDOW`] qualifies.
    ///
    /// [`FEE_FREE_CANCELLATION_WINDOW`]: Self::FEE_FREE_CANCELLATION_WINDOW
    #[must_use]
    pub fn can_cancel_fee_free(&self, now: DateTime) -> bool {
        self.status == Status::Pending
            && self.created_at.abs_diff(now.coerce())
                <= Self::FEE_FREE_CANCELLATION_WINDOW
    }

    /// Checks whether the [`Customer`] may request a return of the [`Car`].
    ///
    /// Only an approved or picked up [`Rental`] that has been paid for
    /// qualifies.
    #[must_use]
    pub fn can_request_return(&self) -> bool {
        matches!(self.status, Status::Confirmed | Status::Ongoing)
            && self.payment_status == payment::Status::Paid
    }

    /// Checks whether the [`Customer`] may file a review for this [`Rental`].
    ///
    /// At most one review per [`Rental`], and only once its return has been
    /// approved.
    #[must_use]
    pub fn can_review(&self) -> bool {
        self.status == Status::ReturnApproved && !self.has_review
    }

    /// Checks whether the [`Customer`] may submit a payment for this
    /// [`Rental`].
    ///
    /// Money is still owed while the [`payment::Status`] is pending or a
    /// previous attempt has failed, unless the [`Rental`] itself is already
    /// finished.
    #[must_use]
    pub fn can_pay(&self) -> bool {
        use payment::Status as P;

        !self.status.is_terminal()
            && matches!(self.payment_status, P::Pending | P::Failed)
    }

    /// Returns the number of whole hours elapsed since this [`Rental`] was
    /// created.
    ///
    /// The difference is taken as an absolute value, so a [`Rental`] created
    /// "in the future" due to clock skew counts as just created.
    #[must_use]
    pub fn hours_since_creation(&self, now: DateTime) -> u64 {
        self.created_at.abs_diff(now.coerce()).as_secs() / 3600
    }
}

/// ID of a [`Rental`].
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

/// Free-text location where a [`Car`] is picked up or returned.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

define_kind! {
    #[doc = "Status of a [`Rental`]."]
    enum Status {
        #[doc = "Submitted and awaiting `Shop` approval."]
        Pending = 1,

        #[doc = "Approved by the `Shop`, the `Car` is not picked up yet."]
        Confirmed = 2,

        #[doc = "The `Car` is picked up and in use."]
        Ongoing = 3,

        #[doc = "The `Customer` asked to return the `Car`."]
        ReturnRequested = 4,

        #[doc = "The `Shop` accepted the `Car` back."]
        ReturnApproved = 5,

        #[doc = "Finished regularly."]
        Completed = 6,

        #[doc = "Cancelled before completion."]
        Cancelled = 7,
    }
}

impl Status {
    /// Checks whether this [`Status`] is terminal.
    ///
    /// No transitions are allowed out of a terminal [`Status`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Checks whether this [`Status`] is allowed to change to the provided
    /// one.
    #[must_use]
    pub fn may_become(self, next: Self) -> bool {
        use Status as S;

        match self {
            S::Pending => matches!(next, S::Confirmed | S::Cancelled),
            S::Confirmed => {
                matches!(next, S::Ongoing | S::Cancelled | S::ReturnRequested)
            }
            S::Ongoing => matches!(next, S::ReturnRequested),
            S::ReturnRequested => {
                matches!(next, S::ReturnApproved | S::Confirmed | S::Ongoing)
            }
            S::ReturnApproved => matches!(next, S::Completed),
            S::Cancelled | S::Completed => false,
        }
    }
}

/// [`Date`] when a [`Rental`] period starts.
pub type StartDate = DateOf<(Rental, unit::Start)>;

/// [`Date`] when a [`Rental`] period ends.
pub type EndDate = DateOf<(Rental, unit::End)>;

/// [`DateTime`] when a [`Rental`] was created.
pub type CreationDateTime = DateTimeOf<(Rental, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, Date, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{car, customer, shop};

    use super::{payment, CreationDateTime, Id, Rental, Status};

    fn rental(status: Status, payment_status: payment::Status) -> Rental {
        Rental {
            id: Id::new(),
            car_id: car::Id::new(),
            shop_id: shop::Id::new(),
            customer_id: customer::Id::new(),
            start_date: Date::from_calendar_date(2024, 6, 1).unwrap().coerce(),
            end_date: Date::from_calendar_date(2024, 6, 4).unwrap().coerce(),
            status,
            payment_status,
            payment_proof: None,
            total_amount: Money {
                amount: Decimal::from(3300),
                currency: Currency::Thb,
            },
            pickup_location: None,
            return_location: None,
            has_review: false,
            status_before_return: None,
            created_at: CreationDateTime::UNIX_EPOCH,
        }
    }

    fn hours(n: u64) -> DateTime {
        DateTime::UNIX_EPOCH + Duration::from_secs(n * 3600)
    }

    #[test]
    fn cancellable_while_unpaid_and_not_taken_out() {
        use payment::Status as P;
        use Status as S;

        assert!(rental(S::Pending, P::Pending).can_cancel());
        assert!(rental(S::Pending, P::Failed).can_cancel());
        assert!(rental(S::Confirmed, P::Pending).can_cancel());
        assert!(rental(S::Confirmed, P::Failed).can_cancel());

        assert!(!rental(S::Pending, P::Paid).can_cancel());
        assert!(!rental(S::Pending, P::PendingVerification).can_cancel());
        assert!(!rental(S::Ongoing, P::Pending).can_cancel());
        assert!(!rental(S::ReturnRequested, P::Pending).can_cancel());
        assert!(!rental(S::ReturnApproved, P::Pending).can_cancel());
        assert!(!rental(S::Completed, P::Pending).can_cancel());
        assert!(!rental(S::Cancelled, P::Pending).can_cancel());
    }

    #[test]
    fn fee_free_cancellation_limited_to_two_hours() {
        let r = rental(Status::Pending, payment::Status::Pending);

        assert!(r.can_cancel_fee_free(hours(1)));
        assert!(r.can_cancel_fee_free(hours(2)));
        assert!(!r.can_cancel_fee_free(hours(3)));

        let confirmed = rental(Status::Confirmed, payment::Status::Pending);
        assert!(!confirmed.can_cancel_fee_free(hours(1)));
    }

    #[test]
    fn fee_free_cancellation_tolerates_clock_skew() {
        let mut r = rental(Status::Pending, payment::Status::Pending);
        r.created_at = CreationDateTime::UNIX_EPOCH
            + Duration::from_secs(3 * 3600);

        // `now` is an hour before `created_at`.
        assert!(r.can_cancel_fee_free(hours(2)));
        assert_eq!(r.hours_since_creation(hours(2)), 1);
    }

    #[test]
    fn requests_return_for_active_and_paid_only() {
        use payment::Status as P;
        use Status as S;

        let statuses = [
            S::Pending,
            S::Confirmed,
            S::Ongoing,
            S::ReturnRequested,
            S::ReturnApproved,
            S::Completed,
            S::Cancelled,
        ];
        let payments = [
            P::Pending,
            P::PendingVerification,
            P::Paid,
            P::RefundPending,
            P::Refunded,
            P::Failed,
            P::Rejected,
        ];

        for status in statuses {
            for payment_status in payments {
                let expected = matches!(status, S::Confirmed | S::Ongoing)
                    && payment_status == P::Paid;
                assert_eq!(
                    rental(status, payment_status).can_request_return(),
                    expected,
                    "status: {status}, payment: {payment_status}",
                );
            }
        }
    }

    #[test]
    fn reviewable_once_after_approved_return() {
        let r = rental(Status::ReturnApproved, payment::Status::Paid);
        assert!(r.can_review());

        let mut reviewed = r.clone();
        reviewed.has_review = true;
        assert!(!reviewed.can_review());

        assert!(!rental(Status::Completed, payment::Status::Paid)
            .can_review());
        assert!(!rental(Status::Ongoing, payment::Status::Paid).can_review());
    }

    #[test]
    fn payable_while_owing_and_alive() {
        use payment::Status as P;
        use Status as S;

        assert!(rental(S::Pending, P::Pending).can_pay());
        assert!(rental(S::Confirmed, P::Failed).can_pay());

        assert!(!rental(S::Pending, P::PendingVerification).can_pay());
        assert!(!rental(S::Confirmed, P::Paid).can_pay());
        assert!(!rental(S::Cancelled, P::Pending).can_pay());
        assert!(!rental(S::Completed, P::Failed).can_pay());
    }

    #[test]
    fn hours_since_creation_floors() {
        let r = rental(Status::Pending, payment::Status::Pending);

        assert_eq!(r.hours_since_creation(DateTime::UNIX_EPOCH), 0);
        assert_eq!(
            r.hours_since_creation(
                DateTime::UNIX_EPOCH + Duration::from_secs(90 * 60),
            ),
            1,
        );
        assert_eq!(
            r.hours_since_creation(
                DateTime::UNIX_EPOCH + Duration::from_secs(3 * 3600 - 1),
            ),
            2,
        );
    }

    #[test]
    fn terminal_statuses_never_progress() {
        use Status as S;

        let all = [
            S::Pending,
            S::Confirmed,
            S::Ongoing,
            S::ReturnRequested,
            S::ReturnApproved,
            S::Completed,
            S::Cancelled,
        ];
        for next in all {
            assert!(!S::Cancelled.may_become(next), "CANCELLED -> {next}");
            assert!(!S::Completed.may_become(next), "COMPLETED -> {next}");
        }
    }

    #[test]
    fn status_chart_edges() {
        use Status as S;

        assert!(S::Pending.may_become(S::Confirmed));
        assert!(S::Pending.may_become(S::Cancelled));
        assert!(!S::Pending.may_become(S::Ongoing));

        assert!(S::Confirmed.may_become(S::Ongoing));
        assert!(S::Confirmed.may_become(S::Cancelled));
        assert!(S::Confirmed.may_become(S::ReturnRequested));
        assert!(!S::Confirmed.may_become(S::Completed));

        assert!(S::Ongoing.may_become(S::ReturnRequested));
        assert!(!S::Ongoing.may_become(S::Cancelled));

        assert!(S::ReturnRequested.may_become(S::ReturnApproved));
        assert!(S::ReturnRequested.may_become(S::Confirmed));
        assert!(S::ReturnRequested.may_become(S::Ongoing));

        assert!(S::ReturnApproved.may_become(S::Completed));
        assert!(!S::ReturnApproved.may_become(S::Cancelled));
    }
}
