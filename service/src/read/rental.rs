//! [`Rental`] read model definitions.

use common::DateTime;

use crate::domain::{
    rental::{self, payment},
    Rental,
};
#[cfg(doc)]
use crate::domain::{Customer, Shop};

/// [`Rental`] annotated with everything a surface renders: capability flags
/// and presentation [`Badge`]s.
///
/// Computed in one place, so surfaces never re-derive the rules themselves.
#[derive(Clone, Debug)]
pub struct Overview {
    /// The [`Rental`] itself.
    pub rental: Rental,

    /// Whether the [`Customer`] may cancel the [`Rental`].
    pub can_cancel: bool,

    /// Whether the cancellation would be free of charge.
    pub can_cancel_fee_free: bool,

    /// Whether the [`Customer`] may request a return.
    pub can_request_return: bool,

    /// Whether the [`Customer`] may file a review.
    pub can_review: bool,

    /// Whether the [`Customer`] may submit a payment.
    pub can_pay: bool,

    /// Whole hours elapsed since the [`Rental`] was created.
    pub hours_since_creation: u64,

    /// [`Badge`] presenting the [`rental::Status`].
    pub status_badge: Badge,

    /// [`Badge`] presenting the [`payment::Status`].
    pub payment_badge: Badge,
}

impl Overview {
    /// Builds an [`Overview`] of the provided [`Rental`] as of the provided
    /// moment.
    #[must_use]
    pub fn new(rental: Rental, now: DateTime) -> Self {
        Self {
            can_cancel: rental.can_cancel(),
            can_cancel_fee_free: rental.can_cancel_fee_free(now),
            can_request_return: rental.can_request_return(),
            can_review: rental.can_review(),
            can_pay: rental.can_pay(),
            hours_since_creation: rental.hours_since_creation(now),
            status_badge: status_badge(rental.status),
            payment_badge: payment_badge(rental.payment_status),
            rental,
        }
    }
}

/// Localized display entry of a status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Badge {
    /// Thai display text.
    pub text: &'static str,

    /// Style [`Class`] the text is rendered with.
    pub class: Class,
}

/// Style class of a [`Badge`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Class {
    /// Yellow accent.
    Yellow,

    /// Blue accent.
    Blue,

    /// Indigo accent.
    Indigo,

    /// Orange accent.
    Orange,

    /// Purple accent.
    Purple,

    /// Green accent.
    Green,

    /// Red accent.
    Red,
}

/// Returns the [`Badge`] presenting the provided [`rental::Status`].
#[must_use]
pub const fn status_badge(status: rental::Status) -> Badge {
    use rental::Status as S;

    let (text, class) = match status {
        S::Pending => ("รออนุมัติ", Class::Yellow),
        S::Confirmed => ("อนุมัติแล้ว", Class::Blue),
        S::Ongoing => ("กำลังเช่า", Class::Indigo),
        S::ReturnRequested => ("ขอคืนรถ", Class::Orange),
        S::ReturnApproved => ("อนุมัติคืนรถแล้ว", Class::Purple),
        S::Completed => ("เสร็จสิ้น", Class::Green),
        S::Cancelled => ("ยกเลิก", Class::Red),
    };
    Badge { text, class }
}

/// Returns the [`Badge`] presenting the provided [`payment::Status`].
#[must_use]
pub const fn payment_badge(status: payment::Status) -> Badge {
    use payment::Status as S;

    let (text, class) = match status {
        S::Pending => ("รอชำระเงิน", Class::Yellow),
        S::PendingVerification => ("รอยืนยันการชำระเงิน", Class::Yellow),
        S::Paid => ("ชำระเงินแล้ว", Class::Green),
        S::RefundPending => ("รอการคืนเงิน", Class::Blue),
        S::Refunded => ("คืนเงินแล้ว", Class::Purple),
        S::Failed => ("การชำระเงินล้มเหลว", Class::Red),
        S::Rejected => ("การชำระเงินถูกปฏิเสธ", Class::Red),
    };
    Badge { text, class }
}

/// Display group [`Rental`]s are filtered into on listing surfaces.
///
/// Mirrors the tabs of the customer and shop dashboards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Group {
    /// [`Customer`]'s bookings awaiting [`Shop`] approval.
    CustomerPending,

    /// [`Customer`]'s bookings in progress.
    CustomerActive,

    /// [`Customer`]'s finished or cancelled bookings.
    CustomerHistory,

    /// [`Shop`]'s bookings requiring an approval or a payment verification.
    ShopPending,

    /// [`Shop`]'s bookings with a return requested.
    ShopReturns,

    /// [`Shop`]'s approved and finished bookings.
    ShopCompleted,
}

impl Group {
    /// Returns the [`rental::Status`]es this [`Group`] collects.
    #[must_use]
    pub const fn statuses(self) -> &'static [rental::Status] {
        use rental::Status as S;

        match self {
            Self::CustomerPending | Self::ShopPending => &[S::Pending],
            Self::CustomerActive => {
                &[S::Confirmed, S::Ongoing, S::ReturnRequested]
            }
            Self::CustomerHistory => {
                &[S::Completed, S::Cancelled, S::ReturnApproved]
            }
            Self::ShopReturns => &[S::ReturnRequested],
            Self::ShopCompleted => &[S::Confirmed, S::Ongoing, S::Completed],
        }
    }

    /// Returns the [`payment::Status`]es this [`Group`] collects in addition
    /// to its [`statuses()`](Group::statuses).
    ///
    /// Only the shop's pending tab collects by payment state: a booking with
    /// a payment awaiting verification needs attention no matter how far its
    /// rental status has progressed.
    #[must_use]
    pub const fn payment_statuses(self) -> &'static [payment::Status] {
        match self {
            Self::ShopPending => &[payment::Status::PendingVerification],
            Self::CustomerPending
            | Self::CustomerActive
            | Self::CustomerHistory
            | Self::ShopReturns
            | Self::ShopCompleted => &[],
        }
    }

    /// Checks whether a [`Rental`] in the provided statuses falls into this
    /// [`Group`].
    #[must_use]
    pub fn matches(
        self,
        status: rental::Status,
        payment_status: payment::Status,
    ) -> bool {
        self.statuses().contains(&status)
            || self.payment_statuses().contains(&payment_status)
    }
}

pub mod list {
    //! [`Rental`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{customer, rental, shop};
    #[cfg(doc)]
    use crate::domain::Rental;

    use super::Group;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = rental::Id;

    /// Cursor pointing to a specific [`Rental`] in a list.
    pub type Cursor = rental::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`customer::Customer`] the [`Rental`]s belong to.
        ///
        /// [`customer::Customer`]: crate::domain::Customer
        pub customer_id: Option<customer::Id>,

        /// ID of the [`shop::Shop`] the [`Rental`]s belong to.
        ///
        /// [`shop::Shop`]: crate::domain::Shop
        pub shop_id: Option<shop::Id>,

        /// Display [`Group`] to narrow the [`Rental`]s to.
        pub group: Option<Group>,
    }

    /// Total count of [`Rental`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}

pub mod due {
    //! Definitions of [`Rental`]s due to be advanced by the system.

    use common::Date;

    #[cfg(doc)]
    use crate::domain::Rental;

    /// Filter of confirmed and paid [`Rental`]s whose start date has arrived.
    #[derive(Clone, Copy, Debug)]
    pub struct ToStart {
        /// Today's [`Date`].
        pub today: Date,
    }

    /// Filter of return-approved [`Rental`]s whose end date has passed.
    #[derive(Clone, Copy, Debug)]
    pub struct ToComplete {
        /// Today's [`Date`].
        pub today: Date,
    }
}

#[cfg(test)]
mod spec {
    use super::{payment_badge, status_badge, Class, Group};
    use crate::domain::rental::{payment, Status};

    #[test]
    fn badges_render_thai_text_with_fixed_palette() {
        assert_eq!(status_badge(Status::Pending).text, "รออนุมัติ");
        assert_eq!(status_badge(Status::Pending).class, Class::Yellow);
        assert_eq!(status_badge(Status::Ongoing).class, Class::Indigo);
        assert_eq!(status_badge(Status::ReturnRequested).class, Class::Orange);
        assert_eq!(status_badge(Status::Completed).class, Class::Green);
        assert_eq!(status_badge(Status::Cancelled).text, "ยกเลิก");

        assert_eq!(
            payment_badge(payment::Status::PendingVerification).class,
            Class::Yellow,
        );
        assert_eq!(payment_badge(payment::Status::Paid).class, Class::Green);
        assert_eq!(
            payment_badge(payment::Status::Rejected).text,
            "การชำระเงินถูกปฏิเสธ",
        );
    }

    #[test]
    fn groups_mirror_dashboard_tabs() {
        use payment::Status as P;
        use Status as S;

        assert!(Group::CustomerPending.matches(S::Pending, P::Pending));
        assert!(!Group::CustomerPending.matches(S::Confirmed, P::Pending));

        assert!(Group::CustomerActive.matches(S::Confirmed, P::Paid));
        assert!(Group::CustomerActive.matches(S::ReturnRequested, P::Paid));
        assert!(!Group::CustomerActive.matches(S::Completed, P::Paid));

        assert!(Group::CustomerHistory.matches(S::ReturnApproved, P::Paid));
        assert!(Group::CustomerHistory.matches(S::Cancelled, P::Refunded));

        // A payment awaiting verification surfaces in the shop's pending tab
        // even for an already confirmed booking.
        assert!(Group::ShopPending
            .matches(S::Confirmed, P::PendingVerification));
        assert!(Group::ShopPending.matches(S::Pending, P::Pending));
        assert!(!Group::ShopPending.matches(S::Confirmed, P::Paid));

        assert!(Group::ShopReturns.matches(S::ReturnRequested, P::Paid));
        assert!(Group::ShopCompleted.matches(S::Ongoing, P::Paid));
        assert!(!Group::ShopCompleted.matches(S::Cancelled, P::Refunded));
    }
}
