//! Payment state of a [`Rental`].

use common::define_kind;
use derive_more::{AsRef, Display, FromStr};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

#[cfg(doc)]
use super::Rental;

define_kind! {
    #[doc = "Payment status of a [`Rental`]."]
    enum Status {
        #[doc = "No payment has been submitted yet."]
        Pending = 1,

        #[doc = "A payment proof awaits `Shop` verification."]
        PendingVerification = 2,

        #[doc = "Verified and settled."]
        Paid = 3,

        #[doc = "A refund has been initiated and awaits confirmation."]
        RefundPending = 4,

        #[doc = "The money has been returned to the `Customer`."]
        Refunded = 5,

        #[doc = "The last payment attempt was turned down."]
        Failed = 6,

        #[doc = "Rejected by the `Shop` with no retry expected."]
        Rejected = 7,
    }
}

impl Status {
    /// Checks whether this [`Status`] is allowed to change to the provided
    /// one.
    ///
    /// Payment state changes independently from the [`Rental`] status, so
    /// refunds of a cancelled [`Rental`] are validated against this chart
    /// alone.
    #[must_use]
    pub fn may_become(self, next: Self) -> bool {
        use Status as S;

        match self {
            S::Pending => matches!(next, S::PendingVerification | S::Failed),
            S::PendingVerification => {
                matches!(next, S::Paid | S::Failed | S::Rejected)
            }
            S::Paid => matches!(next, S::RefundPending),
            S::RefundPending => matches!(next, S::Refunded),
            S::Failed => matches!(next, S::PendingVerification),
            S::Rejected | S::Refunded => false,
        }
    }
}

/// Reference to a payment proof uploaded by a `Customer`.
///
/// Stored as an opaque string, usually a slip image URL.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Proof(String);

impl Proof {
    /// Creates a new [`Proof`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `proof` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(proof: impl Into<String>) -> Self {
        Self(proof.into())
    }

    /// Creates a new [`Proof`] if the given `proof` is valid.
    #[must_use]
    pub fn new(proof: impl Into<String>) -> Option<Self> {
        let proof = proof.into();
        Self::check(&proof).then_some(Self(proof))
    }

    /// Checks whether the given `proof` is a valid [`Proof`].
    fn check(proof: impl AsRef<str>) -> bool {
        let proof = proof.as_ref();
        proof.trim() == proof && !proof.is_empty() && proof.len() <= 512
    }
}

impl FromStr for Proof {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Proof`")
    }
}

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn terminal_statuses_never_progress() {
        use Status as S;

        let all = [
            S::Pending,
            S::PendingVerification,
            S::Paid,
            S::RefundPending,
            S::Refunded,
            S::Failed,
            S::Rejected,
        ];
        for next in all {
            assert!(!S::Rejected.may_become(next), "REJECTED -> {next}");
            assert!(!S::Refunded.may_become(next), "REFUNDED -> {next}");
        }
    }

    #[test]
    fn chart_edges() {
        use Status as S;

        assert!(S::Pending.may_become(S::PendingVerification));
        assert!(S::Pending.may_become(S::Failed));
        assert!(!S::Pending.may_become(S::Paid));

        assert!(S::PendingVerification.may_become(S::Paid));
        assert!(S::PendingVerification.may_become(S::Failed));
        assert!(S::PendingVerification.may_become(S::Rejected));
        assert!(!S::PendingVerification.may_become(S::Refunded));

        assert!(S::Paid.may_become(S::RefundPending));
        assert!(!S::Paid.may_become(S::Refunded));

        assert!(S::RefundPending.may_become(S::Refunded));

        assert!(S::Failed.may_become(S::PendingVerification));
        assert!(!S::Failed.may_become(S::Paid));
    }
}
