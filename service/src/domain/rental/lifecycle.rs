//! Lifecycle transitions of a [`Rental`].
//!
//! Every status change of a [`Rental`] is expressed as an [`Action`]
//! performed by an [`Actor`] and validated by [`State::apply()`] against the
//! transition charts, so no mutation can bypass them.

use derive_more::{Display, Error};

#[cfg(doc)]
use super::Rental;
use super::{payment, Status};
#[cfg(doc)]
use crate::domain::{Car, Customer, Shop};

/// Lifecycle snapshot of a [`Rental`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{status}/{payment_status}")]
pub struct State {
    /// [`Status`] of the [`Rental`].
    pub status: Status,

    /// [`payment::Status`] of the [`Rental`].
    pub payment_status: payment::Status,

    /// [`Status`] the [`Rental`] had when its return was requested.
    pub status_before_return: Option<Status>,
}

impl State {
    /// Applies the provided [`Action`] performed by the provided [`Actor`] to
    /// this [`State`].
    ///
    /// Any [`Action`] upon a terminal [`State`] is rejected, before any other
    /// consideration.
    ///
    /// # Errors
    ///
    /// If the [`Action`] is not allowed for this [`State`], or the [`Actor`]
    /// is not entitled to perform it.
    pub fn apply(
        self,
        action: Action,
        actor: Actor,
    ) -> Result<Self, InvalidTransition> {
        use payment::Status as P;
        use Action as A;
        use Status as S;

        let fail = || InvalidTransition {
            state: self,
            action,
            actor,
        };

        if self.status.is_terminal() {
            return Err(fail());
        }

        let actor_allowed = match action {
            A::Cancel | A::UploadPaymentProof | A::RequestReturn => {
                actor == Actor::Customer
            }
            A::ApproveBooking
            | A::RejectBooking
            | A::VerifyPayment
            | A::RejectPayment
            | A::ApproveReturn
            | A::RejectReturn => actor == Actor::Shop,
            A::Complete => matches!(actor, Actor::Shop | Actor::System),
            A::Start => actor == Actor::System,
        };
        if !actor_allowed {
            return Err(fail());
        }

        let mut next = self;
        match action {
            A::Cancel => {
                if !(matches!(self.payment_status, P::Pending | P::Failed)
                    && matches!(self.status, S::Pending | S::Confirmed))
                {
                    return Err(fail());
                }
                next.status = S::Cancelled;
            }
            A::UploadPaymentProof => {
                if !matches!(self.payment_status, P::Pending | P::Failed) {
                    return Err(fail());
                }
                next.payment_status = P::PendingVerification;
            }
            A::ApproveBooking => {
                if self.status != S::Pending {
                    return Err(fail());
                }
                next.status = S::Confirmed;
            }
            A::RejectBooking => {
                if self.status != S::Pending {
                    return Err(fail());
                }
                next.status = S::Cancelled;
            }
            A::VerifyPayment => {
                if self.payment_status != P::PendingVerification {
                    return Err(fail());
                }
                next.payment_status = P::Paid;
            }
            A::RejectPayment => {
                if self.payment_status != P::PendingVerification {
                    return Err(fail());
                }
                next.payment_status = P::Failed;
            }
            A::RequestReturn => {
                if !(matches!(self.status, S::Confirmed | S::Ongoing)
                    && self.payment_status == P::Paid)
                {
                    return Err(fail());
                }
                next.status_before_return = Some(self.status);
                next.status = S::ReturnRequested;
            }
            A::ApproveReturn => {
                if self.status != S::ReturnRequested {
                    return Err(fail());
                }
                next.status = S::ReturnApproved;
                next.status_before_return = None;
            }
            A::RejectReturn => {
                if self.status != S::ReturnRequested {
                    return Err(fail());
                }
                let Some(prev @ (S::Confirmed | S::Ongoing)) =
                    self.status_before_return
                else {
                    return Err(fail());
                };
                next.status = prev;
                next.status_before_return = None;
            }
            A::Start => {
                if !(self.status == S::Confirmed
                    && self.payment_status == P::Paid)
                {
                    return Err(fail());
                }
                next.status = S::Ongoing;
            }
            A::Complete => {
                if self.status != S::ReturnApproved {
                    return Err(fail());
                }
                next.status = S::Completed;
            }
        }
        Ok(next)
    }
}

/// Action changing the lifecycle [`State`] of a [`Rental`].
///
/// Refunds are deliberately absent here: they run on the payment chart alone
/// and never consult the [`Rental`] status, so a cancelled [`Rental`] can
/// still be refunded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// [`Customer`] cancels the [`Rental`].
    Cancel,

    /// [`Customer`] submits a payment proof.
    UploadPaymentProof,

    /// [`Shop`] approves the booking.
    ApproveBooking,

    /// [`Shop`] rejects the booking.
    RejectBooking,

    /// [`Shop`] verifies the submitted payment.
    VerifyPayment,

    /// [`Shop`] rejects the submitted payment.
    RejectPayment,

    /// [`Customer`] asks to return the [`Car`].
    RequestReturn,

    /// [`Shop`] accepts the [`Car`] back.
    ApproveReturn,

    /// [`Shop`] declines the return request.
    RejectReturn,

    /// The system, or the [`Shop`], closes the finished [`Rental`].
    Complete,

    /// The system marks the [`Rental`] as picked up on its start date.
    Start,
}

/// Party performing an [`Action`] upon a [`Rental`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Actor {
    /// [`Customer`] who booked the [`Rental`].
    Customer,

    /// [`Shop`] owning the booked [`Car`].
    Shop,

    /// Background automation acting on due dates.
    System,
}

/// Error of applying an [`Action`] to a [`State`] it's not allowed for.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`{action}` by `{actor}` is not allowed for `{state}` state")]
pub struct InvalidTransition {
    /// [`State`] the [`Action`] was applied to.
    pub state: State,

    /// Rejected [`Action`].
    pub action: Action,

    /// [`Actor`] who performed the [`Action`].
    pub actor: Actor,
}

#[cfg(test)]
mod spec {
    use super::{payment, Action, Actor, State, Status};

    fn state(status: Status, payment_status: payment::Status) -> State {
        State {
            status,
            payment_status,
            status_before_return: None,
        }
    }

    #[test]
    fn books_through_the_happy_path() {
        use payment::Status as P;
        use Status as S;

        let submitted = state(S::Pending, P::Pending);

        let uploaded = submitted
            .apply(Action::UploadPaymentProof, Actor::Customer)
            .unwrap();
        assert_eq!(uploaded.payment_status, P::PendingVerification);

        let confirmed =
            uploaded.apply(Action::ApproveBooking, Actor::Shop).unwrap();
        assert_eq!(confirmed.status, S::Confirmed);

        let paid = confirmed.apply(Action::VerifyPayment, Actor::Shop).unwrap();
        assert_eq!(paid.payment_status, P::Paid);

        let ongoing = paid.apply(Action::Start, Actor::System).unwrap();
        assert_eq!(ongoing.status, S::Ongoing);

        let requested = ongoing
            .apply(Action::RequestReturn, Actor::Customer)
            .unwrap();
        assert_eq!(requested.status, S::ReturnRequested);
        assert_eq!(requested.status_before_return, Some(S::Ongoing));

        let approved =
            requested.apply(Action::ApproveReturn, Actor::Shop).unwrap();
        assert_eq!(approved.status, S::ReturnApproved);
        assert_eq!(approved.status_before_return, None);

        let completed = approved.apply(Action::Complete, Actor::Shop).unwrap();
        assert_eq!(completed.status, S::Completed);
    }

    #[test]
    fn rejected_return_reverts_to_prior_status() {
        use payment::Status as P;
        use Status as S;

        for prior in [S::Confirmed, S::Ongoing] {
            let requested = state(prior, P::Paid)
                .apply(Action::RequestReturn, Actor::Customer)
                .unwrap();

            let reverted =
                requested.apply(Action::RejectReturn, Actor::Shop).unwrap();
            assert_eq!(reverted.status, prior);
            assert_eq!(reverted.status_before_return, None);
        }
    }

    #[test]
    fn terminal_states_reject_every_action() {
        use payment::Status as P;
        use Status as S;

        let actions = [
            Action::Cancel,
            Action::UploadPaymentProof,
            Action::ApproveBooking,
            Action::RejectBooking,
            Action::VerifyPayment,
            Action::RejectPayment,
            Action::RequestReturn,
            Action::ApproveReturn,
            Action::RejectReturn,
            Action::Complete,
            Action::Start,
        ];
        let actors = [Actor::Customer, Actor::Shop, Actor::System];

        for status in [S::Cancelled, S::Completed] {
            for action in actions {
                for actor in actors {
                    assert!(
                        state(status, P::Pending)
                            .apply(action, actor)
                            .is_err(),
                        "{action} by {actor} must fail for {status}",
                    );
                }
            }
        }
    }

    #[test]
    fn actors_cannot_play_each_other() {
        use payment::Status as P;
        use Status as S;

        assert!(state(S::Pending, P::Pending)
            .apply(Action::Cancel, Actor::Shop)
            .is_err());
        assert!(state(S::Pending, P::Pending)
            .apply(Action::ApproveBooking, Actor::Customer)
            .is_err());
        assert!(state(S::Confirmed, P::Paid)
            .apply(Action::Start, Actor::Shop)
            .is_err());
        assert!(state(S::ReturnApproved, P::Paid)
            .apply(Action::Complete, Actor::Customer)
            .is_err());

        // `Complete` is shared between the shop and the automation.
        assert!(state(S::ReturnApproved, P::Paid)
            .apply(Action::Complete, Actor::System)
            .is_ok());
    }

    #[test]
    fn out_of_order_actions_are_rejected() {
        use payment::Status as P;
        use Status as S;

        assert!(state(S::Confirmed, P::Paid)
            .apply(Action::ApproveReturn, Actor::Shop)
            .is_err());
        assert!(state(S::Pending, P::Paid)
            .apply(Action::VerifyPayment, Actor::Shop)
            .is_err());
        assert!(state(S::Confirmed, P::Pending)
            .apply(Action::Start, Actor::System)
            .is_err());
        assert!(state(S::Ongoing, P::Paid)
            .apply(Action::Cancel, Actor::Customer)
            .is_err());
        assert!(state(S::Confirmed, P::Paid)
            .apply(Action::Cancel, Actor::Customer)
            .is_err());
        assert!(state(S::Ongoing, P::Paid)
            .apply(Action::Complete, Actor::Shop)
            .is_err());
    }

    #[test]
    fn apply_is_deterministic() {
        use payment::Status as P;
        use Status as S;

        let from = state(S::Pending, P::PendingVerification);

        assert_eq!(
            from.apply(Action::ApproveBooking, Actor::Shop).unwrap(),
            from.apply(Action::ApproveBooking, Actor::Shop).unwrap(),
        );
        assert_eq!(
            from.apply(Action::Start, Actor::System).unwrap_err(),
            from.apply(Action::Start, Actor::System).unwrap_err(),
        );
    }

    #[test]
    fn applying_same_action_twice_fails() {
        use payment::Status as P;
        use Status as S;

        let confirmed = state(S::Pending, P::Pending)
            .apply(Action::ApproveBooking, Actor::Shop)
            .unwrap();
        assert!(confirmed.apply(Action::ApproveBooking, Actor::Shop).is_err());

        let paid = state(S::Confirmed, P::PendingVerification)
            .apply(Action::VerifyPayment, Actor::Shop)
            .unwrap();
        assert!(paid.apply(Action::VerifyPayment, Actor::Shop).is_err());
    }

    #[test]
    fn every_transition_conforms_to_the_status_chart() {
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
        let actions = [
            Action::Cancel,
            Action::UploadPaymentProof,
            Action::ApproveBooking,
            Action::RejectBooking,
            Action::VerifyPayment,
            Action::RejectPayment,
            Action::RequestReturn,
            Action::ApproveReturn,
            Action::RejectReturn,
            Action::Complete,
            Action::Start,
        ];
        let actors = [Actor::Customer, Actor::Shop, Actor::System];

        for status in statuses {
            for payment_status in payments {
                for sbr in [None, Some(S::Confirmed), Some(S::Ongoing)] {
                    let from = State {
                        status,
                        payment_status,
                        status_before_return: sbr,
                    };
                    for action in actions {
                        for actor in actors {
                            let Ok(to) = from.apply(action, actor) else {
                                continue;
                            };
                            if to.status != from.status {
                                assert!(
                                    from.status.may_become(to.status),
                                    "{action}: {} -> {}",
                                    from.status,
                                    to.status,
                                );
                            }
                            if to.payment_status != from.payment_status {
                                assert!(
                                    from.payment_status
                                        .may_become(to.payment_status),
                                    "{action}: {} -> {}",
                                    from.payment_status,
                                    to.payment_status,
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
