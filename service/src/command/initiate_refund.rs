//! [`Command`] for initiating a refund of a [`Rental`] payment.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        rental::{self, payment},
        shop, Rental,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for initiating a refund of a [`Rental`] payment on behalf of
/// its [`Shop`].
///
/// Refunds concern the payment alone and follow the [`payment::Status`]
/// transitions chart only, so a paid [`Rental`] may be refunded even after
/// being cancelled.
///
/// [`Shop`]: crate::domain::Shop
#[derive(Clone, Copy, Debug)]
pub struct InitiateRefund {
    /// ID of the [`Rental`] to refund the payment of.
    pub rental_id: rental::Id,

    /// ID of the [`Shop`] initiating the refund.
    ///
    /// [`Shop`]: crate::domain::Shop
    pub shop_id: shop::Id,

    /// [`payment::Status`] the caller has displayed, if any.
    ///
    /// Fails with [`ExecutionError::ConcurrentModification`] if the
    /// [`Rental`] payment has moved on since.
    pub expected_payment_status: Option<payment::Status>,
}

impl<Db> Command<InitiateRefund> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Rental, rental::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: InitiateRefund,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let InitiateRefund {
            rental_id,
            shop_id,
            expected_payment_status,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Rental`.
        tx.execute(Lock(By::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;
        if rental.shop_id != shop_id {
            return Err(tracerr::new!(E::NotRentalShop {
                rental_id,
                shop_id,
            }));
        }
        if let Some(expected) = expected_payment_status {
            if rental.payment_status != expected {
                return Err(tracerr::new!(E::ConcurrentModification {
                    id: rental_id,
                    expected,
                    actual: rental.payment_status,
                }));
            }
        }
        if !rental.payment_status.may_become(payment::Status::RefundPending) {
            return Err(tracerr::new!(E::RefundNotAllowed {
                id: rental_id,
                payment_status: rental.payment_status,
            }));
        }
        rental.payment_status = payment::Status::RefundPending;

        tx.execute(Update(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rental)
    }
}

/// Error of [`InitiateRefund`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Rental`] payment changed between being displayed and being acted
    /// upon.
    #[display(
        "`Rental(id: {id})` payment is in `{actual}` status, \
         not in the expected `{expected}`"
    )]
    ConcurrentModification {
        /// ID of the [`Rental`].
        id: rental::Id,

        /// [`payment::Status`] the caller expected.
        expected: payment::Status,

        /// [`payment::Status`] actually persisted.
        actual: payment::Status,
    },

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] does not belong to the provided [`Shop`].
    ///
    /// [`Shop`]: crate::domain::Shop
    #[display(
        "`Rental(id: {rental_id})` does not belong to `Shop(id: {shop_id})`"
    )]
    NotRentalShop {
        /// ID of the [`Rental`].
        rental_id: rental::Id,

        /// ID of the [`Shop`].
        ///
        /// [`Shop`]: crate::domain::Shop
        shop_id: shop::Id,
    },

    /// [`Rental`] payment cannot be refunded from its current
    /// [`payment::Status`].
    #[display(
        "`Rental(id: {id})` payment in `{payment_status}` status \
         cannot be refunded"
    )]
    RefundNotAllowed {
        /// ID of the [`Rental`].
        id: rental::Id,

        /// Current [`payment::Status`] of the [`Rental`].
        payment_status: payment::Status,
    },

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),
}
