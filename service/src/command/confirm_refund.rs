//! [`Command`] for confirming a refund of a [`Rental`] payment.

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

/// [`Command`] for confirming that a pending refund of a [`Rental`] payment
/// has been made, on behalf of its [`Shop`].
///
/// [`Shop`]: crate::domain::Shop
#[derive(Clone, Copy, Debug)]
pub struct ConfirmRefund {
    /// ID of the [`Rental`] the payment of which is being refunded.
    pub rental_id: rental::Id,

    /// ID of the [`Shop`] confirming the refund.
    ///
    /// [`Shop`]: crate::domain::Shop
    pub shop_id: shop::Id,

    /// [`payment::Status`] the caller has displayed, if any.
    ///
    /// Fails with [`ExecutionError::ConcurrentModification`] if the
    /// [`Rental`] payment has moved on since.
    pub expected_payment_status: Option<payment::Status>,
}

impl<Db> Command<ConfirmRefund> for Service<Db>
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
        cmd: ConfirmRefund,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmRefund {
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
        if !rental.payment_status.may_become(payment::Status::Refunded) {
            return Err(tracerr::new!(E::RefundNotPending {
                id: rental_id,
                payment_status: rental.payment_status,
            }));
        }
        rental.payment_status = payment::Status::Refunded;

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

/// Error of [`ConfirmRefund`] [`Command`] execution.
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

    /// [`Rental`] payment has no refund to confirm.
    #[display(
        "`Rental(id: {id})` payment in `{payment_status}` status \
         has no pending refund"
    )]
    RefundNotPending {
        /// ID of the [`Rental`].
        id: rental::Id,

        /// Current [`payment::Status`] of the [`Rental`].
        payment_status: payment::Status,
    },

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),
}
