//! [`Command`] for submitting a payment proof for a [`Rental`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        customer,
        rental::{self, lifecycle, payment},
        Customer, Rental,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for submitting a payment proof for a [`Rental`] on behalf of
/// its [`Customer`].
///
/// Puts the payment under [`Shop`] verification.
///
/// [`Shop`]: crate::domain::Shop
#[derive(Clone, Debug)]
pub struct UploadPaymentProof {
    /// ID of the [`Rental`] to pay for.
    pub rental_id: rental::Id,

    /// ID of the [`Customer`] submitting the payment.
    pub customer_id: customer::Id,

    /// [`payment::Proof`] being submitted.
    pub proof: payment::Proof,

    /// [`payment::Status`] the caller has displayed, if any.
    ///
    /// Fails with [`ExecutionError::ConcurrentModification`] if the
    /// [`Rental`] payment has moved on since.
    pub expected_payment_status: Option<payment::Status>,
}

impl<Db> Command<UploadPaymentProof> for Service<Db>
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
        cmd: UploadPaymentProof,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UploadPaymentProof {
            rental_id,
            customer_id,
            proof,
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
        if rental.customer_id != customer_id {
            return Err(tracerr::new!(E::NotRentalCustomer {
                rental_id,
                customer_id,
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

        let state = rental
            .state()
            .apply(
                lifecycle::Action::UploadPaymentProof,
                lifecycle::Actor::Customer,
            )
            .map_err(tracerr::from_and_wrap!(=> E))?;
        rental.set_state(state);
        rental.payment_proof = Some(proof);

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

/// Error of [`UploadPaymentProof`] [`Command`] execution.
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

    /// [`Rental`] does not belong to the provided [`Customer`].
    #[display(
        "`Rental(id: {rental_id})` does not belong to \
         `Customer(id: {customer_id})`"
    )]
    NotRentalCustomer {
        /// ID of the [`Rental`].
        rental_id: rental::Id,

        /// ID of the [`Customer`].
        customer_id: customer::Id,
    },

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// Submission is not allowed for the current [`Rental`] state.
    #[display("`Rental` action rejected: {_0}")]
    #[from]
    Transition(lifecycle::InvalidTransition),
}
