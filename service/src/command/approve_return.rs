//! [`Command`] for approving a requested return of a [`Rental`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        car,
        rental::{self, lifecycle},
        shop, Car, Rental,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for approving a requested return of a [`Rental`]ed [`Car`] on
/// behalf of its [`Shop`].
///
/// The [`Car`] becomes available for new [`Rental`]s right away, while the
/// [`Rental`] itself waits to be completed.
///
/// [`Shop`]: crate::domain::Shop
#[derive(Clone, Copy, Debug)]
pub struct ApproveReturn {
    /// ID of the [`Rental`] to approve the return of.
    pub rental_id: rental::Id,

    /// ID of the [`Shop`] approving the return.
    ///
    /// [`Shop`]: crate::domain::Shop
    pub shop_id: shop::Id,

    /// [`rental::Status`] the caller has displayed, if any.
    ///
    /// Fails with [`ExecutionError::ConcurrentModification`] if the
    /// [`Rental`] has moved on since.
    pub expected_status: Option<rental::Status>,
}

impl<Db> Command<ApproveReturn> for Service<Db>
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
        > + Database<Lock<By<Car, car::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Update<Car>, Err = Traced<database::Error>>
        + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ApproveReturn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveReturn {
            rental_id,
            shop_id,
            expected_status,
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
        if let Some(expected) = expected_status {
            if rental.status != expected {
                return Err(tracerr::new!(E::ConcurrentModification {
                    id: rental_id,
                    expected,
                    actual: rental.status,
                }));
            }
        }

        let state = rental
            .state()
            .apply(lifecycle::Action::ApproveReturn, lifecycle::Actor::Shop)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        rental.set_state(state);

        tx.execute(Update(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Avoid concurrent actions upon the same `Car`.
        tx.execute(Lock(By::new(rental.car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut car = tx
            .execute(Select(By::<Option<Car>, _>::new(rental.car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(rental.car_id))
            .map_err(tracerr::wrap!())?;
        car.status = car::Status::Available;

        tx.execute(Update(car))
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

/// Error of [`ApproveReturn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] of the [`Rental`] does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Rental`] changed between being displayed and being acted upon.
    #[display(
        "`Rental(id: {id})` is in `{actual}` status, \
         not in the expected `{expected}`"
    )]
    ConcurrentModification {
        /// ID of the [`Rental`].
        id: rental::Id,

        /// [`rental::Status`] the caller expected.
        expected: rental::Status,

        /// [`rental::Status`] actually persisted.
        actual: rental::Status,
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

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// Approval is not allowed for the current [`Rental`] state.
    #[display("`Rental` action rejected: {_0}")]
    #[from]
    Transition(lifecycle::InvalidTransition),
}
