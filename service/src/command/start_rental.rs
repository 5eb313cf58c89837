//! [`Command`] for starting a confirmed [`Rental`] on its start date.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        rental::{self, lifecycle},
        Rental,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for starting a confirmed and paid [`Rental`] once its start
/// date arrives.
///
/// Issued by the system itself (see [`task::AdvanceDueRentals`]), not by any
/// [`Customer`] or [`Shop`].
///
/// [`Customer`]: crate::domain::Customer
/// [`Shop`]: crate::domain::Shop
/// [`task::AdvanceDueRentals`]: crate::task::AdvanceDueRentals
#[derive(Clone, Copy, Debug)]
pub struct StartRental {
    /// ID of the [`Rental`] to start.
    pub rental_id: rental::Id,
}

impl<Db> Command<StartRental> for Service<Db>
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
        cmd: StartRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let StartRental { rental_id } = cmd;

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
        let today = Date::today();
        if rental.start_date.coerce() > today {
            return Err(tracerr::new!(E::RentalNotDue {
                id: rental_id,
                start_date: rental.start_date,
                today,
            }));
        }

        let state = rental
            .state()
            .apply(lifecycle::Action::Start, lifecycle::Actor::System)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        rental.set_state(state);

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

/// Error of [`StartRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Rental`]'s start date hasn't arrived yet.
    #[display(
        "`Rental(id: {id})` starts on {start_date}, while today is {today}"
    )]
    RentalNotDue {
        /// ID of the [`Rental`].
        id: rental::Id,

        /// [`rental::StartDate`] of the [`Rental`].
        start_date: rental::StartDate,

        /// Today's [`Date`].
        today: Date,
    },

    /// Starting is not allowed for the current [`Rental`] state.
    #[display("`Rental` action rejected: {_0}")]
    #[from]
    Transition(lifecycle::InvalidTransition),
}
