//! [`Command`] for toggling a [`Car`] between being available and being under
//! maintenance.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{car, shop, Car},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for toggling a [`Car`] between the [available][0] and the
/// [under-maintenance][1] [`car::Status`]es on behalf of its [`Shop`].
///
/// The [rented][2] [`car::Status`] is driven by [`Rental`] actions alone and
/// cannot be requested here, nor left while a [`Rental`] holds the [`Car`].
///
/// [`Rental`]: crate::domain::Rental
/// [`Shop`]: crate::domain::Shop
/// [0]: car::Status::Available
/// [1]: car::Status::Maintenance
/// [2]: car::Status::Rented
#[derive(Clone, Copy, Debug)]
pub struct SetCarStatus {
    /// ID of the [`Car`] to set the [`car::Status`] of.
    pub car_id: car::Id,

    /// ID of the [`Shop`] owning the [`Car`].
    ///
    /// [`Shop`]: crate::domain::Shop
    pub shop_id: shop::Id,

    /// [`car::Status`] to set.
    pub status: car::Status,
}

impl<Db> Command<SetCarStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Car, car::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Update<Car>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetCarStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetCarStatus {
            car_id,
            shop_id,
            status,
        } = cmd;

        if status == car::Status::Rented {
            return Err(tracerr::new!(E::StatusNotSettable(status)));
        }

        self.database()
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Car`.
        tx.execute(Lock(By::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut car = tx
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())?;
        if car.shop_id != shop_id {
            return Err(tracerr::new!(E::NotShopCar { car_id, shop_id }));
        }
        if car.status == car::Status::Rented {
            return Err(tracerr::new!(E::CarHeldByRental(car_id)));
        }
        car.status = status;

        tx.execute(Update(car.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(car)
    }
}

/// Error of [`SetCarStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] is held by an active [`Rental`] at the moment.
    ///
    /// [`Rental`]: crate::domain::Rental
    #[display("`Car(id: {_0})` is held by an active rental")]
    CarHeldByRental(#[error(not(source))] car::Id),

    /// [`Car`] with the provided ID does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Car`] does not belong to the provided [`Shop`].
    ///
    /// [`Shop`]: crate::domain::Shop
    #[display("`Car(id: {car_id})` does not belong to `Shop(id: {shop_id})`")]
    NotShopCar {
        /// ID of the [`Car`].
        car_id: car::Id,

        /// ID of the [`Shop`].
        ///
        /// [`Shop`]: crate::domain::Shop
        shop_id: shop::Id,
    },

    /// Requested [`car::Status`] is driven by [`Rental`] actions and cannot
    /// be set directly.
    ///
    /// [`Rental`]: crate::domain::Rental
    #[display("`{_0}` status cannot be set directly")]
    StatusNotSettable(#[error(not(source))] car::Status),
}
