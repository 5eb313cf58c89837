//! [`Command`] for adding a new [`Car`] to a [`Shop`]'s fleet.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::car::{
    Brand, Color, Description, LicensePlate, Model, Seats, Year,
};
use crate::{
    domain::{car, rental::pricing, shop, Car, Shop},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Car`] to the fleet of a [`Shop`].
///
/// The [`Car`] is created as [available][0] and may be booked right away.
///
/// [0]: car::Status::Available
#[derive(Clone, Debug)]
pub struct CreateCar {
    /// ID of the [`Shop`] owning the new [`Car`].
    pub shop_id: shop::Id,

    /// [`Brand`] of the new [`Car`].
    pub brand: car::Brand,

    /// [`Model`] of the new [`Car`].
    pub model: car::Model,

    /// [`Year`] the new [`Car`] was manufactured in.
    pub year: car::Year,

    /// [`LicensePlate`] of the new [`Car`].
    pub license_plate: car::LicensePlate,

    /// [`car::Kind`] of the new [`Car`].
    pub kind: car::Kind,

    /// [`car::Transmission`] of the new [`Car`].
    pub transmission: car::Transmission,

    /// [`car::Fuel`] the new [`Car`] runs on.
    pub fuel: car::Fuel,

    /// Number of [`Seats`] in the new [`Car`].
    pub seats: car::Seats,

    /// [`Color`] of the new [`Car`].
    pub color: car::Color,

    /// [`Description`] of the new [`Car`], if any.
    pub description: Option<car::Description>,

    /// Daily rate the new [`Car`] is rented at.
    pub daily_rate: Money,

    /// Daily insurance rate of the new [`Car`], if insured.
    pub insurance_rate: Option<Money>,
}

impl<Db> Command<CreateCar> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Shop>, shop::Id>>,
            Ok = Option<Shop>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Car>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCar {
            shop_id,
            brand,
            model,
            year,
            license_plate,
            kind,
            transmission,
            fuel,
            seats,
            color,
            description,
            daily_rate,
            insurance_rate,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Shop>, _>::new(shop_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ShopNotExists(shop_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let one_day = pricing::total(1, daily_rate, insurance_rate)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if one_day.amount <= Decimal::ZERO {
            return Err(tracerr::new!(E::Validation(
                pricing::ValidationError::NonPositiveTotal(one_day),
            )));
        }

        let car = Car {
            id: car::Id::new(),
            shop_id,
            brand,
            model,
            year,
            license_plate,
            kind,
            transmission,
            fuel,
            seats,
            color,
            description,
            daily_rate,
            insurance_rate,
            status: car::Status::Available,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Err(e) = tx.execute(Insert(car.clone())).await {
            if e.as_ref().is_unique_violation(Some("cars_license_plate_key")) {
                return Err(tracerr::new!(E::LicensePlateTaken(
                    car.license_plate,
                )));
            }
            return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(car)
    }
}

/// Error of [`CreateCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`LicensePlate`] of the new [`Car`] is used by another [`Car`]
    /// already.
    #[display("`Car` with `{_0}` license plate exists already")]
    LicensePlateTaken(#[error(not(source))] car::LicensePlate),

    /// [`Shop`] with the provided ID does not exist.
    #[display("`Shop(id: {_0})` does not exist")]
    ShopNotExists(#[error(not(source))] shop::Id),

    /// Rates of the new [`Car`] are malformed.
    #[display("invalid `Car` rates: {_0}")]
    #[from]
    Validation(pricing::ValidationError),
}
