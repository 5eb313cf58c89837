//! [`Command`] for booking a new [`Rental`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        car, customer,
        rental::{self, payment, pricing},
        Car, Customer, Rental,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for booking a new [`Rental`].
#[derive(Clone, Debug)]
pub struct CreateRental {
    /// ID of the [`Car`] to book.
    pub car_id: car::Id,

    /// ID of the [`Customer`] booking the [`Car`].
    pub customer_id: customer::Id,

    /// First [`Date`] of the rental period.
    pub start_date: rental::StartDate,

    /// [`Date`] the [`Car`] is due back.
    pub end_date: rental::EndDate,

    /// Optional [`rental::Location`] to pick the [`Car`] up at.
    pub pickup_location: Option<rental::Location>,

    /// Optional [`rental::Location`] to return the [`Car`] at.
    pub return_location: Option<rental::Location>,
}

impl<Db> Command<CreateRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
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
        > + Database<Insert<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRental {
            car_id,
            customer_id,
            start_date,
            end_date,
            pickup_location,
            return_location,
        } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let car = self
            .database()
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())?;
        if !car.is_available() {
            return Err(tracerr::new!(E::CarNotAvailable(car.id)));
        }

        let quote = pricing::Quote::for_submission(
            start_date,
            end_date,
            Date::today(),
            car.daily_rate,
            car.insurance_rate,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Car`.
        tx.execute(Lock(By::new(car.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let car = tx
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())?;
        if !car.is_available() {
            return Err(tracerr::new!(E::CarNotAvailable(car.id)));
        }

        let rental = Rental {
            id: rental::Id::new(),
            car_id: car.id,
            shop_id: car.shop_id,
            customer_id: customer.id,
            start_date,
            end_date,
            status: rental::Status::Pending,
            payment_status: payment::Status::Pending,
            payment_proof: None,
            total_amount: quote.total,
            pickup_location,
            return_location,
            has_review: false,
            status_before_return: None,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(rental.clone()))
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

/// Error of [`CreateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] with the provided ID cannot be booked right now.
    #[display("`Car(id: {_0})` is not available")]
    CarNotAvailable(#[error(not(source))] car::Id),

    /// [`Car`] with the provided ID does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Booking submission failed to validate.
    #[display("invalid booking: {_0}")]
    #[from]
    Validation(pricing::ValidationError),
}
