//! [`AdvanceDueRentals`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Select, Start},
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{complete_rental, start_rental, CompleteRental, StartRental},
    domain::{rental, Rental},
    infra::{database, Database},
    read, Command, Service,
};

use super::Task;

/// Configuration for [`AdvanceDueRentals`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between advancing runs.
    pub interval: time::Duration,
}

/// [`Task`] advancing [`Rental`]s the calendar has caught up with: starting
/// confirmed and paid ones once their start date arrives, and completing ones
/// with an approved return once their end date has passed.
#[derive(Clone, Copy, Debug)]
pub struct AdvanceDueRentals<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<AdvanceDueRentals<Self>, Config>>> for Service<Db>
where
    AdvanceDueRentals<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<AdvanceDueRentals<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = AdvanceDueRentals {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::AdvanceDueRentals` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for AdvanceDueRentals<Service<Db>>
where
    Db: Database<
            Select<By<Vec<rental::Id>, read::rental::due::ToStart>>,
            Ok = Vec<rental::Id>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<rental::Id>, read::rental::due::ToComplete>>,
            Ok = Vec<rental::Id>,
            Err = Traced<database::Error>,
        >,
    Service<Db>: Command<
            StartRental,
            Ok = Rental,
            Err = Traced<start_rental::ExecutionError>,
        > + Command<
            CompleteRental,
            Ok = Rental,
            Err = Traced<complete_rental::ExecutionError>,
        >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let today = Date::today();

        let due = self
            .service
            .database()
            .execute(Select(By::<Vec<rental::Id>, _>::new(
                read::rental::due::ToStart { today },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;
        for rental_id in due {
            // A single `Rental` failing to advance must not stall the rest.
            _ = self
                .service
                .execute(StartRental { rental_id })
                .await
                .map_err(|e| {
                    log::error!(
                        "failed to start `Rental(id: {rental_id})`: {e}",
                    );
                });
        }

        let overdue = self
            .service
            .database()
            .execute(Select(By::<Vec<rental::Id>, _>::new(
                read::rental::due::ToComplete { today },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;
        for rental_id in overdue {
            _ = self
                .service
                .execute(CompleteRental {
                    rental_id,
                    shop_id: None,
                    expected_status: Some(rental::Status::ReturnApproved),
                })
                .await
                .map_err(|e| {
                    log::error!(
                        "failed to complete `Rental(id: {rental_id})`: {e}",
                    );
                });
        }

        Ok(())
    }
}

/// Error of [`AdvanceDueRentals`] execution.
pub type ExecutionError = Traced<database::Error>;
