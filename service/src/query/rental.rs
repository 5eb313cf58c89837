//! [`Query`] collection related to a single [`Rental`].

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{rental, Rental},
    infra::{database, Database},
    read, Query, Service,
};

use super::DatabaseQuery;

/// Queries a [`Rental`] by its [`rental::Id`].
pub type ById = DatabaseQuery<By<Option<Rental>, rental::Id>>;

/// [`Query`] of a [`Rental`] along with everything a surface presents it
/// with, computed as of the moment of execution.
#[derive(Clone, Copy, Debug)]
pub struct Overview {
    /// ID of the [`Rental`] to overview.
    pub rental_id: rental::Id,
}

impl<Db> Query<Overview> for Service<Db>
where
    Db: Database<
        Select<By<Option<Rental>, rental::Id>>,
        Ok = Option<Rental>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::Overview>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Overview { rental_id }: Overview,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::wrap!())?
            .map(|rental| read::Overview::new(rental, DateTime::now())))
    }
}
