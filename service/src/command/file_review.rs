//! [`Command`] for filing a [`Review`] of a completed [`Rental`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, rental, review, Rental, Review},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Customer;

use super::Command;

/// [`Command`] for filing a [`Review`] of a [`Rental`] experience on behalf of
/// its [`Customer`].
///
/// Only a [`Rental`] with an approved return may be reviewed, and only once.
#[derive(Clone, Debug)]
pub struct FileReview {
    /// ID of the [`Rental`] being reviewed.
    pub rental_id: rental::Id,

    /// ID of the [`Customer`] filing the [`Review`].
    pub customer_id: customer::Id,

    /// [`review::Rating`] given to the [`Rental`] experience.
    pub rating: review::Rating,

    /// [`review::Comment`] elaborating the [`review::Rating`], if any.
    pub comment: Option<review::Comment>,
}

impl<Db> Command<FileReview> for Service<Db>
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
        > + Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: FileReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let FileReview {
            rental_id,
            customer_id,
            rating,
            comment,
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
        if !rental.can_review() {
            return Err(tracerr::new!(E::ReviewNotAllowed(rental_id)));
        }
        rental.has_review = true;

        let review = Review {
            id: review::Id::new(),
            rental_id,
            customer_id,
            shop_id: rental.shop_id,
            rating,
            comment,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(review.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Update(rental))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(review)
    }
}

/// Error of [`FileReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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

    /// [`Rental`] cannot be reviewed in its current state, or has been
    /// reviewed already.
    #[display("`Rental(id: {_0})` cannot be reviewed")]
    ReviewNotAllowed(#[error(not(source))] rental::Id),
}
