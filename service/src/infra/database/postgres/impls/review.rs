//! [`Review`]-related [`Database`] implementations.

use common::operations::{Insert, Update};
use tracerr::Traced;

use crate::{
    domain::Review,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Review>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(review)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(review): Update<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            rental_id,
            customer_id,
            shop_id,
            rating,
            comment,
            created_at,
        } = review;

        let rating = i16::from(rating.get());

        const SQL: &str = "\
            INSERT INTO reviews (\
                id, rental_id, customer_id, shop_id, \
                rating, comment, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::INT2, $6::VARCHAR, \
                $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET rental_id = EXCLUDED.rental_id, \
                customer_id = EXCLUDED.customer_id, \
                shop_id = EXCLUDED.shop_id, \
                rating = EXCLUDED.rating, \
                comment = EXCLUDED.comment, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &rental_id,
                &customer_id,
                &shop_id,
                &rating,
                &comment,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
