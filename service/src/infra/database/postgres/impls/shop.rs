//! [`Shop`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{shop, Shop},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Shop>, shop::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Shop>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Shop>, shop::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: shop::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, address, phone, promptpay_id, created_at \
            FROM shops \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Shop {
                id: row.get("id"),
                name: row.get("name"),
                address: row.get("address"),
                phone: row.get("phone"),
                promptpay_id: row.get("promptpay_id"),
                created_at: row.get("created_at"),
            }))
    }
}
