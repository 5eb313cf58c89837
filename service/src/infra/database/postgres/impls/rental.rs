//! [`Rental`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{
        rental::{self, payment},
        Rental,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<rental::Id, Rental>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[rental::Id]>,
{
    type Ok = HashMap<rental::Id, Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<rental::Id, Rental>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[rental::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, car_id, shop_id, customer_id, \
                   start_date, end_date, \
                   status, payment_status, status_before_return, \
                   payment_proof, \
                   total_amount, total_amount_currency, \
                   pickup_location, return_location, \
                   has_review, \
                   created_at \
            FROM rentals \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Rental {
                        id,
                        car_id: row.get("car_id"),
                        shop_id: row.get("shop_id"),
                        customer_id: row.get("customer_id"),
                        start_date: row.get("start_date"),
                        end_date: row.get("end_date"),
                        status: row.get("status"),
                        payment_status: row.get("payment_status"),
                        payment_proof: row.get("payment_proof"),
                        total_amount: Money {
                            amount: row.get("total_amount"),
                            currency: row.get("total_amount_currency"),
                        },
                        pickup_location: row.get("pickup_location"),
                        return_location: row.get("return_location"),
                        has_review: row.get("has_review"),
                        status_before_return: row.get("status_before_return"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Rental>, rental::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<rental::Id, Rental>, [rental::Id; 1]>>,
        Ok = HashMap<rental::Id, Rental>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Rental>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(rental)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rental {
            id,
            car_id,
            shop_id,
            customer_id,
            start_date,
            end_date,
            status,
            payment_status,
            payment_proof,
            total_amount,
            pickup_location,
            return_location,
            has_review,
            status_before_return,
            created_at,
        } = rental;

        let total_amount_currency = total_amount.currency;
        let total_amount = total_amount.amount;

        const SQL: &str = "\
            INSERT INTO rentals (\
                id, car_id, shop_id, customer_id, \
                start_date, end_date, \
                status, payment_status, status_before_return, \
                payment_proof, \
                total_amount, total_amount_currency, \
                pickup_location, return_location, \
                has_review, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::DATE, $6::DATE, \
                $7::INT2, $8::INT2, $9::INT2, \
                $10::VARCHAR, \
                $11::NUMERIC, $12::INT2, \
                $13::VARCHAR, $14::VARCHAR, \
                $15::BOOLEAN, \
                $16::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET car_id = EXCLUDED.car_id, \
                shop_id = EXCLUDED.shop_id, \
                customer_id = EXCLUDED.customer_id, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                status = EXCLUDED.status, \
                payment_status = EXCLUDED.payment_status, \
                status_before_return = EXCLUDED.status_before_return, \
                payment_proof = EXCLUDED.payment_proof, \
                total_amount = EXCLUDED.total_amount, \
                total_amount_currency = EXCLUDED.total_amount_currency, \
                pickup_location = EXCLUDED.pickup_location, \
                return_location = EXCLUDED.return_location, \
                has_review = EXCLUDED.has_review, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &car_id,
                &shop_id,
                &customer_id,
                &start_date,
                &end_date,
                &status,
                &payment_status,
                &status_before_return,
                &payment_proof,
                &total_amount,
                &total_amount_currency,
                &pickup_location,
                &return_location,
                &has_review,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Rental, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rental::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO rentals_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::rental::list::Page, read::rental::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rental::list::Page, read::rental::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::list::Selector {
            arguments,
            filter:
                read::rental::list::Filter {
                    customer_id,
                    shop_id,
                    group,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let customer_idx = customer_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let shop_idx = shop_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let statuses = group.map(read::rental::Group::statuses);
        let statuses_limit =
            statuses.map(|s| i32::try_from(s.len()).unwrap());
        let payment_statuses =
            group.map(read::rental::Group::payment_statuses);
        let payment_statuses_limit =
            payment_statuses.map(|s| i32::try_from(s.len()).unwrap());

        let statuses_idx = statuses.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let statuses_limit_idx = statuses_limit.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });
        let payment_statuses_idx = payment_statuses.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let payment_statuses_limit_idx =
            payment_statuses_limit.as_ref().map(|n| {
                ps.push(n);
                ps.len()
            });

        let sql = format!(
            "SELECT id \
             FROM rentals \
             WHERE true \
                   {cursor} \
                   {customer_filtering} \
                   {shop_filtering} \
                   {group_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            shop_filtering = shop_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND shop_id = ${idx}::UUID"))
            }),
            group_filtering = statuses_idx
                .zip(statuses_limit_idx)
                .zip(payment_statuses_idx.zip(payment_statuses_limit_idx))
                .into_iter()
                .format_with("", |((s, sl), (p, pl)), f| {
                    f(&format_args!(
                        "AND (status IN \
                              (SELECT unnest(${s}::INT2[]) LIMIT ${sl}::INT4) \
                              OR payment_status IN \
                              (SELECT unnest(${p}::INT2[]) LIMIT ${pl}::INT4))"
                    ))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::rental::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<By<read::rental::list::TotalCount, read::rental::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rental::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rental::list::TotalCount, read::rental::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::list::Filter {
            customer_id,
            shop_id,
            group,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let customer_idx = customer_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let shop_idx = shop_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let statuses = group.map(read::rental::Group::statuses);
        let statuses_limit =
            statuses.map(|s| i32::try_from(s.len()).unwrap());
        let payment_statuses =
            group.map(read::rental::Group::payment_statuses);
        let payment_statuses_limit =
            payment_statuses.map(|s| i32::try_from(s.len()).unwrap());

        let statuses_idx = statuses.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let statuses_limit_idx = statuses_limit.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });
        let payment_statuses_idx = payment_statuses.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let payment_statuses_limit_idx =
            payment_statuses_limit.as_ref().map(|n| {
                ps.push(n);
                ps.len()
            });

        let sql = format!(
            "SELECT COUNT(id)::INT4 \
             FROM rentals \
             WHERE true \
                   {customer_filtering} \
                   {shop_filtering} \
                   {group_filtering}",
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            shop_filtering = shop_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND shop_id = ${idx}::UUID"))
            }),
            group_filtering = statuses_idx
                .zip(statuses_limit_idx)
                .zip(payment_statuses_idx.zip(payment_statuses_limit_idx))
                .into_iter()
                .format_with("", |((s, sl), (p, pl)), f| {
                    f(&format_args!(
                        "AND (status IN \
                              (SELECT unnest(${s}::INT2[]) LIMIT ${sl}::INT4) \
                              OR payment_status IN \
                              (SELECT unnest(${p}::INT2[]) LIMIT ${pl}::INT4))"
                    ))
                }),
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Select<By<Vec<rental::Id>, read::rental::due::ToStart>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<rental::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<rental::Id>, read::rental::due::ToStart>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::due::ToStart { today } = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rentals \
            WHERE status = $1::INT2 \
              AND payment_status = $2::INT2 \
              AND start_date <= $3::DATE";
        self.query(
            SQL,
            &[&rental::Status::Confirmed, &payment::Status::Paid, &today],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|rows| rows.into_iter().map(|row| row.get("id")).collect())
    }
}

impl<C> Database<Select<By<Vec<rental::Id>, read::rental::due::ToComplete>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<rental::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<rental::Id>, read::rental::due::ToComplete>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::due::ToComplete { today } = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rentals \
            WHERE status = $1::INT2 \
              AND end_date < $2::DATE";
        self.query(SQL, &[&rental::Status::ReturnApproved, &today])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.into_iter().map(|row| row.get("id")).collect())
    }
}
