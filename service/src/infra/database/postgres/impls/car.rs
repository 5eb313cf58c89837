//! [`Car`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{car, Car},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<car::Id, Car>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[car::Id]>,
{
    type Ok = HashMap<car::Id, Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<car::Id, Car>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[car::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, shop_id, \
                   brand, model, year, license_plate, \
                   kind, transmission, fuel, seats, color, description, \
                   daily_rate, daily_rate_currency, \
                   insurance_rate, insurance_rate_currency, \
                   status, \
                   created_at \
            FROM cars \
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
                    Car {
                        id,
                        shop_id: row.get("shop_id"),
                        brand: row.get("brand"),
                        model: row.get("model"),
                        year: u16::try_from(row.get::<_, i32>("year"))
                            .expect("`year` overflow"),
                        license_plate: row.get("license_plate"),
                        kind: row.get("kind"),
                        transmission: row.get("transmission"),
                        fuel: row.get("fuel"),
                        seats: u16::try_from(row.get::<_, i32>("seats"))
                            .expect("`seats` overflow"),
                        color: row.get("color"),
                        description: row.get("description"),
                        daily_rate: Money {
                            amount: row.get("daily_rate"),
                            currency: row.get("daily_rate_currency"),
                        },
                        insurance_rate: row
                            .get::<_, Option<_>>("insurance_rate")
                            .map(|amount| Money {
                                amount,
                                currency: row.get("insurance_rate_currency"),
                            }),
                        status: row.get("status"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Car>, car::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<car::Id, Car>, [car::Id; 1]>>,
        Ok = HashMap<car::Id, Car>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Car>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Car>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(car)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
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
            status,
            created_at,
        } = car;

        let year = i32::from(year);
        let seats = i32::from(seats);
        let daily_rate_currency = daily_rate.currency;
        let daily_rate = daily_rate.amount;
        let insurance_rate_currency = insurance_rate.map(|r| r.currency);
        let insurance_rate = insurance_rate.map(|r| r.amount);

        const SQL: &str = "\
            INSERT INTO cars (\
                id, shop_id, \
                brand, model, year, license_plate, \
                kind, transmission, fuel, seats, color, description, \
                daily_rate, daily_rate_currency, \
                insurance_rate, insurance_rate_currency, \
                status, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::INT4, $6::VARCHAR, \
                $7::INT2, $8::INT2, $9::INT2, $10::INT4, \
                $11::VARCHAR, $12::VARCHAR, \
                $13::NUMERIC, $14::INT2, \
                $15::NUMERIC, $16::INT2, \
                $17::INT2, \
                $18::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET shop_id = EXCLUDED.shop_id, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                year = EXCLUDED.year, \
                license_plate = EXCLUDED.license_plate, \
                kind = EXCLUDED.kind, \
                transmission = EXCLUDED.transmission, \
                fuel = EXCLUDED.fuel, \
                seats = EXCLUDED.seats, \
                color = EXCLUDED.color, \
                description = EXCLUDED.description, \
                daily_rate = EXCLUDED.daily_rate, \
                daily_rate_currency = EXCLUDED.daily_rate_currency, \
                insurance_rate = EXCLUDED.insurance_rate, \
                insurance_rate_currency = EXCLUDED.insurance_rate_currency, \
                status = EXCLUDED.status, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &shop_id,
                &brand,
                &model,
                &year,
                &license_plate,
                &kind,
                &transmission,
                &fuel,
                &seats,
                &color,
                &description,
                &daily_rate,
                &daily_rate_currency,
                &insurance_rate,
                &insurance_rate_currency,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Car, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: car::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO cars_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::car::list::Page, read::car::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::car::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::car::list::Page, read::car::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::car::list::Selector {
            arguments,
            filter:
                read::car::list::Filter {
                    shop_id,
                    include_unavailable,
                    model,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let shop_idx = shop_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let available =
            (!include_unavailable).then_some(car::Status::Available);
        let available_idx = available.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let model_idx = model.as_ref().map(|m| {
            ps.push(m);
            ps.len()
        });

        let model_pattern =
            model.as_ref().map(|m| FuzzPattern::new(m.as_ref()));
        let model_pattern_idx = model_pattern.as_ref().map(|m| {
            ps.push(m);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM cars \
             WHERE true \
                   {cursor} \
                   {shop_filtering} \
                   {status_filtering} \
                   {model_filtering} \
             ORDER BY {model_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            shop_filtering = shop_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND shop_id = ${idx}::UUID"))
            }),
            status_filtering =
                available_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            model_filtering =
                model_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(CONCAT(brand, ' ', model)) \
                         SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            model_ordering = model_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(CONCAT(brand, ' ', model), \
                                 ${idx}::VARCHAR, 1, 1, 0) \
                     {order},"
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

        Ok(read::car::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<Select<By<read::car::list::TotalCount, read::car::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::car::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::car::list::TotalCount, read::car::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::car::list::Filter {
            shop_id,
            include_unavailable,
            model,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let shop_idx = shop_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let available =
            (!include_unavailable).then_some(car::Status::Available);
        let available_idx = available.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let model_pattern =
            model.as_ref().map(|m| FuzzPattern::new(m.as_ref()));
        let model_pattern_idx = model_pattern.as_ref().map(|m| {
            ps.push(m);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(id)::INT4 \
             FROM cars \
             WHERE true \
                   {shop_filtering} \
                   {status_filtering} \
                   {model_filtering}",
            shop_filtering = shop_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND shop_id = ${idx}::UUID"))
            }),
            status_filtering =
                available_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            model_filtering =
                model_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(CONCAT(brand, ' ', model)) \
                         SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
