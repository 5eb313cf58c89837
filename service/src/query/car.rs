//! [`Query`] collection related to a single [`Car`].

use common::operations::By;

use crate::domain::{car, Car};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Car`] by its [`car::Id`].
pub type ById = DatabaseQuery<By<Option<Car>, car::Id>>;
