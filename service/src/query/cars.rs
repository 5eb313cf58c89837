//! [`Query`] collection related to the multiple [`Car`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Car, Query};

use super::DatabaseQuery;

/// Queries a list of [`Car`]s.
pub type List =
    DatabaseQuery<By<read::car::list::Page, read::car::list::Selector>>;

/// Queries total count of [`Car`]s.
pub type TotalCount =
    DatabaseQuery<By<read::car::list::TotalCount, read::car::list::Filter>>;
