//! [`Query`] collection related to the multiple [`Rental`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Rental, Query};

use super::DatabaseQuery;

/// Queries a list of [`Rental`]s.
pub type List =
    DatabaseQuery<By<read::rental::list::Page, read::rental::list::Selector>>;

/// Queries total count of [`Rental`]s.
pub type TotalCount = DatabaseQuery<
    By<read::rental::list::TotalCount, read::rental::list::Filter>,
>;
