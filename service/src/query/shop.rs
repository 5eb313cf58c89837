//! [`Query`] collection related to a single [`Shop`].

use common::operations::By;

use crate::domain::{shop, Shop};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Shop`] by its [`shop::Id`].
pub type ById = DatabaseQuery<By<Option<Shop>, shop::Id>>;
