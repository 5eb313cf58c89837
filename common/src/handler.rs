//! [`Handler`] abstractions.

use std::future::Future;

/// Handler of some execution.
///
/// Commands, queries, background tasks and database operations all share this
/// single seam.
pub trait Handler<Args = ()> {
    /// Type of the value produced by a successful execution.
    type Ok;

    /// Type of the error produced by a failed execution.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
