//! Operations understood by [`Handler`]s.

use std::marker::PhantomData;

use crate::Handler;

/// Insertion of a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Update of an existing value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Selection of a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Exclusive locking of a value.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Starting of some long-running work.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Performing of a unit of work.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Opening of a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Transactional form of a `T`, as produced by [`Transact`].
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Committing of an opened transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Request of a `W` identified by a `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the requested value.
    _what: PhantomData<W>,

    /// Key the value is requested by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] wrapping the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps this [`By`] into its key.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
