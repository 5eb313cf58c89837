//! Abstractions for cursor-based pagination.

use std::fmt;

/// Page of `N`odes addressed by `C`ursors.
#[derive(Clone, Debug)]
pub struct Connection<C, N> {
    /// [`Edge`]s forming this [`Connection`].
    pub edges: Vec<Edge<C, N>>,

    /// [`Kind`] of pagination this [`Connection`] was selected with.
    pub kind: Kind,

    /// Indicator whether more nodes exist beyond this [`Connection`].
    pub has_more: bool,
}

/// A page in a [`Connection`].
pub type Page<C, N> = Connection<C, N>;

impl<C, N> Connection<C, N> {
    /// Creates a new [`Connection`] from the provided [`Edge`]s.
    #[must_use]
    pub fn new(
        arguments: &Arguments<C>,
        edges: impl IntoIterator<Item = impl Into<Edge<C, N>>>,
        has_more: bool,
    ) -> Self {
        Self {
            edges: edges.into_iter().map(Into::into).collect::<Vec<_>>(),
            kind: arguments.kind(),
            has_more,
        }
    }

    /// Returns [`PageInfo`] of this [`Connection`].
    #[must_use]
    pub fn page_info(&self) -> PageInfo<C>
    where
        C: Clone,
    {
        PageInfo {
            end_cursor: self.edges.last().map(|e| e.cursor.clone()),
            has_next_page: self.has_more && self.kind.is_forward(),
            has_previous_page: self.has_more && self.kind.is_backward(),
        }
    }
}

/// Information about a page in a [`Connection`].
#[derive(Clone, Copy, Debug)]
pub struct PageInfo<C> {
    /// Last cursor of the page.
    pub end_cursor: Option<C>,

    /// Indicator whether a next page exists.
    pub has_next_page: bool,

    /// Indicator whether a previous page exists.
    pub has_previous_page: bool,
}

/// Single node of a [`Connection`] paired with its cursor.
#[derive(Clone, Copy, Debug)]
pub struct Edge<C, N> {
    /// Cursor addressing the node.
    pub cursor: C,

    /// The node itself.
    pub node: N,
}

impl<C, N> From<(C, N)> for Edge<C, N> {
    fn from((cursor, node): (C, N)) -> Self {
        Self { cursor, node }
    }
}

/// Arguments of a pagination request.
#[derive(Clone, Copy, Debug)]
pub enum Arguments<C> {
    /// Pagination towards the end of the list.
    Forward {
        /// Number of nodes to return.
        first: usize,

        /// Cursor to return nodes after.
        after: Option<C>,

        /// Indicator whether the `after` cursor itself is part of the
        /// result.
        including: bool,
    },

    /// Pagination towards the beginning of the list.
    Backward {
        /// Number of nodes to return.
        last: usize,

        /// Cursor to return nodes before.
        before: Option<C>,

        /// Indicator whether the `before` cursor itself is part of the
        /// result.
        including: bool,
    },
}

impl<C> Arguments<C> {
    /// Creates a new [`Arguments`] out of the provided raw parameters.
    ///
    /// Returns [`None`] if the parameters contradict each other (like both
    /// `first` and `last` being set). Equal `after` and `before` cursors
    /// request the pointed node itself.
    pub fn new<Num>(
        first: Option<Num>,
        after: Option<C>,
        last: Option<Num>,
        before: Option<C>,
        default: Num,
    ) -> Option<Self>
    where
        C: PartialEq + fmt::Debug,
        Num: TryInto<usize> + fmt::Debug,
    {
        Some(match (first, after, last, before) {
            (None, None, None, None) => Self::Forward {
                first: default.try_into().ok()?,
                after: None,
                including: false,
            },
            (Some(first), None, None, None) => Self::Forward {
                first: first.try_into().ok()?,
                after: None,
                including: false,
            },
            (Some(first), Some(after), None, None) => Self::Forward {
                first: first.try_into().ok()?,
                after: Some(after),
                including: false,
            },
            (Some(first), Some(after), None, Some(before))
                if after == before =>
            {
                Self::Forward {
                    first: first.try_into().ok()?,
                    after: Some(after),
                    including: true,
                }
            }
            (None, None, Some(last), None) => Self::Backward {
                last: last.try_into().ok()?,
                before: None,
                including: false,
            },
            (None, None, Some(last), Some(before)) => Self::Backward {
                last: last.try_into().ok()?,
                before: Some(before),
                including: false,
            },
            (None, Some(after), Some(last), Some(before))
                if after == before =>
            {
                Self::Backward {
                    last: last.try_into().ok()?,
                    before: Some(before),
                    including: true,
                }
            }
            (None, Some(after), None, Some(before)) if after == before => {
                Self::Forward {
                    first: 1,
                    after: Some(after),
                    including: true,
                }
            }
            _ => return None,
        })
    }

    /// Returns the cursor if this [`Arguments`] requests exactly the node it
    /// points at.
    pub fn exact_cursor(&self) -> Option<&C> {
        match self {
            Self::Forward {
                first: 1,
                after,
                including: true,
            } => after.as_ref(),
            Self::Backward {
                last: 1,
                before,
                including: true,
            } => before.as_ref(),
            Self::Forward { .. } | Self::Backward { .. } => None,
        }
    }

    /// Returns the cursor this [`Arguments`] paginates from.
    #[must_use]
    pub fn cursor(&self) -> Option<&C> {
        match self {
            Self::Forward { after, .. } => after.as_ref(),
            Self::Backward { before, .. } => before.as_ref(),
        }
    }

    /// Returns the [`Kind`] of pagination this [`Arguments`] requests.
    pub fn kind(&self) -> Kind {
        match *self {
            Self::Forward { including, .. } => {
                if including {
                    Kind::ForwardIncluding
                } else {
                    Kind::Forward
                }
            }
            Self::Backward { including, .. } => {
                if including {
                    Kind::BackwardIncluding
                } else {
                    Kind::Backward
                }
            }
        }
    }

    /// Returns the number of nodes this [`Arguments`] requests.
    #[must_use]
    pub fn limit(&self) -> usize {
        match *self {
            Self::Forward { first, .. } => first,
            Self::Backward { last, .. } => last,
        }
    }
}

/// Pagination [`Arguments`] combined with a domain-specific filter.
#[derive(Clone, Copy, Debug)]
pub struct Selector<C, F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments<C>,

    /// Additional filter narrowing the result.
    pub filter: F,
}

/// Kind of pagination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Forward pagination.
    Forward,

    /// Forward pagination including the cursor.
    ForwardIncluding,

    /// Backward pagination.
    Backward,

    /// Backward pagination including the cursor.
    BackwardIncluding,
}

impl Kind {
    /// Returns whether this [`Kind`] paginates forward.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward | Self::ForwardIncluding)
    }

    /// Returns whether this [`Kind`] paginates backward.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        matches!(self, Self::Backward | Self::BackwardIncluding)
    }

    /// Returns the comparison operator selecting cursors for this [`Kind`].
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Forward => ">",
            Self::ForwardIncluding => ">=",
            Self::Backward => "<",
            Self::BackwardIncluding => "<=",
        }
    }

    /// Returns the [`Order`] cursors are sorted in for this [`Kind`].
    #[must_use]
    pub const fn order(&self) -> Order {
        match self {
            Self::Forward | Self::ForwardIncluding => Order::Ascending,
            Self::Backward | Self::BackwardIncluding => Order::Descending,
        }
    }
}

/// Order of pagination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns the SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Defines pagination type aliases over the provided cursor, node and filter
/// types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($cursor:ty, $node:ty, $filter:ty) => {
        #[doc = "Edge of a [`Connection`]."]
        pub type Edge = $crate::pagination::Edge<$cursor, $node>;

        #[doc = "A [`Connection`] of nodes."]
        pub type Connection = $crate::pagination::Connection<$cursor, $node>;

        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$cursor, $node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo<$cursor>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments<$cursor>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$cursor, $filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Kind, Order};

    #[test]
    fn defaults_to_forward() {
        let args =
            Arguments::<u32>::new(None, None, None, None, 10_i32).unwrap();

        assert!(matches!(
            args,
            Arguments::Forward {
                first: 10,
                after: None,
                including: false,
            },
        ));
        assert_eq!(args.limit(), 10);
        assert_eq!(args.kind(), Kind::Forward);
    }

    #[test]
    fn rejects_contradicting_parameters() {
        assert!(
            Arguments::new(Some(5), None, Some(5), None::<u32>, 10_i32)
                .is_none()
        );
        assert!(
            Arguments::new(Some(5), Some(1_u32), None, Some(2), 10_i32)
                .is_none()
        );
        assert!(Arguments::<u32>::new(Some(-1), None, None, None, 10).is_none());
    }

    #[test]
    fn equal_cursors_request_the_pointed_node() {
        let args =
            Arguments::new(None, Some(7_u32), None, Some(7), 10_i32).unwrap();

        assert_eq!(args.exact_cursor(), Some(&7));
        assert_eq!(args.limit(), 1);
        assert_eq!(args.kind(), Kind::ForwardIncluding);
    }

    #[test]
    fn kind_maps_to_operator_and_order() {
        assert_eq!(Kind::Forward.operator(), ">");
        assert_eq!(Kind::ForwardIncluding.operator(), ">=");
        assert_eq!(Kind::Backward.operator(), "<");
        assert_eq!(Kind::BackwardIncluding.operator(), "<=");

        assert_eq!(Kind::Forward.order(), Order::Ascending);
        assert_eq!(Kind::Backward.order(), Order::Descending);
        assert!(Kind::ForwardIncluding.is_forward());
        assert!(Kind::BackwardIncluding.is_backward());
    }
}
