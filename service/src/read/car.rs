//! [`Car`] read model definitions.

pub mod list {
    //! [`Car`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};
    use smart_default::SmartDefault;

    use crate::domain::{car, shop};
    #[cfg(doc)]
    use crate::domain::{Car, Shop};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = car::Id;

    /// Cursor pointing to a specific [`Car`] in a list.
    pub type Cursor = car::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, SmartDefault)]
    pub struct Filter {
        /// ID of the [`Shop`] the [`Car`]s belong to.
        pub shop_id: Option<shop::Id>,

        /// Include [`Car`]s that cannot be booked right now.
        #[default(true)]
        pub include_unavailable: bool,

        /// [`car::Brand`] or [`car::Model`] (or a part of either) to fuzzy
        /// search for.
        pub model: Option<car::Model>,
    }

    /// Total count of [`Car`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
