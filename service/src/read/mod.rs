//! Read entities definitions.

pub mod car;
pub mod rental;

pub use self::rental::Overview;
