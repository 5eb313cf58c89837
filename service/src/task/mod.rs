//! Background [`Task`]s definitions.

pub mod advance_due_rentals;
mod background;

pub use common::Handler as Task;

pub use self::{
    advance_due_rentals::AdvanceDueRentals, background::Background,
};
