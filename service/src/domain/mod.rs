//! Domain definitions.

pub mod car;
pub mod customer;
pub mod rental;
pub mod review;
pub mod shop;

pub use self::{
    car::Car, customer::Customer, rental::Rental, review::Review, shop::Shop,
};
