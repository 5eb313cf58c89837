//! [`Command`] definition.

pub mod approve_booking;
pub mod approve_return;
pub mod cancel_rental;
pub mod complete_rental;
pub mod confirm_refund;
pub mod create_car;
pub mod create_rental;
pub mod file_review;
pub mod initiate_refund;
pub mod reject_booking;
pub mod reject_payment;
pub mod reject_return;
pub mod request_return;
pub mod set_car_status;
pub mod start_rental;
pub mod upload_payment_proof;
pub mod verify_payment;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_booking::ApproveBooking, approve_return::ApproveReturn,
    cancel_rental::CancelRental, complete_rental::CompleteRental,
    confirm_refund::ConfirmRefund, create_car::CreateCar,
    create_rental::CreateRental, file_review::FileReview,
    initiate_refund::InitiateRefund, reject_booking::RejectBooking,
    reject_payment::RejectPayment, reject_return::RejectReturn,
    request_return::RequestReturn, set_car_status::SetCarStatus,
    start_rental::StartRental, upload_payment_proof::UploadPaymentProof,
    verify_payment::VerifyPayment,
};
