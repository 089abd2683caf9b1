pub mod accounts;
pub mod booking;
pub mod lots;
