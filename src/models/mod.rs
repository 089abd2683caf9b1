pub mod lot;
pub mod reservation;
pub mod spot;
pub mod user;

pub use lot::{LotOverview, ParkingLot};
pub use reservation::{Reservation, ReservationView};
pub use spot::ParkingSpot;
pub use user::User;
