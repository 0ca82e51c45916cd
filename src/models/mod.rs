pub mod pin;
pub mod photo;
pub mod region;
