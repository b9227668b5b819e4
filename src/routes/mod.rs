pub mod generate;
pub mod photo;
pub mod trips;
