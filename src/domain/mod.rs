pub mod events;
pub mod ports;
pub mod records;
