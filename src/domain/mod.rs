pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;
