mod reading;

pub use reading::{SensorReading, REQUIRED_FIELDS};
