//! Sensor subsystem.
//!
//! One probe today: the capacitive soil-moisture sensor.  The module
//! split mirrors the driver layout so further probes (tank level, air
//! temperature) slot in beside it.

pub mod moisture;
