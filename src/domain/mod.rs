// Domain layer: forecast/poem models and ports (interfaces). No external
// dependencies beyond serde/chrono where needed.

pub mod model;
pub mod ports;
