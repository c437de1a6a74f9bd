// Domain layer: per-invocation models and the ports handlers/hooks implement.

pub mod model;
pub mod ports;
