//! Neural network models and training

mod adam;
mod gcn;
mod train;

pub use adam::Adam;
pub use gcn::{masked_cross_entropy, Gcn, GcnConfig};
pub use train::{train_gcn, GcnMetrics, TrainGcnConfig};
