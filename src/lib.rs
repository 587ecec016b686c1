pub mod dataset;
pub mod decode;
pub mod eigen;
pub mod graph;
pub mod matrix;
pub mod report;
pub mod train;
pub mod update;
