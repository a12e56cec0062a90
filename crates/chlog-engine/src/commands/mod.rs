//! Command orchestration layer.
//!
//! Each command coordinates the core kernel with the network seams and owns
//! the operation boundary logging for its run.

pub mod relay;
