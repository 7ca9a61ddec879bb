pub mod process;

pub use process::{CreateProcessRequest, Process, UpdateProcessRequest};
