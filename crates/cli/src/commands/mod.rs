pub mod batch;
pub mod check;
pub mod interactive;
pub mod task;
