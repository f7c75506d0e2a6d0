pub mod completion_worker;

pub use completion_worker::CompletionWorker;
