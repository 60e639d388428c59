pub mod graph;
pub mod record;
pub mod tools;

// Re-export the Message struct from tools module for convenience
pub use tools::Message;
