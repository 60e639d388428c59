pub mod generate;

pub use generate::{ChatClient, LanguageModel};
