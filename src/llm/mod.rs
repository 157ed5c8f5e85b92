pub mod client;
pub mod integration;
pub mod prompts;
pub mod tools;

pub use client::*;
pub use integration::*;
pub use prompts::*;
pub use tools::*;
