pub mod client;
pub mod routine;
pub mod types;

pub use routine::GeminiRoutineClient;
