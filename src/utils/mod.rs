// Utils module - transport and string helpers shared by every workflow
pub mod exec;
pub mod ssh;
pub mod string;

// Re-export commonly used utilities
pub use exec::{CommandOperator, Executor};
pub use string::{expand_path, parse_mode, random_suffix, shell_escape};
