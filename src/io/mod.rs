pub mod config_io;
pub mod todo_io;

pub use config_io::ConfigError;
pub use todo_io::TodoError;
