//! Configuration management for notifier-client
//!
//! - [`ClientOptions`]: the construction-time surface of a client
//! - [`ConfigResolver`]: merges options over defaults and picks the mode
//! - [`ConfigLoader`]: layered loading from TOML files and `NOTIFIER_*`
//!   environment variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod settings;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_env;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, Configuration, Endpoint, ResolutionMode};
pub use settings::{
    ClientOptions, ConsoleSettings, DefaultProfile, FileSettings, LoggerSettings, NotifierOption,
    PortPolicy, Settings,
};
