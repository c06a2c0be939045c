//! Configuration loading and merging
//!
//! Settings come from built-in defaults, an optional config file and the
//! environment, with precedence Env > File > Defaults.

pub mod loader;
pub mod settings;

pub use loader::load_settings;
pub use settings::{
    DiscoverSettings, IntakeSettings, RenderSettings, ServerSettings, ServiceSettings, Settings,
};
