pub mod paths;

pub use paths::{default_config_path, get_app_config_dir, get_app_state_dir};
