pub mod environment;
pub mod paths;

pub use environment::Environment;
pub use paths::{format_path_with_tilde, project_slug};
