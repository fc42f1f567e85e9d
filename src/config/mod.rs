pub mod editor;
pub mod env;

pub use editor::EditorConfig;
pub use env::EnvConfig;
