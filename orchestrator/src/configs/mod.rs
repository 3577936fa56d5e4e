mod env;
mod kinds;

pub use env::Config;
pub use kinds::{EngineKind, InvalidPolicy, ReportFormat};
