mod function;
mod query;
mod report;

pub use function::FuncId;
pub use query::{Query, QueryErr, QueryFrame};
pub use report::{Report, ReportFrame};
