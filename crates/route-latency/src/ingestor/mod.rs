pub mod query;
pub mod scan;
pub mod source;
pub mod types;

pub use query::LogQuery;
pub use scan::scan;
pub use source::{ElasticsearchSource, LogSource};
pub use types::{Page, Record};
