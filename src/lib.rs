pub mod call_query;
pub mod config;
pub mod errors;
pub mod globals;
pub mod helpers;
pub mod hierarchy;
pub mod patch;
pub mod project;
pub mod record;
pub mod resolver;
pub mod tokenizer;
pub mod value;

pub use call_query::calls_for;
pub use config::ExportConfig;
pub use errors::LoadError;
pub use hierarchy::ParentMap;
pub use project::Project;
pub use record::{CallInvocation, RecordTable, SourceRecord};
pub use resolver::{resolve, resolve_bool, resolve_number, resolve_raw, resolve_string};
pub use tokenizer::tokenize;
pub use value::{Number, Value, ValueKind};
