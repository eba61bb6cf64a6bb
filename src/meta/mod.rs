//! Output metadata model: tables, columns and storage type tags.

pub mod column;
pub mod storage_type;
pub mod table;

pub use column::{ColumnMetadata, READ_ONLY};
pub use storage_type::StorageType;
pub use table::TableMetadata;
