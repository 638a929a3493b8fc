pub mod http;
pub mod memory;
pub mod name;
pub mod schema;
pub mod traits;
pub mod writer;

pub use http::HttpIndexStore;
pub use memory::MemoryIndexStore;
pub use name::{daily_index_name, IndexName, IndexNameError};
pub use traits::{CreateOutcome, IndexStore, StoreError};
pub use writer::{write_document, WriteOutcome};
