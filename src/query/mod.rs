//! # Query Construction and Pagination
//!
//! Request parameters in, store query and response envelope out:
//!
//! ```text
//! body -> ListParams -> QueryBuilder -> PreparedQuery -> DataStore -> ListEnvelope
//! ```

pub mod builder;
pub mod collection;
pub mod envelope;
pub mod params;

pub use builder::{PageLimits, PagedQuery, QueryBuilder, DEFAULT_LIMIT, MAX_LIMIT};
pub use collection::{Collection, CollectionSpec};
pub use envelope::{ListEnvelope, Pagination, SingleEnvelope};
pub use params::ListParams;
