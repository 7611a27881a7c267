pub mod index;
pub mod query;
pub mod tokenizer;

pub use index::{ConsistencyError, DocId, DocumentEntry, IndexEntry, SearchEngine};
pub use query::{parse_query, Operator, ParsedQuery};
