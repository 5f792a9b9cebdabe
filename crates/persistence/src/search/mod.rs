//! Search input handling for the client and service record lists.
//!
//! - [`query_string`] - splits raw search input into keyword filters and a
//!   general term
//! - [`keywords`] - the keyword whitelists and the fields they address
//! - [`filter`] - turns parsed input into a backend-neutral [`SearchFilter`]
//!
//! # Example
//!
//! ```
//! use fixlog_persistence::search::{ClientField, ClientSearch, Predicate};
//!
//! let search = ClientSearch::new().unwrap();
//! let filter = search.filter("전화:02-1234 강남");
//!
//! assert_eq!(filter.predicates[0].field, ClientField::Phone);
//! assert_eq!(filter.predicates[0].predicate, Predicate::Contains("02-1234".into()));
//! assert_eq!(filter.general.as_deref(), Some("강남"));
//! ```

pub mod filter;
pub mod keywords;
pub mod query_string;

pub use filter::{
    ClientSearch, FieldPredicate, FieldSearch, Predicate, RecordSearch, SearchFilter,
    parse_date_range,
};
pub use keywords::{
    CLIENT_KEYWORDS, ClientField, RECORD_KEYWORDS, RecordField, SearchField, status_code,
};
pub use query_string::{ParsedQuery, QueryParser};
