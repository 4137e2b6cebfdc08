//! JSON manipulation keywords driven by JSONPath expressions.
//!
//! ```
//! use jsonlib::JsonLibrary;
//! use serde_json::json;
//!
//! let lib = JsonLibrary::new();
//! let doc = json!({"items": [{"id": 1}, {"id": 2}]});
//! let ids = lib.get_value_from_json(&doc, "$.items[*].id").unwrap();
//! assert_eq!(ids, vec![json!(1), json!(2)]);
//! ```

pub mod error;
pub mod format;
pub mod keywords;
pub mod navigate;
pub mod ops;
pub mod output;
pub mod path;
pub mod schema;

pub use error::JsonLibError;
pub use keywords::{JsonLibrary, Settings};
pub use navigate::{find, Location, Match, Step};
pub use path::JsonPath;
