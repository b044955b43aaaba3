//! IO modules - data boundary and output
//!
//! - `franchise_csv` - `<name>_movies.csv` tables into validated `MovieRecord`s
//! - `comments` - `<name>_comments.json` exports into a `CommentSet`
//! - `catalog` - data directory discovery, one `FranchiseInput` per franchise
//! - `egress` - joined score rows to file (JSONL format)

pub mod catalog;
pub mod comments;
pub mod egress;
pub mod franchise_csv;

pub use catalog::{discover, load_inputs, FranchiseFiles};
pub use egress::Egress;
