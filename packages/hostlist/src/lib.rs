#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Utilities for expanding and compressing the bracketed host-list expressions used by cluster
//! schedulers to name sets of compute nodes.
//!
//! Example host-list expression: `n[000-002,005-008],g[100-102]`
//!
//! # Format
//!
//! The value is a comma-separated list of zero or more host patterns. Commas inside brackets
//! belong to the bracket, not to the list. Each pattern is literal text with zero or more
//! bracket groups, where a bracket group is a comma-separated list of:
//!
//! * a single unsigned integer (e.g. `7`)
//! * an inclusive range of unsigned integers (e.g. `000-003`)
//!
//! The number of digits in the range start sets the zero-padded width of every number the range
//! produces. A pattern with several bracket groups (e.g. `r[1-2]n[01-04]`) expands to every
//! combination, with the leftmost group varying slowest.
//!
//! # Example
//!
//! ```
//! let hosts = hostlist::expand("n[000-002],g7").unwrap();
//! assert_eq!(hosts, vec!["n000", "n001", "n002", "g7"]);
//!
//! println!("As host list: {}", hostlist::compress(hosts.iter().map(String::as_str)));
//! ```
//!
//! The [`HostList`] type keeps an ordered sequence of names and offers deduplication:
//!
//! ```
//! let mut hosts = hostlist::HostList::parse("n[3-4],n[1-3]").unwrap();
//! hosts.uniq();
//!
//! assert_eq!(hosts.ranged(), "n[1-4]");
//! ```

mod emit;
mod error;
mod host_list;
mod name;
mod parse;

pub use emit::*;
pub use error::*;
pub use host_list::*;
pub use parse::*;
