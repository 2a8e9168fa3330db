pub mod lenient;
pub mod posting;

pub use posting::{parse_skill_list, GeoPoint, Posting, PostingRow};
