//! Social network client used by scrap-journal.
//!
//! Only the Twitter v1.1 pipeline is implemented: typed response models,
//! the OAuth1-signed timeline client, normalization into journal posts, and
//! the interactive PIN authorization flow.
pub mod twitter;
