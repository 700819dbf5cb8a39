//! Output generation for crawl artifacts.
//!
//! Each run writes into its own timestamped directory so consecutive crawls
//! never overwrite each other:
//!
//! # Output Structure
//!
//! ```text
//! data/crawl/outputs/
//! ├── 20250820_100513/
//! │   └── news_extracted.json
//! └── 20250820_143005/
//!     └── news_extracted.json
//! ```

pub mod json;
