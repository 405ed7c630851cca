//! Active Handles Report
//!
//! Console output for [`active_handles`] descriptors: an ANSI highlighter
//! implementing the probe's [`Highlight`](active_handles::Highlight) seam and
//! a reporter that prints one block per pending callback.

#![warn(missing_docs)]

pub mod highlight;
pub mod report;

pub use highlight::AnsiHighlighter;
pub use report::{color_choice, print, render, to_json};
