//! # page-split
//!
//! Turns a folder of dual-page scans into single pages. Each scan is
//! optionally trimmed by fixed margins, then cut at one fixed column into a
//! left and a right page, written as JPEG.
//!
//! # Pipeline
//!
//! ```text
//! scans/              load        crop           split at x       pages/
//! ├── a.jpg    →   DynamicImage → (clamped) →  left | right  →  ├── a_left.jpg
//! └── b.png                                                     ├── a_right.jpg
//!                                                               └── ...
//! ```
//!
//! Scans are handled one at a time, in path order. A scan that fails does not
//! stop the batch; its failure is recorded in the run summary.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists the supported scans directly inside the input folder |
//! | [`process`] | Runs load → crop → split → write per scan and collects the results |
//! | [`imaging`] | Crop bounds, split planning, and the `image`-crate backend |
//! | [`naming`] | `<stem>_left.jpg` / `<stem>_right.jpg` output names |
//! | [`config`] | Layered `page-split.toml` loading, validation and CLI overrides |
//! | [`output`] | CLI output formatting for split runs and dry runs |
//!
//! # Design Decisions
//!
//! ## Margins Degrade, They Don't Fail
//!
//! Crop margins are clamped into the image. If what remains is empty the
//! scan is split uncropped and a warning is reported, so one oversized margin
//! setting doesn't lose a whole batch.
//!
//! ## One Split Column for the Whole Batch
//!
//! `split_x` is an absolute column in the cropped image. A scan whose cropped
//! width is `split_x` or less produces only a `_left` page, which covers the
//! odd single page (a cover, an insert) scanned alongside the spreads.
//!
//! ## Backend Trait
//!
//! All file decoding and encoding goes through
//! [`imaging::PageBackend`]. Crop and split are pure operations on in-memory
//! images, so the batch logic is tested against a mock backend without
//! writing any files.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
