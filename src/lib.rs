//! photomover: batch photo pipeline.
//!
//! Watches a set of source folders described by a CSV config file and, on
//! every pass, resizes the photos it finds, rewrites their EXIF down to a
//! GPS-only block, draws a caption, and copies the results into destination
//! folders under timestamped names. Sources are deleted on success and
//! quarantined on failure, so a folder drains as the pipeline runs.
//!
//! Module map:
//!
//! | Module    | Role                                                    |
//! |-----------|---------------------------------------------------------|
//! | `config`  | CSV job list parsing and size strings                   |
//! | `gps`     | Decimal degrees to EXIF rational DMS                    |
//! | `fonts`   | Per-run font cache keyed by family and size             |
//! | `imaging` | Backend trait, EXIF plumbing, production image pipeline |
//! | `storage` | Destination sink trait and the local-folder sink        |
//! | `report`  | Timestamped error blocks and the quarantine folder      |
//! | `runner`  | Per-job and per-pass orchestration                      |

pub mod config;
pub mod fonts;
pub mod gps;
pub mod imaging;
pub mod report;
pub mod runner;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;
