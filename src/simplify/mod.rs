//! Trajectory simplification strategies.
//!
//! Three independent alternatives over the same derived input:
//! - [`sed`] - synchronized-distance point elimination; geometrically
//!   faithful within a configured deviation
//! - [`segments`] - collapses the interiors of stop and straight-and-steady
//!   segments; keeps the eventful parts of a track
//! - [`downsample`] - fixed-interval time bucketing; a plain density cap
//!   with no geometric guarantee
//!
//! None of the strategies is chained to the cleaner by this crate; callers
//! compose them as policy dictates.

pub mod downsample;
pub mod sed;
pub mod segments;

pub use downsample::{downsample_track, DownsampleConfig};
pub use sed::{simplify_sed, simplify_sed_derived, SedConfig};
pub use segments::{simplify_segments, simplify_segments_derived, SegmentConfig};
