//! svgbake turns vector documents into imperative Rust drawing code, so
//! icons ship as compiled source instead of runtime-parsed assets.
//!
//! The pipeline per document:
//!
//! - [`convert::scene_from_svg`] resolves SVG/SVGZ bytes into a [`Scene`]
//! - [`transcode`] walks the scene, state-diffs the drawing instructions,
//!   splits them into size-bounded procedures and packages the final text
//! - the generated code paints through the [`canvas::Canvas`] trait
//!
//! [`batch::convert_dir`] drives whole directories with per-file failure
//! isolation; the `svgbake` binary wraps both entry points.
#![forbid(unsafe_code)]

pub mod batch;
pub mod canon;
pub mod canvas;
pub mod chunk;
pub mod convert;
pub mod error;
pub mod scene;
pub mod template;
pub mod transcode;
pub mod walk;

pub use canvas::{Canvas, Color, Composite, Paint, Shape, Stroke};
pub use convert::scene_from_svg;
pub use error::{BakeError, BakeResult};
pub use scene::{
    CompositeAlpha, CompositeRule, Geometry, Node, NodeKind, Painter, PathSeg, Scene, ShapeNode,
};
pub use transcode::{BakeOptions, DEFAULT_CHUNK_THRESHOLD_BYTES, transcode, transcode_to_string};
