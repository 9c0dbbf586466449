//! Per-invocation orchestration: walk, chunk, package, flush.
//!
//! One call owns its emission state and output buffer, so independent
//! invocations are isolated and may run in parallel under an external
//! driver. Output is fully buffered before flushing because the bounding
//! box, known only after the walk, lands in tokens that precede the
//! instruction body in the skeleton.

use std::io;

use kurbo::Rect;

use crate::chunk;
use crate::error::BakeResult;
use crate::scene::Scene;
use crate::template;
use crate::walk;

/// Default byte threshold above which the instruction stream is split into
/// several generated procedures.
pub const DEFAULT_CHUNK_THRESHOLD_BYTES: usize = 3000;

/// Per-call configuration surface.
#[derive(Clone, Debug)]
pub struct BakeOptions {
    /// Name of the generated type.
    pub type_name: String,
    /// Optional namespace recorded in the generated header.
    pub namespace: Option<String>,
    /// Emit the resizable skeleton instead of the fixed-size one.
    pub resizable: bool,
    /// Procedure size bound handed to the chunker.
    pub chunk_threshold_bytes: usize,
}

impl BakeOptions {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: None,
            resizable: false,
            chunk_threshold_bytes: DEFAULT_CHUNK_THRESHOLD_BYTES,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn chunk_threshold_bytes(mut self, bytes: usize) -> Self {
        self.chunk_threshold_bytes = bytes;
        self
    }
}

/// Transcode `scene` into generated source text.
#[tracing::instrument(skip(scene, opts), fields(type_name = %opts.type_name))]
pub fn transcode_to_string(scene: &Scene, opts: &BakeOptions) -> BakeResult<String> {
    let output = walk::walk(scene)?;
    let bounds = output
        .bounds
        .unwrap_or_else(|| Rect::new(0.0, 0.0, scene.width, scene.height));
    let chunks = chunk::split(&output.instructions, opts.chunk_threshold_bytes);
    tracing::debug!(
        instructions = output.instructions.len(),
        chunks = chunks.len(),
        "walk complete"
    );
    Ok(template::render(&chunks, bounds, opts))
}

/// Transcode `scene` and write the artifact to a caller-supplied sink.
///
/// The sink receives either the complete artifact or nothing: any walk
/// failure aborts before the first byte is written.
pub fn transcode(scene: &Scene, opts: &BakeOptions, out: &mut dyn io::Write) -> BakeResult<()> {
    let text = transcode_to_string(scene, opts)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}
