//! Packages chunked instruction bodies and metadata into the final source
//! text by literal sentinel replacement. No re-parsing, no validation of
//! the produced text: verifying that the output compiles is the build of
//! the consuming crate, not this module.

use kurbo::Rect;

use crate::chunk::Chunk;
use crate::transcode::BakeOptions;

const TEMPLATE_FIXED: &str = include_str!("../templates/icon.rs.tmpl");
const TEMPLATE_RESIZABLE: &str = include_str!("../templates/icon_resizable.rs.tmpl");

const TOKEN_NAMESPACE: &str = "TOKEN_NAMESPACE";
const TOKEN_TYPENAME: &str = "TOKEN_TYPENAME";
const TOKEN_PAINT_CALLS: &str = "TOKEN_PAINT_CALLS";
const TOKEN_PAINT_FNS: &str = "TOKEN_PAINT_FNS";
const TOKEN_ORIG_X: &str = "TOKEN_ORIG_X";
const TOKEN_ORIG_Y: &str = "TOKEN_ORIG_Y";
const TOKEN_ORIG_WIDTH: &str = "TOKEN_ORIG_WIDTH";
const TOKEN_ORIG_HEIGHT: &str = "TOKEN_ORIG_HEIGHT";

/// Substitute the chunked bodies and metadata into the selected skeleton.
pub fn render(chunks: &[Chunk], bounds: Rect, opts: &BakeOptions) -> String {
    let template = if opts.resizable {
        TEMPLATE_RESIZABLE
    } else {
        TEMPLATE_FIXED
    };

    let namespace_line = match &opts.namespace {
        Some(namespace) => format!("//! Namespace: `{namespace}`."),
        None => String::new(),
    };

    template
        .replace(TOKEN_NAMESPACE, &namespace_line)
        .replace(TOKEN_TYPENAME, &opts.type_name)
        .replace(TOKEN_PAINT_CALLS, &paint_calls(chunks.len()))
        .replace(TOKEN_PAINT_FNS, &paint_fns(chunks))
        .replace(TOKEN_ORIG_X, &ceil_i32(bounds.x0))
        .replace(TOKEN_ORIG_Y, &ceil_i32(bounds.y0))
        .replace(TOKEN_ORIG_WIDTH, &ceil_i32(bounds.width()))
        .replace(TOKEN_ORIG_HEIGHT, &ceil_i32(bounds.height()))
}

fn ceil_i32(v: f64) -> String {
    format!("{}", v.ceil() as i32)
}

// The entry point invokes every chunk procedure in sequence, threading the
// composite alpha and the open-transform stack through each call so that
// state obligations may straddle chunk boundaries.
fn paint_calls(count: usize) -> String {
    (0..count)
        .map(|i| format!("        paint_{i}(g, orig_alpha, &mut transforms);"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint_fns(chunks: &[Chunk]) -> String {
    let mut fns = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let mut text = format!(
            "#[allow(unused_mut, unused_variables)]\n\
             fn paint_{i}(g: &mut dyn Canvas, orig_alpha: f64, transforms: &mut Vec<Affine>) {{\n\
             \x20   let mut shape = Shape::default();\n"
        );
        for line in chunk.body.lines() {
            if line.is_empty() {
                text.push('\n');
            } else {
                text.push_str("    ");
                text.push_str(line);
                text.push('\n');
            }
        }
        text.push('}');
        fns.push(text);
    }
    fns.join("\n\n")
}
