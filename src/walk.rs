//! Scene-tree walker: flattens a [`Scene`] into a state-diffed stream of
//! drawing instructions plus the painted bounds.
//!
//! The emission state is owned by one walk and mirrors the target canvas:
//! paint, stroke, shape and composite are sticky across the whole stream,
//! not per subtree, which is what makes the diffing valid.

use std::sync::Arc;

use kurbo::{Affine, BezPath, Rect};

use crate::canon;
use crate::error::{BakeError, BakeResult};
use crate::scene::{CompositeRule, Geometry, Node, NodeKind, Painter, PathSeg, Scene};

/// One atomic statement of generated text, possibly spanning several lines
/// (a full path construction is a single instruction). Chunk boundaries
/// never fall inside an instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub text: String,
}

impl Instruction {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// True for trace-label comments, false for drawing statements.
    pub fn is_comment(&self) -> bool {
        self.text.trim_start().starts_with("//")
    }
}

/// Raw walk result, handed downstream immutably.
#[derive(Clone, Debug)]
pub struct WalkOutput {
    pub instructions: Vec<Instruction>,
    /// Union of painted extents in root space; `None` if nothing painted.
    pub bounds: Option<Rect>,
}

/// Walk the scene depth-first and emit its instruction stream.
#[tracing::instrument(skip(scene))]
pub fn walk(scene: &Scene) -> BakeResult<WalkOutput> {
    let mut emitter = Emitter::new();
    emitter.visit(&scene.root, "")?;
    Ok(WalkOutput {
        instructions: emitter.out,
        bounds: emitter.bounds,
    })
}

struct Emitter {
    out: Vec<Instruction>,
    current_paint: Option<String>,
    current_stroke: Option<String>,
    current_shape: Option<Arc<Geometry>>,
    current_alpha: Option<f64>,
    ctm: Affine,
    bounds: Option<Rect>,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            current_paint: None,
            current_stroke: None,
            current_shape: None,
            current_alpha: None,
            ctm: Affine::IDENTITY,
            bounds: None,
        }
    }

    fn push(&mut self, text: impl Into<String>) {
        self.out.push(Instruction::new(text));
    }

    fn visit(&mut self, node: &Node, label: &str) -> BakeResult<()> {
        if let Some(composite) = &node.composite {
            if composite.rule != CompositeRule::SrcOver {
                return Err(BakeError::unsupported_composite_rule(format!(
                    "{:?}",
                    composite.rule
                )));
            }
            let implicit_noop = self.current_alpha.is_none() && composite.alpha == 1.0;
            if self.current_alpha != Some(composite.alpha) && !implicit_noop {
                self.current_alpha = Some(composite.alpha);
                self.push(format!(
                    "g.set_composite(Composite::src_over({} * orig_alpha));\n",
                    canon::float(composite.alpha)
                ));
            }
        }

        let scoped = node.transform.filter(|t| *t != Affine::IDENTITY);
        if let Some(transform) = scoped {
            self.push("transforms.push(g.transform());\n");
            self.push(format!("g.concat({});\n", canon::affine(&transform)));
        }

        let saved_ctm = self.ctm;
        if let Some(transform) = scoped {
            self.ctm = self.ctm * transform;
        }

        // The opened scope must close on every exit path: run the subtree,
        // then emit the restore whether or not an error is on its way out.
        let result = self.visit_scoped(node, label);

        self.ctm = saved_ctm;
        if scoped.is_some() {
            self.push("g.set_transform(transforms.pop().unwrap_or_default());\n");
        }
        result
    }

    fn visit_scoped(&mut self, node: &Node, label: &str) -> BakeResult<()> {
        if !label.is_empty() {
            self.push(format!("\n// {label}\n"));
        }
        match &node.kind {
            NodeKind::Group(children) => {
                for (index, child) in children.iter().enumerate() {
                    self.visit(child, &format!("{label}_{index}"))?;
                }
            }
            NodeKind::Shape(shape) => self.apply_painter(&shape.painter, &shape.geometry)?,
        }
        Ok(())
    }

    fn apply_painter(&mut self, painter: &Painter, geometry: &Arc<Geometry>) -> BakeResult<()> {
        match painter {
            Painter::Fill(paint) => {
                // Canonicalization validates gradients before anything for
                // this application reaches the stream.
                let paint_text = canon::paint(paint)?;
                self.set_paint_if_changed(paint_text);
                self.emit_geometry(geometry);
                self.record_bounds(geometry, 0.0);
                self.push("g.fill(&shape);\n");
            }
            Painter::Stroke(paint, stroke) => {
                let paint_text = canon::paint(paint)?;
                let stroke_text = canon::stroke(stroke);
                self.set_paint_if_changed(paint_text);
                if self.current_stroke.as_deref() != Some(stroke_text.as_str()) {
                    self.push(format!("g.set_stroke({stroke_text});\n"));
                    self.current_stroke = Some(stroke_text);
                }
                self.emit_geometry(geometry);
                self.record_bounds(geometry, stroke.width / 2.0);
                self.push("g.draw(&shape);\n");
            }
            Painter::Composite(painters) => {
                for painter in painters {
                    self.apply_painter(painter, geometry)?;
                }
            }
        }
        Ok(())
    }

    fn set_paint_if_changed(&mut self, paint_text: String) {
        if self.current_paint.as_deref() != Some(paint_text.as_str()) {
            self.push(format!("g.set_paint({paint_text});\n"));
            self.current_paint = Some(paint_text);
        }
    }

    // Skips re-emission only for the literal same in-memory geometry.
    // Value-equal but distinct geometries are always re-emitted.
    fn emit_geometry(&mut self, geometry: &Arc<Geometry>) {
        if let Some(current) = &self.current_shape {
            if Arc::ptr_eq(current, geometry) {
                return;
            }
        }
        self.push(geometry_text(geometry));
        self.current_shape = Some(geometry.clone());
    }

    fn record_bounds(&mut self, geometry: &Geometry, outset: f64) {
        let Some(bbox) = geometry_bbox(geometry) else {
            return;
        };
        let device = self.ctm.transform_rect_bbox(bbox.inflate(outset, outset));
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(device),
            None => device,
        });
    }
}

fn geometry_text(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Path(segments) => {
            let mut text = String::from("shape = Shape::path(|p| {\n");
            for segment in segments {
                match *segment {
                    PathSeg::MoveTo(x, y) => {
                        text.push_str(&format!(
                            "    p.move_to({}, {});\n",
                            canon::float(x),
                            canon::float(y)
                        ));
                    }
                    PathSeg::LineTo(x, y) => {
                        text.push_str(&format!(
                            "    p.line_to({}, {});\n",
                            canon::float(x),
                            canon::float(y)
                        ));
                    }
                    PathSeg::QuadTo(x1, y1, x, y) => {
                        text.push_str(&format!(
                            "    p.quad_to({}, {}, {}, {});\n",
                            canon::float(x1),
                            canon::float(y1),
                            canon::float(x),
                            canon::float(y)
                        ));
                    }
                    PathSeg::CubicTo(x1, y1, x2, y2, x, y) => {
                        text.push_str(&format!(
                            "    p.curve_to({}, {}, {}, {}, {}, {});\n",
                            canon::float(x1),
                            canon::float(y1),
                            canon::float(x2),
                            canon::float(y2),
                            canon::float(x),
                            canon::float(y)
                        ));
                    }
                    PathSeg::Close => text.push_str("    p.close();\n"),
                }
            }
            text.push_str("});\n");
            text
        }
        Geometry::Rect { x, y, w, h } => format!(
            "shape = Shape::rect({}, {}, {}, {});\n",
            canon::float(*x),
            canon::float(*y),
            canon::float(*w),
            canon::float(*h)
        ),
        Geometry::RoundRect {
            x,
            y,
            w,
            h,
            arc_w,
            arc_h,
        } => format!(
            "shape = Shape::round_rect({}, {}, {}, {}, {}, {});\n",
            canon::float(*x),
            canon::float(*y),
            canon::float(*w),
            canon::float(*h),
            canon::float(*arc_w),
            canon::float(*arc_h)
        ),
        Geometry::Ellipse { x, y, w, h } => format!(
            "shape = Shape::ellipse({}, {}, {}, {});\n",
            canon::float(*x),
            canon::float(*y),
            canon::float(*w),
            canon::float(*h)
        ),
        Geometry::Line { x1, y1, x2, y2 } => format!(
            "shape = Shape::line({}, {}, {}, {});\n",
            canon::float(*x1),
            canon::float(*y1),
            canon::float(*x2),
            canon::float(*y2)
        ),
    }
}

fn geometry_bbox(geometry: &Geometry) -> Option<Rect> {
    match geometry {
        Geometry::Path(segments) => {
            let mut path = BezPath::new();
            let mut started = false;
            for segment in segments {
                match *segment {
                    PathSeg::MoveTo(x, y) => {
                        path.move_to((x, y));
                        started = true;
                    }
                    PathSeg::LineTo(x, y) if started => path.line_to((x, y)),
                    PathSeg::QuadTo(x1, y1, x, y) if started => path.quad_to((x1, y1), (x, y)),
                    PathSeg::CubicTo(x1, y1, x2, y2, x, y) if started => {
                        path.curve_to((x1, y1), (x2, y2), (x, y));
                    }
                    PathSeg::Close if started => path.close_path(),
                    _ => {}
                }
            }
            if path.elements().is_empty() {
                None
            } else {
                use kurbo::Shape as _;
                Some(path.bounding_box())
            }
        }
        Geometry::Rect { x, y, w, h }
        | Geometry::RoundRect { x, y, w, h, .. }
        | Geometry::Ellipse { x, y, w, h } => Some(Rect::new(*x, *y, x + w, y + h)),
        Geometry::Line { x1, y1, x2, y2 } => Some(Rect::new(*x1, *y1, *x2, *y2).abs()),
    }
}
