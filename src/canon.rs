//! Canonical literal formatting for generated source text.
//!
//! Every value the walker emits goes through these functions, so equal
//! inputs always produce byte-identical text. That determinism is what the
//! walker's state diffing compares against.

use kurbo::Affine;

use crate::canvas::{Color, Paint, Stroke};
use crate::error::{BakeError, BakeResult};

/// Nudge applied to a gradient fraction that would serialize identically to
/// its predecessor. The target gradient routine requires strictly
/// increasing stops, so equal stops are separated by this epsilon; the
/// resulting drift is a documented lossy transform.
pub const FRACTION_NUDGE: f64 = 1e-9;

const INTEGRAL_EPSILON: f64 = 1e-6;

// Named palette recognized by the color canonicalizer, matching the
// constants exported by the canvas module.
const PALETTE: &[(Color, &str)] = &[
    (Color::WHITE, "Color::WHITE"),
    (Color::BLACK, "Color::BLACK"),
    (Color::RED, "Color::RED"),
    (Color::GREEN, "Color::GREEN"),
    (Color::BLUE, "Color::BLUE"),
    (Color::LIGHT_GRAY, "Color::LIGHT_GRAY"),
    (Color::GRAY, "Color::GRAY"),
    (Color::DARK_GRAY, "Color::DARK_GRAY"),
    (Color::YELLOW, "Color::YELLOW"),
    (Color::CYAN, "Color::CYAN"),
    (Color::MAGENTA, "Color::MAGENTA"),
];

/// Canonical float literal. Values integral within 1e-6 absolute error
/// render as `{n}.0`; everything else uses shortest round-trip formatting.
pub fn float(v: f64) -> String {
    let rounded = v.round();
    if (rounded - v).abs() < INTEGRAL_EPSILON && rounded.abs() < 9.0e15 {
        format!("{}.0", rounded as i64)
    } else {
        format!("{v}")
    }
}

// Exact float literal: no integral snapping, so deliberately distinct
// values (nudged gradient stops) never collapse back together.
fn exact_float(v: f64) -> String {
    if v == 0.0 {
        "0.0".to_owned()
    } else if v == 1.0 {
        "1.0".to_owned()
    } else {
        format!("{v}")
    }
}

/// `(x, y)` point literal.
pub fn point(x: f64, y: f64) -> String {
    format!("({}, {})", float(x), float(y))
}

/// Affine literal with all 6 matrix components, in kurbo coefficient order.
pub fn affine(transform: &Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!(
        "Affine::new([{}, {}, {}, {}, {}, {}])",
        float(a),
        float(b),
        float(c),
        float(d),
        float(e),
        float(f)
    )
}

/// Canonical color literal: named palette entry, `Color::rgb(0xRRGGBB)` for
/// other opaque colors, `Color::rgba(0xAARRGGBB)` when translucent.
pub fn color(c: Color) -> String {
    for (known, name) in PALETTE {
        if c == *known {
            return (*name).to_owned();
        }
    }
    if c.is_opaque() {
        format!("Color::rgb(0x{:02X}{:02X}{:02X})", c.r, c.g, c.b)
    } else {
        format!("Color::rgba(0x{:02X}{:02X}{:02X}{:02X})", c.a, c.r, c.g, c.b)
    }
}

/// Color slice literal for gradient stop lists.
pub fn colors(list: &[Color]) -> String {
    let entries: Vec<String> = list.iter().map(|c| color(*c)).collect();
    format!("&[{}]", entries.join(", "))
}

/// Gradient fraction slice literal.
///
/// Validates that every fraction lies in `[0, 1]` and the sequence is
/// non-decreasing. A fraction that would serialize identically to its
/// predecessor is nudged up by [`FRACTION_NUDGE`] before formatting.
pub fn fractions(list: &[f64]) -> BakeResult<String> {
    let mut previous = -1.0f64;
    for &fraction in list {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(BakeError::invalid_gradient(format!(
                "fraction values must be in the range 0 to 1: {fraction}"
            )));
        }
        if fraction < previous {
            return Err(BakeError::invalid_gradient(format!(
                "fractions must be non-decreasing: {fraction}"
            )));
        }
        previous = fraction;
    }

    let mut rendered: Vec<String> = Vec::with_capacity(list.len());
    for &fraction in list {
        let mut text = exact_float(fraction);
        if rendered.last() == Some(&text) {
            text = exact_float(fraction + FRACTION_NUDGE);
        }
        rendered.push(text);
    }
    Ok(format!("&[{}]", rendered.join(", ")))
}

/// Canonical stroke literal.
pub fn stroke(s: &Stroke) -> String {
    let base = format!(
        "Stroke::new({}, Cap::{:?}, Join::{:?}, {})",
        float(s.width),
        s.cap,
        s.join,
        float(s.miter_limit)
    );
    match &s.dash {
        None => base,
        Some(dash) => {
            let entries: Vec<String> = dash.iter().map(|d| float(*d)).collect();
            format!(
                "{base}.with_dash(&[{}], {})",
                entries.join(", "),
                float(s.dash_phase)
            )
        }
    }
}

/// Canonical paint literal, as passed to `set_paint` in generated code.
///
/// Gradient validation happens here, eagerly, before the caller emits any
/// instruction for the node being painted.
pub fn paint(p: &Paint) -> BakeResult<String> {
    match p {
        Paint::Color(c) => Ok(format!("{}.into()", color(*c))),
        Paint::LinearGradient(g) => {
            check_stop_counts(g.fractions.len(), g.colors.len())?;
            Ok(format!(
                "Paint::linear_gradient({}, {}, {}, {}, CycleMode::{:?}, ColorSpace::{:?}, {})",
                point(g.start.x, g.start.y),
                point(g.end.x, g.end.y),
                fractions(&g.fractions)?,
                colors(&g.colors),
                g.cycle,
                g.color_space,
                affine(&g.transform)
            ))
        }
        Paint::RadialGradient(g) => {
            check_stop_counts(g.fractions.len(), g.colors.len())?;
            Ok(format!(
                "Paint::radial_gradient({}, {}, {}, {}, {}, CycleMode::{:?}, ColorSpace::{:?}, {})",
                point(g.center.x, g.center.y),
                float(g.radius),
                point(g.focus.x, g.focus.y),
                fractions(&g.fractions)?,
                colors(&g.colors),
                g.cycle,
                g.color_space,
                affine(&g.transform)
            ))
        }
    }
}

fn check_stop_counts(fractions: usize, colors: usize) -> BakeResult<()> {
    if fractions != colors {
        return Err(BakeError::invalid_gradient(format!(
            "expected one color per fraction, got {colors} colors for {fractions} fractions"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Cap, ColorSpace, CycleMode, Join};
    use crate::error::BakeError;

    #[test]
    fn integral_floats_snap() {
        assert_eq!(float(5.0), "5.0");
        assert_eq!(float(5.0000001), "5.0");
        assert_eq!(float(2.9999997), "3.0");
        assert_eq!(float(-3.0), "-3.0");
        assert_eq!(float(0.0), "0.0");
    }

    #[test]
    fn non_integral_floats_round_trip_exactly() {
        for v in [1.5, -0.25, 9.37, 0.1, 123.456] {
            let text = float(v);
            assert_eq!(text.parse::<f64>().unwrap(), v);
        }
    }

    #[test]
    fn color_palette_and_hex() {
        assert_eq!(color(Color::RED), "Color::RED");
        assert_eq!(color(Color::LIGHT_GRAY), "Color::LIGHT_GRAY");
        assert_eq!(color(Color::rgb(0xDA70D6)), "Color::rgb(0xDA70D6)");
        assert_eq!(
            color(Color::new(0x10, 0x20, 0x30, 0x80)),
            "Color::rgba(0x80102030)"
        );
    }

    #[test]
    fn affine_emits_all_six_components() {
        assert_eq!(
            affine(&Affine::translate((10.0, 20.0))),
            "Affine::new([1.0, 0.0, 0.0, 1.0, 10.0, 20.0])"
        );
    }

    #[test]
    fn fractions_reject_out_of_range() {
        assert!(matches!(
            fractions(&[-0.1, 1.0]),
            Err(BakeError::InvalidGradient(_))
        ));
        assert!(matches!(
            fractions(&[0.0, 1.5]),
            Err(BakeError::InvalidGradient(_))
        ));
    }

    #[test]
    fn fractions_reject_decreasing() {
        assert!(matches!(
            fractions(&[0.0, 0.6, 0.5]),
            Err(BakeError::InvalidGradient(_))
        ));
    }

    #[test]
    fn equal_fractions_are_nudged_by_the_fixed_epsilon() {
        let text = fractions(&[0.0, 0.5, 0.5, 1.0]).unwrap();
        assert_eq!(text, "&[0.0, 0.5, 0.500000001, 1.0]");
    }

    #[test]
    fn adjacent_fraction_literals_never_repeat() {
        let text = fractions(&[0.0, 0.0, 1.0, 1.0]).unwrap();
        let inner = text.trim_start_matches("&[").trim_end_matches(']');
        let literals: Vec<&str> = inner.split(", ").collect();
        for pair in literals.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn stroke_literals() {
        assert_eq!(
            stroke(&Stroke::new(1.5, Cap::Round, Join::Bevel, 4.0)),
            "Stroke::new(1.5, Cap::Round, Join::Bevel, 4.0)"
        );
        assert_eq!(
            stroke(&Stroke::new(1.0, Cap::Butt, Join::Miter, 4.0).with_dash(&[3.0, 1.0], 0.5)),
            "Stroke::new(1.0, Cap::Butt, Join::Miter, 4.0).with_dash(&[3.0, 1.0], 0.5)"
        );
    }

    #[test]
    fn paint_literals() {
        assert_eq!(paint(&Paint::Color(Color::RED)).unwrap(), "Color::RED.into()");

        let gradient = Paint::linear_gradient(
            (0.0, 0.0),
            (10.0, 0.0),
            &[0.0, 1.0],
            &[Color::WHITE, Color::BLACK],
            CycleMode::NoCycle,
            ColorSpace::Srgb,
            Affine::IDENTITY,
        );
        assert_eq!(
            paint(&gradient).unwrap(),
            "Paint::linear_gradient((0.0, 0.0), (10.0, 0.0), &[0.0, 1.0], \
             &[Color::WHITE, Color::BLACK], CycleMode::NoCycle, ColorSpace::Srgb, \
             Affine::new([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]))"
        );
    }

    #[test]
    fn paint_rejects_mismatched_stop_counts() {
        let gradient = Paint::linear_gradient(
            (0.0, 0.0),
            (1.0, 0.0),
            &[0.0, 0.5, 1.0],
            &[Color::WHITE, Color::BLACK],
            CycleMode::NoCycle,
            ColorSpace::Srgb,
            Affine::IDENTITY,
        );
        assert!(matches!(
            paint(&gradient),
            Err(BakeError::InvalidGradient(_))
        ));
    }
}
