//! A backend which turns [`Command`]s into Swift source code that redraws the scene with
//! CoreGraphics.  Every resource (color, path, transform, gradient, pattern, image) is declared
//! once, the first time it's used, and referred to by name from then on.

use std::{
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

use base64::Engine;
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    ir::{
        lowering::lower,
        optimize::{optimize, OptimizeOpts},
        Command, Provider, Types,
    },
    scene::{self, Affine, BlendMode, Color, FillRule, LineCap, LineJoin, Scene, Segment, Shape},
    utils::Rect2,
    V2,
};

mod intern;
mod renderer;
mod template;

pub use renderer::CodeRenderer;
pub use template::sanitize_name;

/// Generate the complete Swift source for a [`Scene`], wrapped in a `UIImage` extension whose
/// factory method is named after `name`.
pub fn gen_code_string(scene: &Scene, name: &str, opts: &CodeGenOpts) -> String {
    let provider = CodeProvider::new(opts.precision);
    let commands = optimize(lower(&scene.root, &provider), &opts.optimize);
    let mut renderer = CodeRenderer::new();
    renderer.render(&commands);
    renderer.make_template(name, provider.create_size(scene.size))
}

/// Configuration for how Swift code is generated
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodeGenOpts {
    /// Which rewrites are applied to the top-level command stream.  Nested streams (pattern tiles
    /// and masks) always get every rewrite.
    pub optimize: OptimizeOpts,
    /// How many decimal places numbers are rounded to
    pub precision: u32,
}

impl CodeGenOpts {
    /// Parse a `CodeGenOpts` from TOML.  Any missing field takes its default value.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let opts: Self = toml::from_str(source)?;
        if opts.precision > MAX_PRECISION {
            return Err(Error::Precision {
                precision: opts.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(opts)
    }
}

/// The most decimal places worth printing.  An `f32` has no more significant digits than this.
pub const MAX_PRECISION: u32 = 9;

impl Default for CodeGenOpts {
    fn default() -> Self {
        Self {
            optimize: OptimizeOpts::all(),
            precision: 3,
        }
    }
}

///////////
// TYPES //
///////////

/// Marker type for the Swift/CoreGraphics [`Types`] family.  Every representation is a
/// structured value which knows how to print itself, and values are compared (and interned) by
/// structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeTypes;

impl Types for CodeTypes {
    type Float = Num;
    type Point = CgPoint;
    type Size = CgSize;
    type Rect = CgRect;
    type Color = CgColor;
    type Gradient = CgGradient;
    type Mask = CgMask;
    type Path = CgPath;
    type Pattern = CgPattern;
    type Transform = CgTransform;
    type BlendMode = &'static str;
    type FillRule = &'static str;
    type LineCap = &'static str;
    type LineJoin = &'static str;
    type Image = CgImage;
}

/// A number which has already been rounded to the output precision.  Two `Num`s are equal exactly
/// when they print identically.
#[derive(Debug, Clone, Copy)]
pub struct Num(f32);

impl Num {
    fn new(value: f32, precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        let rounded = ((value as f64) * scale).round() / scale;
        // Adding 0.0 turns -0.0 into 0.0
        Num(rounded as f32 + 0.0)
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Num {}

impl Hash for Num {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl Display for Num {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        // Swift needs a decimal point to infer a floating point literal
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CgPoint {
    pub x: Num,
    pub y: Num,
}

impl Display for CgPoint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "CGPoint(x: {}, y: {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CgSize {
    pub width: Num,
    pub height: Num,
}

impl Display for CgSize {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "CGSize(width: {}, height: {})", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CgRect {
    pub origin: CgPoint,
    pub size: CgSize,
}

impl Display for CgRect {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "CGRect(x: {}, y: {}, width: {}, height: {})",
            self.origin.x, self.origin.y, self.size.width, self.size.height
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CgTransform {
    pub a: Num,
    pub b: Num,
    pub c: Num,
    pub d: Num,
    pub tx: Num,
    pub ty: Num,
}

impl Display for CgTransform {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "CGAffineTransform(a: {}, b: {}, c: {}, d: {}, tx: {}, ty: {})",
            self.a, self.b, self.c, self.d, self.tx, self.ty
        )
    }
}

/// The color spaces which generated code can refer to.  Each is declared once, the first time a
/// resource needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Rgb,
    Gray,
    /// The space used to fill with a [`CgPattern`]
    Pattern,
}

impl ColorSpace {
    /// The name of the variable holding this color space
    pub fn name(self) -> &'static str {
        match self {
            ColorSpace::Rgb => "rgb",
            ColorSpace::Gray => "gray",
            ColorSpace::Pattern => "patternSpace",
        }
    }

    /// The lines of code which declare this color space
    fn declaration(self) -> Vec<String> {
        match self {
            ColorSpace::Rgb => vec!["let rgb = CGColorSpaceCreateDeviceRGB()".to_owned()],
            ColorSpace::Gray => vec!["let gray = CGColorSpaceCreateDeviceGray()".to_owned()],
            ColorSpace::Pattern => vec![
                "let patternSpace = CGColorSpace(patternBaseSpace: nil)!".to_owned(),
                // Colored patterns take a single alpha component
                "var patternAlpha: CGFloat = 1.0".to_owned(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CgColor {
    pub space: ColorSpace,
    pub components: Vec<Num>,
}

impl Display for CgColor {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "CGColor(colorSpace: {}, components: [{}])!",
            self.space.name(),
            self.components.iter().join(", ")
        )
    }
}

/// A gradient in the RGB color space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CgGradient {
    pub colors: Vec<CgColor>,
    pub locations: Vec<Num>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CgPath {
    pub ops: Vec<PathOp>,
}

/// A single call to build up a `CGMutablePath`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathOp {
    Move(CgPoint),
    Line(CgPoint),
    Curve {
        to: CgPoint,
        control1: CgPoint,
        control2: CgPoint,
    },
    Close,
    Lines(Vec<CgPoint>),
    Rect(CgRect),
    RoundedRect {
        rect: CgRect,
        corner: CgSize,
    },
    Ellipse(CgRect),
}

impl PathOp {
    /// The line of code which applies this operation to the path called `path`
    fn line(&self, path: &str) -> String {
        match self {
            PathOp::Move(p) => format!("{}.move(to: {})", path, p),
            PathOp::Line(p) => format!("{}.addLine(to: {})", path, p),
            PathOp::Curve {
                to,
                control1,
                control2,
            } => format!(
                "{}.addCurve(to: {}, control1: {}, control2: {})",
                path, to, control1, control2
            ),
            PathOp::Close => format!("{}.closeSubpath()", path),
            PathOp::Lines(pts) => format!("{}.addLines(between: [{}])", path, pts.iter().join(", ")),
            PathOp::Rect(rect) => format!("{}.addRect({})", path, rect),
            PathOp::RoundedRect { rect, corner } => format!(
                "{}.addRoundedRect(in: {}, cornerWidth: {}, cornerHeight: {})",
                path, rect, corner.width, corner.height
            ),
            PathOp::Ellipse(rect) => format!("{}.addEllipse(in: {})", path, rect),
        }
    }
}

/// A repeating tile, whose contents get generated into their own draw callback
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CgPattern {
    pub tile: CgRect,
    pub contents: Vec<Command<CodeTypes>>,
}

/// A grayscale mask, whose contents get generated into their own bitmap context
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CgMask {
    pub size: CgSize,
    pub contents: Vec<Command<CodeTypes>>,
}

/// An image, embedded in the generated code as base64
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CgImage {
    pub base64: String,
}

//////////////
// PROVIDER //
//////////////

/// [`Provider`] for [`CodeTypes`].  Every number is rounded to `precision` decimal places as it's
/// converted.
#[derive(Debug, Clone, Copy)]
pub struct CodeProvider {
    precision: u32,
}

impl CodeProvider {
    /// Creates a provider which rounds to `precision` decimal places, capped at [`MAX_PRECISION`]
    pub fn new(precision: u32) -> Self {
        if precision > MAX_PRECISION {
            log::debug!("precision {} capped to {}", precision, MAX_PRECISION);
        }
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    fn rgba_components(&self, color: Color) -> Vec<Num> {
        let (r, g, b, a) = match color {
            Color::None => (0.0, 0.0, 0.0, 0.0),
            Color::Rgba { rgb, alpha } => (
                rgb.r as f32 / 255.0,
                rgb.g as f32 / 255.0,
                rgb.b as f32 / 255.0,
                alpha,
            ),
            Color::Gray { white, alpha } => (white, white, white, alpha),
        };
        [r, g, b, a]
            .iter()
            .map(|&c| self.create_float(c))
            .collect_vec()
    }
}

impl Default for CodeProvider {
    fn default() -> Self {
        Self::new(CodeGenOpts::default().precision)
    }
}

impl Provider for CodeProvider {
    type Types = CodeTypes;

    fn supports_transparency_layers(&self) -> bool {
        true
    }

    fn create_float(&self, f: f32) -> Num {
        Num::new(f, self.precision)
    }

    fn create_point(&self, p: V2) -> CgPoint {
        CgPoint {
            x: self.create_float(p.x),
            y: self.create_float(p.y),
        }
    }

    fn create_size(&self, s: V2) -> CgSize {
        CgSize {
            width: self.create_float(s.x),
            height: self.create_float(s.y),
        }
    }

    fn create_rect(&self, r: Rect2) -> CgRect {
        CgRect {
            origin: self.create_point(r.origin),
            size: self.create_size(r.size),
        }
    }

    fn create_color(&self, color: Color) -> CgColor {
        match color {
            Color::Gray { white, alpha } => CgColor {
                space: ColorSpace::Gray,
                components: vec![self.create_float(white), self.create_float(alpha)],
            },
            _ => CgColor {
                space: ColorSpace::Rgb,
                components: self.rgba_components(color),
            },
        }
    }

    fn create_gradient(&self, gradient: &scene::Gradient) -> CgGradient {
        CgGradient {
            // `CGGradient` needs every color in the same space
            colors: gradient
                .stops
                .iter()
                .map(|stop| CgColor {
                    space: ColorSpace::Rgb,
                    components: self.rgba_components(stop.color),
                })
                .collect_vec(),
            locations: gradient
                .stops
                .iter()
                .map(|stop| self.create_float(stop.offset))
                .collect_vec(),
        }
    }

    fn create_mask(&self, commands: Vec<Command<CodeTypes>>, size: V2) -> CgMask {
        CgMask {
            size: self.create_size(size),
            contents: commands,
        }
    }

    fn create_blend_mode(&self, mode: BlendMode) -> &'static str {
        match mode {
            BlendMode::Normal => ".normal",
            BlendMode::Copy => ".copy",
            BlendMode::SourceIn => ".sourceIn",
            BlendMode::DestinationIn => ".destinationIn",
        }
    }

    fn create_transform(&self, affine: Affine) -> CgTransform {
        CgTransform {
            a: self.create_float(affine.a),
            b: self.create_float(affine.b),
            c: self.create_float(affine.c),
            d: self.create_float(affine.d),
            tx: self.create_float(affine.tx),
            ty: self.create_float(affine.ty),
        }
    }

    fn create_path(&self, shape: &Shape) -> CgPath {
        let points = |pts: &[V2]| pts.iter().map(|&p| self.create_point(p)).collect_vec();
        let ops = match shape {
            Shape::Lines(pts) => vec![PathOp::Lines(points(pts))],
            Shape::Polygon(pts) => vec![PathOp::Lines(points(pts)), PathOp::Close],
            Shape::Rect { rect, radii } => {
                let corner = self.create_size(*radii);
                let rect = self.create_rect(*rect);
                if corner.width.value() == 0.0 && corner.height.value() == 0.0 {
                    vec![PathOp::Rect(rect)]
                } else {
                    vec![PathOp::RoundedRect { rect, corner }]
                }
            }
            Shape::Ellipse(rect) => vec![PathOp::Ellipse(self.create_rect(*rect))],
            Shape::Path(segments) => segments
                .iter()
                .map(|segment| match *segment {
                    Segment::Move(p) => PathOp::Move(self.create_point(p)),
                    Segment::Line(p) => PathOp::Line(self.create_point(p)),
                    Segment::Cubic {
                        to,
                        control1,
                        control2,
                    } => PathOp::Curve {
                        to: self.create_point(to),
                        control1: self.create_point(control1),
                        control2: self.create_point(control2),
                    },
                    Segment::Close => PathOp::Close,
                })
                .collect_vec(),
        };
        CgPath { ops }
    }

    fn create_pattern(
        &self,
        pattern: &scene::Pattern,
        contents: Vec<Command<CodeTypes>>,
    ) -> CgPattern {
        CgPattern {
            tile: self.create_rect(pattern.tile),
            contents,
        }
    }

    fn create_fill_rule(&self, rule: FillRule) -> &'static str {
        match rule {
            FillRule::NonZero => ".winding",
            FillRule::EvenOdd => ".evenOdd",
        }
    }

    fn create_line_cap(&self, cap: LineCap) -> &'static str {
        match cap {
            LineCap::Butt => ".butt",
            LineCap::Round => ".round",
            LineCap::Square => ".square",
        }
    }

    fn create_line_join(&self, join: LineJoin) -> &'static str {
        match join {
            LineJoin::Bevel => ".bevel",
            LineJoin::Round => ".round",
            LineJoin::Miter => ".miter",
        }
    }

    fn create_image(&self, image: &scene::Image) -> CgImage {
        CgImage {
            base64: base64::engine::general_purpose::STANDARD.encode(&image.data),
        }
    }
}
