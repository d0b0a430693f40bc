use itertools::Itertools;

use crate::{
    indexed_vec::{ColorIdx, GradientIdx, IdxType, ImageIdx, PathIdx, PatternIdx, TransformIdx},
    ir::{
        optimize::{optimize, OptimizeOpts},
        Command,
    },
};

use super::{
    intern::{identifier, ColorSpaces, Interner},
    template, CgColor, CgGradient, CgImage, CgMask, CgPath, CgPattern, CgSize, CgTransform,
    CodeTypes, ColorSpace,
};

/// The options used for the command streams nested inside patterns and masks.  These are always
/// drawn inside a scope provided by whoever calls them.
const NESTED_OPTS: OptimizeOpts = OptimizeOpts {
    skip_redundant_state: true,
    skip_initial_save_state: true,
};

/// Accumulates the Swift code for a stream of [`Command`]s.  A `CodeRenderer` owns all of its
/// intern tables, so resources are only shared within one drawing.
#[derive(Debug, Clone)]
pub struct CodeRenderer {
    /// The body of the drawing, in order
    lines: Vec<String>,
    /// Pattern declarations, which must come before any of `lines`
    pattern_lines: Vec<String>,

    color_spaces: ColorSpaces,
    colors: Interner<ColorIdx, CgColor>,
    paths: Interner<PathIdx, CgPath>,
    transforms: Interner<TransformIdx, CgTransform>,
    gradients: Interner<GradientIdx, CgGradient>,
    patterns: Interner<PatternIdx, CgPattern>,
    images: Interner<ImageIdx, CgImage>,
    num_masks: usize,
}

impl CodeRenderer {
    pub fn new() -> Self {
        Self {
            lines: vec![],
            pattern_lines: vec![],

            color_spaces: ColorSpaces::default(),
            colors: Interner::new("rgba"),
            paths: Interner::new("path"),
            transforms: Interner::new("transform"),
            gradients: Interner::new("gradient"),
            patterns: Interner::new("pattern"),
            images: Interner::new("image"),
            num_masks: 0,
        }
    }

    /// The body of the drawing generated so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The pattern declarations generated so far
    pub fn pattern_lines(&self) -> &[String] {
        &self.pattern_lines
    }

    /// Every generated line, with the pattern declarations first
    pub fn all_lines(&self) -> impl Iterator<Item = &str> {
        self.pattern_lines
            .iter()
            .chain(self.lines.iter())
            .map(String::as_str)
    }

    /// Wrap the generated lines in a `UIImage` extension (see [`template`] for the exact shape)
    pub fn make_template(&self, name: &str, size: CgSize) -> String {
        template::make_template(name, size, self.all_lines())
    }

    /// Generate the code for every command in `commands`, in order
    pub fn render(&mut self, commands: &[Command<CodeTypes>]) {
        for cmd in commands {
            self.render_command(cmd);
        }
    }

    fn render_command(&mut self, cmd: &Command<CodeTypes>) {
        let line = match cmd {
            Command::PushState => "ctx.saveGState()".to_owned(),
            Command::PopState => "ctx.restoreGState()".to_owned(),
            Command::PushTransparencyLayer => {
                "ctx.beginTransparencyLayer(auxiliaryInfo: nil)".to_owned()
            }
            Command::PopTransparencyLayer => "ctx.endTransparencyLayer()".to_owned(),

            Command::Concatenate(transform) => {
                format!("ctx.concatenate({})", self.transform(transform))
            }
            Command::Translate { tx, ty } => format!("ctx.translateBy(x: {}, y: {})", tx, ty),
            Command::Rotate(angle) => format!("ctx.rotate(by: {})", angle),
            Command::Scale { sx, sy } => format!("ctx.scaleBy(x: {}, y: {})", sx, sy),

            Command::SetFill(color) => format!("ctx.setFillColor({})", self.color(color)),
            Command::SetFillPattern(pattern) => {
                let name = self.pattern(pattern);
                let space = self.color_spaces.require(ColorSpace::Pattern, &mut self.lines);
                self.lines.push(format!("ctx.setFillColorSpace({})", space));
                format!(
                    "ctx.setFillPattern({}, colorComponents: &patternAlpha)",
                    name
                )
            }
            Command::SetStroke(color) => format!("ctx.setStrokeColor({})", self.color(color)),
            Command::SetLineWidth(width) => format!("ctx.setLineWidth({})", width),
            Command::SetLineCap(cap) => format!("ctx.setLineCap({})", cap),
            Command::SetLineJoin(join) => format!("ctx.setLineJoin({})", join),
            Command::SetMiterLimit(limit) => format!("ctx.setMiterLimit({})", limit),
            Command::SetClip { path, rule } => {
                let name = self.path(path);
                self.lines.push(format!("ctx.addPath({})", name));
                format!("ctx.clip(using: {})", rule)
            }
            Command::SetClipMask { mask, frame } => {
                let name = self.mask(mask);
                format!("ctx.clip(to: {}, mask: {})", frame, name)
            }
            Command::SetAlpha(alpha) => format!("ctx.setAlpha({})", alpha),
            Command::SetBlendMode(mode) => format!("ctx.setBlendMode({})", mode),

            Command::Stroke(path) => {
                let name = self.path(path);
                self.lines.push(format!("ctx.addPath({})", name));
                "ctx.strokePath()".to_owned()
            }
            Command::Fill { path, rule } => {
                let name = self.path(path);
                self.lines.push(format!("ctx.addPath({})", name));
                format!("ctx.fillPath(using: {})", rule)
            }
            Command::DrawImage { image, rect } => {
                format!("ctx.draw({}, in: {})", self.image(image), rect)
            }
            Command::DrawLinearGradient { gradient, from, to } => format!(
                "ctx.drawLinearGradient({}, start: {}, end: {}, options: {})",
                self.gradient(gradient),
                from,
                to,
                GRADIENT_OPTIONS
            ),
            Command::DrawRadialGradient {
                gradient,
                start_center,
                start_radius,
                end_center,
                end_radius,
            } => format!(
                "ctx.drawRadialGradient({}, startCenter: {}, startRadius: {}, endCenter: {}, \
                 endRadius: {}, options: {})",
                self.gradient(gradient),
                start_center,
                start_radius,
                end_center,
                end_radius,
                GRADIENT_OPTIONS
            ),
        };
        self.lines.push(line);
    }

    ///////////////
    // RESOURCES //
    ///////////////

    // Each of these returns the identifier of a resource, declaring it first if it hasn't been
    // seen before

    fn color(&mut self, color: &CgColor) -> String {
        let (idx, is_new) = self.colors.intern(color);
        let name = self.colors.name(idx).to_owned();
        if is_new {
            self.color_spaces.require(color.space, &mut self.lines);
            self.lines.push(format!("let {} = {}", name, color));
        }
        name
    }

    fn path(&mut self, path: &CgPath) -> String {
        let (idx, is_new) = self.paths.intern(path);
        let name = self.paths.name(idx).to_owned();
        if is_new {
            self.lines.push(format!("let {} = CGMutablePath()", name));
            self.lines
                .extend(path.ops.iter().map(|op| op.line(&name)));
        }
        name
    }

    fn transform(&mut self, transform: &CgTransform) -> String {
        let (idx, is_new) = self.transforms.intern(transform);
        let name = self.transforms.name(idx).to_owned();
        if is_new {
            self.lines.push(format!("let {} = {}", name, transform));
        }
        name
    }

    fn gradient(&mut self, gradient: &CgGradient) -> String {
        let (idx, is_new) = self.gradients.intern(gradient);
        let name = self.gradients.name(idx).to_owned();
        if is_new {
            let space = self.color_spaces.require(ColorSpace::Rgb, &mut self.lines);
            let locations = identifier("locations", idx.to_idx());
            self.lines.push(format!(
                "var {}: [CGFloat] = [{}]",
                locations,
                gradient.locations.iter().join(", ")
            ));
            self.lines.push(format!(
                "let {} = CGGradient(colorsSpace: {}, colors: [{}] as CFArray, locations: &{})!",
                name,
                space,
                gradient.colors.iter().join(", "),
                locations
            ));
        }
        name
    }

    fn image(&mut self, image: &CgImage) -> String {
        let (idx, is_new) = self.images.intern(image);
        let name = self.images.name(idx).to_owned();
        if is_new {
            self.lines.push(format!(
                "let {} = UIImage(data: Data(base64Encoded: \"{}\")!)!.cgImage!",
                name, image.base64
            ));
        }
        name
    }

    /// Patterns are declared in [`Self::pattern_lines`], since the draw callbacks can't capture
    /// anything from the drawing body
    fn pattern(&mut self, pattern: &CgPattern) -> String {
        let (idx, is_new) = self.patterns.intern(pattern);
        if is_new {
            let declaration = pattern_declaration(pattern, idx.to_idx());
            self.pattern_lines.extend(declaration);
        }
        self.patterns.name(idx).to_owned()
    }

    /// Masks aren't interned; each one is drawn into its own bitmap where it's used
    fn mask(&mut self, mask: &CgMask) -> String {
        let name = identifier("mask", self.num_masks);
        self.num_masks += 1;

        let nested = render_nested(&mask.contents);
        let CgSize { width, height } = mask.size;
        self.lines
            .push(format!("let {} = {{ () -> CGImage in", name));
        self.lines.extend(template::indent([
            format!(
                "let ctx = CGContext(data: nil, width: Int({}), height: Int({}), \
                 bitsPerComponent: 8, bytesPerRow: 0, space: CGColorSpaceCreateDeviceGray(), \
                 bitmapInfo: CGImageAlphaInfo.none.rawValue)!",
                width, height
            ),
            // Bitmap contexts put the origin at the bottom-left
            format!("ctx.translateBy(x: 0.0, y: {})", height),
            "ctx.scaleBy(x: 1.0, y: -1.0)".to_owned(),
        ]));
        self.lines.extend(template::indent(nested.all_lines()));
        self.lines
            .extend(template::indent(["return ctx.makeImage()!"]));
        self.lines.push("}()".to_owned());
        name
    }
}

impl Default for CodeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

const GRADIENT_OPTIONS: &str = "[.drawsAfterEndLocation, .drawsBeforeStartLocation]";

/// Optimize and render a nested command stream with a fresh [`CodeRenderer`]
fn render_nested(commands: &[Command<CodeTypes>]) -> CodeRenderer {
    let commands = optimize(commands.to_vec(), &NESTED_OPTS);
    let mut renderer = CodeRenderer::new();
    renderer.render(&commands);
    renderer
}

/// Generates the declaration of the pattern with index `idx`: its draw callback, its callback
/// struct and the pattern itself.  All three are named after `idx`.
fn pattern_declaration(pattern: &CgPattern, idx: usize) -> Vec<String> {
    let nested = render_nested(&pattern.contents);
    let draw = identifier("patternDraw", idx);
    let callbacks = identifier("patternCallback", idx);
    let name = identifier("pattern", idx);

    let mut lines = vec![format!(
        "let {}: CGPatternDrawPatternCallback = {{ _, ctx in",
        draw
    )];
    lines.extend(template::indent(nested.all_lines()));
    lines.push("}".to_owned());
    lines.push(format!(
        "var {} = CGPatternCallbacks(version: 0, drawPattern: {}, releaseInfo: nil)",
        callbacks, draw
    ));
    lines.push(format!("let {} = CGPattern(", name));
    lines.extend(template::indent(vec![
        "info: nil,".to_owned(),
        format!("bounds: {},", pattern.tile),
        "matrix: .identity,".to_owned(),
        format!("xStep: {},", pattern.tile.size.width),
        format!("yStep: {},", pattern.tile.size.height),
        "tiling: .constantSpacing,".to_owned(),
        "isColored: true,".to_owned(),
        format!("callbacks: &{}", callbacks),
    ]));
    lines.push(")!".to_owned());
    lines
}
