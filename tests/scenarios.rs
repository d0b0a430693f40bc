//! End-to-end checks of scenes going through lowering, optimization and code generation.

use vgir::{
    codegen::{CodeProvider, CodeRenderer},
    gen_code_string,
    ir::{check_balance, lowering::lower, optimize::optimize},
    scene::{
        examples, Affine, Color, Content, Fill, FillRule, Gradient, GradientStop, Node, Paint,
        Pattern, Shape, Transform,
    },
    CodeGenOpts, OptimizeOpts, Rect2, Scene, V2,
};

/// Lower, optimize and render a scene, returning the renderer so its output can be inspected
fn render(scene: &Scene, opts: &OptimizeOpts) -> CodeRenderer {
    let commands = optimize(lower(&scene.root, &CodeProvider::default()), opts);
    let mut renderer = CodeRenderer::new();
    renderer.render(&commands);
    renderer
}

fn count(lines: &[String], pred: impl Fn(&str) -> bool) -> usize {
    lines.iter().filter(|l| pred(l)).count()
}

fn position(lines: &[String], pred: impl Fn(&str) -> bool) -> usize {
    lines
        .iter()
        .position(|l| pred(l))
        .expect("expected line not generated")
}

#[test]
fn empty_group_optimizes_to_nothing() {
    let scene = examples::empty();
    let commands = lower(&scene.root, &CodeProvider::default());
    assert_eq!(commands.len(), 4);
    let opts = OptimizeOpts {
        skip_redundant_state: true,
        ..OptimizeOpts::default()
    };
    assert!(optimize(commands, &opts).is_empty());
}

#[test]
fn identical_colors_are_declared_once() {
    let renderer = render(&examples::two_squares(), &OptimizeOpts::all());
    let lines = renderer.lines();
    assert_eq!(count(lines, |l| l.starts_with("let rgba")), 1);
    assert_eq!(count(lines, |l| l == "ctx.setFillColor(rgba)"), 2);
    // The squares are in different places, so they're different paths
    assert_eq!(count(lines, |l| l.ends_with("= CGMutablePath()")), 2);
}

#[test]
fn gradient_declarations_come_in_order() {
    let renderer = render(&examples::linear_gradient(), &OptimizeOpts::all());
    let lines = renderer.lines();

    let is_space = |l: &str| l == "let rgb = CGColorSpaceCreateDeviceRGB()";
    let is_locations = |l: &str| l == "var locations: [CGFloat] = [0.0, 1.0]";
    let is_gradient = |l: &str| l.starts_with("let gradient = CGGradient(colorsSpace: rgb, ");
    assert_eq!(count(lines, is_space), 1);
    assert_eq!(count(lines, is_locations), 1);
    assert_eq!(count(lines, is_gradient), 1);
    assert!(position(lines, is_space) < position(lines, is_locations));
    assert_eq!(
        position(lines, is_locations) + 1,
        position(lines, is_gradient)
    );
    assert!(lines[position(lines, is_gradient)].ends_with("locations: &locations)!"));

    let draws = count(lines, |l| l.starts_with("ctx.drawLinearGradient(gradient, "));
    assert_eq!(draws, 1);
}

#[test]
fn patterns_are_declared_before_the_body() {
    let renderer = render(&examples::checkerboard(), &OptimizeOpts::all());
    let preamble = renderer.pattern_lines();
    assert_eq!(
        preamble[0],
        "let patternDraw: CGPatternDrawPatternCallback = { _, ctx in"
    );
    assert!(preamble.contains(&"let pattern = CGPattern(".to_owned()));
    assert!(preamble
        .contains(&"var patternCallback = CGPatternCallbacks(version: 0, drawPattern: patternDraw, releaseInfo: nil)".to_owned()));
    // The tile's content is drawn inside the callback
    assert_eq!(
        count(preamble, |l| l.starts_with("  ctx.fillPath(")),
        2
    );
    assert!(!renderer.lines().iter().any(|l| l.contains("CGPattern(")));

    let all = renderer.all_lines().map(str::to_owned).collect::<Vec<_>>();
    let decl = position(&all, |l| l == "let pattern = CGPattern(");
    let space = position(&all, |l| l == "ctx.setFillColorSpace(patternSpace)");
    let usage = position(&all, |l| {
        l == "ctx.setFillPattern(pattern, colorComponents: &patternAlpha)"
    });
    assert!(decl < space);
    assert_eq!(space + 1, usage);
}

#[test]
fn initial_save_state_removes_only_the_outer_bracket() {
    let scene = examples::two_squares();
    let commands = lower(&scene.root, &CodeProvider::default());
    let opts = OptimizeOpts {
        skip_initial_save_state: true,
        ..OptimizeOpts::default()
    };
    let optimized = optimize(commands.clone(), &opts);
    assert_eq!(optimized, commands[1..commands.len() - 1].to_vec());
    assert_eq!(check_balance(&optimized), Ok(()));
}

#[test]
fn generation_is_deterministic() {
    for (name, scene) in examples::all() {
        let opts = CodeGenOpts::default();
        assert_eq!(
            gen_code_string(&scene, name, &opts),
            gen_code_string(&scene, name, &opts),
            "{} generated different code",
            name
        );
    }
}

#[test]
fn two_squares_generate_expected_code() {
    let code = gen_code_string(&examples::two_squares(), "two squares", &CodeGenOpts::default());
    assert_eq!(
        code,
        "extension UIImage {
  static func svgTwoSquares() -> UIImage {
    let f = UIGraphicsImageRendererFormat.preferred()
    f.opaque = false
    return UIGraphicsImageRenderer(size: CGSize(width: 30.0, height: 10.0), format: f).image {
      drawSVG(in: $0.cgContext)
    }
  }

  private static func drawSVG(in ctx: CGContext) {
    ctx.saveGState()
    let rgb = CGColorSpaceCreateDeviceRGB()
    let rgba = CGColor(colorSpace: rgb, components: [1.0, 0.502, 0.0, 0.5])!
    ctx.setFillColor(rgba)
    let path = CGMutablePath()
    path.addRect(CGRect(x: 0.0, y: 0.0, width: 10.0, height: 10.0))
    ctx.addPath(path)
    ctx.fillPath(using: .winding)
    ctx.restoreGState()
    ctx.saveGState()
    ctx.setFillColor(rgba)
    let path1 = CGMutablePath()
    path1.addRect(CGRect(x: 20.0, y: 0.0, width: 10.0, height: 10.0))
    ctx.addPath(path1)
    ctx.fillPath(using: .winding)
    ctx.restoreGState()
  }
}
"
    );
}

#[test]
fn isolated_groups_become_transparency_layers() {
    let renderer = render(&examples::faded_badge(), &OptimizeOpts::all());
    let lines = renderer.lines();
    let alpha = position(lines, |l| l == "ctx.setAlpha(0.5)");
    let blend = position(lines, |l| l == "ctx.setBlendMode(.sourceIn)");
    let begin = position(lines, |l| l == "ctx.beginTransparencyLayer(auxiliaryInfo: nil)");
    let end = position(lines, |l| l == "ctx.endTransparencyLayer()");
    assert!(alpha < begin && blend < begin && begin < end);
    assert_eq!(
        lines[position(lines, |l| l.starts_with("ctx.rotate("))],
        "ctx.rotate(by: 0.262)"
    );
    assert!(lines.contains(&"ctx.clip(using: .evenOdd)".to_owned()));
}

#[test]
fn masks_and_images_are_generated() {
    let renderer = render(&examples::masked_photo(), &OptimizeOpts::all());
    let lines = renderer.lines();
    assert!(lines.contains(&"ctx.scaleBy(x: 2.0, y: 2.0)".to_owned()));
    assert!(lines.contains(
        &"let image = UIImage(data: Data(base64Encoded: \"iVBORw0KGgo=\")!)!.cgImage!".to_owned()
    ));
    let mask = position(lines, |l| l == "let mask = { () -> CGImage in");
    let clip = position(lines, |l| l.starts_with("ctx.clip(to: ") && l.ends_with("mask: mask)"));
    let draw = position(lines, |l| l.starts_with("ctx.draw(image, in: "));
    assert!(mask < clip && clip < draw);
}

#[test]
fn config_controls_the_pipeline() {
    let opts = CodeGenOpts::from_toml_str(
        "precision = 1\n[optimize]\nskip_redundant_state = true\nskip_initial_save_state = false\n",
    )
    .unwrap();
    let code = gen_code_string(&examples::faded_badge(), "badge", &opts);
    assert!(code.contains("ctx.rotate(by: 0.3)"));
    // The root bracket is kept
    assert!(code.contains("  private static func drawSVG(in ctx: CGContext) {\n    ctx.saveGState()\n"));
}

fn square(x: f32, size: f32) -> Shape {
    Shape::Rect {
        rect: Rect2::new(x, 0.0, size, size),
        radii: V2::new(0.0, 0.0),
    }
}

fn tile(size: f32, content: Vec<Node>) -> Pattern {
    Pattern {
        tile: Rect2::new(0.0, 0.0, size, size),
        content,
    }
}

fn pattern_filled(shape: Shape, pattern: Pattern) -> Node {
    Node::shape(shape).with_fill(Fill {
        paint: Paint::Pattern(pattern),
        rule: FillRule::NonZero,
    })
}

fn scene_of(children: Vec<Node>) -> Scene {
    Scene::new(V2::new(64.0, 64.0), Node::group(children))
}

#[test]
fn patterns_are_numbered_and_shared() {
    let dots = tile(8.0, vec![Node::shape(square(0.0, 4.0)).with_fill_color(Color::rgb(0, 0, 0))]);
    let stripes = tile(6.0, vec![Node::shape(square(0.0, 3.0)).with_fill_color(Color::rgb(0, 0, 255))]);
    let scene = scene_of(vec![
        pattern_filled(square(0.0, 16.0), dots.clone()),
        pattern_filled(square(20.0, 16.0), dots),
        pattern_filled(square(40.0, 16.0), stripes),
    ]);
    let renderer = render(&scene, &OptimizeOpts::all());

    let preamble = renderer.pattern_lines();
    assert_eq!(count(preamble, |l| l.starts_with("let patternDraw")), 2);
    assert_eq!(count(preamble, |l| l.starts_with("let pattern = CGPattern(")), 1);
    assert!(preamble.contains(&"let patternDraw1: CGPatternDrawPatternCallback = { _, ctx in".to_owned()));
    assert!(preamble.contains(
        &"var patternCallback1 = CGPatternCallbacks(version: 0, drawPattern: patternDraw1, releaseInfo: nil)"
            .to_owned()
    ));
    assert!(preamble.contains(&"let pattern1 = CGPattern(".to_owned()));
    assert!(preamble.contains(&"  callbacks: &patternCallback1".to_owned()));
    assert!(preamble.contains(&"  xStep: 6.0,".to_owned()));

    let lines = renderer.lines();
    assert_eq!(
        count(lines, |l| l == "let patternSpace = CGColorSpace(patternBaseSpace: nil)!"),
        1
    );
    assert_eq!(
        count(lines, |l| l == "ctx.setFillPattern(pattern, colorComponents: &patternAlpha)"),
        2
    );
    assert_eq!(
        count(lines, |l| l == "ctx.setFillPattern(pattern1, colorComponents: &patternAlpha)"),
        1
    );
}

#[test]
fn nested_patterns_are_declared_inside_their_callback() {
    let inner = tile(2.0, vec![Node::shape(square(0.0, 1.0)).with_fill_color(Color::rgb(255, 0, 0))]);
    let outer = tile(8.0, vec![pattern_filled(square(0.0, 4.0), inner)]);
    let scene = scene_of(vec![pattern_filled(square(0.0, 32.0), outer)]);
    let renderer = render(&scene, &OptimizeOpts::all());

    let preamble = renderer.pattern_lines();
    assert_eq!(preamble[0], "let patternDraw: CGPatternDrawPatternCallback = { _, ctx in");
    assert_eq!(preamble[1], "  let patternDraw: CGPatternDrawPatternCallback = { _, ctx in");
    // The inner tile's content is two levels deep
    assert_eq!(count(preamble, |l| l == "    ctx.fillPath(using: .winding)"), 1);

    let inner_decl = position(preamble, |l| l == "  let pattern = CGPattern(");
    let inner_use = position(preamble, |l| {
        l == "  ctx.setFillPattern(pattern, colorComponents: &patternAlpha)"
    });
    let outer_decl = position(preamble, |l| l == "let pattern = CGPattern(");
    assert!(inner_decl < inner_use && inner_use < outer_decl);
    assert_eq!(count(preamble, |l| l == "let pattern = CGPattern("), 1);
    assert!(renderer
        .lines()
        .contains(&"ctx.setFillPattern(pattern, colorComponents: &patternAlpha)".to_owned()));
}

#[test]
fn transforms_are_declared_once() {
    let shifted = |matrix: Affine, x: f32| {
        Node::shape(square(x, 2.0))
            .with_fill_color(Color::rgb(0, 0, 0))
            .with_transform(Transform::Matrix(matrix))
    };
    let shift = Affine::new(1.0, 0.0, 0.0, 1.0, 5.0, 5.0);
    let skew = Affine::new(1.0, 0.0, 0.5, 1.0, 0.0, 0.0);
    let scene = scene_of(vec![shifted(shift, 0.0), shifted(shift, 4.0), shifted(skew, 8.0)]);
    let renderer = render(&scene, &OptimizeOpts::all());
    let lines = renderer.lines();

    let is_decl = |l: &str| {
        l == "let transform = CGAffineTransform(a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 5.0, ty: 5.0)"
    };
    assert_eq!(count(lines, is_decl), 1);
    assert_eq!(count(lines, |l| l == "ctx.concatenate(transform)"), 2);
    assert_eq!(
        position(lines, is_decl) + 1,
        position(lines, |l| l == "ctx.concatenate(transform)")
    );
    assert_eq!(
        count(lines, |l| {
            l == "let transform1 = CGAffineTransform(a: 1.0, b: 0.0, c: 0.5, d: 1.0, tx: 0.0, ty: 0.0)"
        }),
        1
    );
    assert_eq!(count(lines, |l| l == "ctx.concatenate(transform1)"), 1);
}

#[test]
fn reused_gradients_keep_one_declaration() {
    let stops = |offsets: Vec<f32>| Gradient {
        stops: offsets
            .into_iter()
            .map(|offset| GradientStop {
                offset,
                color: Color::rgb(0, 0, 0),
            })
            .collect(),
    };
    let linear = |gradient: Gradient, x: f32| {
        Node::content(Content::LinearGradient {
            gradient,
            from: V2::new(x, 0.0),
            to: V2::new(x + 10.0, 0.0),
        })
    };
    let scene = scene_of(vec![
        linear(stops(vec![0.0, 1.0]), 0.0),
        linear(stops(vec![0.0, 1.0]), 20.0),
        linear(stops(vec![0.0, 0.5, 1.0]), 40.0),
    ]);
    let renderer = render(&scene, &OptimizeOpts::all());
    let lines = renderer.lines();

    assert_eq!(count(lines, |l| l == "var locations: [CGFloat] = [0.0, 1.0]"), 1);
    assert_eq!(count(lines, |l| l.starts_with("let gradient = CGGradient(")), 1);
    assert_eq!(count(lines, |l| l.starts_with("ctx.drawLinearGradient(gradient, ")), 2);

    let is_locations1 = |l: &str| l == "var locations1: [CGFloat] = [0.0, 0.5, 1.0]";
    let is_gradient1 = |l: &str| l.starts_with("let gradient1 = CGGradient(colorsSpace: rgb, ");
    assert_eq!(count(lines, is_locations1), 1);
    assert_eq!(position(lines, is_locations1) + 1, position(lines, is_gradient1));
    assert!(lines[position(lines, is_gradient1)].ends_with("locations: &locations1)!"));
    assert_eq!(count(lines, |l| l.starts_with("ctx.drawLinearGradient(gradient1, ")), 1);
}

#[test]
fn nested_opacities_are_composited_in_layers() {
    let dot = Node::shape(Shape::Ellipse(Rect2::new(0.0, 0.0, 4.0, 4.0)))
        .with_fill_color(Color::rgb(0, 0, 0));
    let inner = Node::group(vec![dot]).with_opacity(0.5);
    let scene = scene_of(vec![Node::group(vec![inner]).with_opacity(0.5)]);
    let renderer = render(&scene, &OptimizeOpts::all());
    let lines = renderer.lines();

    let begins = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.as_str() == "ctx.beginTransparencyLayer(auxiliaryInfo: nil)")
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let alphas = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.as_str() == "ctx.setAlpha(0.5)")
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    assert_eq!(begins.len(), 2);
    assert_eq!(alphas.len(), 2);
    // outer alpha, outer layer, inner alpha, inner layer
    assert!(alphas[0] < begins[0] && begins[0] < alphas[1] && alphas[1] < begins[1]);
    assert_eq!(count(lines, |l| l == "ctx.endTransparencyLayer()"), 2);
}

#[test]
fn excessive_precision_never_prints_nan() {
    assert!(CodeGenOpts::from_toml_str("precision = 400").is_err());

    let opts = CodeGenOpts {
        precision: 400,
        ..CodeGenOpts::default()
    };
    let code = gen_code_string(&examples::two_squares(), "two squares", &opts);
    assert!(!code.contains("NaN"));
    assert!(code.contains("CGSize(width: 30.0, height: 10.0)"));
}
