//! The fixed Swift wrapper around generated drawing code.  Consumers rely on its shape: a
//! `UIImage` factory named `svg<Name>()` which draws into a renderer-provided `CGContext`.

use itertools::Itertools;

use super::CgSize;

/// One level of indentation in generated code
const INDENT: &str = "  ";

/// Indent every non-empty line by one level
pub(super) fn indent<S: AsRef<str>>(
    lines: impl IntoIterator<Item = S>,
) -> impl Iterator<Item = String> {
    lines.into_iter().map(|line| {
        let line = line.as_ref();
        if line.is_empty() {
            String::new()
        } else {
            format!("{}{}", INDENT, line)
        }
    })
}

/// Converts a human-readable name into something which can be used in a Swift identifier:
/// every word is capitalized and everything that isn't a letter or digit is dropped.  For
/// example, `"my star-icon"` becomes `"MyStarIcon"`.
pub fn sanitize_name(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Wrap `lines` (the body of the drawing) into a complete Swift source file
pub(super) fn make_template<'a>(
    name: &str,
    size: CgSize,
    lines: impl IntoIterator<Item = &'a str>,
) -> String {
    let body = indent(indent(lines)).join("\n");
    format!(
        "extension UIImage {{
  static func svg{name}() -> UIImage {{
    let f = UIGraphicsImageRendererFormat.preferred()
    f.opaque = false
    return UIGraphicsImageRenderer(size: {size}, format: f).image {{
      drawSVG(in: $0.cgContext)
    }}
  }}

  private static func drawSVG(in ctx: CGContext) {{
{body}
  }}
}}
",
        name = sanitize_name(name),
        size = size,
        body = body
    )
}
