//! SVG generation from a built scene

use std::fmt::Display;

use crate::scene::shapes::{Grid, Line, Polygonal};
use crate::scene::{Node, NodeId, NodeKind, Scene, Shape};

use super::SvgConfig;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const SVG_DOCTYPE: &str = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

/// Render a scene to SVG markup
pub fn render_svg(scene: &Scene, config: &SvgConfig) -> String {
    let mut writer = SvgWriter::new(config);
    writer.prologue(scene);
    if scene.contains_arrows() {
        writer.arrow_marker();
    }
    for &child in scene.children(scene.root()) {
        writer.node(scene, child);
    }
    writer.finish()
}

/// Escape special XML characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// ` name="value"` with the value escaped
fn attr(name: &str, value: impl Display) -> String {
    format!(r#" {}="{}""#, name, escape_xml(&value.to_string()))
}

fn points_attr(points: &[[f64; 2]]) -> String {
    let points = points
        .iter()
        .map(|[x, y]| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ");
    attr("points", points)
}

/// Attributes shared by every element, in the order id, events, style,
/// transform
fn common_attrs(node: &Node) -> String {
    let mut out = String::new();
    if let Some(name) = &node.name {
        out.push_str(&attr("id", name));
    }
    out.push_str(&node.events.attributes());
    out.push_str(&node.style.attributes());
    if let Some(transform) = node.transforms.to_markup() {
        out.push_str(&attr("transform", transform));
    }
    out
}

/// Accumulates markup line by line
struct SvgWriter<'c> {
    config: &'c SvgConfig,
    out: String,
    indent: usize,
}

impl<'c> SvgWriter<'c> {
    fn new(config: &'c SvgConfig) -> Self {
        Self {
            config,
            out: String::new(),
            indent: 0,
        }
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &'static str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn line(&mut self, markup: &str) {
        let indent = self.indent_str();
        let newline = self.newline();
        self.out.push_str(&indent);
        self.out.push_str(markup);
        self.out.push_str(newline);
    }

    fn open(&mut self, markup: &str) {
        self.line(markup);
        self.indent += 1;
    }

    fn close(&mut self, tag: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(&format!("</{}>", tag));
    }

    fn prologue(&mut self, scene: &Scene) {
        if self.config.standalone {
            self.line(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
        }
        if let Some(href) = &self.config.stylesheet {
            let pi = format!(r#"<?xml-stylesheet{} type="text/css"?>"#, attr("href", href));
            self.line(&pi);
        }
        if self.config.doctype {
            self.line(SVG_DOCTYPE);
        }
        let root = scene.node(scene.root());
        let svg = format!(
            "<svg{}{}{}{}{}{}>",
            attr("xmlns", SVG_NS),
            attr("xmlns:xlink", XLINK_NS),
            attr("version", "1.1"),
            attr("width", scene.width()),
            attr("height", scene.height()),
            common_attrs(root),
        );
        self.open(&svg);
    }

    fn arrow_marker(&mut self) {
        self.open("<defs>");
        self.open(
            r#"<marker id="marker-arrowhead" markerWidth="6" markerHeight="8" refX="4" refY="3" orient="auto">"#,
        );
        self.line(r#"<path d="M 0 0 L 4 3 0 6" style="fill: none; stroke: black;"/>"#);
        self.close("marker");
        self.close("defs");
    }

    fn node(&mut self, scene: &Scene, id: NodeId) {
        let node = scene.node(id);
        let common = common_attrs(node);
        match &node.kind {
            NodeKind::Document | NodeKind::Group | NodeKind::LabeledCircle => {
                self.container(scene, id, "g", &common)
            }
            NodeKind::Link { href } => {
                let attrs = format!("{}{}", attr("xlink:href", href), common);
                self.container(scene, id, "a", &attrs)
            }
            NodeKind::Defs => self.container(scene, id, "defs", &common),
            NodeKind::Shape(shape) => self.shape(scene, shape, &common),
        }
    }

    fn container(&mut self, scene: &Scene, id: NodeId, tag: &str, attrs: &str) {
        let children = scene.children(id);
        if children.is_empty() {
            self.line(&format!("<{}{}/>", tag, attrs));
            return;
        }
        self.open(&format!("<{}{}>", tag, attrs));
        for &child in children {
            self.node(scene, child);
        }
        self.close(tag);
    }

    fn empty(&mut self, tag: &str, geometry: String, common: &str) {
        self.line(&format!("<{}{}{}/>", tag, geometry, common));
    }

    fn shape(&mut self, scene: &Scene, shape: &Shape, common: &str) {
        match shape {
            Shape::Rect(r) => {
                let mut geometry = format!(
                    "{}{}{}{}",
                    attr("x", r.x),
                    attr("y", r.y),
                    attr("width", r.width),
                    attr("height", r.height)
                );
                if let Some(rx) = r.rx {
                    geometry.push_str(&attr("rx", rx));
                }
                if let Some(ry) = r.ry {
                    geometry.push_str(&attr("ry", ry));
                }
                self.empty("rect", geometry, common);
            }
            Shape::Circle(c) => {
                let geometry = format!("{}{}{}", attr("cx", c.cx), attr("cy", c.cy), attr("r", c.r));
                self.empty("circle", geometry, common);
            }
            Shape::Ellipse(e) => {
                let geometry = format!(
                    "{}{}{}{}",
                    attr("cx", e.cx),
                    attr("cy", e.cy),
                    attr("rx", e.rx),
                    attr("ry", e.ry)
                );
                self.empty("ellipse", geometry, common);
            }
            Shape::Line(line) | Shape::Arrow(line) => self.empty("line", line_attrs(line), common),
            Shape::Polyline(points) => self.empty("polyline", points_attr(points), common),
            Shape::Polygon(points) => self.empty("polygon", points_attr(points), common),
            Shape::Star(Polygonal { points, .. }) | Shape::RegularPolygon(Polygonal { points, .. }) => {
                self.empty("polygon", points_attr(points), common)
            }
            Shape::Path(data) => self.empty("path", attr("d", data), common),
            Shape::Balloon(balloon) => self.empty("path", attr("d", balloon.path_data()), common),
            Shape::Bezier(bezier) => self.empty("path", attr("d", bezier.path_data()), common),
            Shape::BentLine(bent) => self.empty("path", attr("d", bent.path_data()), common),
            Shape::Text(text) => {
                let markup = format!(
                    "<text{}{}{}>{}</text>",
                    attr("x", text.x),
                    attr("y", text.y),
                    common,
                    escape_xml(&text.content)
                );
                self.line(&markup);
            }
            Shape::Image(image) => {
                let geometry = format!(
                    "{}{}{}{}{}",
                    attr("x", image.x),
                    attr("y", image.y),
                    attr("width", image.width),
                    attr("height", image.height),
                    attr("xlink:href", &image.href)
                );
                self.empty("image", geometry, common);
            }
            Shape::Use(reference) => {
                let target = reference.target.trim_start_matches('#');
                let mut geometry = attr("xlink:href", format!("#{}", target));
                let optional = [
                    ("x", reference.x),
                    ("y", reference.y),
                    ("width", reference.width),
                    ("height", reference.height),
                ];
                for (name, value) in optional {
                    if let Some(value) = value {
                        geometry.push_str(&attr(name, value));
                    }
                }
                self.empty("use", geometry, common);
            }
            Shape::Grid(grid) => self.grid(scene, grid, common),
        }
    }

    /// Lines every `distance` units across the document, labelled with
    /// their coordinate at scale 1
    fn grid(&mut self, scene: &Scene, grid: &Grid, common: &str) {
        let (width, height) = (scene.width(), scene.height());
        self.open(&format!("<g{}>", common));
        for x in steps(width, grid.distance) {
            let geometry = format!("{}{}{}{}", attr("x1", x), attr("y1", 0), attr("x2", x), attr("y2", height));
            self.empty("line", geometry, "");
            if grid.scale == 1.0 {
                self.line(&format!("<text{}{}>{}</text>", attr("x", x), attr("y", 12), x));
            }
        }
        for y in steps(height, grid.distance) {
            let geometry = format!("{}{}{}{}", attr("x1", 0), attr("y1", y), attr("x2", width), attr("y2", y));
            self.empty("line", geometry, "");
            if grid.scale == 1.0 {
                self.line(&format!("<text{}{}>{}</text>", attr("x", 0), attr("y", y), y));
            }
        }
        self.close("g");
    }

    /// Close the root element; the document ends without a newline
    fn finish(mut self) -> String {
        self.indent = 0;
        self.out.push_str("</svg>");
        self.out
    }
}

fn line_attrs(line: &Line) -> String {
    format!(
        "{}{}{}{}",
        attr("x1", line.x1),
        attr("y1", line.y1),
        attr("x2", line.x2),
        attr("y2", line.y2)
    )
}

/// `0, distance, 2·distance, …` up to and including `limit`
fn steps(limit: f64, distance: f64) -> impl Iterator<Item = f64> {
    (0usize..)
        .map(move |i| i as f64 * distance)
        .take_while(move |v| *v <= limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneError;
    use pretty_assertions::assert_eq;

    fn fragment() -> SvgConfig {
        SvgConfig::new().with_standalone(false)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_empty_document() {
        let scene = Scene::new(100.0, 50.0);
        let svg = render_svg(&scene, &SvgConfig::default());
        insta::assert_snapshot!(svg, @r#"
<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="100" height="50">
</svg>
"#);
    }

    #[test]
    fn test_prologue_options() {
        let scene = Scene::new(10.0, 10.0);
        let config = SvgConfig::new()
            .with_doctype(true)
            .with_stylesheet("style.css")
            .with_pretty_print(false);
        let svg = render_svg(&scene, &config);
        assert!(svg.starts_with(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?><?xml-stylesheet href="style.css" type="text/css"?><!DOCTYPE svg"#
        ));
        assert!(svg.ends_with(r#"height="10"></svg>"#));
    }

    #[test]
    fn test_attribute_order() -> Result<(), SceneError> {
        let scene = Scene::build(100.0, 50.0, |b| {
            let corner = b.pt(10.0, 10.0);
            b.rect(corner, 80.0, 40.0)?
                .id("box")
                .style(|s| {
                    s.fill("red");
                })
                .event(|e| {
                    e.onclick("select()");
                })
                .translate(5.0, 5.0);
            Ok(())
        })?;

        let svg = render_svg(&scene, &fragment());
        assert_eq!(
            svg,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="100" height="50">"#,
                "\n",
                r#"  <rect x="10" y="10" width="80" height="40" id="box" onclick="select(evt)" fill="red" transform="translate(5 5)"/>"#,
                "\n</svg>"
            )
        );
        Ok(())
    }

    #[test]
    fn test_nested_containers() -> Result<(), SceneError> {
        let scene = Scene::build(100.0, 100.0, |b| {
            b.group()?.id("g").rotate(30.0).children(|g| {
                let center = g.pt(0.0, 0.0);
                g.circle(center, 10.0)?;
                g.link("https://example.org")?.children(|a| {
                    let at = a.pt(5.0, 90.0);
                    a.text("home & away", at)?;
                    Ok(())
                })?;
                Ok(())
            })?;
            b.defs()?;
            Ok(())
        })?;

        let svg = render_svg(&scene, &fragment());
        insta::assert_snapshot!(svg, @r#"
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="100" height="100">
  <g id="g" transform="rotate(30)">
    <circle cx="0" cy="0" r="10"/>
    <a xlink:href="https://example.org">
      <text x="5" y="90">home &amp; away</text>
    </a>
  </g>
  <defs/>
</svg>
"#);
        Ok(())
    }

    #[test]
    fn test_arrow_marker_emitted_once() -> Result<(), SceneError> {
        let scene = Scene::build(50.0, 50.0, |b| {
            for i in 0..3 {
                let start = b.pt(0.0, f64::from(i) * 10.0);
                let goal = b.pt(40.0, f64::from(i) * 10.0);
                b.arrow(start, goal)?;
            }
            Ok(())
        })?;

        let svg = render_svg(&scene, &fragment());
        assert_eq!(svg.matches("<marker ").count(), 1);
        assert!(svg.contains(
            r#"<line x1="0" y1="10" x2="40" y2="10" marker-end="url(#marker-arrowhead)"/>"#
        ));
        Ok(())
    }

    #[test]
    fn test_no_marker_without_arrows() -> Result<(), SceneError> {
        let scene = Scene::build(50.0, 50.0, |b| {
            let (start, goal) = (b.pt(0.0, 0.0), b.pt(10.0, 10.0));
            b.line(start, goal)?;
            Ok(())
        })?;
        assert!(!render_svg(&scene, &fragment()).contains("<defs>"));
        Ok(())
    }

    #[test]
    fn test_polygon_and_use() -> Result<(), SceneError> {
        let scene = Scene::build(50.0, 50.0, |b| {
            let points = [b.pt(0.0, 0.0), b.pt(10.0, 0.0), b.pt(5.0, 7.5)];
            b.polygon(&points)?.id("tri");
            b.use_ref("tri")?;
            Ok(())
        })?;

        let svg = render_svg(&scene, &fragment().with_pretty_print(false));
        assert!(svg.contains(r#"<polygon points="0,0 10,0 5,7.5" id="tri"/>"#));
        assert!(svg.contains(r##"<use xlink:href="#tri"/>"##));
        Ok(())
    }

    #[test]
    fn test_grid_lines_and_labels() -> Result<(), SceneError> {
        let scene = Scene::build(20.0, 10.0, |b| {
            b.grid(10.0)?;
            Ok(())
        })?;

        let svg = render_svg(&scene, &fragment().with_pretty_print(false));
        assert_eq!(svg.matches("<line ").count(), 5);
        assert!(svg.contains(r#"<line x1="20" y1="0" x2="20" y2="10"/><text x="20" y="12">20</text>"#));
        assert!(svg.contains(r#"<line x1="0" y1="10" x2="20" y2="10"/><text x="0" y="10">10</text>"#));
        Ok(())
    }

    #[test]
    fn test_steps_include_limit() {
        assert_eq!(steps(20.0, 10.0).collect::<Vec<_>>(), vec![0.0, 10.0, 20.0]);
        assert_eq!(steps(25.0, 10.0).collect::<Vec<_>>(), vec![0.0, 10.0, 20.0]);
    }
}
