use crate::layout::{Layout, Position};
use crate::measure::TextMetrics;
use crate::tree::{GoalTree, Level};
use std::fmt::Write;

pub struct SvgRenderer {
    metrics: TextMetrics,
    pub width: f64,
    pub height: f64,
    pub title: String,
    /// Space reserved above the plot area for the title.
    pub title_height: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            width: 1000.0,
            height: 600.0,
            title: "Goal Tree Visualization".to_string(),
            title_height: 40.0,
        }
    }
}

/// A node ready to draw: pixel center, radius and wrapped label.
struct NodeShape {
    cx: f64,
    cy: f64,
    r: f64,
    lines: Vec<String>,
}

impl SvgRenderer {
    pub fn render(&self, tree: &GoalTree, layout: &Layout) -> String {
        let mut svg = String::new();

        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        )
        .unwrap();

        // Style
        writeln!(
            &mut svg,
            r#"<style>
  .background {{ fill: #fff; }}
  .title {{ font-family: sans-serif; font-size: 16px; fill: #000; }}
  .goal-node {{ fill: lightblue; }}
  .goal-label {{ font-family: sans-serif; font-size: 13px; font-weight: bold; fill: #000; }}
  .goal-edge {{ stroke: gray; stroke-width: 1.5; fill: none; }}
  .arrow {{ fill: gray; }}
</style>
<defs>
  <marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse">
    <path class="arrow" d="M 0 0 L 10 5 L 0 10 z" />
  </marker>
</defs>"#
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<rect class="background" x="0" y="0" width="{}" height="{}" />"#,
            self.width, self.height
        )
        .unwrap();
        writeln!(
            &mut svg,
            r#"<text class="title" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            self.width / 2.0,
            self.title_height * 0.65,
            escape_xml(&self.title)
        )
        .unwrap();

        let shapes = self.shapes(tree, layout);

        // Edges first (behind nodes)
        for edge in tree.edges() {
            self.render_edge(&mut svg, &shapes[edge.from.index()], &shapes[edge.to.index()]);
        }

        for (id, node) in tree.nodes() {
            self.render_node(&mut svg, &shapes[id.index()], node.level, &node.id);
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn shapes(&self, tree: &GoalTree, layout: &Layout) -> Vec<NodeShape> {
        let sized: Vec<(Vec<String>, f64)> = tree
            .nodes()
            .map(|(_, n)| {
                let lines = self.metrics.wrap_label(&n.label);
                let r = self.metrics.node_radius(&lines);
                (lines, r)
            })
            .collect();

        let inset = sized.iter().map(|(_, r)| *r).fold(0.0, f64::max) + 10.0;
        let projection = Projection::fit(tree, layout, self, inset);

        tree.nodes()
            .zip(sized)
            .map(|((h, _), (lines, r))| {
                let (cx, cy) = projection.apply(layout.position(h));
                NodeShape { cx, cy, r, lines }
            })
            .collect()
    }

    fn render_node(&self, svg: &mut String, shape: &NodeShape, level: Level, id: &str) {
        writeln!(
            svg,
            r#"<circle class="goal-node {}" data-id="{}" cx="{}" cy="{}" r="{}" />"#,
            level.as_str(),
            escape_xml(id),
            shape.cx,
            shape.cy,
            shape.r
        )
        .unwrap();

        if shape.lines.is_empty() {
            return;
        }

        // Vertically center the block of lines on the circle.
        let line_h = self.metrics.line_height;
        let first_y = shape.cy - line_h * (shape.lines.len() as f64 - 1.0) / 2.0 + line_h * 0.35;
        writeln!(
            svg,
            r#"<text class="goal-label" x="{}" y="{}" text-anchor="middle">"#,
            shape.cx, first_y
        )
        .unwrap();
        for (i, line) in shape.lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { line_h };
            writeln!(
                svg,
                r#"  <tspan x="{}" dy="{}">{}</tspan>"#,
                shape.cx,
                dy,
                escape_xml(line)
            )
            .unwrap();
        }
        writeln!(svg, "</text>").unwrap();
    }

    /// Straight child -> parent line clipped to both circles, arrow at the parent.
    fn render_edge(&self, svg: &mut String, child: &NodeShape, parent: &NodeShape) {
        let dx = parent.cx - child.cx;
        let dy = parent.cy - child.cy;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= child.r + parent.r {
            return;
        }
        let ux = dx / len;
        let uy = dy / len;

        writeln!(
            svg,
            r#"<line class="goal-edge" x1="{}" y1="{}" x2="{}" y2="{}" marker-end="url(#arrow)" />"#,
            child.cx + ux * child.r,
            child.cy + uy * child.r,
            parent.cx - ux * parent.r,
            parent.cy - uy * parent.r
        )
        .unwrap();
    }
}

/// Maps normalized layout space onto the plot area below the title.
/// The y range is fitted to the rows actually used so the tree fills the canvas.
struct Projection {
    left: f64,
    plot_w: f64,
    top: f64,
    plot_h: f64,
    y_min: f64,
    y_max: f64,
}

impl Projection {
    fn fit(tree: &GoalTree, layout: &Layout, renderer: &SvgRenderer, inset: f64) -> Self {
        let ys = tree.nodes().map(|(h, _)| layout.position(h).y);
        let (y_min, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

        Self {
            left: inset,
            plot_w: (renderer.width - 2.0 * inset).max(0.0),
            top: renderer.title_height + inset,
            plot_h: (renderer.height - renderer.title_height - 2.0 * inset).max(0.0),
            y_min,
            y_max,
        }
    }

    fn apply(&self, p: Position) -> (f64, f64) {
        let x = self.left + p.x * self.plot_w;
        let span = self.y_max - self.y_min;
        let y = if span > 0.0 {
            self.top + (self.y_max - p.y) / span * self.plot_h
        } else {
            self.top + self.plot_h / 2.0
        };
        (x, y)
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::GoalAssignment;
    use crate::layout::layout;
    use crate::tree::build_tree;

    fn render(a: &GoalAssignment) -> String {
        let tree = build_tree(a).unwrap();
        let layout = layout(&tree);
        SvgRenderer::default().render(&tree, &layout)
    }

    fn marathon() -> GoalAssignment {
        let mut a = GoalAssignment::new("Run a marathon")
            .with_mid("Build endurance")
            .with_mid("Eat healthy");
        a.assign(0, ["Run 5k", "Run 10k"]);
        a.assign(1, ["Meal prep"]);
        a
    }

    #[test]
    fn test_render_basic() {
        let svg = render(&marathon());

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Goal Tree Visualization"));
        for label in ["Run a marathon", "Build", "endurance", "Eat healthy", "Run 5k", "Run 10k", "Meal prep"] {
            assert!(svg.contains(label), "{label}");
        }
    }

    #[test]
    fn test_render_counts() {
        let svg = render(&marathon());
        assert_eq!(svg.matches("<circle").count(), 6);
        assert_eq!(svg.matches(r#"class="goal-edge""#).count(), 5);
    }

    #[test]
    fn test_render_root_only() {
        let svg = render(&GoalAssignment::new("Alone"));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(!svg.contains(r#"class="goal-edge""#));
        assert!(svg.contains("Alone"));
    }

    #[test]
    fn test_render_escapes_labels() {
        let svg = render(&GoalAssignment::new("Save <$> & \"invest\"").with_mid("M"));
        assert!(svg.contains("Save &lt;$&gt; &amp;"));
        assert!(svg.contains("&quot;invest&quot;"));
        assert!(!svg.contains("<$>"));
    }

    #[test]
    fn test_render_unicode() {
        let svg = render(&GoalAssignment::new("マラソン").with_mid("持久力"));
        assert!(svg.contains("マラソン"));
        assert!(svg.contains("持久力"));
    }

    #[test]
    fn test_root_above_children() {
        let tree = build_tree(&marathon()).unwrap();
        let layout = layout(&tree);
        let shapes = SvgRenderer::default().shapes(&tree, &layout);
        let root = &shapes[tree.root().index()];
        for &mid in tree.mids() {
            assert!(root.cy < shapes[mid.index()].cy);
        }
    }

    #[test]
    fn test_projection_stays_on_canvas() {
        let tree = build_tree(&marathon()).unwrap();
        let layout = layout(&tree);
        let renderer = SvgRenderer::default();
        for shape in renderer.shapes(&tree, &layout) {
            assert!(shape.cx - shape.r >= 0.0 && shape.cx + shape.r <= renderer.width);
            assert!(shape.cy - shape.r >= renderer.title_height);
            assert!(shape.cy + shape.r <= renderer.height);
        }
    }
}
