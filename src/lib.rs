pub mod assignment;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod parser;
pub mod serializer;
#[cfg(not(target_arch = "wasm32"))]
pub mod store;
pub mod svg;
pub mod tree;

use wasm_bindgen::prelude::*;

use assignment::{GoalAssignment, RENDER_HINT};
use layout::LayoutEngine;
use svg::SvgRenderer;
use tree::GoalTree;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Build, lay out and render an assignment. Fails with the render hint when
/// there is no high-level goal or no mid-level goal yet.
pub fn render_assignment(assignment: &GoalAssignment) -> Result<String, String> {
    if !assignment.is_renderable() {
        return Err(RENDER_HINT.to_string());
    }

    let tree = GoalTree::build(assignment).map_err(|e| e.to_string())?;
    let layout = LayoutEngine::default().layout(&tree);
    let svg = SvgRenderer::default().render(&tree, &layout);

    Ok(svg)
}

/// Render goal notation to SVG
#[wasm_bindgen(js_name = "goalsToSvg")]
pub fn render_goals(source: &str) -> Result<String, String> {
    let assignment = parser::parse(source).map_err(|e| e.to_string())?;
    render_assignment(&assignment)
}

/// Render a JSON goal assignment (as sent by a web form) to SVG
#[wasm_bindgen(js_name = "assignmentToSvg")]
pub fn render_assignment_json(json: &str) -> Result<String, String> {
    let assignment: GoalAssignment = serde_json::from_str(json).map_err(|e| e.to_string())?;
    render_assignment(&assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_goals() {
        let svg = render_goals(
            r#"
            high "Run a marathon"
            low "Run 5k"
            mid "Build endurance" { "Run 5k" }
            "#,
        )
        .unwrap();
        assert!(svg.contains("Run a marathon"));
        assert!(svg.contains("Run 5k"));
    }

    #[test]
    fn test_render_goals_parse_error() {
        let err = render_goals(r#"high "unterminated"#).unwrap_err();
        assert!(err.contains("Unterminated string"));
    }

    #[test]
    fn test_render_requires_high_and_mid() {
        assert_eq!(render_goals(r#"high "Only""#).unwrap_err(), RENDER_HINT);
        assert_eq!(render_goals(r#"mid "Only""#).unwrap_err(), RENDER_HINT);
    }

    #[test]
    fn test_render_assignment_json() {
        let svg = render_assignment_json(
            r#"{"high_goal":"Run a marathon","mid_goals":["Eat healthy"],"low_goals_by_mid_index":{"0":["Meal prep"]}}"#,
        )
        .unwrap();
        assert!(svg.contains("Meal prep"));
    }

    #[test]
    fn test_render_assignment_json_bad_index() {
        let err = render_assignment_json(
            r#"{"high_goal":"H","mid_goals":["M"],"low_goals_by_mid_index":{"4":["x"]}}"#,
        )
        .unwrap_err();
        assert!(err.contains("mid goal #4"));
    }
}
