use crate::ir::Gender;
use serde::{Deserialize, Serialize};
use std::path::Path;

const TIER_FILLS: [&str; 3] = ["#F3EEFF", "#ECF4FF", "#F4F8EE"];

/// Fixed geometry constants driving every layout computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Between the two members of a couple.
    pub spouse_gap: f32,
    /// Between the two ancestor couples in the top row.
    pub branch_gap: f32,
    /// Between sibling subtrees.
    pub child_gap: f32,
    /// Between a partner row and its children row.
    pub connector_gap: f32,
    pub canvas_padding: f32,
    /// Offset of the rail from the partner row and the children anchors.
    pub rail_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            node_height: 56.0,
            spouse_gap: 24.0,
            branch_gap: 48.0,
            child_gap: 32.0,
            connector_gap: 56.0,
            canvas_padding: 40.0,
            rail_margin: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Copy with non-finite values reset to defaults, gaps clamped to zero and node
    /// sizes to one unit.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let pick = |value: f32, fallback: f32, floor: f32| {
            if value.is_finite() {
                value.max(floor)
            } else {
                fallback
            }
        };
        Self {
            node_width: pick(self.node_width, defaults.node_width, 1.0),
            node_height: pick(self.node_height, defaults.node_height, 1.0),
            spouse_gap: pick(self.spouse_gap, defaults.spouse_gap, 0.0),
            branch_gap: pick(self.branch_gap, defaults.branch_gap, 0.0),
            child_gap: pick(self.child_gap, defaults.child_gap, 0.0),
            connector_gap: pick(self.connector_gap, defaults.connector_gap, 0.0),
            canvas_padding: pick(self.canvas_padding, defaults.canvas_padding, 0.0),
            rail_margin: pick(self.rail_margin, defaults.rail_margin, 0.0),
        }
    }

    pub fn couple_width(&self) -> f32 {
        self.node_width * 2.0 + self.spouse_gap
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub zoom_in_multiplier: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_in_multiplier: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Branch used for gendered labels when a member has no gender recorded.
    pub unset_gender: Gender,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            unset_gender: Gender::Male,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub line_color: String,
    pub node_stroke: String,
    pub text_color: String,
    pub tier_fills: Vec<String>,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            background: "#FFFFFF".to_string(),
            line_color: "#7A8AA6".to_string(),
            node_stroke: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            tier_fills: TIER_FILLS.iter().map(|value| value.to_string()).collect(),
            font_family: "Inter, Segoe UI, system-ui, sans-serif".to_string(),
            font_size: 13.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub labels: LabelConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    spouse_gap: Option<f32>,
    branch_gap: Option<f32>,
    child_gap: Option<f32>,
    connector_gap: Option<f32>,
    canvas_padding: Option<f32>,
    rail_margin: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    zoom_in_multiplier: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    unset_gender: Option<Gender>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
    line_color: Option<String>,
    node_stroke: Option<String>,
    text_color: Option<String>,
    tier_fills: Option<Vec<String>>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    viewport: Option<ViewportConfigFile>,
    labels: Option<LabelConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_width {
            target.node_width = v;
        }
        if let Some(v) = layout.node_height {
            target.node_height = v;
        }
        if let Some(v) = layout.spouse_gap {
            target.spouse_gap = v;
        }
        if let Some(v) = layout.branch_gap {
            target.branch_gap = v;
        }
        if let Some(v) = layout.child_gap {
            target.child_gap = v;
        }
        if let Some(v) = layout.connector_gap {
            target.connector_gap = v;
        }
        if let Some(v) = layout.canvas_padding {
            target.canvas_padding = v;
        }
        if let Some(v) = layout.rail_margin {
            target.rail_margin = v;
        }
        config.layout = config.layout.sanitized();
    }

    if let Some(viewport) = parsed.viewport
        && let Some(v) = viewport.zoom_in_multiplier
    {
        config.viewport.zoom_in_multiplier = v;
    }

    if let Some(labels) = parsed.labels
        && let Some(v) = labels.unset_gender
    {
        config.labels.unset_gender = v;
    }

    if let Some(render) = parsed.render {
        let target = &mut config.render;
        if let Some(v) = render.width {
            target.width = v;
        }
        if let Some(v) = render.height {
            target.height = v;
        }
        if let Some(v) = render.background {
            target.background = v;
        }
        if let Some(v) = render.line_color {
            target.line_color = v;
        }
        if let Some(v) = render.node_stroke {
            target.node_stroke = v;
        }
        if let Some(v) = render.text_color {
            target.text_color = v;
        }
        if let Some(v) = render.tier_fills
            && !v.is_empty()
        {
            target.tier_fills = v;
        }
        if let Some(v) = render.font_family {
            target.font_family = v;
        }
        if let Some(v) = render.font_size {
            target.font_size = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_overrides_defaults() {
        let config = parse_config(
            r##"{
                "layout": { "nodeWidth": 150, "childGap": 10 },
                "labels": { "unsetGender": "female" },
                "render": { "background": "#000000" }
            }"##,
        )
        .expect("config should parse");
        assert_eq!(config.layout.node_width, 150.0);
        assert_eq!(config.layout.child_gap, 10.0);
        assert_eq!(config.layout.node_height, LayoutConfig::default().node_height);
        assert_eq!(config.labels.unset_gender, Gender::Female);
        assert_eq!(config.render.background, "#000000");
    }

    #[test]
    fn sanitize_rejects_negative_and_non_finite() {
        let config = LayoutConfig {
            node_width: -5.0,
            spouse_gap: f32::NAN,
            child_gap: -1.0,
            ..LayoutConfig::default()
        }
        .sanitized();
        assert_eq!(config.node_width, 1.0);
        assert_eq!(config.spouse_gap, LayoutConfig::default().spouse_gap);
        assert_eq!(config.child_gap, 0.0);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.viewport.zoom_in_multiplier, 3.0);
    }
}
