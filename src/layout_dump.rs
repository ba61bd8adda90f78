use crate::layout::{Connectors, DepthTier, TreeSize};
use crate::snapshot::TreeScene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub tree_size: TreeSize,
    pub focus: Vec<String>,
    pub left_ancestors: Vec<String>,
    pub right_ancestors: Vec<String>,
    pub nodes: Vec<NodeDump>,
    pub connectors: Connectors,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub tier: DepthTier,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutDump {
    pub fn from_scene(scene: &TreeScene) -> Self {
        let tree = &scene.tree;
        let layout = &tree.layout;
        let nodes = tree
            .members()
            .into_iter()
            .filter_map(|member| {
                let frame = layout.frames.get(&member.id)?;
                Some(NodeDump {
                    id: member.id.clone(),
                    name: member.display_name(),
                    tier: layout
                        .variants
                        .get(&member.id)
                        .copied()
                        .unwrap_or(DepthTier::C),
                    x: frame.x,
                    y: frame.y,
                    width: frame.width,
                    height: frame.height,
                })
            })
            .collect();

        let ids = |couple: &Option<[crate::ir::Member; 2]>| -> Vec<String> {
            couple
                .iter()
                .flatten()
                .map(|member| member.id.clone())
                .collect()
        };

        LayoutDump {
            width: layout.width,
            height: layout.height,
            tree_size: layout.tree_size,
            focus: tree
                .center_unit
                .partners
                .iter()
                .map(|member| member.id.clone())
                .collect(),
            left_ancestors: ids(&tree.left_ancestor_couple),
            right_ancestors: ids(&tree.right_ancestor_couple),
            nodes,
            connectors: scene.connectors.clone(),
        }
    }
}

pub fn write_layout_dump(path: Option<&Path>, scene: Option<&TreeScene>) -> anyhow::Result<()> {
    let dump = scene.map(LayoutDump::from_scene);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Member, Relationship, RelationshipType};

    #[test]
    fn dump_lists_every_framed_member() {
        let members = vec![
            Member::new("a", "A", "X")
                .with_edge(Relationship::new("p", RelationshipType::Parent))
                .with_edge(Relationship::new("b", RelationshipType::Spouse))
                .with_edge(Relationship::new("c", RelationshipType::Child)),
            Member::new("b", "B", "X").with_edge(Relationship::new("a", RelationshipType::Spouse)),
            Member::new("c", "C", "X"),
        ];
        let scene = TreeScene::build(&members, &LayoutConfig::default()).expect("focus exists");
        let dump = LayoutDump::from_scene(&scene);
        assert_eq!(dump.nodes.len(), 3);
        assert_eq!(dump.focus, vec!["a".to_string(), "b".to_string()]);
        assert!(dump.left_ancestors.is_empty());

        let json = serde_json::to_value(&dump).expect("dump serializes");
        assert_eq!(json["nodes"][0]["tier"], "A");
        assert_eq!(json["connectors"]["spouseBars"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["treeSize"]["width"], json["treeSize"]["height"]);
    }
}
