use crate::config::LayoutConfig;
use crate::family::{FamilyTree, build_family_tree_with};
use crate::ir::{Member, MemberGraph};
use crate::layout::Connectors;

/// Everything a renderer needs for one member snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeScene {
    pub tree: FamilyTree,
    pub connectors: Connectors,
}

impl TreeScene {
    pub fn build(members: &[Member], config: &LayoutConfig) -> Option<Self> {
        let graph = MemberGraph::new(members);
        let tree = build_family_tree_with(&graph, config)?;
        let connectors = tree.connectors(config);
        Some(Self { tree, connectors })
    }
}

/// Recomputes the scene only when the member snapshot changes by content.
#[derive(Debug, Clone)]
pub struct TreeCache {
    config: LayoutConfig,
    members: Option<Vec<Member>>,
    scene: Option<TreeScene>,
    recomputes: u64,
}

impl TreeCache {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            members: None,
            scene: None,
            recomputes: 0,
        }
    }

    pub fn update(&mut self, members: &[Member]) -> Option<&TreeScene> {
        let unchanged = self
            .members
            .as_deref()
            .is_some_and(|previous| previous == members);
        if !unchanged {
            self.scene = TreeScene::build(members, &self.config);
            self.members = Some(members.to_vec());
            self.recomputes += 1;
            tracing::debug!(
                recomputes = self.recomputes,
                has_focus = self.scene.is_some(),
                "tree scene recomputed"
            );
        }
        self.scene.as_ref()
    }

    pub fn scene(&self) -> Option<&TreeScene> {
        self.scene.as_ref()
    }

    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Swaps the layout constants and forces a recompute on the next update.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.members = None;
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
