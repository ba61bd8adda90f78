//! Genealogical graph layout and relationship inference.
//!
//! A member snapshot flows through focus selection, unit building, layout and
//! connector geometry; relationship labels and the viewport controller sit beside
//! that pipeline and share only the member model and the layout's content size.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod family;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod relationship;
pub mod render;
pub mod snapshot;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, ViewportConfig, load_config};
pub use family::{
    FamilyTree, FocusCouple, build_family_tree, build_family_tree_by, build_family_tree_with,
    build_unit, find_parent_couple, select_focus, select_focus_by,
};
pub use ir::{
    Date, FamilyUnit, Gender, Member, MemberGraph, Relationship, RelationshipKind,
    RelationshipType, UnitChild,
};
pub use layout::{Connectors, NodeFrame, Segment, TreeLayout, build_connectors, build_tree_layout, layout_unit};
pub use parser::parse_members;
pub use relationship::{Relation, relationship_label, relationship_labels, siblings_of};
pub use render::render_svg;
pub use snapshot::{TreeCache, TreeScene};
pub use viewport::{GestureEvent, Size, Transform, Viewport};
