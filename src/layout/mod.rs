mod connectors;
pub(crate) mod types;
pub use connectors::*;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{FamilyUnit, Member, UnitChild};

fn row_width(count: usize, config: &LayoutConfig) -> f32 {
    match count {
        0 => 0.0,
        1 => config.node_width,
        _ => config.couple_width(),
    }
}

fn leaf_layout(member: &Member, depth: usize, config: &LayoutConfig) -> UnitLayout {
    let mut layout = UnitLayout {
        width: config.node_width,
        height: config.node_height,
        ..UnitLayout::default()
    };
    layout.frames.insert(
        member.id.clone(),
        NodeFrame {
            x: 0.0,
            y: 0.0,
            width: config.node_width,
            height: config.node_height,
        },
    );
    layout
        .variants
        .insert(member.id.clone(), DepthTier::for_depth(depth));
    layout
}

/// Places up to two partners side by side starting at `(x, y)`.
fn place_partners<'a>(
    partners: impl IntoIterator<Item = &'a Member>,
    x: f32,
    y: f32,
    tier: DepthTier,
    config: &LayoutConfig,
    layout: &mut UnitLayout,
) {
    let mut cursor = x;
    for partner in partners.into_iter().take(2) {
        layout.frames.insert(
            partner.id.clone(),
            NodeFrame {
                x: cursor,
                y,
                width: config.node_width,
                height: config.node_height,
            },
        );
        layout.variants.insert(partner.id.clone(), tier);
        cursor += config.node_width + config.spouse_gap;
    }
}

/// Bottom-up layout of `unit`: partner row on top, children row centered below it.
pub fn layout_unit(unit: &FamilyUnit, config: &LayoutConfig) -> UnitLayout {
    let config = config.sanitized();
    layout_unit_inner(unit, &config)
}

fn layout_unit_inner(unit: &FamilyUnit, config: &LayoutConfig) -> UnitLayout {
    let partner_count = unit.partners.len().min(2);
    let partner_row_width = row_width(partner_count, config);
    let partner_height = if partner_count > 0 { config.node_height } else { 0.0 };

    let child_layouts: Vec<UnitLayout> = unit
        .children
        .iter()
        .map(|child| match child {
            UnitChild::Unit(nested) => layout_unit_inner(nested, config),
            UnitChild::Leaf(member) => leaf_layout(member, unit.depth + 1, config),
        })
        .collect();

    let gaps = child_layouts.len().saturating_sub(1) as f32 * config.child_gap;
    let children_row_width: f32 = child_layouts.iter().map(|c| c.width).sum::<f32>() + gaps;
    let children_row_height = child_layouts
        .iter()
        .map(|c| c.height)
        .fold(0.0_f32, f32::max);

    let width = partner_row_width.max(children_row_width);
    let height = if child_layouts.is_empty() {
        partner_height
    } else {
        partner_height + config.connector_gap + children_row_height
    };

    let mut layout = UnitLayout {
        width,
        height,
        ..UnitLayout::default()
    };
    place_partners(
        &unit.partners,
        (width - partner_row_width) / 2.0,
        0.0,
        DepthTier::for_depth(unit.depth),
        config,
        &mut layout,
    );

    let row_y = partner_height + config.connector_gap;
    let mut cursor = (width - children_row_width) / 2.0;
    for child in child_layouts {
        let child_width = child.width;
        layout.absorb(child, cursor, row_y);
        cursor += child_width + config.child_gap;
    }
    layout
}

/// Composes the center unit under up to two ancestor couples and centers the result
/// in a square canvas.
pub fn build_tree_layout(
    center_unit: &FamilyUnit,
    left_ancestors: Option<&[Member]>,
    right_ancestors: Option<&[Member]>,
    config: &LayoutConfig,
) -> TreeLayout {
    let config = config.sanitized();
    let center = layout_unit_inner(center_unit, &config);

    let left = left_ancestors.filter(|side| !side.is_empty());
    let right = right_ancestors.filter(|side| !side.is_empty());
    let left_width = left.map_or(0.0, |side| row_width(side.len(), &config));
    let right_width = right.map_or(0.0, |side| row_width(side.len(), &config));
    let both = left.is_some() && right.is_some();
    let any = left.is_some() || right.is_some();

    let top_row_width = left_width + right_width + if both { config.branch_gap } else { 0.0 };
    let ancestor_row_height = if any { config.node_height } else { 0.0 };
    let center_offset_y = if any {
        ancestor_row_height + config.connector_gap
    } else {
        0.0
    };

    let base_width = center.width.max(top_row_width);
    let base_height = center_offset_y + center.height;

    let mut composed = UnitLayout::default();
    let center_offset_x = (base_width - center.width) / 2.0;
    composed.absorb(center, center_offset_x, center_offset_y);

    let top_row_x = (base_width - top_row_width) / 2.0;
    if let Some(side) = left {
        place_partners(side, top_row_x, 0.0, DepthTier::A, &config, &mut composed);
    }
    if let Some(side) = right {
        let x = if both {
            top_row_x + left_width + config.branch_gap
        } else {
            top_row_x
        };
        place_partners(side, x, 0.0, DepthTier::A, &config, &mut composed);
    }

    let side = base_width.max(base_height) + config.canvas_padding * 2.0;
    let offset_x = (side - base_width) / 2.0;
    let offset_y = (side - base_height) / 2.0;
    let frames = composed
        .frames
        .into_iter()
        .map(|(id, frame)| (id, frame.translated(offset_x, offset_y)))
        .collect();

    tracing::debug!(
        width = base_width,
        height = base_height,
        side,
        "tree layout composed"
    );

    TreeLayout {
        width: base_width,
        height: base_height,
        tree_size: TreeSize {
            width: side,
            height: side,
        },
        frames,
        variants: composed.variants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(ids: &[&str], children: Vec<UnitChild>, depth: usize) -> FamilyUnit {
        FamilyUnit {
            partners: ids.iter().map(|id| Member::new(*id, id, "X")).collect(),
            children,
            depth,
        }
    }

    fn leaf(id: &str) -> UnitChild {
        UnitChild::Leaf(Member::new(id, id, "X"))
    }

    #[test]
    fn single_partner_without_children_is_one_node() {
        let config = LayoutConfig::default();
        let layout = layout_unit(&unit(&["a"], Vec::new(), 0), &config);
        assert_eq!(layout.width, config.node_width);
        assert_eq!(layout.height, config.node_height);
        let frame = layout.frames["a"];
        assert_eq!((frame.x, frame.y), (0.0, 0.0));
        assert_eq!(layout.variants["a"], DepthTier::A);
    }

    #[test]
    fn children_row_is_centered_below_partners() {
        let config = LayoutConfig::default();
        let layout = layout_unit(
            &unit(&["a", "b"], vec![leaf("c"), leaf("d"), leaf("e")], 0),
            &config,
        );
        let children_width = config.node_width * 3.0 + config.child_gap * 2.0;
        assert_eq!(layout.width, children_width.max(config.couple_width()));
        assert_eq!(
            layout.height,
            config.node_height * 2.0 + config.connector_gap
        );
        let a = layout.frames["a"];
        let b = layout.frames["b"];
        assert_eq!(a.x, (layout.width - config.couple_width()) / 2.0);
        assert_eq!(b.x - a.right(), config.spouse_gap);
        let c = layout.frames["c"];
        let e = layout.frames["e"];
        assert_eq!(c.y, config.node_height + config.connector_gap);
        assert_eq!(c.x, 0.0);
        assert_eq!(e.right(), layout.width);
        assert_eq!(layout.variants["c"], DepthTier::B);
    }

    #[test]
    fn nested_units_take_their_full_width() {
        let config = LayoutConfig::default();
        let nested = unit(&["c", "cs"], vec![leaf("g1"), leaf("g2")], 1);
        let layout = layout_unit(
            &unit(&["a", "b"], vec![UnitChild::Unit(nested), leaf("d")], 0),
            &config,
        );
        let nested_width = (config.node_width * 2.0 + config.child_gap).max(config.couple_width());
        assert_eq!(
            layout.width,
            nested_width + config.child_gap + config.node_width
        );
        assert_eq!(layout.variants["g1"], DepthTier::C);
        assert_eq!(layout.variants["cs"], DepthTier::B);
        let d = layout.frames["d"];
        assert_eq!(d.x, nested_width + config.child_gap);
    }

    #[test]
    fn tree_layout_is_square_and_contains_every_frame() {
        let config = LayoutConfig::default();
        let center = unit(&["a", "b"], vec![leaf("c")], 1);
        let left = [Member::new("l1", "L1", "X"), Member::new("l2", "L2", "X")];
        let right = [Member::new("r1", "R1", "X"), Member::new("r2", "R2", "X")];
        let layout = build_tree_layout(&center, Some(&left[..]), Some(&right[..]), &config);

        let top_row = config.couple_width() * 2.0 + config.branch_gap;
        assert_eq!(layout.width, top_row);
        assert_eq!(layout.tree_size.width, layout.tree_size.height);
        assert_eq!(layout.frames.len(), 7);
        for frame in layout.frames.values() {
            assert!(frame.x >= 0.0 && frame.y >= 0.0);
            assert!(frame.right() <= layout.tree_size.width);
            assert!(frame.bottom() <= layout.tree_size.height);
        }
        let l2 = layout.frames["l2"];
        let r1 = layout.frames["r1"];
        assert_eq!(r1.x - l2.right(), config.branch_gap);
        assert_eq!(layout.variants["l1"], DepthTier::A);
    }

    #[test]
    fn lone_ancestor_side_is_centered() {
        let config = LayoutConfig::default();
        let center = unit(&["a", "b"], Vec::new(), 1);
        let right = [Member::new("r1", "R1", "X"), Member::new("r2", "R2", "X")];
        let layout = build_tree_layout(&center, None, Some(&right[..]), &config);
        let r1 = layout.frames["r1"];
        let a = layout.frames["a"];
        assert_eq!(r1.x, a.x);
        assert_eq!(layout.width, config.couple_width());
        assert_eq!(
            layout.height,
            config.node_height * 2.0 + config.connector_gap
        );
    }

    #[test]
    fn degenerate_tree_has_no_nan() {
        let config = LayoutConfig {
            canvas_padding: f32::NAN,
            child_gap: -10.0,
            ..LayoutConfig::default()
        };
        let layout = build_tree_layout(&unit(&["a"], Vec::new(), 0), None, Some(&[][..]), &config);
        assert_eq!(layout.frames.len(), 1);
        assert!(layout.tree_size.width.is_finite());
        assert_eq!(layout.width, LayoutConfig::default().node_width);
        for frame in layout.frames.values() {
            assert!(frame.x.is_finite() && frame.y.is_finite());
            assert!(frame.x >= 0.0 && frame.y >= 0.0);
        }
    }
}
