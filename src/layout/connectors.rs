use super::*;

/// Horizontal line joining a couple, or the center of a single partner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartnerLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub mid_x: f32,
    pub top: f32,
    pub bottom: f32,
}

fn partner_line(partners: &[Member], layout: &TreeLayout) -> Option<PartnerLine> {
    let frames: Vec<NodeFrame> = partners
        .iter()
        .take(2)
        .filter_map(|partner| layout.frames.get(&partner.id).copied())
        .collect();
    match frames.as_slice() {
        [single] => Some(PartnerLine {
            x1: single.center_x(),
            x2: single.center_x(),
            y: single.center_y(),
            mid_x: single.center_x(),
            top: single.y,
            bottom: single.bottom(),
        }),
        [a, b] => {
            let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
            let x1 = left.right();
            let x2 = right.x;
            Some(PartnerLine {
                x1,
                x2,
                y: (left.center_y() + right.center_y()) / 2.0,
                mid_x: (x1 + x2) / 2.0,
                top: left.y.min(right.y),
                bottom: left.bottom().max(right.bottom()),
            })
        }
        _ => None,
    }
}

fn child_anchor(child: &UnitChild, layout: &TreeLayout) -> Option<(f32, f32)> {
    match child {
        UnitChild::Unit(unit) => {
            partner_line(&unit.partners, layout).map(|line| (line.mid_x, line.y))
        }
        UnitChild::Leaf(member) => layout
            .frames
            .get(&member.id)
            .map(|frame| (frame.center_x(), frame.y)),
    }
}

fn emit_family(
    partners: &[Member],
    children: &[UnitChild],
    layout: &TreeLayout,
    config: &LayoutConfig,
    out: &mut Connectors,
) {
    let Some(line) = partner_line(partners, layout) else {
        return;
    };
    if partners.len() >= 2 {
        out.spouse_bars
            .push(Segment::new(line.x1, line.y, line.x2, line.y));
    }

    let anchors: Vec<(f32, f32)> = children
        .iter()
        .filter_map(|child| child_anchor(child, layout))
        .collect();
    if anchors.is_empty() {
        return;
    }

    let top_anchor_y = anchors
        .iter()
        .map(|(_, y)| *y)
        .fold(f32::INFINITY, f32::min);
    // Higher of the two candidates. rail_margin is non-negative after sanitizing, so
    // the rail can never sit below the topmost anchor.
    let rail_y = (line.bottom + config.rail_margin).min(top_anchor_y - config.rail_margin);

    out.stems
        .push(Segment::new(line.mid_x, line.y, line.mid_x, rail_y));

    let (rail_start, rail_end) = anchors
        .iter()
        .fold((line.mid_x, line.mid_x), |(lo, hi), (x, _)| {
            (lo.min(*x), hi.max(*x))
        });
    out.rails
        .push(Segment::new(rail_start, rail_y, rail_end, rail_y));

    for (x, y) in anchors {
        out.drops.push(Segment::new(x, rail_y, x, y));
    }
}

fn emit_unit(unit: &FamilyUnit, layout: &TreeLayout, config: &LayoutConfig, out: &mut Connectors) {
    emit_family(&unit.partners, &unit.children, layout, config, out);
    for child in &unit.children {
        if let UnitChild::Unit(nested) = child {
            emit_unit(nested, layout, config, out);
        }
    }
}

/// Line geometry for a finished layout: the center unit depth first, then each
/// ancestor couple as a one-generation family over its focus partner.
pub fn build_connectors(
    center_unit: &FamilyUnit,
    left_ancestors: Option<&[Member]>,
    right_ancestors: Option<&[Member]>,
    layout: &TreeLayout,
    config: &LayoutConfig,
) -> Connectors {
    let config = config.sanitized();
    let mut out = Connectors::default();
    emit_unit(center_unit, layout, &config, &mut out);

    let sides = [
        (left_ancestors, center_unit.partners.first()),
        (right_ancestors, center_unit.partners.get(1)),
    ];
    for (ancestors, focus_partner) in sides {
        let (Some(ancestors), Some(partner)) = (ancestors, focus_partner) else {
            continue;
        };
        if ancestors.is_empty() {
            continue;
        }
        let synthetic = [UnitChild::Leaf(partner.clone())];
        emit_family(ancestors, &synthetic, layout, &config, &mut out);
    }
    out
}
