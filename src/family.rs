//! Focus couple selection and recursive family-unit construction.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::ir::{FamilyUnit, Member, MemberGraph, RelationshipType, UnitChild};
use crate::layout::{Connectors, TreeLayout, build_connectors, build_tree_layout};

/// The anchor couple of the visible subtree.
#[derive(Debug, Clone, Copy)]
pub struct FocusCouple<'a> {
    pub primary: &'a Member,
    pub spouse: &'a Member,
}

/// Visible subtree: one ancestor couple per focus partner, the focus unit and its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyTree {
    pub left_ancestor_couple: Option<[Member; 2]>,
    pub right_ancestor_couple: Option<[Member; 2]>,
    pub center_unit: FamilyUnit,
    pub layout: TreeLayout,
}

impl FamilyTree {
    /// Every member with a frame: ancestors left to right, then the center unit.
    pub fn members(&self) -> Vec<&Member> {
        let mut out = Vec::new();
        for couple in [&self.left_ancestor_couple, &self.right_ancestor_couple]
            .into_iter()
            .flatten()
        {
            out.extend(couple.iter());
        }
        out.extend(self.center_unit.members());
        out
    }

    /// Connector geometry over this tree's layout.
    pub fn connectors(&self, config: &LayoutConfig) -> Connectors {
        build_connectors(
            &self.center_unit,
            self.left_ancestor_couple.as_ref().map(|c| c.as_slice()),
            self.right_ancestor_couple.as_ref().map(|c| c.as_slice()),
            &self.layout,
            config,
        )
    }
}

/// A member with parent, child and spouse edges all present.
pub fn is_focus_candidate(member: &Member) -> bool {
    member.has_edge(RelationshipType::Parent)
        && member.has_edge(RelationshipType::Child)
        && member.has_edge(RelationshipType::Spouse)
}

/// First candidate in stored order.
pub fn select_focus<'a>(graph: &MemberGraph<'a>) -> Option<FocusCouple<'a>> {
    select_focus_by(graph, |_, _| Ordering::Equal)
}

/// Smallest candidate under `compare`; ties keep stored order. Only the chosen
/// candidate's spouse is consulted: when it does not resolve there is no focus.
pub fn select_focus_by<'a, F>(graph: &MemberGraph<'a>, mut compare: F) -> Option<FocusCouple<'a>>
where
    F: FnMut(&Member, &Member) -> Ordering,
{
    let primary = graph
        .members()
        .iter()
        .filter(|member| is_focus_candidate(member))
        .min_by(|a, b| compare(a, b))?;
    let Some(spouse) = graph.resolve_spouse(primary) else {
        tracing::debug!(member = %primary.id, "focus candidate has no resolvable spouse");
        return None;
    };
    Some(FocusCouple { primary, spouse })
}

/// First two resolvable, distinct parents in stored order.
pub fn find_parent_couple<'a>(member: &Member, graph: &MemberGraph<'a>) -> Option<[&'a Member; 2]> {
    let mut parents = Vec::with_capacity(2);
    for parent in graph.resolve_parents(member) {
        if parent.id == member.id || parents.iter().any(|p: &&Member| p.id == parent.id) {
            continue;
        }
        parents.push(parent);
        if parents.len() == 2 {
            return Some([parents[0], parents[1]]);
        }
    }
    None
}

pub fn build_unit(
    partner_a: &Member,
    partner_b: Option<&Member>,
    depth: usize,
    graph: &MemberGraph<'_>,
) -> FamilyUnit {
    let mut visited = HashSet::new();
    build_unit_guarded(partner_a, partner_b, depth, graph, &mut visited)
}

fn build_unit_guarded<'a>(
    partner_a: &Member,
    partner_b: Option<&Member>,
    depth: usize,
    graph: &MemberGraph<'a>,
    visited: &mut HashSet<String>,
) -> FamilyUnit {
    visited.insert(partner_a.id.clone());
    if let Some(partner) = partner_b {
        visited.insert(partner.id.clone());
    }

    let mut children = collect_children(partner_a, partner_b, graph);
    sort_by_birth(&mut children);

    let mut built = Vec::with_capacity(children.len());
    for child in children {
        if visited.contains(&child.id) {
            tracing::warn!(member = %child.id, "skipping member already placed in the tree");
            continue;
        }
        visited.insert(child.id.clone());
        let spouse = graph
            .resolve_spouse(child)
            .filter(|spouse| !visited.contains(&spouse.id));
        match spouse {
            Some(spouse) => built.push(UnitChild::Unit(build_unit_guarded(
                child,
                Some(spouse),
                depth + 1,
                graph,
                visited,
            ))),
            None => built.push(UnitChild::Leaf(child.clone())),
        }
    }

    let mut partners = vec![partner_a.clone()];
    if let Some(partner) = partner_b {
        partners.push(partner.clone());
    }
    FamilyUnit {
        partners,
        children: built,
        depth,
    }
}

fn collect_children<'a>(
    partner_a: &Member,
    partner_b: Option<&Member>,
    graph: &MemberGraph<'a>,
) -> Vec<&'a Member> {
    let mut seen = HashSet::new();
    let mut children = Vec::new();
    for partner in std::iter::once(partner_a).chain(partner_b) {
        for id in partner.child_ids() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(child) = graph.get(id) {
                children.push(child);
            }
        }
    }
    children
}

/// Dated children ascending; undated ones after, in their original order.
fn sort_by_birth(children: &mut [&Member]) {
    children.sort_by(|a, b| match (a.birth_date, b.birth_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn build_family_tree(members: &[Member]) -> Option<FamilyTree> {
    build_family_tree_with(&MemberGraph::new(members), &LayoutConfig::default())
}

pub fn build_family_tree_with(graph: &MemberGraph<'_>, config: &LayoutConfig) -> Option<FamilyTree> {
    build_family_tree_by(graph, config, |_, _| Ordering::Equal)
}

pub fn build_family_tree_by<F>(
    graph: &MemberGraph<'_>,
    config: &LayoutConfig,
    compare: F,
) -> Option<FamilyTree>
where
    F: FnMut(&Member, &Member) -> Ordering,
{
    let Some(focus) = select_focus_by(graph, compare) else {
        tracing::debug!(members = graph.len(), "no focus couple in snapshot");
        return None;
    };
    tracing::debug!(primary = %focus.primary.id, spouse = %focus.spouse.id, "focus couple selected");

    let left = find_parent_couple(focus.primary, graph);
    let mut right = find_parent_couple(focus.spouse, graph);
    if let (Some(left), Some(couple)) = (left, right)
        && couple.iter().any(|m| left.iter().any(|l| l.id == m.id))
    {
        tracing::warn!(spouse = %focus.spouse.id, "ancestor couples overlap, dropping the spouse side");
        right = None;
    }

    let mut visited = HashSet::new();
    for member in left.iter().chain(right.iter()).flatten() {
        visited.insert(member.id.clone());
    }
    let depth = if left.is_some() || right.is_some() { 1 } else { 0 };
    let center_unit = build_unit_guarded(focus.primary, Some(focus.spouse), depth, graph, &mut visited);

    let left_ancestor_couple = left.map(|[a, b]| [a.clone(), b.clone()]);
    let right_ancestor_couple = right.map(|[a, b]| [a.clone(), b.clone()]);
    let layout = build_tree_layout(
        &center_unit,
        left_ancestor_couple.as_ref().map(|c| c.as_slice()),
        right_ancestor_couple.as_ref().map(|c| c.as_slice()),
        config,
    );

    Some(FamilyTree {
        left_ancestor_couple,
        right_ancestor_couple,
        center_unit,
        layout,
    })
}
