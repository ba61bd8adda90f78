//! Relationship labels from one member's point of view.
//!
//! Only parent, child and spouse edges are stored. Siblings, in-laws and
//! grandparents are derived from those edges on demand, in a fixed order of
//! precedence: direct edge, sibling, sibling's spouse, grandparent, grandchild,
//! spouse's parent.

use std::collections::HashSet;
use std::fmt;

use crate::config::LabelConfig;
use crate::ir::{Gender, Member, MemberGraph, RelationshipKind, RelationshipType};

/// Typed outcome of relationship resolution. `Display` yields the label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Yourself,
    Parent(Option<RelationshipKind>, Gender),
    Child(Option<RelationshipKind>, Gender),
    Spouse,
    Sibling(Gender),
    SiblingInLaw(Gender),
    Grandparent(Gender),
    Grandchild(Gender),
    ParentInLaw(Gender),
    Family,
}

impl Relation {
    pub fn label(&self) -> &'static str {
        use Gender::{Female, Male};
        use RelationshipKind::{Adopted, Biological, Guardian, Step};
        match *self {
            Relation::Yourself => "You",
            Relation::Parent(Some(Guardian), _) => "Guardian",
            Relation::Parent(Some(Step), Male) => "Stepdad",
            Relation::Parent(Some(Step), Female) => "Stepmom",
            Relation::Parent(Some(Adopted), Male) => "Adoptive Dad",
            Relation::Parent(Some(Adopted), Female) => "Adoptive Mom",
            Relation::Parent(None | Some(Biological), Male) => "Dad",
            Relation::Parent(None | Some(Biological), Female) => "Mom",
            Relation::Child(Some(Guardian), _) => "Ward",
            Relation::Child(Some(Step), Male) => "Stepson",
            Relation::Child(Some(Step), Female) => "Stepdaughter",
            Relation::Child(Some(Adopted), Male) => "Adopted Son",
            Relation::Child(Some(Adopted), Female) => "Adopted Daughter",
            Relation::Child(None | Some(Biological), Male) => "Son",
            Relation::Child(None | Some(Biological), Female) => "Daughter",
            Relation::Spouse => "Spouse",
            Relation::Sibling(Male) => "Brother",
            Relation::Sibling(Female) => "Sister",
            Relation::SiblingInLaw(Male) => "Brother-in-law",
            Relation::SiblingInLaw(Female) => "Sister-in-law",
            Relation::Grandparent(Male) => "Grandpa",
            Relation::Grandparent(Female) => "Grandma",
            Relation::Grandchild(Male) => "Grandson",
            Relation::Grandchild(Female) => "Granddaughter",
            Relation::ParentInLaw(Male) => "Father-in-law",
            Relation::ParentInLaw(Female) => "Mother-in-law",
            Relation::Family => "Family",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn relationship_label(observer_id: &str, target_id: &str, members: &[Member]) -> String {
    let graph = MemberGraph::new(members);
    resolve_relation(observer_id, target_id, &graph, &LabelConfig::default()).to_string()
}

pub fn relationship_label_with(
    observer_id: &str,
    target_id: &str,
    graph: &MemberGraph<'_>,
    config: &LabelConfig,
) -> String {
    resolve_relation(observer_id, target_id, graph, config).to_string()
}

/// Labels for every member of the snapshot, in stored order, as seen by `observer_id`.
pub fn relationship_labels<'a>(
    observer_id: &str,
    graph: &MemberGraph<'a>,
    config: &LabelConfig,
) -> Vec<(&'a Member, Relation)> {
    graph
        .members()
        .iter()
        .map(|member| (member, resolve_relation(observer_id, &member.id, graph, config)))
        .collect()
}

pub fn resolve_relation(
    observer_id: &str,
    target_id: &str,
    graph: &MemberGraph<'_>,
    config: &LabelConfig,
) -> Relation {
    if observer_id == target_id {
        return Relation::Yourself;
    }
    let (Some(observer), Some(target)) = (graph.get(observer_id), graph.get(target_id)) else {
        return Relation::Family;
    };
    let gender = target.gender.unwrap_or(config.unset_gender);

    if let Some(edge) = observer.edge_to(target_id) {
        return match edge.relation {
            RelationshipType::Parent => Relation::Parent(edge.kind, gender),
            RelationshipType::Child => Relation::Child(edge.kind, gender),
            RelationshipType::Spouse => Relation::Spouse,
            RelationshipType::Sibling => Relation::Sibling(gender),
            RelationshipType::Grandparent => Relation::Grandparent(gender),
            RelationshipType::Grandchild => Relation::Grandchild(gender),
        };
    }

    if shares_parent(observer, target) {
        return Relation::Sibling(gender);
    }

    let siblings = siblings_in(observer, graph);
    if siblings
        .iter()
        .any(|sibling| sibling.has_edge_to(RelationshipType::Spouse, target_id))
    {
        return Relation::SiblingInLaw(gender);
    }

    if graph
        .resolve_parents(observer)
        .iter()
        .any(|parent| parent.has_edge_to(RelationshipType::Parent, target_id))
    {
        return Relation::Grandparent(gender);
    }

    if graph
        .resolve_children(observer)
        .iter()
        .any(|child| child.has_edge_to(RelationshipType::Child, target_id))
    {
        return Relation::Grandchild(gender);
    }

    let is_parent_in_law = observer
        .spouse_ids()
        .filter_map(|id| graph.get(id))
        .any(|spouse| spouse.has_edge_to(RelationshipType::Parent, target_id));
    if is_parent_in_law {
        return Relation::ParentInLaw(gender);
    }

    Relation::Family
}

/// Every other member sharing at least one stored parent id with `member_id`.
pub fn siblings_of<'a>(member_id: &str, members: &'a [Member]) -> Vec<&'a Member> {
    let graph = MemberGraph::new(members);
    match graph.get(member_id) {
        Some(subject) => siblings_in(subject, &graph),
        None => Vec::new(),
    }
}

fn siblings_in<'a>(subject: &Member, graph: &MemberGraph<'a>) -> Vec<&'a Member> {
    let parents: HashSet<&str> = subject.parent_ids().collect();
    if parents.is_empty() {
        return Vec::new();
    }
    graph
        .members()
        .iter()
        .filter(|candidate| candidate.id != subject.id)
        .filter(|candidate| candidate.parent_ids().any(|id| parents.contains(id)))
        .collect()
}

fn shares_parent(a: &Member, b: &Member) -> bool {
    let parents: HashSet<&str> = a.parent_ids().collect();
    b.parent_ids().any(|id| parents.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Relationship;

    fn edge(target: &str, relation: RelationshipType) -> Relationship {
        Relationship::new(target, relation)
    }

    /// gp1+gp2 -> dad (+ mom, whose parents are mgp1+mgp2) -> kid1, kid2; kid1 married to kid1s.
    fn family() -> Vec<Member> {
        vec![
            Member::new("gp1", "George", "Smith")
                .with_gender(Gender::Male)
                .with_edge(edge("gp2", RelationshipType::Spouse))
                .with_edge(edge("dad", RelationshipType::Child)),
            Member::new("gp2", "Greta", "Smith")
                .with_gender(Gender::Female)
                .with_edge(edge("gp1", RelationshipType::Spouse))
                .with_edge(edge("dad", RelationshipType::Child)),
            Member::new("mgp1", "Walter", "Jones")
                .with_gender(Gender::Male)
                .with_edge(edge("mom", RelationshipType::Child)),
            Member::new("dad", "David", "Smith")
                .with_gender(Gender::Male)
                .with_edge(edge("gp1", RelationshipType::Parent))
                .with_edge(edge("gp2", RelationshipType::Parent))
                .with_edge(edge("mom", RelationshipType::Spouse))
                .with_edge(edge("kid1", RelationshipType::Child))
                .with_edge(edge("kid2", RelationshipType::Child)),
            Member::new("mom", "Mary", "Smith")
                .with_gender(Gender::Female)
                .with_edge(edge("mgp1", RelationshipType::Parent))
                .with_edge(edge("dad", RelationshipType::Spouse))
                .with_edge(edge("kid1", RelationshipType::Child))
                .with_edge(edge("kid2", RelationshipType::Child)),
            Member::new("kid1", "Kate", "Smith")
                .with_gender(Gender::Female)
                .with_edge(edge("dad", RelationshipType::Parent))
                .with_edge(edge("mom", RelationshipType::Parent))
                .with_edge(edge("kid1s", RelationshipType::Spouse)),
            Member::new("kid2", "Ken", "Smith")
                .with_edge(edge("dad", RelationshipType::Parent)),
            Member::new("kid1s", "Sam", "Lee")
                .with_gender(Gender::Male)
                .with_edge(edge("kid1", RelationshipType::Spouse)),
        ]
    }

    #[test]
    fn self_is_you_even_when_absent() {
        let members = family();
        assert_eq!(relationship_label("dad", "dad", &members), "You");
        assert_eq!(relationship_label("nobody", "nobody", &members), "You");
    }

    #[test]
    fn unknown_ids_fall_back_to_family() {
        let members = family();
        assert_eq!(relationship_label("dad", "ghost", &members), "Family");
        assert_eq!(relationship_label("ghost", "dad", &members), "Family");
    }

    #[test]
    fn direct_edges_are_gendered() {
        let members = family();
        assert_eq!(relationship_label("kid1", "dad", &members), "Dad");
        assert_eq!(relationship_label("kid1", "mom", &members), "Mom");
        assert_eq!(relationship_label("dad", "kid1", &members), "Daughter");
        assert_eq!(relationship_label("dad", "mom", &members), "Spouse");
    }

    #[test]
    fn unset_gender_uses_configured_branch() {
        let members = family();
        assert_eq!(relationship_label("dad", "kid2", &members), "Son");
        let graph = MemberGraph::new(&members);
        let config = LabelConfig {
            unset_gender: Gender::Female,
        };
        assert_eq!(relationship_label_with("dad", "kid2", &graph, &config), "Daughter");
    }

    #[test]
    fn edge_kinds_change_the_label() {
        let members = vec![
            Member::new("a", "A", "X")
                .with_edge(edge("p1", RelationshipType::Parent).with_kind(RelationshipKind::Step))
                .with_edge(edge("p2", RelationshipType::Parent).with_kind(RelationshipKind::Adopted))
                .with_edge(edge("p3", RelationshipType::Parent).with_kind(RelationshipKind::Guardian))
                .with_edge(edge("c1", RelationshipType::Child).with_kind(RelationshipKind::Step))
                .with_edge(edge("c2", RelationshipType::Child).with_kind(RelationshipKind::Adopted))
                .with_edge(edge("c3", RelationshipType::Child).with_kind(RelationshipKind::Guardian))
                .with_edge(edge("p4", RelationshipType::Parent).with_kind(RelationshipKind::Biological)),
            Member::new("p1", "P1", "X").with_gender(Gender::Female),
            Member::new("p2", "P2", "X").with_gender(Gender::Male),
            Member::new("p3", "P3", "X").with_gender(Gender::Female),
            Member::new("p4", "P4", "X").with_gender(Gender::Female),
            Member::new("c1", "C1", "X").with_gender(Gender::Male),
            Member::new("c2", "C2", "X").with_gender(Gender::Female),
            Member::new("c3", "C3", "X").with_gender(Gender::Male),
        ];
        assert_eq!(relationship_label("a", "p1", &members), "Stepmom");
        assert_eq!(relationship_label("a", "p2", &members), "Adoptive Dad");
        assert_eq!(relationship_label("a", "p3", &members), "Guardian");
        assert_eq!(relationship_label("a", "p4", &members), "Mom");
        assert_eq!(relationship_label("a", "c1", &members), "Stepson");
        assert_eq!(relationship_label("a", "c2", &members), "Adopted Daughter");
        assert_eq!(relationship_label("a", "c3", &members), "Ward");
    }

    #[test]
    fn legacy_derived_edges_are_still_labelled() {
        let members = vec![
            Member::new("a", "A", "X")
                .with_edge(edge("b", RelationshipType::Sibling))
                .with_edge(edge("c", RelationshipType::Grandparent))
                .with_edge(edge("d", RelationshipType::Grandchild)),
            Member::new("b", "B", "X").with_gender(Gender::Female),
            Member::new("c", "C", "X").with_gender(Gender::Female),
            Member::new("d", "D", "X").with_gender(Gender::Male),
        ];
        assert_eq!(relationship_label("a", "b", &members), "Sister");
        assert_eq!(relationship_label("a", "c", &members), "Grandma");
        assert_eq!(relationship_label("a", "d", &members), "Grandson");
    }

    #[test]
    fn derived_relations() {
        let members = family();
        assert_eq!(relationship_label("kid2", "kid1", &members), "Sister");
        assert_eq!(relationship_label("kid1", "kid2", &members), "Brother");
        assert_eq!(relationship_label("kid2", "kid1s", &members), "Brother-in-law");
        assert_eq!(relationship_label("kid1", "gp2", &members), "Grandma");
        assert_eq!(relationship_label("kid1", "mgp1", &members), "Grandpa");
        assert_eq!(relationship_label("gp1", "kid2", &members), "Grandson");
        assert_eq!(relationship_label("mgp1", "gp1", &members), "Family");
        assert_eq!(relationship_label("dad", "mgp1", &members), "Father-in-law");
        assert_eq!(relationship_label("kid1s", "gp1", &members), "Family");
    }

    #[test]
    fn grandchild_needs_child_edges_on_both_hops() {
        let mut members = family();
        members[5] = members[5]
            .clone()
            .with_edge(edge("gk", RelationshipType::Child));
        members.push(Member::new("gk", "Gina", "Lee").with_gender(Gender::Female));
        assert_eq!(relationship_label("dad", "gk", &members), "Granddaughter");
        assert_eq!(relationship_label("kid2", "gk", &members), "Family");
    }

    #[test]
    fn siblings_are_symmetric_and_exclude_self() {
        let members = family();
        for member in &members {
            let siblings = siblings_of(&member.id, &members);
            assert!(siblings.iter().all(|s| s.id != member.id));
            for sibling in siblings {
                let back = siblings_of(&sibling.id, &members);
                assert!(
                    back.iter().any(|m| m.id == member.id),
                    "{} -> {} not symmetric",
                    member.id,
                    sibling.id
                );
            }
        }
        let ids: Vec<&str> = siblings_of("kid2", &members)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["kid1"]);
        assert!(siblings_of("ghost", &members).is_empty());
        assert!(siblings_of("gp1", &members).is_empty());
    }

    #[test]
    fn bulk_labels_follow_stored_order() {
        let members = family();
        let graph = MemberGraph::new(&members);
        let labels = relationship_labels("kid1", &graph, &LabelConfig::default());
        assert_eq!(labels.len(), members.len());
        assert_eq!(labels[0].0.id, "gp1");
        assert_eq!(labels[5].1, Relation::Yourself);
    }
}
