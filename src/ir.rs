use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type MemberId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Parent,
    Child,
    Spouse,
    Sibling,
    Grandparent,
    Grandchild,
}

impl RelationshipType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "parent" => Some(Self::Parent),
            "child" => Some(Self::Child),
            "spouse" => Some(Self::Spouse),
            "sibling" => Some(Self::Sibling),
            "grandparent" => Some(Self::Grandparent),
            "grandchild" => Some(Self::Grandchild),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Biological,
    Adopted,
    Step,
    Guardian,
}

impl RelationshipKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "biological" => Some(Self::Biological),
            "adopted" => Some(Self::Adopted),
            "step" => Some(Self::Step),
            "guardian" => Some(Self::Guardian),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Calendar date with optional month/day precision. Missing parts order first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl Date {
    pub fn new(year: i32, month: Option<u8>, day: Option<u8>) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
            if let Some(day) = self.day {
                write!(f, "-{day:02}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub target: MemberId,
    pub relation: RelationshipType,
    pub kind: Option<RelationshipKind>,
}

impl Relationship {
    pub fn new(target: impl Into<MemberId>, relation: RelationshipType) -> Self {
        Self {
            target: target.into(),
            relation,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Record-keeping fields carried through from the data source untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub bio: Option<String>,
    pub relationships: Vec<Relationship>,
    pub provenance: Provenance,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            nickname: None,
            gender: None,
            birth_date: None,
            death_date: None,
            bio: None,
            relationships: Vec::new(),
            provenance: Provenance::default(),
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_edge(mut self, edge: Relationship) -> Self {
        self.relationships.push(edge);
        self
    }

    pub fn display_name(&self) -> String {
        let given = self
            .nickname
            .as_deref()
            .filter(|nick| !nick.trim().is_empty())
            .unwrap_or(&self.first_name);
        let name = format!("{} {}", given.trim(), self.last_name.trim());
        name.trim().to_string()
    }

    /// Year range such as `1950–2010`, `b. 1950` or `d. 2010`.
    pub fn lifespan(&self) -> Option<String> {
        match (self.birth_date, self.death_date) {
            (Some(birth), Some(death)) => Some(format!("{}–{}", birth.year, death.year)),
            (Some(birth), None) => Some(format!("b. {}", birth.year)),
            (None, Some(death)) => Some(format!("d. {}", death.year)),
            (None, None) => None,
        }
    }

    pub fn edges_of(&self, relation: RelationshipType) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships
            .iter()
            .filter(move |edge| edge.relation == relation)
    }

    pub fn has_edge(&self, relation: RelationshipType) -> bool {
        self.edges_of(relation).next().is_some()
    }

    pub fn parent_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.edges_of(RelationshipType::Parent)
            .map(|edge| edge.target.as_str())
    }

    pub fn child_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.edges_of(RelationshipType::Child)
            .map(|edge| edge.target.as_str())
    }

    pub fn spouse_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.edges_of(RelationshipType::Spouse)
            .map(|edge| edge.target.as_str())
    }

    /// First stored edge pointing at `target`.
    pub fn edge_to(&self, target: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|edge| edge.target == target)
    }

    pub fn has_edge_to(&self, relation: RelationshipType, target: &str) -> bool {
        self.edges_of(relation).any(|edge| edge.target == target)
    }
}

/// Borrowed, id-indexed view over one member snapshot.
#[derive(Debug, Clone)]
pub struct MemberGraph<'a> {
    members: &'a [Member],
    index: HashMap<&'a str, &'a Member>,
}

impl<'a> MemberGraph<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut index = HashMap::with_capacity(members.len());
        for member in members {
            // First occurrence of an id wins.
            index.entry(member.id.as_str()).or_insert(member);
        }
        Self { members, index }
    }

    pub fn members(&self) -> &'a [Member] {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'a Member> {
        self.index.get(id).copied()
    }

    /// First spouse edge whose target exists in the snapshot.
    pub fn resolve_spouse(&self, member: &Member) -> Option<&'a Member> {
        member
            .spouse_ids()
            .filter(|id| *id != member.id)
            .find_map(|id| self.get(id))
    }

    pub fn resolve_parents(&self, member: &Member) -> Vec<&'a Member> {
        member.parent_ids().filter_map(|id| self.get(id)).collect()
    }

    pub fn resolve_children(&self, member: &Member) -> Vec<&'a Member> {
        member.child_ids().filter_map(|id| self.get(id)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitChild {
    Unit(FamilyUnit),
    Leaf(Member),
}

impl UnitChild {
    pub fn member(&self) -> &Member {
        match self {
            UnitChild::Unit(unit) => &unit.partners[0],
            UnitChild::Leaf(member) => member,
        }
    }
}

/// One couple (or single parent) and their ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyUnit {
    pub partners: Vec<Member>,
    pub children: Vec<UnitChild>,
    pub depth: usize,
}

impl FamilyUnit {
    /// Every member in this unit and below, partners before children, depth first.
    pub fn members(&self) -> Vec<&Member> {
        let mut out = Vec::new();
        self.collect_members(&mut out);
        out
    }

    fn collect_members<'a>(&'a self, out: &mut Vec<&'a Member>) {
        out.extend(self.partners.iter());
        for child in &self.children {
            match child {
                UnitChild::Unit(unit) => unit.collect_members(out),
                UnitChild::Leaf(member) => out.push(member),
            }
        }
    }
}
