//! Hook name classification

use std::fmt;

use crate::state::Relation;

/// What a hook invocation means for the persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    /// `<relation>-relation-joined` or `-changed`
    RelationJoined(Relation),
    /// `<relation>-relation-departed` or `-broken`
    RelationDeparted(Relation),
    /// `upgrade-charm`: everything gets re-applied
    UpgradeCharm,
    /// Any other hook; only the derived flags drive the dispatch
    Other(String),
}

impl HookEvent {
    pub fn parse(name: &str) -> Self {
        if name == "upgrade-charm" {
            return HookEvent::UpgradeCharm;
        }

        if let Some((relation, phase)) = name.split_once("-relation-") {
            if let Some(relation) = Relation::from_name(relation) {
                match phase {
                    "joined" | "changed" => return HookEvent::RelationJoined(relation),
                    "departed" | "broken" => return HookEvent::RelationDeparted(relation),
                    _ => {}
                }
            }
        }

        HookEvent::Other(name.to_string())
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::RelationJoined(r) => write!(f, "{}-relation-joined", r.name()),
            HookEvent::RelationDeparted(r) => write!(f, "{}-relation-departed", r.name()),
            HookEvent::UpgradeCharm => f.write_str("upgrade-charm"),
            HookEvent::Other(name) => f.write_str(name),
        }
    }
}
