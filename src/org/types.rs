//! Organization node types
//!
//! The hierarchy has three kinds of nodes: the organization root at the
//! top, organizational units grouping things below it, and accounts as
//! leaves. They are carried through the walker as one tagged [`OrgNode`]
//! so the engine, builders, and renderers can treat them uniformly while
//! keeping each variant's named fields.
//!
//! Serialized names follow the provider's wire format: PascalCase fields
//! and a `Type` tag of `ROOT` / `ORGANIZATIONAL_UNIT` / `ACCOUNT`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of hierarchy node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "ROOT")]
    Root,
    #[serde(rename = "ORGANIZATIONAL_UNIT")]
    OrganizationalUnit,
    #[serde(rename = "ACCOUNT")]
    Account,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "ROOT",
            NodeType::OrganizationalUnit => "ORGANIZATIONAL_UNIT",
            NodeType::Account => "ACCOUNT",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The organization root; entry point of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Root {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Root {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arn: None,
            name: None,
        }
    }
}

/// An organizational unit grouping accounts and other units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrgUnit {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OrgUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arn: None,
            name: Some(name.into()),
        }
    }
}

/// A member account; always a leaf of the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Provider status string (ACTIVE, SUSPENDED, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_method: Option<String>,

    /// Serialized as an ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_timestamp: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arn: None,
            name: Some(name.into()),
            email: None,
            status: None,
            joined_method: None,
            joined_timestamp: None,
        }
    }
}

/// Any node of the organization hierarchy.
///
/// The serialized form is internally tagged, so a flattened node reads as
/// one object with a `Type` field next to the variant's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum OrgNode {
    #[serde(rename = "ROOT")]
    Root(Root),
    #[serde(rename = "ORGANIZATIONAL_UNIT")]
    OrganizationalUnit(OrgUnit),
    #[serde(rename = "ACCOUNT")]
    Account(Account),
}

impl OrgNode {
    /// The node's unique identifier
    pub fn id(&self) -> &str {
        match self {
            OrgNode::Root(r) => &r.id,
            OrgNode::OrganizationalUnit(u) => &u.id,
            OrgNode::Account(a) => &a.id,
        }
    }

    /// The node's display name, when the provider returned one
    pub fn name(&self) -> Option<&str> {
        match self {
            OrgNode::Root(r) => r.name.as_deref(),
            OrgNode::OrganizationalUnit(u) => u.name.as_deref(),
            OrgNode::Account(a) => a.name.as_deref(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            OrgNode::Root(_) => NodeType::Root,
            OrgNode::OrganizationalUnit(_) => NodeType::OrganizationalUnit,
            OrgNode::Account(_) => NodeType::Account,
        }
    }

    /// Accounts never have children
    pub fn is_leaf(&self) -> bool {
        matches!(self, OrgNode::Account(_))
    }

    /// Look up an attribute by its provider field name, as used in label
    /// templates (`Id`, `Type`, `Arn`, `Name`, `Email`, `Status`,
    /// `JoinedMethod`, `JoinedTimestamp`).
    pub fn attribute(&self, key: &str) -> Option<String> {
        match key {
            "Id" => Some(self.id().to_string()),
            "Type" => Some(self.node_type().as_str().to_string()),
            "Name" => self.name().map(str::to_string),
            "Arn" => match self {
                OrgNode::Root(r) => r.arn.clone(),
                OrgNode::OrganizationalUnit(u) => u.arn.clone(),
                OrgNode::Account(a) => a.arn.clone(),
            },
            "Email" => match self {
                OrgNode::Account(a) => a.email.clone(),
                _ => None,
            },
            "Status" => match self {
                OrgNode::Account(a) => a.status.clone(),
                _ => None,
            },
            "JoinedMethod" => match self {
                OrgNode::Account(a) => a.joined_method.clone(),
                _ => None,
            },
            "JoinedTimestamp" => match self {
                OrgNode::Account(a) => a.joined_timestamp.map(|t| t.to_rfc3339()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<Root> for OrgNode {
    fn from(root: Root) -> Self {
        OrgNode::Root(root)
    }
}

impl From<OrgUnit> for OrgNode {
    fn from(unit: OrgUnit) -> Self {
        OrgNode::OrganizationalUnit(unit)
    }
}

impl From<Account> for OrgNode {
    fn from(account: Account) -> Self {
        OrgNode::Account(account)
    }
}

impl fmt::Display for OrgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.node_type(), self.id())
    }
}
