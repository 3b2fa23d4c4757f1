//! File-backed organization snapshot
//!
//! [`SnapshotOrg`] serves a static organization description through the
//! [`OrgApi`] paging contract. It backs the CLI (walk a snapshot exported
//! to JSON) and the tests, where a page size of 1 exercises pagination the
//! same way the real provider's small pages do. An SDK-backed client would
//! implement the same trait.

use crate::error::{OrgApiError, WalkerError};
use crate::org::api::{OrgApi, Page};
use crate::org::types::{Account, OrgUnit, Root};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default number of items served per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// JSON shape of a snapshot file.
///
/// Units and accounts are keyed by the id of the root or unit directly
/// above them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OrgDescription {
    pub roots: Vec<Root>,
    pub organizational_units: HashMap<String, Vec<OrgUnit>>,
    pub accounts: HashMap<String, Vec<Account>>,
}

/// An [`OrgApi`] implementation over a static snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotOrg {
    desc: OrgDescription,
    page_size: usize,
}

impl SnapshotOrg {
    pub fn new(desc: OrgDescription) -> Self {
        Self {
            desc,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Serve listings in pages of `page_size` items (minimum 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, WalkerError> {
        let desc: OrgDescription = serde_json::from_str(json)?;
        Ok(Self::new(desc))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, WalkerError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn page_of<T: Clone>(&self, items: &[T], token: Option<&str>) -> Result<Page<T>, OrgApiError> {
        let offset: usize = match token {
            None => 0,
            Some(t) => t.parse().map_err(|_| OrgApiError::InvalidToken {
                token: t.to_string(),
            })?,
        };
        if offset > items.len() {
            return Err(OrgApiError::InvalidToken {
                token: offset.to_string(),
            });
        }
        let end = (offset + self.page_size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());
        Ok(Page::new(items[offset..end].to_vec(), next))
    }
}

impl OrgApi for SnapshotOrg {
    fn list_roots(&self, next_token: Option<&str>) -> Result<Page<Root>, OrgApiError> {
        self.page_of(&self.desc.roots, next_token)
    }

    fn list_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrgUnit>, OrgApiError> {
        let units = self
            .desc
            .organizational_units
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.page_of(units, next_token)
    }

    fn list_accounts_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Account>, OrgApiError> {
        let accounts = self
            .desc
            .accounts
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.page_of(accounts, next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::api::{iter_accounts, iter_units};

    fn sample() -> SnapshotOrg {
        let mut desc = OrgDescription {
            roots: vec![Root::new("r-0001")],
            ..Default::default()
        };
        desc.organizational_units.insert(
            "r-0001".into(),
            vec![OrgUnit::new("ou-a", "A"), OrgUnit::new("ou-b", "B")],
        );
        desc.accounts.insert(
            "ou-a".into(),
            vec![
                Account::new("111111111111", "one"),
                Account::new("222222222222", "two"),
                Account::new("333333333333", "three"),
            ],
        );
        SnapshotOrg::new(desc)
    }

    #[test]
    fn test_parse_snapshot_json() {
        let json = r#"{
            "Roots": [{"Id": "r-0001", "Name": "Root"}],
            "OrganizationalUnits": {"r-0001": [{"Id": "ou-a", "Name": "A"}]},
            "Accounts": {"ou-a": [{"Id": "111111111111", "Email": "one@example.com"}]}
        }"#;

        let snapshot = SnapshotOrg::from_json(json).unwrap();
        let roots = snapshot.list_roots(None).unwrap();
        assert_eq!(roots.items.len(), 1);
        assert_eq!(roots.items[0].id, "r-0001");

        let accounts = snapshot.list_accounts_for_parent("ou-a", None).unwrap();
        assert_eq!(accounts.items[0].email.as_deref(), Some("one@example.com"));
    }

    #[test]
    fn test_small_pages_carry_tokens() {
        let snapshot = sample().with_page_size(1);

        let first = snapshot.list_accounts_for_parent("ou-a", None).unwrap();
        assert_eq!(first.items.len(), 1);
        let token = first.next_token.expect("more pages");

        let second = snapshot
            .list_accounts_for_parent("ou-a", Some(&token))
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_token.is_some());
    }

    #[test]
    fn test_iterators_see_all_pages() {
        let snapshot = sample().with_page_size(1);

        let accounts: Vec<_> = iter_accounts(&snapshot, "ou-a")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(accounts.len(), 3);

        let units: Vec<_> = iter_units(&snapshot, "r-0001")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn test_unknown_parent_lists_empty() {
        let snapshot = sample();
        let page = snapshot.list_units_for_parent("ou-missing", None).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_bogus_token_rejected() {
        let snapshot = sample();
        let err = snapshot.list_roots(Some("not-a-number")).unwrap_err();
        assert!(matches!(err, OrgApiError::InvalidToken { .. }));
    }
}
