//! Paginated enumeration boundary
//!
//! The walker never talks to the provider directly; it goes through
//! [`OrgApi`], which exposes the three listing calls with explicit page
//! tokens. [`PageIter`] follows continuation tokens so callers consume one
//! flat sequence regardless of how the remote chose to page the listing.

use crate::error::OrgApiError;
use crate::org::types::{Account, OrgUnit, Root};

/// One page of a remote listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Continuation token; None on the final page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// A final page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

/// Access to the remote Organizations listing calls.
///
/// Implementations are called concurrently from multiple workers and must
/// be safe under that concurrency. Retries, if any, happen inside the
/// implementation; the walker has no retry policy.
pub trait OrgApi: Send + Sync {
    /// List the organization roots
    fn list_roots(&self, next_token: Option<&str>) -> Result<Page<Root>, OrgApiError>;

    /// List the organizational units directly under a root or unit
    fn list_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrgUnit>, OrgApiError>;

    /// List the accounts directly under a root or unit
    fn list_accounts_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Account>, OrgApiError>;
}

/// Lazy iterator over a paginated listing call.
///
/// Fetches the first page on the first `next()` and follows continuation
/// tokens until the remote reports no more pages. No fixed page size or
/// item-count cap is assumed; empty intermediate pages are skipped. After
/// an error the iterator is fused.
pub struct PageIter<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, OrgApiError>,
{
    fetch: F,
    buffer: std::vec::IntoIter<T>,
    next_token: Option<String>,
    started: bool,
    failed: bool,
}

impl<T, F> PageIter<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, OrgApiError>,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            buffer: Vec::new().into_iter(),
            next_token: None,
            started: false,
            failed: false,
        }
    }
}

impl<T, F> Iterator for PageIter<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, OrgApiError>,
{
    type Item = Result<T, OrgApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }
            if self.started && self.next_token.is_none() {
                return None;
            }
            match (self.fetch)(self.next_token.as_deref()) {
                Ok(page) => {
                    self.started = true;
                    self.next_token = page.next_token;
                    self.buffer = page.items.into_iter();
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Iterate every organization root
pub fn iter_roots<A>(api: &A) -> impl Iterator<Item = Result<Root, OrgApiError>> + '_
where
    A: OrgApi + ?Sized,
{
    PageIter::new(move |token| api.list_roots(token))
}

/// Iterate every organizational unit directly under `parent_id`
pub fn iter_units<'a, A>(
    api: &'a A,
    parent_id: &'a str,
) -> impl Iterator<Item = Result<OrgUnit, OrgApiError>> + 'a
where
    A: OrgApi + ?Sized,
{
    PageIter::new(move |token| api.list_units_for_parent(parent_id, token))
}

/// Iterate every account directly under `parent_id`
pub fn iter_accounts<'a, A>(
    api: &'a A,
    parent_id: &'a str,
) -> impl Iterator<Item = Result<Account, OrgApiError>> + 'a
where
    A: OrgApi + ?Sized,
{
    PageIter::new(move |token| api.list_accounts_for_parent(parent_id, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn paged(values: &[u32], page_size: usize, token: Option<&str>) -> Result<Page<u32>, OrgApiError> {
        let offset: usize = match token {
            None => 0,
            Some(t) => t.parse().map_err(|_| OrgApiError::InvalidToken {
                token: t.to_string(),
            })?,
        };
        let end = (offset + page_size).min(values.len());
        let next = (end < values.len()).then(|| end.to_string());
        Ok(Page::new(values[offset..end].to_vec(), next))
    }

    #[test]
    fn test_page_iter_joins_pages() {
        let values = [1u32, 2, 3, 4, 5];
        let items: Vec<u32> = PageIter::new(|token| paged(&values, 2, token))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_page_iter_empty_listing() {
        let values: [u32; 0] = [];
        let items: Vec<u32> = PageIter::new(|token| paged(&values, 2, token))
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_page_iter_is_lazy() {
        let calls = Cell::new(0u32);
        let values = [1u32, 2, 3, 4];
        let mut iter = PageIter::new(|token| {
            calls.set(calls.get() + 1);
            paged(&values, 2, token)
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(iter.next().unwrap().unwrap(), 1);
        assert_eq!(iter.next().unwrap().unwrap(), 2);
        // Second page not fetched until its first item is consumed
        assert_eq!(calls.get(), 1);
        assert_eq!(iter.next().unwrap().unwrap(), 3);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_page_iter_skips_empty_intermediate_pages() {
        let pages = vec![
            Page::new(vec![1u32], Some("a".into())),
            Page::new(Vec::new(), Some("b".into())),
            Page::last(vec![2]),
        ];
        let served = Cell::new(0usize);
        let items: Vec<u32> = PageIter::new(|_token| {
            let page = pages[served.get()].clone();
            served.set(served.get() + 1);
            Ok(page)
        })
        .collect::<Result<_, _>>()
        .unwrap();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(served.get(), 3);
    }

    #[test]
    fn test_page_iter_fuses_after_error() {
        let mut iter = PageIter::new(|_token| {
            Err::<Page<u32>, _>(OrgApiError::Throttled {
                message: "rate exceeded".into(),
            })
        });

        assert!(matches!(
            iter.next(),
            Some(Err(OrgApiError::Throttled { .. }))
        ));
        assert!(iter.next().is_none());
    }
}
