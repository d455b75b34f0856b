//! Bounded multi-page fetching.
//!
//! The vendor bills per query and pages are walked with a server-issued
//! continuation token, so an unbounded result walk is an operational
//! hazard. The loop here stops at a hard page ceiling and tells the
//! caller, explicitly, when it truncated; a partial set must never look
//! like a complete one.

use crate::vendor::VendorError;
use crate::vendor::response::page_token;
use casefinder_core::RawNode;
use std::collections::HashSet;
use std::future::Future;

/// All pages collected for one logical query.
#[derive(Debug)]
pub struct PagedResult {
    pub pages: Vec<RawNode>,
    /// True when the page ceiling cut the walk short with more pages
    /// still available upstream.
    pub truncated: bool,
}

/// Fetch pages until the vendor stops issuing continuation tokens or the
/// ceiling is reached.
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's token afterwards; pages are requested in strictly increasing
/// order, as the protocol requires. A token the vendor has already issued
/// once ends the walk (repeat tokens would loop forever against a paid
/// service).
pub async fn fetch_bounded<F, Fut>(mut fetch: F, limit: usize) -> Result<PagedResult, VendorError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<RawNode, VendorError>>,
{
    let mut pages = Vec::new();
    let mut token: Option<String> = None;
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut truncated = false;

    loop {
        let page = fetch(token.take()).await?;
        let next = page_token(&page);
        pages.push(page);

        match next {
            None => break,
            Some(next) => {
                if pages.len() >= limit {
                    tracing::warn!(limit, "page ceiling reached with more pages available; truncating");
                    truncated = true;
                    break;
                }
                if !seen_tokens.insert(next.clone()) {
                    tracing::warn!(token = %next, "vendor repeated a continuation token; stopping");
                    break;
                }
                token = Some(next);
            }
        }
    }

    Ok(PagedResult { pages, truncated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn page(next_token: Option<&str>) -> RawNode {
        let mut root = RawNode::new("pd");
        root.attrs.insert("type".to_string(), "search".to_string());
        if let Some(token) = next_token {
            root.children.push(RawNode {
                text: Some(token.to_string()),
                ..RawNode::new("nextpage")
            });
        }
        root
    }

    #[tokio::test]
    async fn test_single_page_query() {
        let calls = RefCell::new(0usize);
        let result = fetch_bounded(
            |token| {
                *calls.borrow_mut() += 1;
                assert!(token.is_none());
                async { Ok(page(None)) }
            },
            10,
        )
        .await
        .unwrap();

        assert_eq!(result.pages.len(), 1);
        assert!(!result.truncated);
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_tokens_chain_in_order() {
        let seen = RefCell::new(Vec::new());
        let result = fetch_bounded(
            |token| {
                seen.borrow_mut().push(token.clone());
                let n = seen.borrow().len();
                async move {
                    Ok(if n < 3 { page(Some(&format!("tok-{}", n + 1))) } else { page(None) })
                }
            },
            10,
        )
        .await
        .unwrap();

        assert_eq!(result.pages.len(), 3);
        assert!(!result.truncated);
        assert_eq!(
            *seen.borrow(),
            vec![None, Some("tok-2".to_string()), Some("tok-3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_ceiling_truncates_endless_vendor() {
        let calls = RefCell::new(0usize);
        let result = fetch_bounded(
            |_token| {
                *calls.borrow_mut() += 1;
                let n = *calls.borrow();
                async move { Ok(page(Some(&format!("tok-{}", n + 1)))) }
            },
            10,
        )
        .await
        .unwrap();

        assert_eq!(*calls.borrow(), 10);
        assert_eq!(result.pages.len(), 10);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn test_repeated_token_stops_the_walk() {
        let calls = RefCell::new(0usize);
        let result = fetch_bounded(
            |_token| {
                *calls.borrow_mut() += 1;
                async { Ok(page(Some("same-token"))) }
            },
            10,
        )
        .await
        .unwrap();

        // First page issues the token, second page repeats it.
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(result.pages.len(), 2);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let result = fetch_bounded(|_token| async { Err(VendorError::Timeout) }, 10).await;
        assert!(matches!(result, Err(VendorError::Timeout)));
    }
}
