//! One server page of a list resource.

use serde::{Deserialize, Serialize};

/// Spring `Page` envelope as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<W> {
    pub content: Vec<W>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// A page of items. The server's page index and totals are authoritative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePage<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

impl<T> ResourcePage<T> {
    /// Everything on a single page (used for resources the backend does not paginate).
    pub fn single(items: Vec<T>) -> Self {
        let total_items = items.len() as u64;
        Self {
            page_size: items.len() as u32,
            items,
            page_index: 0,
            total_pages: 1,
            total_items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }
}

impl<W> PageResponse<W> {
    /// Convert every item, failing on the first one that does not convert.
    pub fn try_map<T, E>(
        self,
        f: impl FnMut(W) -> Result<T, E>,
    ) -> Result<ResourcePage<T>, E> {
        Ok(ResourcePage {
            items: self.content.into_iter().map(f).collect::<Result<_, _>>()?,
            page_index: self.number,
            total_pages: self.total_pages,
            total_items: self.total_elements,
            page_size: self.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_wire_names() {
        let json = r#"{"content":[1,2],"number":1,"size":2,"totalElements":5,"totalPages":3}"#;
        let resp: PageResponse<u32> = serde_json::from_str(json).unwrap();
        let page = resp.try_map(|n| Ok::<_, ()>(n * 10)).unwrap();
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.total_items, 5);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_single_page() {
        let page = ResourcePage::single(vec!["a", "b"]);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }
}
