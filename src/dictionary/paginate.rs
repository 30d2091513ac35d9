//! Result pagination with forgiving fallbacks: a request for a page that
//! is missing, malformed or out of range never fails, it lands on the
//! nearest valid page.

use serde::Serialize;

/// Metadata describing one page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number actually served
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// One page sliced out of an ordered result list
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Slice `items` into the requested page.
///
/// `requested` is the raw query-string value: absent or unparseable values
/// fall back to page 1, values past the end clamp to the last page. An empty
/// input yields an empty page numbered 1 with a single total page.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested: Option<&str>) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = if total_items == 0 {
        1
    } else {
        (total_items + page_size - 1) / page_size
    };

    let number = match requested.map(str::trim) {
        Some(s) => match s.parse::<usize>() {
            Ok(n) if n >= 1 => n.min(total_pages),
            // A digit string too large for the integer type is still a
            // number past the end, not a malformed page
            Err(_) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => total_pages,
            _ => 1,
        },
        None => 1,
    };

    let start = (number - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = if start >= total_items {
        Vec::new()
    } else {
        items[start..end].to_vec()
    };

    Page {
        items,
        info: PageInfo {
            number,
            total_pages,
            total_items,
            has_previous: number > 1,
            has_next: number < total_pages,
        },
    }
}
