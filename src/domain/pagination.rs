// Pagination cursor over an ordered, fixed collection
use serde::Serialize;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone)]
pub struct PageCursor<T> {
    items: Vec<T>,
    page_size: NonZeroUsize,
    page_index: usize,
}

impl<T> PageCursor<T> {
    pub fn new(items: Vec<T>, page_size: NonZeroUsize) -> Self {
        Self {
            items,
            page_size,
            page_index: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size.get())
    }

    /// The items of the current page, clamped to the collection; empty past the end.
    pub fn current_page(&self) -> &[T] {
        let start = self.page_index.saturating_mul(self.page_size.get()).min(self.items.len());
        let end = start.saturating_add(self.page_size.get()).min(self.items.len());
        &self.items[start..end]
    }

    pub fn has_next(&self) -> bool {
        (self.page_index + 1).saturating_mul(self.page_size.get()) < self.items.len()
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    /// Advance one page. No-op on the last page.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on the first page.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Swap in a new collection; the page offset goes back to zero.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.reset();
    }
}

impl<T: Clone> PageCursor<T> {
    pub fn page(&self) -> Page<T> {
        Page {
            items: self.current_page().to_vec(),
            page_index: self.page_index,
            page_size: self.page_size.get(),
            page_count: self.page_count(),
            total: self.items.len(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(len: usize, page_size: usize) -> PageCursor<usize> {
        PageCursor::new((0..len).collect(), NonZeroUsize::new(page_size).unwrap())
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let mut cursor = cursor(25, 10);
        assert_eq!(cursor.current_page(), (0..10).collect::<Vec<_>>().as_slice());

        assert!(cursor.next());
        assert!(cursor.next());
        assert_eq!(cursor.page_index(), 2);
        assert_eq!(cursor.current_page(), &[20, 21, 22, 23, 24]);

        assert!(!cursor.next());
        assert_eq!(cursor.page_index(), 2);
        assert!(!cursor.next());
        assert_eq!(cursor.page_index(), 2);
        assert_eq!(cursor.current_page().len(), 5);
    }

    #[test]
    fn test_prev_stops_at_first_page() {
        let mut cursor = cursor(25, 10);
        assert!(!cursor.prev());
        assert_eq!(cursor.page_index(), 0);

        cursor.next();
        assert!(cursor.prev());
        assert_eq!(cursor.page_index(), 0);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_page() {
        let mut cursor = cursor(20, 10);
        cursor.next();
        assert!(!cursor.has_next());
        assert!(!cursor.next());
        assert_eq!(cursor.page_count(), 2);
    }

    #[test]
    fn test_empty_collection() {
        let mut cursor = cursor(0, 10);
        assert!(cursor.current_page().is_empty());
        assert!(!cursor.next());
        assert_eq!(cursor.page_count(), 0);
    }

    #[test]
    fn test_replace_resets_offset() {
        let mut cursor = cursor(25, 10);
        cursor.next();
        cursor.next();

        cursor.replace(vec![100, 101, 102]);

        assert_eq!(cursor.page_index(), 0);
        assert_eq!(cursor.current_page(), &[100, 101, 102]);
    }

    #[test]
    fn test_page_snapshot() {
        let mut cursor = cursor(25, 10);
        cursor.next();

        let page = cursor.page();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0], 10);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total, 25);
        assert!(page.has_prev);
        assert!(page.has_next);
    }
}
