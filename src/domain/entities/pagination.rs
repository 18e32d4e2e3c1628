/// Page arithmetic for a filtered row set. `page` is 1-based and always
/// within `1..=total_pages()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total: usize,
}

pub const PAGE_WINDOW: usize = 5;

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.set_page(self.page);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Half-open `[start, end)` range of the current page within the total.
    pub fn slice_bounds(&self) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.page_size).min(self.total);
        let end = start.saturating_add(self.page_size).min(self.total);
        (start, end)
    }

    /// "Showing a-b of n" footer text; empty when there is nothing to show.
    pub fn range_label(&self) -> String {
        let (start, end) = self.slice_bounds();
        if start == end {
            return String::new();
        }
        format!("Showing {}-{} of {} results", start + 1, end, self.total)
    }

    /// Up to five page numbers centred on the current page.
    pub fn page_window(&self) -> Vec<usize> {
        let total_pages = self.total_pages();
        let width = PAGE_WINDOW.min(total_pages);
        let first = if total_pages <= PAGE_WINDOW || self.page <= 3 {
            1
        } else if self.page + 2 >= total_pages {
            total_pages + 1 - PAGE_WINDOW
        } else {
            self.page - 2
        };
        (first..first + width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn total_pages_rounds_up_and_never_drops_below_one() {
        let mut pagination = Pagination::new(20);
        assert_eq!(pagination.total_pages(), 1);
        pagination.set_total(45);
        assert_eq!(pagination.total_pages(), 3);
        pagination.set_total(40);
        assert_eq!(pagination.total_pages(), 2);
    }

    #[test]
    fn set_page_clamps_to_last_page() {
        let mut pagination = Pagination::new(20);
        pagination.set_total(45);
        pagination.set_page(5);
        assert_eq!(pagination.page(), 3);
        pagination.set_page(0);
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn shrinking_total_pulls_page_back_in_range() {
        let mut pagination = Pagination::new(10);
        pagination.set_total(100);
        pagination.set_page(10);
        pagination.set_total(15);
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut pagination = Pagination::new(10);
        pagination.set_total(100);
        pagination.set_page(4);
        pagination.set_page_size(25);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.total_pages(), 4);
    }

    #[test]
    fn slice_bounds_clamp_to_total() {
        let mut pagination = Pagination::new(20);
        pagination.set_total(57);
        pagination.set_page(3);
        assert_eq!(pagination.slice_bounds(), (40, 57));
        assert_eq!(pagination.range_label(), "Showing 41-57 of 57 results");
    }

    #[test]
    fn empty_set_has_empty_slice() {
        let pagination = Pagination::new(20);
        assert_eq!(pagination.slice_bounds(), (0, 0));
        assert_eq!(pagination.range_label(), "");
    }

    #[test]
    fn page_window_follows_current_page() {
        let mut pagination = Pagination::new(10);
        pagination.set_total(100);
        assert_eq!(pagination.page_window(), vec![1, 2, 3, 4, 5]);
        pagination.set_page(6);
        assert_eq!(pagination.page_window(), vec![4, 5, 6, 7, 8]);
        pagination.set_page(10);
        assert_eq!(pagination.page_window(), vec![6, 7, 8, 9, 10]);
        pagination.set_total(25);
        assert_eq!(pagination.page_window(), vec![1, 2, 3]);
    }

    proptest! {
        #[test]
        fn page_always_within_bounds(
            page_size in 1usize..50,
            total in 0usize..1000,
            ops in proptest::collection::vec((0u8..3, 0usize..200), 0..20),
        ) {
            let mut pagination = Pagination::new(page_size);
            pagination.set_total(total);
            for (op, arg) in ops {
                match op {
                    0 => pagination.set_page(arg),
                    1 => pagination.set_total(arg * 3),
                    _ => pagination.set_page_size(arg),
                }
                let expected = pagination.total().div_ceil(pagination.page_size()).max(1);
                prop_assert_eq!(pagination.total_pages(), expected);
                prop_assert!(pagination.page() >= 1);
                prop_assert!(pagination.page() <= pagination.total_pages());
                let (start, end) = pagination.slice_bounds();
                prop_assert!(start <= end && end <= pagination.total());
            }
        }
    }
}
