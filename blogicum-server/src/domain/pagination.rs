use super::error::DomainError;

/// A 1-based page request. Page `0` is rejected; pages past the end are
/// valid and simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl Pagination {
    pub(crate) fn new(page: u32, page_size: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::Validation {
                field: "page",
                message: "must be >= 1",
            });
        }
        if page_size == 0 {
            return Err(DomainError::Validation {
                field: "page_size",
                message: "must be >= 1",
            });
        }
        Ok(Self { page, page_size })
    }

    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total_items: i64,
    pub(crate) total_pages: u32,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, pagination: Pagination, total_items: i64) -> Self {
        let total_items = total_items.max(0);
        let page_size = i64::from(pagination.page_size);
        let total_pages = (total_items + page_size - 1) / page_size;

        Self {
            items,
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.page > 1
    }
}
