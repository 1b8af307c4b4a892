/// Skip/limit applied to `find` after filtering, in insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Window of 1-based `page` with `page_size` items.
    pub fn page(page: usize, page_size: usize) -> Self {
        Self::new()
            .skip(page.saturating_sub(1).saturating_mul(page_size))
            .limit(page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertManyOptions {
    /// Stop at the first failing document instead of inserting the rest
    pub ordered: bool,
}

impl InsertManyOptions {
    pub fn unordered() -> Self {
        Self { ordered: false }
    }
}

impl Default for InsertManyOptions {
    fn default() -> Self {
        Self { ordered: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}
