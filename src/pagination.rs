//! Page arithmetic for the fixed-size result pages

/// Items requested per fetch
pub const PAGE_SIZE: u32 = 15;

/// Number of pages needed to cover `total_hits` results
pub fn total_pages(total_hits: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_hits.div_ceil(u64::from(page_size))
}

/// Whether another page exists after `page`
pub fn has_more(page: u32, total_hits: u64, page_size: u32) -> bool {
    u64::from(page) < total_pages(total_hits, page_size)
}
