/// Split `items` into consecutive pages of `page_size` elements.
///
/// The last page holds the remainder and is never padded. The input is only
/// borrowed. A `page_size` of zero means "unpaginated": the whole list comes
/// back as a single page.
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    if page_size == 0 {
        return vec![items.to_vec()];
    }

    items.chunks(page_size).map(<[T]>::to_vec).collect()
}
