/// Records that can be matched by the free-text search box of a list view.
pub trait Searchable {
    /// Fields the query is matched against. Missing fields are skipped.
    fn search_fields(&self) -> Vec<&str>;
}

/// Returns the records whose searchable fields contain `query`,
/// case-insensitively. Input order is preserved; a blank query keeps
/// everything.
pub fn filter_records<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
