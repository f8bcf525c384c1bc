//! Catalog search and tag filtering.

use crate::product::Product;

/// Searches products by name or description, case-insensitively.
///
/// A blank term matches everything.
pub fn search_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term)
        })
        .collect()
}

/// Keeps products matching any of the selected filters.
///
/// A product with tags matches when any tag contains any filter
/// (case-insensitive substring). A product without tags falls back to
/// matching the filter against its name. An empty filter list keeps
/// everything.
pub fn filter_by_tags<'a>(products: &'a [Product], filters: &[String]) -> Vec<&'a Product> {
    if filters.is_empty() {
        return products.iter().collect();
    }

    let filters: Vec<String> = filters.iter().map(|f| f.to_lowercase()).collect();

    products
        .iter()
        .filter(|product| match &product.tags {
            Some(tags) if !tags.is_empty() => filters.iter().any(|filter| {
                tags.iter().any(|tag| tag.to_lowercase().contains(filter))
            }),
            _ => filters
                .iter()
                .any(|filter| product.name.to_lowercase().contains(filter)),
        })
        .collect()
}
