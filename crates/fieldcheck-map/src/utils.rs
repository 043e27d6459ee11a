//! Utility functions for binding operations.

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Euclidean (L2) distance between two vectors.
///
/// Returns `None` for empty vectors or mismatched dimensions.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Some(sum.sqrt())
}

/// Vector at `idx`, treating a missing or empty vector as no embedding.
pub fn vector_at(vectors: &[Vec<f32>], idx: usize) -> Option<&[f32]> {
    vectors
        .get(idx)
        .map(Vec::as_slice)
        .filter(|vector| !vector.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_unifies_separators() {
        assert_eq!(normalize_text(" ZIP_Code "), "zip code");
        assert_eq!(normalize_text("billing-addr.line/1"), "billing addr line 1");
        assert_eq!(normalize_text("Customer\r\nID"), "customer id");
    }

    #[test]
    fn euclidean_distance_rejects_mismatched_vectors() {
        assert_eq!(euclidean_distance(&[0.0, 3.0], &[4.0, 0.0]), Some(5.0));
        assert_eq!(euclidean_distance(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(euclidean_distance(&[], &[]), None);
    }

    #[test]
    fn vector_at_skips_blank_slots() {
        let vectors = vec![vec![1.0], Vec::new()];
        assert!(vector_at(&vectors, 0).is_some());
        assert!(vector_at(&vectors, 1).is_none());
        assert!(vector_at(&vectors, 2).is_none());
    }
}
