//! Pluralization for log messages.

/// `"s"` unless `n == 1`.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `plural_count(3, "entry point")` -> `"3 entry points"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "sitemap"), "0 sitemaps");
        assert_eq!(plural_count(1, "sitemap"), "1 sitemap");
        assert_eq!(plural_count(2, "entry point"), "2 entry points");
    }
}
