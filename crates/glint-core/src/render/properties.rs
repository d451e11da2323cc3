//! Override chain for handler properties.
//!
//! A handler property is looked up in order: the instance's own value, then
//! the template shared by every layer of that type, then a hard-coded
//! default.  Each property struct holds `Option` fields so "not set" is
//! distinguishable from any real value.

/// Returns the first `Some` among `sources`, or `default`.
pub fn resolve<T>(sources: impl IntoIterator<Item = Option<T>>, default: T) -> T {
    sources.into_iter().flatten().next().unwrap_or(default)
}

/// Like [`resolve`], but borrows and clones only the winning value.
pub fn resolve_ref<'a, T: Clone + 'a>(
    sources: impl IntoIterator<Item = Option<&'a T>>,
    default: impl FnOnce() -> T,
) -> T {
    sources
        .into_iter()
        .flatten()
        .next()
        .cloned()
        .unwrap_or_else(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_value_wins() {
        assert_eq!(resolve([Some(1), Some(2)], 3), 1);
    }

    #[test]
    fn test_template_used_when_instance_unset() {
        assert_eq!(resolve([None, Some(2)], 3), 2);
    }

    #[test]
    fn test_default_used_when_nothing_set() {
        assert_eq!(resolve::<i32>([None, None], 3), 3);
    }

    #[test]
    fn test_resolve_ref_clones_winner_only() {
        let template = vec!["a".to_string()];
        let resolved = resolve_ref([None, Some(&template)], Vec::new);
        assert_eq!(resolved, template);
    }
}
