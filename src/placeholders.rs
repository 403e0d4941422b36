// src/placeholders.rs
use crate::error::ProposalError;

/// Wrap a token key in the `<<...>>` delimiters templates use.
pub fn token(key: &str) -> String {
    format!("<<{}>>", key)
}

/// Insertion-ordered placeholder mapping. Order matters: substitution is a
/// sequential pass per token, so later entries see text inserted by earlier
/// ones. Re-inserting a token with the same value is a no-op; re-inserting it
/// with a different value fails fast instead of silently picking one.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: String, value: String) -> Result<(), ProposalError> {
        if let Some((_, existing)) = self.entries.iter().find(|(t, _)| *t == token) {
            if *existing == value {
                return Ok(());
            }
            return Err(ProposalError::DuplicatePlaceholder {
                token,
                first: existing.clone(),
                second: value,
            });
        }
        self.entries.push((token, value));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut map = PlaceholderMap::new();
        map.insert(token("B"), "2".to_string()).unwrap();
        map.insert(token("A"), "1".to_string()).unwrap();
        let keys: Vec<&str> = map.iter().map(|(t, _)| t).collect();
        assert_eq!(keys, vec!["<<B>>", "<<A>>"]);
    }

    #[test]
    fn duplicate_with_same_value_is_ignored() {
        let mut map = PlaceholderMap::new();
        map.insert(token("Date"), "01-02-2026".to_string()).unwrap();
        map.insert(token("Date"), "01-02-2026".to_string()).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn duplicate_with_conflicting_value_fails_fast() {
        let mut map = PlaceholderMap::new();
        map.insert(token("Date"), "01-02-2026".to_string()).unwrap();
        let err = map.insert(token("Date"), "02-02-2026".to_string());
        assert!(matches!(
            err,
            Err(ProposalError::DuplicatePlaceholder { .. })
        ));
    }
}
