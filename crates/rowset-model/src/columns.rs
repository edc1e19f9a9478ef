//! Column-name resolution.
//!
//! Qualified column names have the form `alias.name`. An identifier matches
//! a column exactly, by alias (`users` matches `users.name`) or by bare name
//! (`name` matches `users.name`). A table never aliases the same name twice,
//! so a second match is an ambiguity, not a preference.

use crate::error::{QueryError, Result};

/// Resolve `ident` against `columns`.
///
/// Returns the unique matching index, `Ok(None)` when nothing matches, and
/// [`QueryError::AmbiguousIdent`] when more than one column matches.
pub fn resolve(columns: &[String], ident: &str) -> Result<Option<usize>> {
    let mut found = None;

    for (index, column) in columns.iter().enumerate() {
        if !matches(column, ident) {
            continue;
        }
        if found.is_some() {
            return Err(QueryError::AmbiguousIdent(ident.to_string()));
        }
        found = Some(index);
    }

    Ok(found)
}

fn matches(column: &str, ident: &str) -> bool {
    if column == ident {
        return true;
    }
    match column.rsplit_once('.') {
        Some((alias, bare)) => alias == ident || bare == ident,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn resolves_exact_alias_and_bare_matches() {
        let cols = columns(&["users.id", "users.name", "hobby"]);

        assert_eq!(resolve(&cols, "users.id").unwrap(), Some(0));
        assert_eq!(resolve(&cols, "name").unwrap(), Some(1));
        assert_eq!(resolve(&cols, "hobby").unwrap(), Some(2));
        assert_eq!(resolve(&cols, "missing").unwrap(), None);
    }

    #[test]
    fn alias_match_requires_a_single_column() {
        let cols = columns(&["users.name"]);
        assert_eq!(resolve(&cols, "users").unwrap(), Some(0));

        let cols = columns(&["users.id", "users.name"]);
        assert_eq!(
            resolve(&cols, "users"),
            Err(QueryError::AmbiguousIdent("users".to_string()))
        );
    }

    #[test]
    fn bare_name_across_aliases_is_ambiguous() {
        let cols = columns(&["users.name", "accounts.name"]);
        assert_eq!(
            resolve(&cols, "name"),
            Err(QueryError::AmbiguousIdent("name".to_string()))
        );
    }
}
