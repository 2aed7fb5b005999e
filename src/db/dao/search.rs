use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

const LIKE_ESCAPE: char = '\\';

/// The case-folded form of a name, stored next to it on write. SQLite's
/// `LOWER()` folds ASCII only, so folding stays on this side.
pub fn search_key(name: &str) -> String {
    name.to_lowercase()
}

/// "`column` contains `term`" over a column holding [`search_key`] values,
/// which makes the match case-insensitive for any script.
///
/// `%`, `_` and the escape character in `term` match literally. An empty
/// term matches every row.
pub fn name_contains<C>(column: C, term: &str) -> Condition
where
    C: ColumnTrait,
{
    let pattern = format!("%{}%", escape_like(&search_key(term)));
    Condition::all().add(column.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_like, search_key};

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
    }

    #[test]
    fn folds_non_ascii_capitals() {
        assert_eq!(search_key("École de Musique"), "école de musique");
        assert_eq!(search_key("ÉCOLE"), search_key("école"));
    }

    #[test]
    fn leaves_plain_terms_alone() {
        assert_eq!(escape_like("musical hop"), "musical hop");
    }
}
