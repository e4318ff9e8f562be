//! SQL text helpers shared by both backends.
//!
//! Placeholder rewriting is plain positional substitution: every `?` in the
//! template becomes `$n`, including one that sits inside a string literal or
//! a comment. Templates must not contain a literal `?`; a violation surfaces
//! as a driver error, exactly like a hand-written bad query.

/// Rewrites `?` placeholders to `$1, $2, …` in first-seen order.
pub fn rewrite_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0usize;

    for ch in sql.chars() {
        if ch == '?' {
            index += 1;
            out.push('$');
            out.push_str(&index.to_string());
        } else {
            out.push(ch);
        }
    }

    out
}

pub fn count_placeholders(sql: &str) -> usize {
    sql.chars().filter(|c| *c == '?').count()
}

pub fn is_insert(sql: &str) -> bool {
    starts_with_keyword(sql.trim_start(), "INSERT")
}

pub fn has_returning(sql: &str) -> bool {
    sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word.eq_ignore_ascii_case("RETURNING"))
}

/// Full networked-backend translation: placeholders plus `RETURNING id` on
/// inserts that do not already ask for something back.
pub fn to_postgres(sql: &str) -> String {
    let rewritten = rewrite_placeholders(sql);

    if !is_insert(&rewritten) || has_returning(&rewritten) {
        return rewritten;
    }

    let body = rewritten.trim_end().trim_end_matches(';').trim_end();
    format!("{body} RETURNING id")
}

pub fn chunk_statements(batch: &str) -> impl Iterator<Item = &str> {
    batch.split(';').map(str::trim).filter(|s| !s.is_empty())
}

fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    sql.len() >= keyword.len()
        && sql.is_char_boundary(keyword.len())
        && sql[..keyword.len()].eq_ignore_ascii_case(keyword)
}
