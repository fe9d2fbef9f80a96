use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

/// Escape character used in generated `LIKE ... ESCAPE` clauses.
const LIKE_ESCAPE: char = '\\';

/// Escape `LIKE` wildcards so user input only ever matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// `LOWER(col) LIKE '%needle%' ESCAPE '\'`, with `needle` bound as a parameter.
pub fn contains_ci<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((col.entity_name(), col))))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Match `needle` as a case-insensitive substring of any of `cols`.
pub fn search_any<C, I>(cols: I, needle: &str) -> Condition
where
    C: ColumnTrait,
    I: IntoIterator<Item = C>,
{
    cols.into_iter()
        .fold(Condition::any(), |cond, col| cond.add(contains_ci(col, needle)))
}
