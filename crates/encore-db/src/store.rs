//! Generic record operations shared by every entity.
//!
//! These are thin wrappers over sea-orm so the booking core speaks in terms
//! of "fetch by id", "filter by foreign key" and so on, whether it runs on a
//! pooled connection or inside a `DatabaseTransaction`.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder,
    Select,
};

/// Escape character for `LIKE` patterns; needs no quoting in any dialect.
const LIKE_ESCAPE: char = '!';

/// Build a `LIKE` pattern matching `term` anywhere, lowercased, with the
/// wildcard characters of the term escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .to_lowercase()
        .replace('!', "!!")
        .replace('%', "!%")
        .replace('_', "!_");
    format!("%{escaped}%")
}

/// `lower(column) LIKE '%term%'`, portable across Postgres and SQLite.
pub fn contains_ci<T: IntoColumnRef>(column: T, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(like_pattern(term)).escape(LIKE_ESCAPE))
}

fn by_primary_key<E: EntityTrait>(mut query: Select<E>) -> Select<E> {
    for key in E::PrimaryKey::iter() {
        query = query.order_by_asc(key.into_column());
    }
    query
}

pub async fn insert<A, C>(conn: &C, model: A) -> Result<<A::Entity as EntityTrait>::Model, DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    C: ConnectionTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    model.insert(conn).await
}

pub async fn update<A, C>(conn: &C, model: A) -> Result<<A::Entity as EntityTrait>::Model, DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    C: ConnectionTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    model.update(conn).await
}

pub async fn get_by_id<E, C>(conn: &C, id: i32) -> Result<Option<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id).one(conn).await
}

/// Every record, in primary key order.
pub async fn get_all<E, C>(conn: &C) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    by_primary_key(E::find()).all(conn).await
}

/// Records whose `column` contains `term`, ignoring case.
pub async fn filter_substring_ci<E, C>(
    conn: &C,
    column: E::Column,
    term: &str,
) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    by_primary_key(E::find().filter(contains_ci(column, term)))
        .all(conn)
        .await
}

/// Records referencing `value` through `column`, in primary key order.
pub async fn filter_by_foreign_key<E, C>(
    conn: &C,
    column: E::Column,
    value: i32,
) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    by_primary_key(E::find().filter(column.eq(value)))
        .all(conn)
        .await
}

pub async fn order_by_desc<E, C>(conn: &C, column: E::Column) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find().order_by_desc(column).all(conn).await
}

/// Delete one record, returning the number of rows removed (0 or 1).
pub async fn delete<E, C>(conn: &C, id: i32) -> Result<u64, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let result = E::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
