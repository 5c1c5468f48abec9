pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;

use rocket::fairing::AdHoc;
use rocket_sync_db_pools::database;
use serde::Serialize;
use tracing::{error, info};

#[database("yatube")]
pub struct Db(diesel::SqliteConnection);

use diesel::prelude::*;
use diesel::query_builder::*;
use diesel::query_dsl::methods::LoadQuery;
use diesel::sql_types::BigInt;
use diesel::sqlite::Sqlite;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Number of posts on every listing page.
pub const PER_PAGE: i64 = 10;

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<usize, String> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| applied.len())
        .map_err(|err| err.to_string())
}

pub fn migrations() -> AdHoc {
    AdHoc::try_on_ignite("Diesel migrations", |rocket| async move {
        let db = match Db::get_one(&rocket).await {
            Some(db) => db,
            None => {
                error!("no database connection available for migrations");
                return Err(rocket);
            }
        };

        match db.run(run_migrations).await {
            Ok(applied) => {
                info!(applied, "database schema is up to date");
                Ok(rocket)
            }
            Err(err) => {
                error!(%err, "failed to run migrations");
                Err(rocket)
            }
        }
    })
}

/// Page number requested by the `page` query value. Anything that is not an
/// integer falls back to the first page.
pub fn requested_page(raw: Option<&str>) -> i64 {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// Number of pages needed for `count` records. An empty listing still has
/// one (empty) page.
pub fn num_pages(count: i64) -> i64 {
    if count <= 0 {
        1
    } else {
        (count + PER_PAGE - 1) / PER_PAGE
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: i64, count: i64) -> Self {
        let num_pages = num_pages(count);
        Page {
            items,
            number,
            num_pages,
            count,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }

    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
        })
    }
}

pub trait Paginate: Sized {
    fn paginate(self, page: i64) -> Paginated<Self>;
}

/// Highest page number whose offset still fits in an `i64`.
const MAX_PAGE: i64 = i64::MAX / PER_PAGE;

impl<T> Paginate for T {
    fn paginate(self, page: i64) -> Paginated<Self> {
        let offset = (page.clamp(1, MAX_PAGE) - 1) * PER_PAGE;
        Paginated {
            query: self,
            page,
            limit: PER_PAGE,
            offset,
        }
    }
}

#[derive(Debug, Clone, Copy, QueryId)]
pub struct Paginated<T> {
    query: T,
    page: i64,
    offset: i64,
    limit: i64,
}

impl<T> Paginated<T> {
    fn at(self, page: i64) -> Self {
        self.query.paginate(page)
    }

    fn load_and_count<'a, U>(self, conn: &mut SqliteConnection) -> QueryResult<(Vec<U>, i64)>
    where
        Self: LoadQuery<'a, SqliteConnection, (U, i64)>,
    {
        let results = self.load::<(U, i64)>(conn)?;
        let total = results.first().map(|x| x.1).unwrap_or(0);
        let records = results.into_iter().map(|x| x.0).collect();
        Ok((records, total))
    }

    /// Load the requested page. Requests outside `1..=num_pages` get the
    /// last page instead.
    pub fn load_page<'a, U>(self, conn: &mut SqliteConnection) -> QueryResult<Page<U>>
    where
        Self: LoadQuery<'a, SqliteConnection, (U, i64)> + Clone,
    {
        let requested = self.page;
        if requested >= 1 {
            let (records, total) = self.clone().load_and_count(conn)?;
            if !records.is_empty() {
                return Ok(Page::new(records, requested, total));
            }
        }

        // the window count is only known once a row comes back
        let (records, total) = self.clone().at(1).load_and_count(conn)?;
        let last = num_pages(total);
        if last == 1 {
            return Ok(Page::new(records, 1, total));
        }

        let (records, total) = self.at(last).load_and_count(conn)?;
        Ok(Page::new(records, last, total))
    }
}

impl<T: Query> Query for Paginated<T> {
    type SqlType = (T::SqlType, BigInt);
}

impl<T> RunQueryDsl<SqliteConnection> for Paginated<T> {}

impl<T> QueryFragment<Sqlite> for Paginated<T>
where
    T: QueryFragment<Sqlite>,
{
    fn walk_ast<'a>(&'a self, mut out: AstPass<'_, 'a, Sqlite>) -> QueryResult<()> {
        out.push_sql("SELECT *, COUNT(*) OVER () FROM (");
        self.query.walk_ast(out.reborrow())?;
        out.push_sql(") t LIMIT ");
        out.push_bind_param::<BigInt, _>(&self.limit)?;
        out.push_sql(" OFFSET ");
        out.push_bind_param::<BigInt, _>(&self.offset)?;
        Ok(())
    }
}

/// Fresh in-memory database with the schema applied.
#[cfg(test)]
pub(crate) fn test_connection() -> SqliteConnection {
    use diesel::connection::SimpleConnection;

    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
    run_migrations(&mut conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_page_defaults_to_first() {
        assert_eq!(requested_page(None), 1);
        assert_eq!(requested_page(Some("abc")), 1);
        assert_eq!(requested_page(Some("")), 1);
        assert_eq!(requested_page(Some("3")), 3);
        assert_eq!(requested_page(Some("-2")), -2);
    }

    #[test]
    fn pages_are_counted_in_tens() {
        assert_eq!(num_pages(0), 1);
        assert_eq!(num_pages(1), 1);
        assert_eq!(num_pages(10), 1);
        assert_eq!(num_pages(11), 2);
        assert_eq!(num_pages(13), 2);
        assert_eq!(num_pages(30), 3);
    }

    #[test]
    fn page_reports_neighbours() {
        let first = Page::new(vec![1; 10], 1, 13);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.num_pages, 2);

        let last = Page::new(vec![1; 3], 2, 13);
        assert!(!last.has_next);
        assert!(last.has_previous);

        let empty: Page<i32> = Page::new(vec![], 1, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
    }

    #[test]
    fn offset_follows_page_number() {
        assert_eq!(().paginate(1).offset, 0);
        assert_eq!(().paginate(3).offset, 20);
        assert_eq!(().paginate(0).offset, 0);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let paginated = ().paginate(i64::MAX);
        assert_eq!(paginated.offset, (MAX_PAGE - 1) * PER_PAGE);
        assert_eq!(paginated.page, i64::MAX);
        assert_eq!(().paginate(i64::MIN).offset, 0);
    }
}
