use crate::formatter::TableFormatter;
use crate::model::DaoError;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::query_dsl::methods::ExecuteDsl;
use diesel::query_dsl::LoadQuery;
use std::io::Write;

/// A result row that knows its column names and can coerce itself to text.
pub trait Record {
    fn columns() -> &'static [&'static str];
    fn values(&self) -> Vec<String>;
}

impl Record for String {
    fn columns() -> &'static [&'static str] {
        &["value"]
    }

    fn values(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

pub fn display_nullable(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| String::from("null"))
}

/// Runs an INSERT, UPDATE or DELETE and returns the number of affected rows.
pub fn execute<Q>(conn: &PgConnection, statement: Q) -> QueryResult<usize>
where
    Q: RunQueryDsl<PgConnection> + ExecuteDsl<PgConnection>,
{
    let affected = statement.execute(conn)?;
    debug!("statement affected {} row(s)", affected);
    Ok(affected)
}

pub fn query_and_print<Q, R>(conn: &PgConnection, query: Q, out: &mut dyn Write) -> Result<usize, DaoError>
where
    Q: LoadQuery<PgConnection, R>,
    R: Record,
{
    let rows = query.load::<R>(conn)?;
    debug!("query returned {} row(s)", rows.len());
    print_result(&rows, out)
}

pub fn query_and_return_result<Q, R>(conn: &PgConnection, query: Q) -> QueryResult<Vec<Vec<String>>>
where
    Q: LoadQuery<PgConnection, R>,
    R: Record,
{
    let rows = query.load::<R>(conn)?;
    debug!("query returned {} row(s)", rows.len());
    Ok(rows.iter().map(Record::values).collect())
}

pub fn query_and_count<Q, R>(conn: &PgConnection, query: Q) -> QueryResult<usize>
where
    Q: LoadQuery<PgConnection, R>,
{
    let count = query.load::<R>(conn)?.len();
    debug!("query counted {} row(s)", count);
    Ok(count)
}

/// Prints already loaded records as a table and returns how many were printed.
pub fn print_result<R: Record>(rows: &[R], out: &mut dyn Write) -> Result<usize, DaoError> {
    let formatter = TableFormatter::new(R::columns());

    formatter.write_header(out)?;
    for row in rows.iter() {
        formatter.write_row(out, &row.values())?;
    }
    out.flush()?;

    Ok(rows.len())
}
