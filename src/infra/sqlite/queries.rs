use anyhow::{anyhow, Context, Result};
use rusqlite::{params_from_iter, types::Value, Connection};
use tracing::debug;

use crate::domain::entities::listing::{FieldConstraint, FilterState, PageQuery, SortDirection};
use crate::domain::entities::record::{FieldValue, Row};
use crate::infra::sqlite::tables::{SqlTable, SqlWritable};

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn field_expr<T: SqlTable>(field: &str) -> Result<&'static str> {
    T::sql_field(field).ok_or_else(|| anyhow!("unknown field: {field}"))
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(text) => Value::Text(text.clone()),
        FieldValue::Number(number) => Value::Real(*number),
        FieldValue::Bool(flag) => Value::Integer(i64::from(*flag)),
        FieldValue::Date(day) => Value::Text(day.format("%Y-%m-%d").to_string()),
    }
}

/// Builds the `WHERE` clause for a filter: the search term over every
/// search column, AND-ed with each field constraint.
fn where_clause<T: SqlTable>(filter: &FilterState) -> Result<(String, Vec<Value>)> {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(search) = filter.search_term().filter(|_| !T::SEARCH.is_empty()) {
        let pattern = escape_like(search);
        let any = T::SEARCH
            .iter()
            .map(|expr| format!("{expr} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({any})"));
        params.extend(T::SEARCH.iter().map(|_| Value::Text(pattern.clone())));
    }

    for constraint in &filter.constraints {
        let expr = field_expr::<T>(constraint.field())?;
        match constraint {
            FieldConstraint::Equals {
                value: FieldValue::Null,
                ..
            } => clauses.push(format!("{expr} IS NULL")),
            FieldConstraint::Equals {
                value: value @ FieldValue::Date(_),
                ..
            } => {
                clauses.push(format!("date({expr}) = ?"));
                params.push(to_sql_value(value));
            }
            FieldConstraint::Equals { value, .. } => {
                clauses.push(format!("{expr} = ?"));
                params.push(to_sql_value(value));
            }
            FieldConstraint::DateRange { from, to, .. } => {
                if from.is_none() && to.is_none() {
                    clauses.push(format!("date({expr}) IS NOT NULL"));
                }
                if let Some(from) = from {
                    clauses.push(format!("date({expr}) >= ?"));
                    params.push(to_sql_value(&FieldValue::Date(*from)));
                }
                if let Some(to) = to {
                    clauses.push(format!("date({expr}) <= ?"));
                    params.push(to_sql_value(&FieldValue::Date(*to)));
                }
            }
            FieldConstraint::Contains { needle, .. } => {
                clauses.push(format!("{expr} LIKE ? ESCAPE '\\'"));
                params.push(Value::Text(escape_like(needle)));
            }
            FieldConstraint::NumberRange { min, max, .. } => {
                if min.is_none() && max.is_none() {
                    clauses.push(format!("{expr} IS NOT NULL"));
                }
                if let Some(min) = min {
                    clauses.push(format!("{expr} >= ?"));
                    params.push(Value::Real(*min));
                }
                if let Some(max) = max {
                    clauses.push(format!("{expr} <= ?"));
                    params.push(Value::Real(*max));
                }
            }
        }
    }

    if clauses.is_empty() {
        return Ok((String::new(), params));
    }
    Ok((format!("WHERE {}", clauses.join(" AND ")), params))
}

/// Mirrors the in-memory column sort: case-folded first, then the raw value,
/// then the row id.
fn order_clause<T: SqlTable>(query: &PageQuery) -> Result<String> {
    match &query.sort {
        Some(spec) => {
            let expr = field_expr::<T>(&spec.column)?;
            let direction = match spec.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            Ok(format!(
                "ORDER BY {expr} COLLATE NOCASE {direction}, {expr} COLLATE BINARY {direction}, t.id ASC"
            ))
        }
        None => Ok(format!("ORDER BY {}", T::DEFAULT_ORDER)),
    }
}

/// One filtered, sorted page of `T` plus the filtered total.
pub fn query_rows<T: SqlTable>(conn: &Connection, query: &PageQuery) -> Result<(Vec<Row<T>>, usize)> {
    if query.page_size == 0 {
        anyhow::bail!("page_size must be greater than zero")
    }

    let (where_sql, filter_params) = where_clause::<T>(&query.filter)?;
    let order_sql = order_clause::<T>(query)?;

    let count_sql = format!("SELECT COUNT(*) FROM {} {where_sql}", T::FROM);
    let total: i64 = conn
        .query_row(&count_sql, params_from_iter(filter_params.iter()), |row| {
            row.get(0)
        })
        .with_context(|| format!("failed to count {}", T::TABLE))?;

    let limit = i64::try_from(query.page_size).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
    let row_sql = format!(
        "SELECT {} FROM {} {where_sql} {order_sql} LIMIT ? OFFSET ?",
        T::SELECT,
        T::FROM
    );
    debug!(table = T::TABLE, sql = %row_sql, "querying page");

    let mut row_params = filter_params;
    row_params.push(Value::Integer(limit));
    row_params.push(Value::Integer(offset));

    let mut stmt = conn
        .prepare(&row_sql)
        .with_context(|| format!("failed to prepare {} page query", T::TABLE))?;
    let rows = stmt
        .query_map(params_from_iter(row_params), T::from_row)
        .with_context(|| format!("failed to query {} page", T::TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read {} rows", T::TABLE))?;

    Ok((rows, usize::try_from(total).unwrap_or_default()))
}

pub fn list_all<T: SqlTable>(conn: &Connection) -> Result<Vec<Row<T>>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        T::SELECT,
        T::FROM,
        T::DEFAULT_ORDER
    );
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare {} listing", T::TABLE))?;
    let rows = stmt
        .query_map([], T::from_row)
        .with_context(|| format!("failed to list {}", T::TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read {} rows", T::TABLE))?;
    Ok(rows)
}

pub fn insert_record<T: SqlWritable>(conn: &Connection, record: &T) -> Result<i64> {
    let placeholders = vec!["?"; T::WRITE_COLUMNS.len()].join(", ");
    let sql = format!(
        "INSERT INTO {}({}) VALUES ({placeholders})",
        T::TABLE,
        T::WRITE_COLUMNS.join(", ")
    );
    conn.execute(&sql, params_from_iter(record.write_values()))
        .with_context(|| format!("failed to insert into {}", T::TABLE))?;
    Ok(conn.last_insert_rowid())
}

/// Returns the number of rows changed (0 when `id` does not exist).
pub fn update_record<T: SqlWritable>(conn: &Connection, id: i64, record: &T) -> Result<usize> {
    let assignments = T::WRITE_COLUMNS
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE {} SET {assignments} WHERE id = ?", T::TABLE);
    let mut values = record.write_values();
    values.push(Value::Integer(id));
    conn.execute(&sql, params_from_iter(values))
        .with_context(|| format!("failed to update {} #{id}", T::TABLE))
}

pub fn delete_record<T: SqlTable>(conn: &Connection, id: i64) -> Result<usize> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
    conn.execute(&sql, [id])
        .with_context(|| format!("failed to delete {} #{id}", T::TABLE))
}

/// `(id, name)` of every stored row of a named table, by name.
fn name_options(conn: &Connection, table: &str) -> Result<Vec<(i64, String)>> {
    let sql = format!("SELECT id, name FROM {table} ORDER BY name COLLATE NOCASE ASC, id ASC");
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare {table} options"))?;
    let options = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .with_context(|| format!("failed to query {table} options"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read {table} options"))?;
    Ok(options)
}

pub fn developer_options(conn: &Connection) -> Result<Vec<(i64, String)>> {
    name_options(conn, "developers")
}

pub fn project_options(conn: &Connection) -> Result<Vec<(i64, String)>> {
    name_options(conn, "projects")
}

/// Distinct values of one `properties` column, in first-seen order.
fn distinct_property_values(conn: &Connection, column: &str) -> Result<Vec<Option<String>>> {
    let sql = format!(
        "SELECT {column}
         FROM properties
         GROUP BY {column}
         ORDER BY MIN(id) ASC"
    );
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare distinct {column} query"))?;
    let values = stmt
        .query_map([], |row| row.get::<_, Option<String>>(0))
        .with_context(|| format!("failed to query distinct {column}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read distinct {column}"))?;
    Ok(values)
}

pub fn distinct_inventory_developers(conn: &Connection) -> Result<Vec<Option<String>>> {
    distinct_property_values(conn, "developer")
}

pub fn distinct_inventory_compounds(conn: &Connection) -> Result<Vec<Option<String>>> {
    distinct_property_values(conn, "compound")
}
