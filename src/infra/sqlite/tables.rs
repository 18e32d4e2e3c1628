use rusqlite::types::Value;

use crate::domain::entities::admin::{
    Application, CommissionRate, Deal, Developer, InventoryItem, Launch, Project, UserProfile,
};
use crate::domain::entities::record::{Record, RecordId, Row};

/// How a record type is read from SQLite. Every `SELECT` lists `t.id` first.
pub trait SqlTable: Record + Sized {
    const TABLE: &'static str;
    const FROM: &'static str;
    const SELECT: &'static str;
    const SEARCH: &'static [&'static str];
    const DEFAULT_ORDER: &'static str;

    /// SQL expression backing a named field, used by constraints and sort.
    fn sql_field(field: &str) -> Option<&'static str>;

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>>;
}

pub trait SqlWritable: SqlTable {
    const WRITE_COLUMNS: &'static [&'static str];

    /// Values in `WRITE_COLUMNS` order.
    fn write_values(&self) -> Vec<Value>;
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn opt_text(value: Option<&str>) -> Value {
    value.map(text).unwrap_or(Value::Null)
}

fn opt_id(value: Option<RecordId>) -> Value {
    value.map(|id| Value::Integer(id.0)).unwrap_or(Value::Null)
}

fn opt_real(value: Option<f64>) -> Value {
    value.map(Value::Real).unwrap_or(Value::Null)
}

fn read_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<RecordId>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(RecordId))
}

impl SqlTable for Developer {
    const TABLE: &'static str = "developers";
    const FROM: &'static str = "developers t";
    const SELECT: &'static str = "t.id, t.name, t.description, t.logo_url, t.created_at";
    const SEARCH: &'static [&'static str] = &["t.name"];
    const DEFAULT_ORDER: &'static str = "t.name COLLATE NOCASE ASC, t.id ASC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "name" => Some("t.name"),
            "description" => Some("t.description"),
            "logo_url" => Some("t.logo_url"),
            "created_at" => Some("t.created_at"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            Developer {
                name: row.get(1)?,
                description: row.get(2)?,
                logo_url: row.get(3)?,
                created_at: row.get(4)?,
            },
        ))
    }
}

impl SqlWritable for Developer {
    const WRITE_COLUMNS: &'static [&'static str] = &["name", "description", "logo_url"];

    fn write_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            opt_text(self.description.as_deref()),
            opt_text(self.logo_url.as_deref()),
        ]
    }
}

impl SqlTable for Project {
    const TABLE: &'static str = "projects";
    const FROM: &'static str = "projects t LEFT JOIN developers d ON d.id = t.developer_id";
    const SELECT: &'static str =
        "t.id, t.name, t.developer_id, d.name, t.description, t.location, t.created_at";
    const SEARCH: &'static [&'static str] = &["t.name", "d.name"];
    const DEFAULT_ORDER: &'static str = "t.name COLLATE NOCASE ASC, t.id ASC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "name" => Some("t.name"),
            "developer_id" => Some("t.developer_id"),
            "developer_name" => Some("d.name"),
            "description" => Some("t.description"),
            "location" => Some("t.location"),
            "created_at" => Some("t.created_at"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            Project {
                name: row.get(1)?,
                developer_id: read_id(row, 2)?,
                developer_name: row.get(3)?,
                description: row.get(4)?,
                location: row.get(5)?,
                created_at: row.get(6)?,
            },
        ))
    }
}

impl SqlWritable for Project {
    const WRITE_COLUMNS: &'static [&'static str] =
        &["name", "developer_id", "description", "location"];

    fn write_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            opt_id(self.developer_id),
            opt_text(self.description.as_deref()),
            opt_text(self.location.as_deref()),
        ]
    }
}

impl SqlTable for CommissionRate {
    const TABLE: &'static str = "commission_rates";
    const FROM: &'static str = "commission_rates t
        LEFT JOIN developers d ON d.id = t.developer_id
        LEFT JOIN projects p ON p.id = t.project_id";
    const SELECT: &'static str = "t.id, t.developer_id, COALESCE(d.name, ''), t.project_id,
        COALESCE(p.name, 'All Projects'), t.percentage, t.created_at";
    const SEARCH: &'static [&'static str] = &["d.name", "p.name"];
    const DEFAULT_ORDER: &'static str = "d.name COLLATE NOCASE ASC, t.id ASC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "developer_id" => Some("t.developer_id"),
            "developer_name" => Some("d.name"),
            "project_id" => Some("t.project_id"),
            "project_names" => Some("p.name"),
            "percentage" => Some("t.percentage"),
            "created_at" => Some("t.created_at"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            CommissionRate {
                developer_id: read_id(row, 1)?,
                developer_name: row.get(2)?,
                project_id: read_id(row, 3)?,
                project_names: row.get(4)?,
                percentage: row.get(5)?,
                created_at: row.get(6)?,
            },
        ))
    }
}

impl SqlWritable for CommissionRate {
    const WRITE_COLUMNS: &'static [&'static str] = &["developer_id", "project_id", "percentage"];

    fn write_values(&self) -> Vec<Value> {
        vec![
            opt_id(self.developer_id),
            opt_id(self.project_id),
            Value::Real(self.percentage),
        ]
    }
}

impl SqlTable for Application {
    const TABLE: &'static str = "partner_applications";
    const FROM: &'static str = "partner_applications t";
    const SELECT: &'static str =
        "t.id, t.full_name, t.phone, t.company_name, t.status, t.has_papers, t.notes, t.created_at";
    const SEARCH: &'static [&'static str] = &["t.full_name", "t.phone", "t.company_name"];
    const DEFAULT_ORDER: &'static str = "t.created_at DESC, t.id DESC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "full_name" => Some("t.full_name"),
            "phone" => Some("t.phone"),
            "company_name" => Some("t.company_name"),
            "status" => Some("t.status"),
            "has_papers" => Some("t.has_papers"),
            "notes" => Some("t.notes"),
            "created_at" => Some("t.created_at"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            Application {
                full_name: row.get(1)?,
                phone: row.get(2)?,
                company_name: row.get(3)?,
                status: row.get(4)?,
                has_papers: row.get(5)?,
                notes: row.get(6)?,
                created_at: row.get(7)?,
            },
        ))
    }
}

impl SqlWritable for Application {
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "full_name",
        "phone",
        "company_name",
        "status",
        "has_papers",
        "notes",
    ];

    fn write_values(&self) -> Vec<Value> {
        vec![
            text(&self.full_name),
            text(&self.phone),
            opt_text(self.company_name.as_deref()),
            text(&self.status),
            Value::Integer(i64::from(self.has_papers)),
            opt_text(self.notes.as_deref()),
        ]
    }
}

impl SqlTable for Deal {
    const TABLE: &'static str = "deals";
    const FROM: &'static str = "deals t";
    const SELECT: &'static str = "t.id, t.developer_name, t.project_name, t.client_name,
        t.unit_code, t.dev_sales_name, t.dev_phone, t.deal_value, t.review_status,
        t.internal_note, t.payment_status, t.created_at";
    const SEARCH: &'static [&'static str] = &["t.project_name", "t.client_name", "t.unit_code"];
    const DEFAULT_ORDER: &'static str = "t.created_at DESC, t.id DESC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "developer_name" => Some("t.developer_name"),
            "project_name" => Some("t.project_name"),
            "client_name" => Some("t.client_name"),
            "unit_code" => Some("t.unit_code"),
            "dev_sales_name" => Some("t.dev_sales_name"),
            "dev_phone" => Some("t.dev_phone"),
            "deal_value" => Some("t.deal_value"),
            "review_status" => Some("t.review_status"),
            "internal_note" => Some("t.internal_note"),
            "payment_status" => Some("t.payment_status"),
            "created_at" => Some("t.created_at"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            Deal {
                developer_name: row.get(1)?,
                project_name: row.get(2)?,
                client_name: row.get(3)?,
                unit_code: row.get(4)?,
                dev_sales_name: row.get(5)?,
                dev_phone: row.get(6)?,
                deal_value: row.get(7)?,
                review_status: row.get(8)?,
                internal_note: row.get(9)?,
                payment_status: row.get(10)?,
                created_at: row.get(11)?,
            },
        ))
    }
}

impl SqlWritable for Deal {
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "developer_name",
        "project_name",
        "client_name",
        "unit_code",
        "dev_sales_name",
        "dev_phone",
        "deal_value",
        "review_status",
        "internal_note",
        "payment_status",
    ];

    fn write_values(&self) -> Vec<Value> {
        vec![
            text(&self.developer_name),
            opt_text(self.project_name.as_deref()),
            text(&self.client_name),
            opt_text(self.unit_code.as_deref()),
            opt_text(self.dev_sales_name.as_deref()),
            opt_text(self.dev_phone.as_deref()),
            Value::Real(self.deal_value),
            text(&self.review_status),
            opt_text(self.internal_note.as_deref()),
            opt_text(self.payment_status.as_deref()),
        ]
    }
}

impl SqlTable for InventoryItem {
    const TABLE: &'static str = "inventory_items";
    const FROM: &'static str = "inventory_items t
        LEFT JOIN developers d ON d.id = t.developer_id
        LEFT JOIN projects p ON p.id = t.project_id";
    const SELECT: &'static str = "t.id, t.unit_number, t.unit_type, t.developer_id, d.name,
        t.project_id, p.name, t.price, t.is_available";
    const SEARCH: &'static [&'static str] = &["t.unit_number", "t.unit_type"];
    const DEFAULT_ORDER: &'static str = "t.id DESC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "unit_number" => Some("t.unit_number"),
            "unit_type" => Some("t.unit_type"),
            "developer_id" => Some("t.developer_id"),
            "developer_name" => Some("d.name"),
            "project_id" => Some("t.project_id"),
            "project_name" => Some("p.name"),
            "price" => Some("t.price"),
            "is_available" => Some("t.is_available"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            InventoryItem {
                unit_number: row.get(1)?,
                unit_type: row.get(2)?,
                developer_id: read_id(row, 3)?,
                developer_name: row.get(4)?,
                project_id: read_id(row, 5)?,
                project_name: row.get(6)?,
                price: row.get(7)?,
                is_available: row.get(8)?,
            },
        ))
    }
}

impl SqlWritable for InventoryItem {
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "unit_number",
        "unit_type",
        "developer_id",
        "project_id",
        "price",
        "is_available",
    ];

    fn write_values(&self) -> Vec<Value> {
        vec![
            text(&self.unit_number),
            text(&self.unit_type),
            opt_id(self.developer_id),
            opt_id(self.project_id),
            opt_real(self.price),
            Value::Integer(i64::from(self.is_available)),
        ]
    }
}

impl SqlTable for Launch {
    const TABLE: &'static str = "launches";
    const FROM: &'static str = "launches t
        LEFT JOIN developers d ON d.id = t.developer_id
        LEFT JOIN projects p ON p.id = t.project_id";
    const SELECT: &'static str = "t.id, t.title, t.description, t.developer_id, d.name,
        t.project_id, p.name, t.launch_date";
    const SEARCH: &'static [&'static str] = &["t.title", "t.description"];
    const DEFAULT_ORDER: &'static str = "t.launch_date DESC, t.id DESC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "title" => Some("t.title"),
            "description" => Some("t.description"),
            "developer_id" => Some("t.developer_id"),
            "developer_name" => Some("d.name"),
            "project_id" => Some("t.project_id"),
            "project_name" => Some("p.name"),
            "launch_date" => Some("t.launch_date"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            Launch {
                title: row.get(1)?,
                description: row.get(2)?,
                developer_id: read_id(row, 3)?,
                developer_name: row.get(4)?,
                project_id: read_id(row, 5)?,
                project_name: row.get(6)?,
                launch_date: row.get(7)?,
            },
        ))
    }
}

impl SqlWritable for Launch {
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "title",
        "description",
        "developer_id",
        "project_id",
        "launch_date",
    ];

    fn write_values(&self) -> Vec<Value> {
        vec![
            text(&self.title),
            opt_text(self.description.as_deref()),
            opt_id(self.developer_id),
            opt_id(self.project_id),
            opt_text(self.launch_date.as_deref()),
        ]
    }
}

impl SqlTable for UserProfile {
    const TABLE: &'static str = "profiles";
    const FROM: &'static str = "profiles t";
    const SELECT: &'static str = "t.id, t.full_name, t.phone, t.role, t.created_at";
    const SEARCH: &'static [&'static str] = &["t.full_name", "t.phone"];
    const DEFAULT_ORDER: &'static str = "t.created_at DESC, t.id DESC";

    fn sql_field(field: &str) -> Option<&'static str> {
        match field {
            "full_name" => Some("t.full_name"),
            "phone" => Some("t.phone"),
            "role" => Some("t.role"),
            "created_at" => Some("t.created_at"),
            _ => None,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Self>> {
        Ok(Row::database(
            row.get(0)?,
            UserProfile {
                full_name: row.get(1)?,
                phone: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            },
        ))
    }
}

impl SqlWritable for UserProfile {
    const WRITE_COLUMNS: &'static [&'static str] = &["full_name", "phone", "role"];

    fn write_values(&self) -> Vec<Value> {
        vec![
            opt_text(self.full_name.as_deref()),
            text(&self.phone),
            text(&self.role),
        ]
    }
}
