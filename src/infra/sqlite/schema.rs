use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS developers (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            description TEXT,
            logo_url    TEXT,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS projects (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            developer_id INTEGER,
            description  TEXT,
            location     TEXT,
            created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (developer_id) REFERENCES developers(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS commission_rates (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            developer_id INTEGER,
            project_id   INTEGER,
            percentage   REAL NOT NULL,
            created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (developer_id) REFERENCES developers(id) ON DELETE CASCADE,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS partner_applications (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name    TEXT NOT NULL,
            phone        TEXT NOT NULL,
            company_name TEXT,
            status       TEXT NOT NULL DEFAULT 'pending',
            has_papers   INTEGER NOT NULL DEFAULT 0,
            notes        TEXT,
            created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS deals (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            developer_name TEXT NOT NULL,
            project_name   TEXT,
            client_name    TEXT NOT NULL,
            unit_code      TEXT,
            dev_sales_name TEXT,
            dev_phone      TEXT,
            deal_value     REAL NOT NULL DEFAULT 0,
            review_status  TEXT NOT NULL DEFAULT 'pending',
            internal_note  TEXT,
            payment_status TEXT,
            created_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS inventory_items (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            unit_number  TEXT NOT NULL,
            unit_type    TEXT NOT NULL,
            developer_id INTEGER,
            project_id   INTEGER,
            price        REAL,
            is_available INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (developer_id) REFERENCES developers(id) ON DELETE SET NULL,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS launches (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            title        TEXT NOT NULL,
            description  TEXT,
            developer_id INTEGER,
            project_id   INTEGER,
            launch_date  TEXT,
            FOREIGN KEY (developer_id) REFERENCES developers(id) ON DELETE SET NULL,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name  TEXT,
            phone      TEXT NOT NULL,
            role       TEXT NOT NULL DEFAULT 'partner',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS properties (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            compound      TEXT,
            developer     TEXT,
            area          TEXT,
            property_type TEXT,
            price         REAL
        );

        CREATE INDEX IF NOT EXISTS idx_projects_developer
            ON projects(developer_id);

        CREATE INDEX IF NOT EXISTS idx_inventory_project
            ON inventory_items(project_id);

        CREATE INDEX IF NOT EXISTS idx_applications_created
            ON partner_applications(created_at);

        CREATE INDEX IF NOT EXISTS idx_deals_created
            ON deals(created_at);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
