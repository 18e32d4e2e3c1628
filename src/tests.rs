use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::domain::entities::admin::{
    AdminEntity, Application, CommissionRate, Deal, Developer, UserProfile, ALL_PROJECTS,
    VARIOUS_DEVELOPERS,
};
use crate::domain::entities::listing::{FieldConstraint, PageQuery, SortDirection, SortSpec};
use crate::domain::entities::record::{FieldValue, RecordId, RowKey, ValidationError};
use crate::infra::import::commissions::read_live_commissions;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::ui::controller::{build_controller, TableController, TableSnapshot};
use crate::ui::state::filter_inputs::{contains_input, date_range_input, value_range_input};
use crate::usecase::list_view::{LoadState, RowInteraction};
use crate::usecase::ports::repo::{RecordStore, RepoError, RowSource};
use crate::usecase::services::edit_service::EditError;
use crate::usecase::services::import_service::ImportService;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("partner-admin-{prefix}-{nanos}"))
}

fn seeded_repo(temp_dir: &Path) -> Arc<SqliteRepo> {
    fs::create_dir_all(temp_dir).expect("should create temp dir");
    let repo = Arc::new(SqliteRepo::new(temp_dir.join("admin.sqlite")));
    repo.init().expect("init should succeed");
    repo
}

fn developer(name: &str) -> Developer {
    Developer {
        name: name.to_string(),
        ..Developer::default()
    }
}

fn application(name: &str, status: &str) -> Application {
    Application {
        full_name: name.to_string(),
        phone: "+20 100 000 0000".to_string(),
        status: status.to_string(),
        ..Application::default()
    }
}

fn seed_users(repo: &SqliteRepo, count: usize) {
    for idx in 0..count {
        RecordStore::<UserProfile>::create(
            repo,
            &UserProfile {
                full_name: Some(format!("User {idx:02}")),
                phone: format!("010{idx:08}"),
                role: "partner".to_string(),
                created_at: None,
            },
        )
        .expect("insert should succeed");
    }
}

/// Inserts a deal with an explicit submission time and returns its key.
fn insert_deal(
    conn: &Connection,
    developer: &str,
    client: &str,
    value: f64,
    status: &str,
    created_at: &str,
) -> RowKey {
    conn.execute(
        "INSERT INTO deals(developer_name, client_name, deal_value, review_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![developer, client, value, status, created_at],
    )
    .expect("deal insert should succeed");
    RowKey::Id(RecordId(conn.last_insert_rowid()))
}

fn column_cells(snapshot: &TableSnapshot, column: &str) -> Vec<String> {
    let idx = snapshot
        .columns
        .iter()
        .position(|c| c.key == column)
        .expect("column should exist");
    snapshot
        .rows
        .iter()
        .map(|row| row.cells[idx].clone())
        .collect()
}

fn first_cells(snapshot: &TableSnapshot) -> Vec<String> {
    snapshot
        .rows
        .iter()
        .map(|row| row.cells[0].clone())
        .collect()
}

fn write_inventory_csv(temp_dir: &Path) -> PathBuf {
    let csv_path = temp_dir.join("properties.csv");
    fs::write(
        &csv_path,
        "compound,developer,area,type,price_in_egp\n\
         \"{'id': 1, 'name': 'Palm Parks'}\",\"{'id': 2, 'name': 'Sodic'}\",October,Apartment,\"4,500,000\"\n\
         Mivida,Emaar,New Cairo,Villa,12000000\n\
         Marassi,emaar,North Coast,Chalet,\n\
         ,,Zayed,Studio,900000\n",
    )
    .expect("should write csv fixture");
    csv_path
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("admin.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (
                'developers','projects','commission_rates','partner_applications',
                'inventory_items','launches','profiles','properties','deals')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");

    assert_eq!(table_count, 9, "required tables should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn record_store_round_trips_and_reports_missing_rows() {
    let temp_dir = unique_test_dir("crud");
    let repo = seeded_repo(&temp_dir);

    let id = RecordStore::<Developer>::create(repo.as_ref(), &developer("Acme"))
        .expect("insert should succeed");
    RecordStore::<Developer>::update(repo.as_ref(), id, &developer("Acme Group"))
        .expect("update should succeed");

    let rows = RowSource::<Developer>::list_all(repo.as_ref()).expect("listing should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.name, "Acme Group");
    assert_eq!(rows[0].database_id(), Some(id));
    assert!(rows[0].record.created_at.is_some(), "created_at defaults in sqlite");

    RecordStore::<Developer>::delete(repo.as_ref(), id).expect("delete should succeed");
    assert_eq!(
        RecordStore::<Developer>::delete(repo.as_ref(), id),
        Err(RepoError::NotFound(id))
    );
    assert_eq!(
        RecordStore::<Developer>::update(repo.as_ref(), RecordId(999), &developer("Ghost")),
        Err(RepoError::NotFound(RecordId(999)))
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn paged_listing_applies_search_constraint_and_sort() {
    let temp_dir = unique_test_dir("paged-listing");
    let repo = seeded_repo(&temp_dir);

    for idx in 0..25 {
        let status = if idx % 5 == 0 { "approved" } else { "pending" };
        RecordStore::<Application>::create(
            repo.as_ref(),
            &application(&format!("Partner {idx:02}"), status),
        )
        .expect("insert should succeed");
    }
    RecordStore::<Application>::create(repo.as_ref(), &application("100%_match", "pending"))
        .expect("insert should succeed");

    let mut query = PageQuery::first_page(10);
    let page = RowSource::<Application>::list_rows(repo.as_ref(), &query)
        .expect("listing should succeed");
    assert_eq!(page.total, 26);
    assert_eq!(page.rows.len(), 10);

    query.page = 3;
    let last = RowSource::<Application>::list_rows(repo.as_ref(), &query)
        .expect("listing should succeed");
    assert_eq!(last.rows.len(), 6);

    query.page = 1;
    query.filter.set_constraint(
        "status",
        Some(FieldConstraint::equals("status", FieldValue::text("approved"))),
    );
    query.sort = Some(SortSpec {
        column: "full_name".to_string(),
        direction: SortDirection::Desc,
    });
    let approved = RowSource::<Application>::list_rows(repo.as_ref(), &query)
        .expect("listing should succeed");
    let names: Vec<_> = approved
        .rows
        .iter()
        .map(|row| row.record.full_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Partner 20", "Partner 15", "Partner 10", "Partner 05", "Partner 00"]
    );

    let mut wildcard = PageQuery::first_page(10);
    wildcard.filter.query = "%_".to_string();
    let literal = RowSource::<Application>::list_rows(repo.as_ref(), &wildcard)
        .expect("listing should succeed");
    assert_eq!(literal.total, 1, "wildcards in the query are matched literally");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn unknown_fields_are_rejected_before_querying() {
    let temp_dir = unique_test_dir("unknown-field");
    let repo = seeded_repo(&temp_dir);

    let mut query = PageQuery::first_page(10);
    query.sort = Some(SortSpec {
        column: "password".to_string(),
        direction: SortDirection::Asc,
    });

    assert_eq!(
        RowSource::<UserProfile>::list_rows(repo.as_ref(), &query),
        Err(RepoError::UnknownField("password".to_string()))
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn developers_include_names_found_in_inventory() {
    let temp_dir = unique_test_dir("developers-merge");
    let repo = seeded_repo(&temp_dir);
    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());

    RecordStore::<Developer>::create(repo.as_ref(), &developer("Emaar"))
        .expect("insert should succeed");
    let imported = ImportService::new(repo.db_path().to_path_buf())
        .import_inventory_csv(&write_inventory_csv(&temp_dir))
        .expect("import should succeed");
    assert_eq!(imported.row_count, 4);
    assert_eq!(imported.skipped, 0);

    let mut controller = build_controller(AdminEntity::Developers, &config, &repo);
    controller.refresh();
    let snapshot = controller.snapshot();

    assert_eq!(snapshot.state, LoadState::Loaded);
    assert_eq!(first_cells(&snapshot), vec!["Emaar", "Sodic"]);
    assert!(!snapshot.rows[0].read_only);
    assert!(snapshot.rows[1].read_only);
    assert_eq!(snapshot.rows[1].key, RowKey::Derived("sodic".to_string()));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn projects_inferred_from_compounds_show_various_developers() {
    let temp_dir = unique_test_dir("projects-merge");
    let repo = seeded_repo(&temp_dir);
    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());

    ImportService::new(repo.db_path().to_path_buf())
        .import_inventory_csv(&write_inventory_csv(&temp_dir))
        .expect("import should succeed");

    let mut controller = build_controller(AdminEntity::Projects, &config, &repo);
    controller.refresh();
    let snapshot = controller.snapshot();

    assert_eq!(first_cells(&snapshot), vec!["Palm Parks", "Mivida", "Marassi"]);
    assert!(snapshot
        .rows
        .iter()
        .all(|row| row.read_only && row.cells[1] == VARIOUS_DEVELOPERS));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn commissions_merge_the_live_sheet() {
    let temp_dir = unique_test_dir("commissions-merge");
    let repo = seeded_repo(&temp_dir);
    let sheet_path = temp_dir.join("commissions.json");
    fs::write(
        &sheet_path,
        r#"[
            {"developerName": "emaar", "commissionPercent": 6.0},
            {"developerName": "Sodic", "commissionPercent": 4.5, "projects": null},
            {"developerName": "  ", "commissionPercent": 3.0},
            {"developerName": "Ora", "commissionPercent": 5.0, "projects": "ZED East"}
        ]"#,
    )
    .expect("should write sheet fixture");

    let developer_id = RecordStore::<Developer>::create(repo.as_ref(), &developer("Emaar"))
        .expect("insert should succeed");
    RecordStore::<CommissionRate>::create(
        repo.as_ref(),
        &CommissionRate {
            developer_id: Some(developer_id),
            percentage: 5.0,
            ..CommissionRate::default()
        },
    )
    .expect("insert should succeed");

    let mut config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    config.live_commissions_path = Some(sheet_path);
    let mut controller = build_controller(AdminEntity::Commissions, &config, &repo);
    controller.refresh();
    let snapshot = controller.snapshot();

    let cells: Vec<_> = snapshot.rows.iter().map(|row| row.cells.clone()).collect();
    assert_eq!(
        cells,
        vec![
            vec!["Emaar".to_string(), ALL_PROJECTS.to_string(), "5".to_string()],
            vec!["Sodic".to_string(), ALL_PROJECTS.to_string(), "4.5".to_string()],
            vec!["Ora".to_string(), "ZED East".to_string(), "5".to_string()],
        ]
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn commission_workbook_reads_first_sheet() {
    let temp_dir = unique_test_dir("commission-xlsx");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let xlsx_path = temp_dir.join("commissions.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Developer Name").expect("header");
    sheet.write_string(0, 1, "Commission %").expect("header");
    sheet.write_string(0, 2, "Projects").expect("header");
    sheet.write_string(1, 0, "Mountain View").expect("cell");
    sheet.write_number(1, 1, 3.5).expect("cell");
    sheet.write_string(1, 2, "iCity").expect("cell");
    sheet.write_string(2, 0, "Hyde Park").expect("cell");
    sheet.write_string(2, 1, "4%").expect("cell");
    workbook.save(&xlsx_path).expect("workbook should save");

    let entries = read_live_commissions(&xlsx_path).expect("workbook should parse");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].developer_name.as_deref(), Some("Mountain View"));
    assert_eq!(entries[0].commission_percent, 3.5);
    assert_eq!(entries[0].projects.as_deref(), Some("iCity"));
    assert_eq!(entries[1].developer_name.as_deref(), Some("Hyde Park"));
    assert_eq!(entries[1].commission_percent, 4.0);
    assert_eq!(entries[1].projects, None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn unreadable_commission_sheet_falls_back_to_database_rows() {
    let temp_dir = unique_test_dir("commission-missing");
    let repo = seeded_repo(&temp_dir);
    let developer_id = RecordStore::<Developer>::create(repo.as_ref(), &developer("Emaar"))
        .expect("insert should succeed");
    RecordStore::<CommissionRate>::create(
        repo.as_ref(),
        &CommissionRate {
            developer_id: Some(developer_id),
            percentage: 2.0,
            ..CommissionRate::default()
        },
    )
    .expect("insert should succeed");

    let mut config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    config.live_commissions_path = Some(temp_dir.join("missing.json"));
    let mut controller = build_controller(AdminEntity::Commissions, &config, &repo);
    controller.refresh();
    let snapshot = controller.snapshot();

    assert_eq!(snapshot.state, LoadState::Loaded);
    assert_eq!(first_cells(&snapshot), vec!["Emaar"]);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn derived_rows_cannot_be_deleted_from_the_table() {
    let temp_dir = unique_test_dir("delete-derived");
    let repo = seeded_repo(&temp_dir);
    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    let emaar = RecordStore::<Developer>::create(repo.as_ref(), &developer("Emaar"))
        .expect("insert should succeed");
    ImportService::new(repo.db_path().to_path_buf())
        .import_inventory_csv(&write_inventory_csv(&temp_dir))
        .expect("import should succeed");

    let mut controller = build_controller(AdminEntity::Developers, &config, &repo);
    controller.refresh();

    let derived = RowKey::Derived("sodic".to_string());
    assert_eq!(controller.delete_row(&derived), Err(EditError::ReadOnlyRow));

    controller.interact(RowInteraction::Check {
        key: derived.clone(),
        selected: true,
    });
    controller.interact(RowInteraction::Check {
        key: RowKey::Id(emaar),
        selected: true,
    });
    assert_eq!(controller.delete_selected(), Err(EditError::ReadOnlyRow));
    assert_eq!(controller.snapshot().rows.len(), 2, "nothing was deleted");

    controller.interact(RowInteraction::Check {
        key: derived,
        selected: false,
    });
    assert_eq!(controller.delete_selected(), Ok(1));
    // Emaar still appears, now inferred from inventory.
    let snapshot = controller.snapshot();
    assert_eq!(first_cells(&snapshot), vec!["Sodic", "Emaar"]);
    assert!(snapshot.rows.iter().all(|row| row.read_only));
    assert_eq!(
        controller.delete_row(&RowKey::Id(emaar)),
        Err(EditError::NotListed)
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn paged_controller_fetches_requested_page() {
    let temp_dir = unique_test_dir("paged-controller");
    let repo = seeded_repo(&temp_dir);
    seed_users(&repo, 45);

    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    let mut controller = build_controller(AdminEntity::Users, &config, &repo);
    controller.refresh();
    let first = controller.snapshot();
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.rows.len(), 20);
    assert_eq!(first.range_label, "Showing 1-20 of 45 results");

    controller.set_page(3);
    let last = controller.snapshot();
    assert_eq!(last.page, 3);
    assert_eq!(last.rows.len(), 5);
    assert!(!last.has_next);

    controller.set_query("User 4");
    let searched = controller.snapshot();
    assert_eq!(searched.page, 1, "a new query starts from the first page");
    assert_eq!(searched.rows.len(), 5);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn bulk_delete_covers_rows_selected_on_other_pages() {
    let temp_dir = unique_test_dir("paged-bulk-delete");
    let repo = seeded_repo(&temp_dir);
    seed_users(&repo, 45);

    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    let mut controller = build_controller(AdminEntity::Users, &config, &repo);
    controller.refresh();

    controller.set_page(2);
    controller.toggle_page(true);
    assert_eq!(controller.snapshot().selected_count, 20);

    controller.set_page(1);
    let page_one = controller.snapshot();
    assert_eq!(page_one.selected_count, 20, "selection survives the page change");
    assert!(page_one.rows.iter().all(|row| !row.selected));
    let kept: Vec<RowKey> = page_one.rows.iter().map(|row| row.key.clone()).collect();

    assert_eq!(controller.delete_selected(), Ok(20));

    let after = controller.snapshot();
    assert_eq!(after.selected_count, 0);
    assert_eq!(after.range_label, "Showing 1-20 of 25 results");
    let remaining = RowSource::<UserProfile>::list_all(repo.as_ref())
        .expect("listing should succeed");
    assert_eq!(remaining.len(), 25);
    let remaining_keys: Vec<RowKey> = remaining.iter().map(|row| row.key()).collect();
    assert!(kept.iter().all(|key| remaining_keys.contains(key)));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn deals_filter_by_developer_value_date_and_status() {
    let temp_dir = unique_test_dir("deals-filters");
    let repo = seeded_repo(&temp_dir);
    let conn = Connection::open(repo.db_path()).expect("should open sqlite db");
    insert_deal(&conn, "Emaar", "Client A", 2_000_000.0, "pending", "2024-01-05 09:00:00");
    insert_deal(&conn, "Sodic", "Client B", 5_000_000.0, "verified", "2024-02-10 09:00:00");
    insert_deal(&conn, "Emaar Misr", "Client C", 9_000_000.0, "pending", "2024-03-15 09:00:00");
    insert_deal(&conn, "emaar", "Client D", 4_000_000.0, "flagged", "2024-03-20 10:00:00");

    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    let mut controller = build_controller(AdminEntity::Deals, &config, &repo);
    controller.refresh();
    assert_eq!(
        column_cells(&controller.snapshot(), "client_name"),
        vec!["Client D", "Client C", "Client B", "Client A"],
        "newest deals first"
    );

    controller.set_constraint("developer_name", contains_input("developer_name", "EMAAR"));
    assert_eq!(
        column_cells(&controller.snapshot(), "client_name"),
        vec!["Client D", "Client C", "Client A"]
    );

    controller.set_constraint(
        "deal_value",
        value_range_input("deal_value", "3,000,000", ""),
    );
    assert_eq!(
        column_cells(&controller.snapshot(), "client_name"),
        vec!["Client D", "Client C"]
    );

    controller.set_constraint("created_at", date_range_input("created_at", "", "2024-03-15"));
    assert_eq!(column_cells(&controller.snapshot(), "client_name"), vec!["Client C"]);

    controller.set_constraint(
        "review_status",
        Some(FieldConstraint::equals("review_status", FieldValue::text("flagged"))),
    );
    let none = controller.snapshot();
    assert_eq!(none.state, LoadState::Loaded);
    assert!(none.rows.is_empty());
    assert_eq!(none.empty_message, "No deals found");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn deal_review_updates_status_and_note_only() {
    let temp_dir = unique_test_dir("deals-review");
    let repo = seeded_repo(&temp_dir);
    let conn = Connection::open(repo.db_path()).expect("should open sqlite db");
    let key = insert_deal(&conn, "Emaar", "Client A", 2_000_000.0, "pending", "2024-01-05");

    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    let mut controller = build_controller(AdminEntity::Deals, &config, &repo);
    controller.refresh();
    assert!(!controller.snapshot().can_create);
    assert_eq!(controller.row_actions(&key), vec!["Verify", "Flag"]);

    controller.run_action(&key, "Verify").expect("verify should succeed");
    assert_eq!(controller.row_actions(&key), vec!["Flag"]);
    assert_eq!(
        controller.run_action(&key, "Archive"),
        Err(EditError::UnknownAction("Archive".to_string()))
    );

    let values = vec![
        ("review_status".to_string(), "flagged".to_string()),
        ("internal_note".to_string(), "unit code missing".to_string()),
    ];
    controller.save_form(Some(&key), &values).expect("review should save");

    let deals = RowSource::<Deal>::list_all(repo.as_ref()).expect("listing should succeed");
    assert_eq!(deals.len(), 1);
    let deal = &deals[0].record;
    assert_eq!(deal.review_status, "flagged");
    assert_eq!(deal.internal_note.as_deref(), Some("unit code missing"));
    assert_eq!(deal.deal_value, 2_000_000.0);
    assert_eq!(deal.client_name, "Client A");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn applications_filter_by_submission_date_and_can_be_approved() {
    let temp_dir = unique_test_dir("applications-review");
    let repo = seeded_repo(&temp_dir);
    let conn = Connection::open(repo.db_path()).expect("should open sqlite db");
    for (name, created_at) in [
        ("Mona", "2024-01-31 23:59:59"),
        ("Omar", "2024-02-01 00:00:00"),
        ("Salma", "2024-02-29 12:00:00"),
    ] {
        conn.execute(
            "INSERT INTO partner_applications(full_name, phone, created_at) VALUES (?1, ?2, ?3)",
            params![name, "+20 100", created_at],
        )
        .expect("application insert should succeed");
    }

    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    let mut controller = build_controller(AdminEntity::Applications, &config, &repo);
    controller.refresh();
    controller.set_constraint(
        "created_at",
        date_range_input("created_at", "2024-02-01", "2024-02-29"),
    );
    let february = controller.snapshot();
    assert_eq!(first_cells(&february), vec!["Salma", "Omar"]);

    let omar = february.rows[1].key.clone();
    assert_eq!(controller.row_actions(&omar), vec!["Approve", "Reject"]);
    controller.run_action(&omar, "Approve").expect("approve should succeed");
    assert_eq!(controller.row_actions(&omar), vec!["Reject"]);
    assert_eq!(column_cells(&controller.snapshot(), "status")[1], "approved");

    controller.set_constraint("created_at", None);
    assert_eq!(controller.snapshot().rows.len(), 3);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn forms_create_and_edit_database_rows_but_not_derived_ones() {
    let temp_dir = unique_test_dir("forms");
    let repo = seeded_repo(&temp_dir);
    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    ImportService::new(repo.db_path().to_path_buf())
        .import_inventory_csv(&write_inventory_csv(&temp_dir))
        .expect("import should succeed");

    let mut developers = build_controller(AdminEntity::Developers, &config, &repo);
    developers.refresh();
    let sodic = RowKey::Derived("sodic".to_string());
    assert_eq!(developers.edit_form(Some(&sodic)), Err(EditError::ReadOnlyRow));
    assert_eq!(
        developers.save_form(Some(&sodic), &[("name".to_string(), "Sodic".to_string())]),
        Err(EditError::ReadOnlyRow)
    );
    assert!(developers.row_actions(&sodic).is_empty());

    assert_eq!(
        developers.save_form(None, &[("name".to_string(), "  ".to_string())]),
        Err(EditError::Invalid(ValidationError::Required("name")))
    );
    developers
        .save_form(None, &[("name".to_string(), "Acme".to_string())])
        .expect("create should succeed");
    let acme = developers
        .snapshot()
        .rows
        .iter()
        .find(|row| row.cells[0] == "Acme")
        .map(|row| row.key.clone())
        .expect("new developer should be listed");
    assert!(matches!(acme, RowKey::Id(_)));

    let form = developers.edit_form(Some(&acme)).expect("form should open");
    assert_eq!(form.inputs[0].key, "name");
    assert_eq!(form.inputs[0].value, "Acme");
    developers
        .save_form(
            Some(&acme),
            &[
                ("name".to_string(), "Acme Group".to_string()),
                ("description".to_string(), "Towers".to_string()),
            ],
        )
        .expect("update should succeed");
    assert!(first_cells(&developers.snapshot()).contains(&"Acme Group".to_string()));

    let projects = build_controller(AdminEntity::Projects, &config, &repo);
    let project_form = projects.edit_form(None).expect("projects are creatable");
    let developer_input = project_form
        .inputs
        .iter()
        .find(|input| input.key == "developer_id")
        .expect("project form picks a developer");
    let RowKey::Id(acme_id) = acme else {
        unreachable!("checked above");
    };
    assert_eq!(
        developer_input.options,
        vec![(acme_id.to_string(), "Acme Group".to_string())]
    );

    let mut commissions = build_controller(AdminEntity::Commissions, &config, &repo);
    assert_eq!(
        commissions.save_form(
            None,
            &[
                ("developer_id".to_string(), acme_id.to_string()),
                ("percentage".to_string(), "25".to_string()),
            ],
        ),
        Err(EditError::Invalid(ValidationError::PercentageOutOfRange(25.0)))
    );

    let mut users = build_controller(AdminEntity::Users, &config, &repo);
    assert_eq!(users.edit_form(None), Err(EditError::NotCreatable));
    assert_eq!(users.save_form(None, &[]), Err(EditError::NotCreatable));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn case_ties_sort_the_same_locally_and_in_sql() {
    let temp_dir = unique_test_dir("sort-parity");
    let repo = seeded_repo(&temp_dir);
    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    for name in ["ann", "Ann", "ANN", "bob"] {
        RecordStore::<Developer>::create(repo.as_ref(), &developer(name))
            .expect("insert should succeed");
    }

    let mut local = build_controller(AdminEntity::Developers, &config, &repo);
    local.refresh();
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        local.sort_by("name");
        let mut query = PageQuery::first_page(10);
        query.sort = Some(SortSpec {
            column: "name".to_string(),
            direction,
        });
        let remote: Vec<String> = RowSource::<Developer>::list_rows(repo.as_ref(), &query)
            .expect("listing should succeed")
            .rows
            .into_iter()
            .map(|row| row.record.name)
            .collect();
        assert_eq!(first_cells(&local.snapshot()), remote, "{direction:?}");
    }
    assert_eq!(first_cells(&local.snapshot()), vec!["bob", "ann", "Ann", "ANN"]);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn export_writes_every_filtered_row() {
    let temp_dir = unique_test_dir("export");
    let repo = seeded_repo(&temp_dir);
    let config = AppConfig::with_db_path(repo.db_path().to_path_buf());
    RecordStore::<Developer>::create(repo.as_ref(), &developer("Emaar"))
        .expect("insert should succeed");
    ImportService::new(repo.db_path().to_path_buf())
        .import_inventory_csv(&write_inventory_csv(&temp_dir))
        .expect("import should succeed");

    let mut controller = build_controller(AdminEntity::Developers, &config, &repo);
    controller.refresh();
    controller.set_query("sod");

    let out = temp_dir.join(AdminEntity::Developers.csv_filename());
    let count = controller.export_csv(&out).expect("export should succeed");
    assert_eq!(count, 1);

    let written = fs::read_to_string(&out).expect("export should be readable");
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("name,description,logo_url,created_at,source")
    );
    assert_eq!(lines.next(), Some(r#""Sodic","","","","derived""#));
    assert_eq!(lines.next(), None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn ensure_dir_creates_webview_directory() {
    let temp_dir = unique_test_dir("webview-data-dir");
    let webview_dir = temp_dir.join("webview");

    let created = crate::ensure_dir(&webview_dir).expect("webview data dir should be created");

    assert_eq!(created, webview_dir);
    assert!(created.is_dir(), "webview directory should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}
