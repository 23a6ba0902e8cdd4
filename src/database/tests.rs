use super::*;
use crate::record::MAX_NAME_LEN;
use tempfile::TempDir;

// 128-byte pages keep the fixtures small: 3 schema descriptors max,
// 6 rows of 20 bytes per data page.
const PAGE: u32 = 128;

fn test_config(dir: &TempDir) -> Config {
    Config::builder()
        .data_dir(dir.path())
        .page_size(PAGE)
        .build()
}

fn t1_attrs() -> Vec<(String, String)> {
    vec![
        ("id".to_string(), "int".to_string()),
        ("name".to_string(), "char".to_string()),
    ]
}

fn row(id: &str, name: &str) -> NamedValues {
    [
        ("id".to_string(), id.to_string()),
        ("name".to_string(), name.to_string()),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_scenario_create_insert_select_describe() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    db.create_table("t1", &t1_attrs()).unwrap();
    db.insert_row("t1", &row("1", "alice")).unwrap();
    db.insert_row("t1", &row("2", "bob")).unwrap();

    let rows = db.select_all("t1").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], row("1", "alice"));
    assert_eq!(rows[1], row("2", "bob"));

    let attrs = db.describe_table("t1").unwrap();
    assert_eq!(
        attrs,
        vec![
            ("id".to_string(), "int".to_string()),
            ("name".to_string(), "char".to_string()),
        ]
    );

    assert_eq!(db.list_tables(), vec!["t1".to_string()]);
}

#[test]
fn test_duplicate_table_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    db.create_table("t1", &t1_attrs()).unwrap();
    let result = db.create_table("t1", &t1_attrs());
    assert!(matches!(result, Err(DatabaseError::DuplicateTable(_))));
    assert_eq!(db.list_tables().len(), 1);
}

#[test]
fn test_long_table_name_leaves_catalog_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    let name = "x".repeat(MAX_NAME_LEN + 1);
    let result = db.create_table(&name, &t1_attrs());
    assert!(matches!(
        result,
        Err(DatabaseError::Record(RecordError::NameTooLong(_)))
    ));
    assert!(db.list_tables().is_empty());
}

#[test]
fn test_unsupported_attr_type_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    let attrs = vec![("id".to_string(), "float".to_string())];
    let result = db.create_table("t1", &attrs);
    assert!(matches!(
        result,
        Err(DatabaseError::Record(RecordError::UnsupportedAttrType(_)))
    ));
    assert!(db.list_tables().is_empty());
}

#[test]
fn test_empty_attribute_list_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    let result = db.create_table("t1", &[]);
    assert!(matches!(
        result,
        Err(DatabaseError::Record(RecordError::EmptySchema(_)))
    ));
}

#[test]
fn test_schema_overflow_rejected_at_creation() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    // 128-byte pages hold (128 - 28) / 32 = 3 descriptors; ask for 4.
    let attrs: Vec<(String, String)> = (0..4)
        .map(|i| (format!("a{i}"), "int".to_string()))
        .collect();
    let result = db.create_table("t1", &attrs);
    assert!(matches!(
        result,
        Err(DatabaseError::Record(RecordError::SchemaOverflow { .. }))
    ));
    assert!(db.list_tables().is_empty());
}

#[test]
fn test_insert_into_unknown_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();

    let result = db.insert_row("nope", &row("1", "a"));
    assert!(matches!(result, Err(DatabaseError::TableNotFound(_))));
    assert!(matches!(
        db.select_all("nope"),
        Err(DatabaseError::TableNotFound(_))
    ));
    assert!(matches!(
        db.describe_table("nope"),
        Err(DatabaseError::TableNotFound(_))
    ));
}

#[test]
fn test_insert_rejections_leave_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();
    db.insert_row("t1", &row("1", "a")).unwrap();

    // Wrong attribute count.
    let short: NamedValues = [("id".to_string(), "2".to_string())].into_iter().collect();
    assert!(matches!(
        db.insert_row("t1", &short),
        Err(DatabaseError::Record(RecordError::SchemaMismatch { .. }))
    ));

    // 17-byte char value.
    assert!(matches!(
        db.insert_row("t1", &row("2", "seventeen-bytes!!")),
        Err(DatabaseError::Record(RecordError::ValueTooLong { .. }))
    ));

    assert_eq!(db.select_all("t1").unwrap().len(), 1);
}

#[test]
fn test_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut db = Database::open(&config).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();
    db.insert_row("t1", &row("1", "alice")).unwrap();
    db.insert_row("t1", &row("2", "bob")).unwrap();
    db.close().unwrap();

    let mut db = Database::open(&config).unwrap();
    assert_eq!(db.list_tables(), vec!["t1".to_string()]);
    assert_eq!(
        db.describe_table("t1").unwrap(),
        vec![
            ("id".to_string(), "int".to_string()),
            ("name".to_string(), "char".to_string()),
        ]
    );
    let rows = db.select_all("t1").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], row("1", "alice"));
    assert_eq!(rows[1], row("2", "bob"));
}

#[test]
fn test_reopen_keeps_page_size_from_header() {
    let dir = tempfile::tempdir().unwrap();

    let db = Database::open(&test_config(&dir)).unwrap();
    db.close().unwrap();

    // Reopening with a different configured page size must defer to the
    // header written at creation time.
    let config = Config::builder()
        .data_dir(dir.path())
        .page_size(4096)
        .build();
    let db = Database::open(&config).unwrap();
    assert_eq!(db.page_size(), PAGE);
}

#[test]
fn test_inserts_survive_reopen_across_pages() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut db = Database::open(&config).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();
    // 6 rows per page; 15 rows span 3 pages.
    for i in 0..15u32 {
        db.insert_row("t1", &row(&i.to_string(), &format!("u{i}"))).unwrap();
    }
    db.close().unwrap();

    let mut db = Database::open(&config).unwrap();
    let rows = db.select_all("t1").unwrap();
    assert_eq!(rows.len(), 15);
    for (i, r) in rows.iter().enumerate() {
        assert_eq!(r["id"], i.to_string());
        assert_eq!(r["name"], format!("u{i}"));
    }
}

#[test]
fn test_table_ordinals_stable_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut db = Database::open(&config).unwrap();
    db.create_table("zz", &t1_attrs()).unwrap();
    db.create_table("aa", &t1_attrs()).unwrap();
    db.insert_row("zz", &row("1", "z")).unwrap();
    db.close().unwrap();

    let meta = dir.path().join(META_FILE_NAME);
    let first = std::fs::read(&meta).unwrap();

    // A reopen plus a no-op-then-mutate cycle must not shuffle which
    // metadata page each table occupies.
    let mut db = Database::open(&config).unwrap();
    db.insert_row("aa", &row("2", "a")).unwrap();
    db.close().unwrap();

    let second = std::fs::read(&meta).unwrap();
    assert_eq!(first.len(), second.len());
    // Page 1 still belongs to "zz", page 2 to "aa".
    let page = PAGE as usize;
    assert_eq!(&first[page..page + 2], b"zz");
    assert_eq!(&second[page..page + 2], b"zz");
    assert_eq!(&first[2 * page..2 * page + 2], b"aa");
    assert_eq!(&second[2 * page..2 * page + 2], b"aa");

    let mut db = Database::open(&config).unwrap();
    assert_eq!(db.select_all("zz").unwrap().len(), 1);
    assert_eq!(db.select_all("aa").unwrap().len(), 1);
}

#[test]
fn test_flush_all_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();
    db.insert_row("t1", &row("1", "alice")).unwrap();

    db.flush_all().unwrap();
    let meta_first = std::fs::read(dir.path().join(META_FILE_NAME)).unwrap();
    let table_first = std::fs::read(dir.path().join("t1.bin")).unwrap();

    db.flush_all().unwrap();
    assert_eq!(
        std::fs::read(dir.path().join(META_FILE_NAME)).unwrap(),
        meta_first
    );
    assert_eq!(std::fs::read(dir.path().join("t1.bin")).unwrap(), table_first);
}

#[test]
fn test_header_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(&test_config(&dir)).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();
    db.close().unwrap();

    let meta = std::fs::read(dir.path().join(META_FILE_NAME)).unwrap();
    assert_eq!(u32::from_le_bytes(meta[0..4].try_into().unwrap()), PAGE);
    assert_eq!(u32::from_le_bytes(meta[4..8].try_into().unwrap()), 1);
}

#[test]
fn test_missing_table_file_aborts_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut db = Database::open(&config).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();
    db.close().unwrap();

    std::fs::remove_file(dir.path().join("t1.bin")).unwrap();
    let result = Database::open(&config);
    assert!(matches!(
        result,
        Err(DatabaseError::File(FileError::FileNotFound(_)))
    ));
}

#[test]
fn test_tiny_page_size_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::builder()
        .data_dir(dir.path())
        .page_size(32)
        .build();
    let result = Database::open(&config);
    assert!(matches!(result, Err(DatabaseError::InvalidPageSize(32))));
}

#[test]
fn test_create_table_is_memory_only_until_flush() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut db = Database::open(&config).unwrap();
    db.create_table("t1", &t1_attrs()).unwrap();

    // Header still says zero tables until the flush runs.
    let meta = std::fs::read(dir.path().join(META_FILE_NAME)).unwrap();
    assert_eq!(u32::from_le_bytes(meta[4..8].try_into().unwrap()), 0);

    db.flush_all().unwrap();
    let meta = std::fs::read(dir.path().join(META_FILE_NAME)).unwrap();
    assert_eq!(u32::from_le_bytes(meta[4..8].try_into().unwrap()), 1);
}

#[test]
fn test_shared_database_serializes_front_ends() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&test_config(&dir)).unwrap();
    let shared = SharedDatabase::new(db);

    shared.create_table("t1", &t1_attrs()).unwrap();

    let writer = shared.clone();
    let handle = std::thread::spawn(move || {
        for i in 0..50u32 {
            writer.insert_row("t1", &row(&i.to_string(), "w")).unwrap();
        }
    });

    // Concurrent reads through the same facade must never observe torn
    // state, only a prefix of the writer's inserts.
    for _ in 0..50 {
        let n = shared.select_all("t1").unwrap().len();
        assert!(n <= 50);
    }
    handle.join().unwrap();

    assert_eq!(shared.select_all("t1").unwrap().len(), 50);
    shared.shutdown().unwrap();
}
