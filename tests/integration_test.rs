use assert_fs::prelude::*;
use listdsl::schema::{parse_schema, serialize_schema, FieldBuilder, SchemaBuilder};
use listdsl::validation::default_values;
use listdsl::{fingerprint, Config, ListDsl, ListDslError};
use serde_json::json;
use std::path::{Path, PathBuf};

fn sample_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas")
}

#[tokio::test]
async fn test_sample_schemas_check_clean() {
    let mut config = Config::default();
    config.schema_paths = vec![sample_dir()];
    let app = ListDsl::new(config);

    let reports = app.check_all(Path::new(".")).unwrap();
    assert_eq!(reports.len(), 3);

    for report in &reports {
        assert!(report.is_valid(), "{:?}", report);
        let summary = report.summary.as_ref().unwrap();
        assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);
        assert_eq!(report.fingerprint.as_ref().map(String::len), Some(64));
    }

    let task_tracker = reports
        .iter()
        .find(|r| r.path.ends_with("task-tracker.dsl"))
        .unwrap();
    assert_eq!(task_tracker.canonical, Some(true));
    assert_eq!(task_tracker.summary.as_ref().unwrap().stats.field_count, 12);

    let customers = reports
        .iter()
        .find(|r| r.path.ends_with("customer-list.dsl"))
        .unwrap();
    // comments are dropped by canonical formatting
    assert_eq!(customers.canonical, Some(false));
}

#[tokio::test]
async fn test_sample_schemas_round_trip() {
    for name in ["task-tracker.dsl", "customer-list.dsl", "event-registration.dsl"] {
        let text = std::fs::read_to_string(sample_dir().join(name)).unwrap();
        let schema = parse_schema(&text).unwrap();
        let reparsed = parse_schema(&serialize_schema(&schema)).unwrap();
        assert_eq!(schema, reparsed, "{name}");
    }
}

#[tokio::test]
async fn test_discovery_honours_patterns() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("lists/tasks.dsl")
        .write_str("@name: Tasks\ntitle: text\n")
        .unwrap();
    temp.child("lists/archive/old.dsl")
        .write_str("@name: Old\ntitle: text\n")
        .unwrap();
    temp.child("lists/readme.md").write_str("# lists\n").unwrap();
    temp.child("single.dsl")
        .write_str("@name: Single\ntitle: text\n")
        .unwrap();

    let mut config = Config::default();
    config.schema_paths = vec![
        PathBuf::from("lists"),
        PathBuf::from("single.dsl"),
        PathBuf::from("missing"),
    ];
    config.exclude_patterns = vec!["archive/**".to_string()];
    let app = ListDsl::new(config);

    let found = app.discover_schemas(temp.path()).unwrap();
    assert_eq!(
        found,
        vec![temp.path().join("lists/tasks.dsl"), temp.path().join("single.dsl")]
    );
}

#[tokio::test]
async fn test_broken_schema_is_reported_not_raised() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("schemas/broken.dsl")
        .write_str("@name: Broken\ntitle: txt\nstatus select\n")
        .unwrap();
    temp.child("schemas/dangling.dsl")
        .write_str("@name: Bonus\nbonus: number visible_if=tier=gold\n")
        .unwrap();

    let app = ListDsl::new(Config::default());
    let reports = app.check_all(temp.path()).unwrap();
    assert_eq!(reports.len(), 2);

    let broken = &reports[0];
    assert!(broken.path.ends_with("broken.dsl"));
    assert_eq!(broken.parse_errors.len(), 2);
    assert!(broken.parse_errors[0].starts_with("line 2:"));
    assert!(broken.parse_errors[1].starts_with("line 3:"));

    let dangling = &reports[1];
    assert!(!dangling.is_valid());
    let summary = dangling.summary.as_ref().unwrap();
    assert_eq!(summary.errors[0].field, "bonus");
    assert!(summary.errors[0].message.contains("'tier'"));
}

#[tokio::test]
async fn test_load_schema_names_the_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("bad.dsl");
    file.write_str("title: text\n").unwrap();

    let app = ListDsl::new(Config::default());
    match app.load_schema(file.path()) {
        Err(ListDslError::Parse { origin, errors }) => {
            assert!(origin.ends_with("bad.dsl"));
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_event_registration_rows() {
    let app = ListDsl::new(Config::default());
    let schema = app
        .load_schema(&sample_dir().join("event-registration.dsl"))
        .unwrap()
        .schema;

    let mut row = default_values(&schema.fields);
    row.insert("first_name".into(), json!("Ada"));
    row.insert("last_name".into(), json!("Lovelace"));
    row.insert("email".into(), json!("ada@example.com"));

    let result = app.validate_record(&schema, &json!(row.clone())).unwrap();
    assert_eq!(result.error_fields(), vec!["agree_to_terms"]);
    assert_eq!(result.errors[0].message, "I agree to the terms must be checked");

    row.insert("agree_to_terms".into(), json!("on"));
    row.insert("ticket_type".into(), json!("vip"));
    row.insert("quantity".into(), json!(11));
    let result = app.validate_record(&schema, &json!(row)).unwrap();
    assert_eq!(result.error_fields(), vec!["quantity"]);
}

#[tokio::test]
async fn test_builder_and_parser_agree() {
    let built = SchemaBuilder::new("Tasks")
        .field(FieldBuilder::text("title").required())
        .field(FieldBuilder::select("status", ["open", "closed"]).required())
        .build();
    let parsed = parse_schema(
        "@name: Tasks\ntitle: text required\nstatus: select required options=[open,closed]\n",
    )
    .unwrap();

    assert_eq!(built, parsed);
    assert_eq!(fingerprint(&built), fingerprint(&parsed));
}
