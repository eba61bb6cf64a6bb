//! Tests for loading entity definitions from disk and extracting them

use entity_metadata::entity::{Column, EntityType, ValueType};
use entity_metadata::{extract_table, MetadataCache, MetadataExtractor, StorageType};
use entity_metadata_cli::{extract_tables, load_entities, load_path, LoadError};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const CUSTOMER_RS: &str = r#"
    use rust_decimal::Decimal;

    pub struct BaseEntity {
        #[column(nullable = false, updatable = false)]
        pub id: i64,
    }

    #[table(name = "t_customer")]
    #[extends(BaseEntity)]
    pub struct Customer {
        #[column(name = "customer_name", length = 64)]
        pub name: String,
        #[column(precision = 12)]
        pub balance: Decimal,
        #[column]
        pub avatar: Vec<u8>,
        #[column]
        pub level: Level,
        #[column]
        pub levels: Vec<Level>,
        #[column]
        #[lob]
        #[enumerated]
        pub status: Status,
        #[column]
        pub external_ref: uuid::Uuid,
        #[collection_table(name = "addr_tbl")]
        pub address: Address,
        pub scratch: String,
    }

    impl Customer {
        #[column_name = "display_name"]
        pub fn display(&self) -> String {
            self.name.clone()
        }
    }

    pub struct Address {
        #[column]
        pub street: String,
        #[column(name = "zip_code")]
        pub zip: String,
    }

    #[dict]
    pub enum Level {
        #[value = 1i64]
        Low,
        #[value = 2i64]
        High,
    }

    pub enum Status {
        Active,
        Closed,
    }
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn find<'a>(entities: &'a [Arc<EntityType>], name: &str) -> &'a EntityType {
    entities.iter().find(|e| e.name() == name).unwrap()
}

#[test]
fn test_rust_source_extraction() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "customer.rs", CUSTOMER_RS);

    let entities = load_entities(&path).unwrap();
    let table = extract_table(find(&entities, "Customer")).unwrap();

    assert_eq!(table.name, "t_customer");
    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "customer_name",
            "balance",
            "avatar",
            "level",
            "levels",
            "status",
            "external_ref",
            "addr_tbl.street",
            "addr_tbl.zip_code",
            "display_name",
        ]
    );

    let storage = |name: &str| table.column(name).unwrap().storage_type;
    assert_eq!(storage("id"), StorageType::Bigint);
    assert_eq!(storage("customer_name"), StorageType::Varchar);
    assert_eq!(storage("balance"), StorageType::Decimal);
    assert_eq!(storage("avatar"), StorageType::Blob);
    assert_eq!(storage("level"), StorageType::Bigint);
    assert_eq!(storage("levels"), StorageType::Bigint);
    assert_eq!(storage("status"), StorageType::Varchar);
    assert_eq!(storage("external_ref"), StorageType::Other);

    let id = table.column("id").unwrap();
    assert!(id.not_null);
    assert!(id.is_read_only());

    let street = table.column("addr_tbl.street").unwrap();
    assert_eq!(street.alias, "address.street");
    assert_eq!(table.column("display_name").unwrap().alias, "display");
    assert!(table.column("scratch").is_none());
}

#[test]
fn test_loaded_entity_matches_hand_built() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "person.rs",
        r#"
        #[table_name = "t_person"]
        pub struct Person {
            #[column]
            pub age: i32,
        }
        "#,
    );

    let entities = load_entities(&path).unwrap();
    let hand_built = EntityType::builder("Person")
        .table("t_person")
        .field("age", ValueType::I32, vec![Column::default().into()])
        .build();

    assert_eq!(
        extract_table(find(&entities, "Person")),
        extract_table(&hand_built)
    );
}

#[test]
fn test_toml_document_extraction() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "order.toml",
        r#"
        [[entities]]
        name = "Line"

        [[entities.fields]]
        name = "sku"
        type = "String"
        column = true

        [[entities]]
        name = "Order"
        table_name = "t_order"

        [[entities.fields]]
        name = "total"
        type = "f64"
        column = { precision = 10 }

        [[entities.fields]]
        name = "lines"
        type = "Vec<Line>"
        collection_table = "line_tbl"
        "#,
    );

    let entities = load_entities(&path).unwrap();
    let table = extract_table(find(&entities, "Order")).unwrap();
    assert_eq!(table.columns()[0].storage_type, StorageType::Decimal);
    assert_eq!(table.columns()[0].precision, 10);
    assert_eq!(table.columns()[1].name, "line_tbl.sku");
    assert_eq!(table.columns()[1].alias, "lines.sku");
}

#[test]
fn test_directory_loading_skips_broken_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "model/customer.rs", CUSTOMER_RS);
    write(&dir, "model/broken.rs", "pub struct {");
    write(&dir, "target/generated.rs", "#[table(name = \"t_ignored\")] pub struct Ignored {}");
    write(&dir, "README.md", "not an entity");
    write(
        &dir,
        "person.json",
        r#"{ "entities": [{ "name": "Person", "table": "t_person",
             "fields": [{ "name": "age", "type": "i32", "column": true }] }] }"#,
    );

    let set = load_path(dir.path()).unwrap();
    assert!(set.entity("Customer").is_some());
    assert!(set.entity("Person").is_some());
    assert!(set.entity("Ignored").is_none());

    let entities = set.build().unwrap();
    let cache = MetadataCache::new(Arc::new(MetadataExtractor::default()));
    let tables = extract_tables(&cache, &entities, None).unwrap();
    let mut names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["t_customer", "t_person"]);
}

#[test]
fn test_extract_single_entity() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "customer.rs", CUSTOMER_RS);
    let entities = load_entities(&path).unwrap();
    let cache = MetadataCache::new(Arc::new(MetadataExtractor::default()));

    let tables = extract_tables(&cache, &entities, Some("Customer")).unwrap();
    assert_eq!(tables.len(), 1);

    // Address has no table annotation
    let tables = extract_tables(&cache, &entities, Some("Address")).unwrap();
    assert!(tables.is_empty());

    let err = extract_tables(&cache, &entities, Some("Missing")).unwrap_err();
    assert!(matches!(err, LoadError::UnknownEntity(_)));
}

#[test]
fn test_unsupported_and_missing_files() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "entities.yaml", "name: Person");
    assert!(matches!(
        load_path(&path),
        Err(LoadError::UnsupportedFormat(_))
    ));

    let missing = dir.path().join("missing.rs");
    assert!(matches!(load_path(&missing), Err(LoadError::Io { .. })));
}

#[test]
fn test_missing_superclass_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "child.rs",
        "#[table(name = \"t_child\")] #[extends(Missing)] pub struct Child {}",
    );
    let err = load_entities(&path).unwrap_err();
    assert!(err.to_string().contains("Missing"));
}

const CATEGORY_RS: &str = r#"
    #[table(name = "t_category")]
    pub struct Category {
        #[column]
        pub name: String,
        #[collection_table(name = "featured_tbl")]
        pub featured: SubCategory,
    }
"#;

const SUBCATEGORY_RS: &str = r#"
    #[table(name = "t_subcategory")]
    #[extends(Category)]
    pub struct SubCategory {
        #[column]
        pub rank: i32,
    }
"#;

#[test]
fn test_struct_nesting_its_own_subclass() {
    for source in [
        format!("{}{}", CATEGORY_RS, SUBCATEGORY_RS),
        format!("{}{}", SUBCATEGORY_RS, CATEGORY_RS),
    ] {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "category.rs", &source);
        let entities = load_entities(&path).unwrap();

        let category = extract_table(find(&entities, "Category")).unwrap();
        let names: Vec<&str> = category.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "featured_tbl.name", "featured_tbl.rank"]);
        assert_eq!(category.column("featured_tbl.name").unwrap().alias, "featured.name");

        let subcategory = extract_table(find(&entities, "SubCategory")).unwrap();
        let names: Vec<&str> = subcategory.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "rank"]);
    }
}
