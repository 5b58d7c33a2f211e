//! Unit tests for the schema module: DDL parsing and the entity model.

use sql_uml::schema::{
    entity_name, extract_alter_table_name, extract_create_table_name, parse_sql_type, Entity,
    ForeignKey, IndexDef, SchemaBuilder,
};

mod ddl_tests {
    use super::*;

    #[test]
    fn test_extract_create_table_name() {
        assert_eq!(
            extract_create_table_name("CREATE TABLE users (id INT);"),
            Some("users".to_string())
        );
        assert_eq!(
            extract_create_table_name("CREATE TABLE `my_table` (id INT);"),
            Some("my_table".to_string())
        );
        assert_eq!(
            extract_create_table_name("CREATE TABLE IF NOT EXISTS \"users\" (id INT);"),
            Some("users".to_string())
        );
        assert_eq!(
            extract_create_table_name("CREATE TABLE public.orders (id INT);"),
            Some("orders".to_string())
        );
    }

    #[test]
    fn test_extract_alter_table_name() {
        assert_eq!(
            extract_alter_table_name("ALTER TABLE users ADD COLUMN email VARCHAR(255);"),
            Some("users".to_string())
        );
        assert_eq!(
            extract_alter_table_name("ALTER TABLE ONLY public.orders ADD CONSTRAINT x;"),
            Some("orders".to_string())
        );
    }

    #[test]
    fn test_create_table_columns() {
        let mut builder = SchemaBuilder::new();
        builder.parse_create_table(
            "CREATE TABLE users (
               `id` int(11) NOT NULL,
               `email` varchar(255) NOT NULL,
               `balance` decimal(10,2) DEFAULT NULL,
               `status` enum('active','banned') NOT NULL,
               PRIMARY KEY (`id`),
               UNIQUE KEY `uq_email` (`email`)
             );",
        );

        let schema = builder.build();
        let users = schema.get_entity("users").unwrap();
        assert_eq!(users.columns.len(), 4);

        let id = users.get_column("id").unwrap();
        assert!(id.is_primary_key);
        assert!(!id.is_nullable);
        assert_eq!(id.width, Some(11));

        let email = users.get_column("email").unwrap();
        assert_eq!(email.length.as_deref(), Some("255"));

        let balance = users.get_column("balance").unwrap();
        assert_eq!(balance.precision, Some(10));
        assert_eq!(balance.scale, Some(2));
        assert!(balance.is_nullable);

        let status = users.get_column("status").unwrap();
        assert_eq!(status.enum_values, vec!["active", "banned"]);

        assert_eq!(users.indexes.len(), 1);
        assert!(users.indexes[0].is_unique);
    }

    #[test]
    fn test_columns_named_like_constraint_keywords_are_kept() {
        let mut builder = SchemaBuilder::new();
        builder.parse_create_table(
            "CREATE TABLE vouchers (
               id INT NOT NULL PRIMARY KEY,
               unique_code VARCHAR(50) NOT NULL,
               constraint_name VARCHAR(64),
               key_hash CHAR(32),
               UNIQUE KEY uq_code (unique_code)
             );",
        );

        let schema = builder.build();
        let vouchers = schema.get_entity("vouchers").unwrap();
        assert_eq!(vouchers.columns.len(), 4);
        assert!(vouchers.get_column("unique_code").is_some());
        assert!(vouchers.get_column("constraint_name").is_some());
        assert!(vouchers.get_column("key_hash").is_some());

        // The real unique constraint still registers as an index
        assert_eq!(vouchers.indexes.len(), 1);
        assert!(vouchers.indexes[0].is_unique);
    }

    #[test]
    fn test_table_level_foreign_key() {
        let mut builder = SchemaBuilder::new();
        builder.parse_create_table(
            "CREATE TABLE orders (
               id INT NOT NULL PRIMARY KEY,
               user_id INT NOT NULL,
               CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users (id)
             );",
        );

        let schema = builder.build();
        let orders = schema.get_entity("orders").unwrap();
        assert_eq!(orders.foreign_keys.len(), 1);

        let fk = &orders.foreign_keys[0];
        assert_eq!(fk.name.as_deref(), Some("fk_user"));
        assert_eq!(fk.columns, vec!["user_id"]);
        assert_eq!(fk.referenced_table, "users");
        assert_eq!(fk.referenced_columns, vec!["id"]);
        assert!(orders.is_foreign_key_column("user_id"));
        assert!(!orders.is_foreign_key_column("id"));
    }

    #[test]
    fn test_alter_table_adds_foreign_key() {
        let mut builder = SchemaBuilder::new();
        builder.parse_create_table("CREATE TABLE orders (id INT PRIMARY KEY, user_id INT);");
        builder.parse_alter_table(
            "ALTER TABLE orders ADD CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users (id);",
        );

        let schema = builder.build();
        let orders = schema.get_entity("orders").unwrap();
        assert_eq!(orders.foreign_keys.len(), 1);
        assert_eq!(orders.foreign_keys[0].referenced_table, "users");
    }

    #[test]
    fn test_create_index_attaches_to_entity() {
        let mut builder = SchemaBuilder::new();
        builder.parse_create_table("CREATE TABLE users (id INT PRIMARY KEY, email VARCHAR(255));");
        builder.parse_create_index("CREATE UNIQUE INDEX uq_email ON users (email);");
        builder.parse_create_index("CREATE INDEX idx_missing ON ghosts (nothing);");

        let schema = builder.build();
        let users = schema.get_entity("users").unwrap();
        assert_eq!(users.indexes.len(), 1);
        assert_eq!(users.indexes[0].name, "uq_email");
        assert!(users.indexes[0].is_unique);
    }

    #[test]
    fn test_postgres_flavored_ddl() {
        let mut builder = SchemaBuilder::new();
        builder.parse_create_table(
            "CREATE TABLE \"users\" (
               id serial PRIMARY KEY,
               name character varying(40) NOT NULL,
               created_at timestamp(6) without time zone
             );",
        );

        let schema = builder.build();
        let users = schema.get_entity("users").unwrap();
        let name = users.get_column("name").unwrap();
        assert_eq!(name.sql_type, "character varying");
        assert_eq!(name.length.as_deref(), Some("40"));
    }
}

mod model_tests {
    use super::*;

    #[test]
    fn test_entity_name_derivation() {
        assert_eq!(entity_name("users"), "Users");
        assert_eq!(entity_name("cart_items"), "CartItems");
    }

    #[test]
    fn test_parse_sql_type() {
        let col = parse_sql_type("bigint(20) unsigned");
        assert_eq!(col.sql_type, "bigint");
        assert_eq!(col.width, Some(20));

        let col = parse_sql_type("double precision");
        assert_eq!(col.sql_type, "double precision");
    }

    #[test]
    fn test_one_to_one_detection_via_primary_key() {
        let mut profiles = Entity::new("profiles");
        profiles.columns.push({
            let mut col = parse_sql_type("int");
            col.name = "user_id".to_string();
            col.is_primary_key = true;
            col
        });

        let fk = ForeignKey {
            name: None,
            columns: vec!["user_id".to_string()],
            referenced_table: "users".to_string(),
            referenced_columns: vec!["id".to_string()],
        };
        assert!(profiles.foreign_key_is_unique(&fk));
    }

    #[test]
    fn test_composite_unique_index_covers_foreign_key() {
        let mut entity = Entity::new("memberships");
        entity.indexes.push(IndexDef {
            name: "uq_membership".to_string(),
            columns: vec!["team_id".to_string(), "user_id".to_string()],
            is_unique: true,
        });

        let fk = ForeignKey {
            name: None,
            columns: vec!["user_id".to_string(), "team_id".to_string()],
            referenced_table: "memberships_archive".to_string(),
            referenced_columns: vec!["user_id".to_string(), "team_id".to_string()],
        };
        // Column order does not matter for coverage
        assert!(entity.foreign_key_is_unique(&fk));
    }
}
