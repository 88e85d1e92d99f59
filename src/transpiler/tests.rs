use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

use super::*;
use crate::ast::{Condition, SortOrder};
use crate::error::{CompileError, CompileResult};
use crate::schema::{ColumnSchema, Schema, TableSchema};

fn fixture() -> Schema {
    Schema::new()
        .with_table(
            TableSchema::new("users")
                .column(ColumnSchema::new("id", "int"))
                .column(ColumnSchema::new("email", "varchar").length(20))
                .column(ColumnSchema::new("nickname", "varchar").nullable())
                .column(ColumnSchema::new("age", "int"))
                .column(ColumnSchema::new("home", "point"))
                .column(ColumnSchema::new("created_at", "datetime")),
        )
        .with_table(
            TableSchema::new("posts")
                .column(ColumnSchema::new("id", "int"))
                .column(ColumnSchema::new("title", "varchar").length(100))
                .column(ColumnSchema::new("user_id", "int").references("users", "id"))
                .column(
                    ColumnSchema::new("editor_id", "int")
                        .nullable()
                        .references("users", "id"),
                ),
        )
        .with_table(
            TableSchema::new("comments")
                .column(ColumnSchema::new("id", "int"))
                .column(ColumnSchema::new("post_id", "int").references("posts", "id"))
                .column(ColumnSchema::new("body", "varchar")),
        )
        .with_table(
            TableSchema::new("tags")
                .column(ColumnSchema::new("id", "int"))
                .column(ColumnSchema::new("label", "varchar").length(32)),
        )
}

fn where_sql(table: &str, input: Json) -> CompileResult<String> {
    let schema = fixture();
    Compiler::new(&schema, &MysqlQuoter).compile_condition(&input, &CompileOptions::new(table))
}

fn join_sql(origin: &str, raw: Json) -> CompileResult<String> {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let joins = compiler.normalize_joins(origin, None, &raw)?;
    let clauses = joins
        .iter()
        .map(|j| compiler.render_join_clause(j, true))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(clauses.join(" "))
}

// ============================================================================
// Conditions
// ============================================================================

#[test]
fn test_insertion_order_preserved() {
    assert_eq!(
        where_sql("users", json!({"id": 1, "age": 2})).unwrap(),
        "`users`.`id` = '1' AND `users`.`age` = '2'"
    );
    assert_eq!(
        where_sql("users", json!({"age": 2, "id": 1})).unwrap(),
        "`users`.`age` = '2' AND `users`.`id` = '1'"
    );
}

#[test]
fn test_comparison() {
    assert_eq!(
        where_sql("users", json!({"age": [">=", 18]})).unwrap(),
        "`users`.`age` >= '18'"
    );
    assert_eq!(
        where_sql("users", json!({"age": ["<>", 3]})).unwrap(),
        "`users`.`age` <> '3'"
    );
}

#[test]
fn test_between() {
    assert_eq!(
        where_sql("users", json!({"age": ["BETWEEN", [18, 30]]})).unwrap(),
        "`users`.`age` BETWEEN '18' AND '30'"
    );
    assert_eq!(
        where_sql("users", json!({"age": ["between", [null, 30]]})).unwrap_err(),
        CompileError::BadBetweenShape("age".into())
    );
    assert_eq!(
        where_sql("users", json!({"age": ["BETWEEN", [1, 2, 3]]})).unwrap_err(),
        CompileError::BadBetweenShape("age".into())
    );
    assert_eq!(
        where_sql("users", json!({"age": ["BETWEEN", 5]})).unwrap_err(),
        CompileError::BadBetweenShape("age".into())
    );
}

#[test]
fn test_in_lists() {
    assert_eq!(
        where_sql("users", json!({"id": ["IN", [1, 2]]})).unwrap(),
        "`users`.`id` IN ('1','2')"
    );
    assert_eq!(
        where_sql("users", json!({"id": ["not in", [3]]})).unwrap(),
        "`users`.`id` NOT IN ('3')"
    );
    assert_eq!(
        where_sql("users", json!({"id": ["IN", 5]})).unwrap_err(),
        CompileError::OperatorNeedsArray("IN".into())
    );
}

#[test]
fn test_empty_in_is_impossible() {
    assert_eq!(where_sql("users", json!({"id": ["IN", []]})).unwrap(), "(1=2)");
}

#[test]
fn test_empty_not_in_is_dropped() {
    assert_eq!(
        where_sql("users", json!({"id": ["NOT IN", []], "age": 3})).unwrap(),
        "`users`.`age` = '3'"
    );
    assert_eq!(where_sql("users", json!({"id": ["NOT IN", []]})).unwrap(), "");
}

#[test]
fn test_or_group() {
    assert_eq!(
        where_sql("users", json!({"OR": {"id": 1, "age": 2}})).unwrap(),
        "(`users`.`id` = '1' OR `users`.`age` = '2')"
    );
}

#[test]
fn test_nested_groups() {
    let sql = where_sql(
        "users",
        json!({
            "email": "a@b.c",
            "OR": {
                "age": ["<", 18],
                "AND": {"id": 1, "nickname": null}
            }
        }),
    )
    .unwrap();
    assert_eq!(
        sql,
        "`users`.`email` = 'a@b.c' AND (`users`.`age` < '18' OR (`users`.`id` = '1' AND `users`.`nickname` IS NULL))"
    );
}

#[test]
fn test_empty_group_dropped() {
    assert_eq!(
        where_sql("users", json!({"id": 1, "OR": {"id": ["NOT IN", []]}})).unwrap(),
        "`users`.`id` = '1'"
    );
    assert_eq!(where_sql("users", json!({"OR": {}})).unwrap(), "");
}

#[test]
fn test_raw_fragment() {
    assert_eq!(
        where_sql("users", json!(["age > 3", {"OR": {"id": 1}}])).unwrap(),
        "(age > 3) AND (`users`.`id` = '1')"
    );
}

#[test]
fn test_integer_shorthand() {
    assert_eq!(where_sql("users", json!(7)).unwrap(), "`users`.`id` = '7'");
    assert_eq!(where_sql("users", Json::Null).unwrap(), "");
}

#[test]
fn test_null_rewrite() {
    assert_eq!(
        where_sql("users", json!({"nickname": null})).unwrap(),
        "`users`.`nickname` IS NULL"
    );
    assert_eq!(
        where_sql("users", json!({"nickname": ["!=", null]})).unwrap(),
        "`users`.`nickname` IS NOT NULL"
    );
    assert_eq!(
        where_sql("users", json!({"nickname": [">", null]})).unwrap_err(),
        CompileError::NullWithUnsupportedOperator(">".into())
    );
}

#[test]
fn test_null_not_allowed() {
    assert_eq!(
        where_sql("users", json!({"email": null})).unwrap_err(),
        CompileError::NullNotAllowed {
            table: "users".into(),
            column: "email".into()
        }
    );
}

#[test]
fn test_assignment_list_keeps_equals_null() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let sql = compiler
        .compile_condition(
            &json!({"nickname": null, "age": 3}),
            &CompileOptions::assignments("users"),
        )
        .unwrap();
    assert_eq!(sql, "`users`.`nickname` = NULL , `users`.`age` = '3'");
}

#[test]
fn test_validation_errors() {
    let long = "x".repeat(21);
    assert_eq!(
        where_sql("users", json!({"email": long})).unwrap_err(),
        CompileError::LengthExceeded {
            table: "users".into(),
            column: "email".into(),
            max: 20,
            actual: 21
        }
    );
    assert_eq!(
        where_sql("users", json!({"age": "abc"})).unwrap_err(),
        CompileError::NotNumeric {
            table: "users".into(),
            column: "age".into()
        }
    );
    assert_eq!(
        where_sql("users", json!({"created_at": "yesterday"})).unwrap_err(),
        CompileError::BadTemporalFormat {
            table: "users".into(),
            column: "created_at".into()
        }
    );
    assert_eq!(
        where_sql("users", json!({"home": ["=", "here"]})).unwrap_err(),
        CompileError::BadPointFormat {
            table: "users".into(),
            column: "home".into()
        }
    );
}

#[test]
fn test_validation_off() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let long = "x".repeat(21);
    let opts = CompileOptions::new("users").validate(false);
    let sql = compiler
        .compile_condition(&json!({"email": long, "age": "abc"}), &opts)
        .unwrap();
    assert_eq!(
        sql,
        format!("`users`.`email` = '{}' AND `users`.`age` = 'abc'", long)
    );

    // Unknown columns are still rejected.
    assert!(matches!(
        compiler.compile_condition(&json!({"nope": 1}), &opts),
        Err(CompileError::UnknownColumnInTable { .. })
    ));
}

#[test]
fn test_unknown_column_suggestion() {
    assert_eq!(
        where_sql("users", json!({"agee": 3})).unwrap_err(),
        CompileError::UnknownColumnInTable {
            table: "users".into(),
            column: "agee".into(),
            suggestion: Some("age".into())
        }
    );
}

#[test]
fn test_unknown_table() {
    assert_eq!(
        where_sql("nope", json!({"a": 1})).unwrap_err(),
        CompileError::UnknownTable("nope".into())
    );
}

#[test]
fn test_no_table_skips_schema() {
    let schema = Schema::new();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let sql = compiler
        .compile_condition(&json!({"anything": 1}), &CompileOptions::default())
        .unwrap();
    assert_eq!(sql, "`anything` = '1'");
}

#[test]
fn test_temporal_and_point_values() {
    assert_eq!(
        where_sql("users", json!({"created_at": [">", "2024-01-02 03:04:05"]})).unwrap(),
        "`users`.`created_at` > '2024-01-02 03:04:05'"
    );
    assert_eq!(
        where_sql("users", json!({"home": [1.5, 2]})).unwrap(),
        "`users`.`home` = POINT(1.5,2)"
    );
}

#[test]
fn test_quoting_delegate() {
    assert_eq!(
        where_sql("users", json!({"nickname": "o'hara"})).unwrap(),
        "`users`.`nickname` = 'o\\'hara'"
    );

    let schema = fixture();
    let sql = Compiler::new(&schema, &AnsiQuoter)
        .compile_condition(&json!({"nickname": "o'hara"}), &CompileOptions::new("users"))
        .unwrap();
    assert_eq!(sql, "`users`.`nickname` = 'o''hara'");
}

#[test]
fn test_bool_serialization() {
    assert_eq!(
        where_sql("users", json!({"nickname": true})).unwrap(),
        "`users`.`nickname` = '1'"
    );
}

#[test]
fn test_match_against() {
    assert_eq!(
        where_sql("users", json!([[["email", "nickname"], "MATCH", "ada"]])).unwrap(),
        "MATCH(`users`.`email`,`users`.`nickname`) AGAINST('ada')"
    );
    assert!(matches!(
        where_sql("users", json!([[["email", "bio"], "MATCH", "ada"]])),
        Err(CompileError::UnknownColumnInTable { .. })
    ));
}

#[test]
fn test_operator_sanitized() {
    assert_eq!(
        where_sql("users", json!({"age": ["=`;", 1]})).unwrap(),
        "`users`.`age` = '1'"
    );
}

#[test]
fn test_alias_rendering() {
    let schema = fixture();
    let sql = Compiler::new(&schema, &MysqlQuoter)
        .compile_condition(&json!({"id": 1}), &CompileOptions::new("users").alias(Some("u")))
        .unwrap();
    assert_eq!(sql, "`u`.`id` = '1'");
}

#[test]
fn test_compile_is_idempotent() {
    let input = json!({"OR": {"id": ["IN", [1, 2]], "nickname": null}, "age": [">", 1]});
    let first = where_sql("users", input.clone()).unwrap();
    let second = where_sql("users", input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compile_decoded_conditions() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let conditions = vec![
        Condition::eq("id", 1),
        Condition::or(vec![Condition::op("age", ">", 3), Condition::raw("1=1")]),
    ];
    let sql = compiler.compile(&conditions, &CompileOptions::new("users")).unwrap();
    assert_eq!(sql, "`users`.`id` = '1' AND (`users`.`age` > '3' OR (1=1))");
}

// ============================================================================
// Join projections in conditions
// ============================================================================

#[test]
fn test_join_projection_resolution() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let joins = compiler
        .normalize_joins(
            "posts",
            None,
            &json!({"users": {"alias": "author", "fields": {"email": "author_email"}}}),
        )
        .unwrap();
    let opts = CompileOptions::new("posts").joins(&joins);

    assert_eq!(
        compiler
            .compile_condition(&json!({"author_email": "a@b.c", "title": "x"}), &opts)
            .unwrap(),
        "`author`.`email` = 'a@b.c' AND `posts`.`title` = 'x'"
    );

    // Validated against the joined table.
    assert_eq!(
        compiler
            .compile_condition(&json!({"author_email": "y".repeat(21)}), &opts)
            .unwrap_err(),
        CompileError::LengthExceeded {
            table: "users".into(),
            column: "email".into(),
            max: 20,
            actual: 21
        }
    );

    // Null through a join is accepted even on a non-nullable column.
    assert_eq!(
        compiler
            .compile_condition(&json!({"author_email": null}), &opts)
            .unwrap(),
        "`author`.`email` IS NULL"
    );
}

#[test]
fn test_qualified_column_passthrough() {
    assert_eq!(
        where_sql("posts", json!({"u.whatever": 1})).unwrap(),
        "`u`.`whatever` = '1'"
    );
}

// ============================================================================
// Join clauses
// ============================================================================

#[test]
fn test_inferred_join_forward() {
    assert_eq!(
        join_sql("comments", json!(["posts"])).unwrap(),
        "INNER JOIN `posts` ON `comments`.`post_id` = `posts`.`id`"
    );
}

#[test]
fn test_inferred_join_backward() {
    assert_eq!(
        join_sql("posts", json!(["comments"])).unwrap(),
        "INNER JOIN `comments` ON `posts`.`id` = `comments`.`post_id`"
    );
}

#[test]
fn test_ambiguous_foreign_key() {
    assert_eq!(
        join_sql("posts", json!(["users"])).unwrap_err(),
        CompileError::AmbiguousForeignKey {
            origin: "posts".into(),
            joined: "users".into(),
            candidates: "posts.user_id -> users.id, posts.editor_id -> users.id".into()
        }
    );
}

#[test]
fn test_on_column_disambiguates() {
    assert_eq!(
        join_sql("posts", json!({"users": {"on": "editor_id", "type": "left"}})).unwrap(),
        "LEFT JOIN `users` ON `posts`.`editor_id` = `users`.`id`"
    );
}

#[test]
fn test_no_foreign_key() {
    assert_eq!(
        join_sql("posts", json!(["tags"])).unwrap_err(),
        CompileError::NoForeignKeyFound {
            origin: "posts".into(),
            joined: "tags".into()
        }
    );
}

#[test]
fn test_explicit_pair() {
    assert_eq!(
        join_sql("posts", json!({"tags": {"on": {"id": "id"}}})).unwrap(),
        "INNER JOIN `tags` ON `posts`.`id` = `tags`.`id`"
    );
    assert!(matches!(
        join_sql("posts", json!({"tags": {"on": {"id": "name"}}})),
        Err(CompileError::UnknownColumnInTable { .. })
    ));
}

#[test]
fn test_raw_on_expression() {
    assert_eq!(
        join_sql("posts", json!({"tags": {"on": "tags.id = posts.id", "type": "left"}})).unwrap(),
        "LEFT JOIN `tags` ON (tags.id = posts.id)"
    );
}

#[test]
fn test_cross_join() {
    assert_eq!(
        join_sql("posts", json!([{"table": "tags", "type": "cross"}])).unwrap(),
        "CROSS JOIN `tags`"
    );
}

#[test]
fn test_join_alias_and_filter() {
    assert_eq!(
        join_sql(
            "posts",
            json!({"author": {"table": "users", "on": "user_id", "where": {"age": [">", 18]}}})
        )
        .unwrap(),
        "INNER JOIN `users` AS `author` ON `posts`.`user_id` = `author`.`id` AND (`author`.`age` > '18')"
    );
}

#[test]
fn test_chained_join() {
    assert_eq!(
        join_sql(
            "comments",
            json!([
                {"table": "posts", "alias": "p"},
                {"table": "users", "origin": "p", "on": "user_id"}
            ])
        )
        .unwrap(),
        "INNER JOIN `posts` AS `p` ON `comments`.`post_id` = `p`.`id` INNER JOIN `users` ON `p`.`user_id` = `users`.`id`"
    );
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_insert_and_replace() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let data = json!({"email": "a@b.c", "age": 30});
    assert_eq!(
        compiler.insert("users", &data).unwrap(),
        "INSERT INTO `users` SET `users`.`email` = 'a@b.c' , `users`.`age` = '30'"
    );
    assert_eq!(
        compiler.replace("users", &data).unwrap(),
        "REPLACE INTO `users` SET `users`.`email` = 'a@b.c' , `users`.`age` = '30'"
    );
    assert_eq!(
        compiler.insert("users", &json!({})).unwrap(),
        "INSERT INTO `users`() VALUES()"
    );
}

#[test]
fn test_insert_validates_data() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    assert_eq!(
        compiler.insert("users", &json!({"agee": 1})).unwrap_err(),
        CompileError::UnknownColumn {
            table: "users".into(),
            column: "agee".into(),
            suggestion: Some("age".into())
        }
    );
    assert!(matches!(
        compiler.insert("users", &json!({"email": null})),
        Err(CompileError::NullNotAllowed { .. })
    ));
}

#[test]
fn test_update() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    assert_eq!(
        compiler
            .update("users", &json!({"id": 7}), &json!({"nickname": null}))
            .unwrap(),
        Some("UPDATE `users` SET `users`.`nickname` = NULL WHERE `users`.`id` = '7'".to_string())
    );
    assert_eq!(
        compiler.update("users", &Json::Null, &json!({"age": 1})).unwrap(),
        Some("UPDATE `users` SET `users`.`age` = '1'".to_string())
    );
    assert_eq!(compiler.update("users", &json!(7), &json!({})).unwrap(), None);
}

#[test]
fn test_delete() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    assert_eq!(
        compiler.delete("users", &json!(7)).unwrap(),
        "DELETE FROM `users` WHERE `users`.`id` = '7'"
    );
    assert_eq!(compiler.delete("users", &Json::Null).unwrap(), "DELETE FROM `users`");
}

#[test]
fn test_select_defaults() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    assert_eq!(
        compiler.select(&SelectQuery::new("users")).unwrap(),
        "SELECT `users`.* FROM `users`"
    );
    assert_eq!(
        compiler.select(&SelectQuery::new("users").offset(5)).unwrap(),
        "SELECT `users`.* FROM `users` LIMIT 18446744073709551615 OFFSET 5"
    );
}

#[test]
fn test_select_with_joins() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let query = SelectQuery::new("posts")
        .alias("p")
        .fields(&["id", "title"])
        .joins(json!({"users": {"on": "user_id", "fields": {"email": "author_email"}}}))
        .filter(json!({"author_email": ["LIKE", "%@x.org"]}))
        .group_by("id")
        .order_by("id", SortOrder::Desc)
        .limit(10)
        .offset(20);
    assert_eq!(
        compiler.select(&query).unwrap(),
        "SELECT `p`.`id`, `p`.`title`, `users`.`email` AS `author_email` FROM `posts` AS `p` \
         INNER JOIN `users` ON `p`.`user_id` = `users`.`id` \
         WHERE `users`.`email` LIKE '%@x.org' \
         GROUP BY `p`.`id` ORDER BY `p`.`id` DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn test_select_unknown_fields() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    assert_eq!(
        compiler
            .select(&SelectQuery::new("posts").fields(&["titel"]))
            .unwrap_err(),
        CompileError::UnknownColumnInTable {
            table: "posts".into(),
            column: "titel".into(),
            suggestion: Some("title".into())
        }
    );
    assert!(matches!(
        compiler.select(
            &SelectQuery::new("posts").joins(json!({"users": {"on": "user_id", "fields": ["bio"]}}))
        ),
        Err(CompileError::UnknownColumnInTable { .. })
    ));
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_large_unsigned_ids_kept_exact() {
    assert_eq!(
        where_sql("users", json!({"id": 18446744073709551615u64})).unwrap(),
        "`users`.`id` = '18446744073709551615'"
    );
    assert_eq!(
        where_sql(
            "users",
            json!({"id": ["IN", [9223372036854775808u64, 9223372036854775809u64]]})
        )
        .unwrap(),
        "`users`.`id` IN ('9223372036854775808','9223372036854775809')"
    );
    assert_eq!(
        where_sql("users", json!(u64::MAX)).unwrap(),
        "`users`.`id` = '18446744073709551615'"
    );
}

#[test]
fn test_match_needs_columns() {
    assert_eq!(
        where_sql("users", json!([[[], "MATCH", "x"]])).unwrap_err(),
        CompileError::ColumnMustBeString
    );

    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let conditions = vec![Condition::Predicate(crate::ast::Predicate {
        column: crate::ast::ColumnRef::Many(Vec::new()),
        operator: "MATCH".into(),
        value: "x".into(),
    })];
    assert_eq!(
        compiler
            .compile(&conditions, &CompileOptions::new("users"))
            .unwrap_err(),
        CompileError::ColumnMustBeString
    );
}

#[test]
fn test_ambiguous_foreign_key_backward() {
    assert_eq!(
        join_sql("users", json!(["posts"])).unwrap_err(),
        CompileError::AmbiguousForeignKey {
            origin: "posts".into(),
            joined: "users".into(),
            candidates: "posts.user_id -> users.id, posts.editor_id -> users.id".into()
        }
    );
}

#[test]
fn test_on_column_from_joined_side() {
    assert_eq!(
        join_sql("users", json!({"posts": {"on": "editor_id"}})).unwrap(),
        "INNER JOIN `posts` ON `users`.`id` = `posts`.`editor_id`"
    );
}

#[test]
fn test_join_null_in_list_skips_validation() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    let joins = compiler
        .normalize_joins(
            "posts",
            None,
            &json!({"users": {"alias": "author", "fields": {"email": "author_email"}}}),
        )
        .unwrap();
    let opts = CompileOptions::new("posts").joins(&joins);
    assert_eq!(
        compiler
            .compile_condition(&json!({"author_email": ["IN", [null, "a"]]}), &opts)
            .unwrap(),
        "`author`.`email` IN (NULL,'a')"
    );

    // The same list on the origin table is still validated.
    assert_eq!(
        where_sql("users", json!({"email": ["IN", [null, "a"]]})).unwrap_err(),
        CompileError::NullNotAllowed {
            table: "users".into(),
            column: "email".into()
        }
    );
}

#[test]
fn test_select_checks_group_and_order_columns() {
    let schema = fixture();
    let compiler = Compiler::new(&schema, &MysqlQuoter);
    assert!(matches!(
        compiler.select(&SelectQuery::new("posts").group_by("nope")),
        Err(CompileError::UnknownColumnInTable { .. })
    ));
    assert_eq!(
        compiler
            .select(&SelectQuery::new("posts").order_by("titel", SortOrder::Asc))
            .unwrap_err(),
        CompileError::UnknownColumnInTable {
            table: "posts".into(),
            column: "titel".into(),
            suggestion: Some("title".into())
        }
    );

    // Join projections are checked against the joined table.
    let query = SelectQuery::new("posts")
        .joins(json!({"users": {"on": "user_id", "fields": {"email": "author_email"}}}))
        .order_by("author_email", SortOrder::Asc);
    assert_eq!(
        compiler.select(&query).unwrap(),
        "SELECT `posts`.*, `users`.`email` AS `author_email` FROM `posts` \
         INNER JOIN `users` ON `posts`.`user_id` = `users`.`id` ORDER BY `users`.`email` ASC"
    );
}
