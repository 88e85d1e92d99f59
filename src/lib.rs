//! # condsql: schema-aware condition compiler
//!
//! Turns nested "where" structures and join shorthand into SQL, checking
//! every column and value against a schema snapshot on the way.
//!
//! ## Quick Example
//!
//! ```
//! use condsql::prelude::*;
//! use serde_json::json;
//!
//! let schema = Schema::new().with_table(
//!     TableSchema::new("users")
//!         .column(ColumnSchema::new("id", "int"))
//!         .column(ColumnSchema::new("role", "varchar").length(20)),
//! );
//! let compiler = Compiler::new(&schema, &MysqlQuoter);
//!
//! let sql = compiler
//!     .compile_condition(
//!         &json!({"OR": {"role": "admin", "id": ["IN", [1, 2]]}}),
//!         &CompileOptions::new("users"),
//!     )
//!     .unwrap();
//! assert_eq!(sql, "(`users`.`role` = 'admin' OR `users`.`id` IN ('1','2'))");
//! ```
//!
//! ## Condition grammar
//!
//! | Input                              | SQL                         |
//! |------------------------------------|-----------------------------|
//! | `{"a": 1}`                         | `` `t`.`a` = '1' ``         |
//! | `{"a": [">=", 1]}`                 | `` `t`.`a` >= '1' ``        |
//! | `{"a": null}`                      | `` `t`.`a` IS NULL ``       |
//! | `{"a": ["BETWEEN", [1, 5]]}`       | `` `t`.`a` BETWEEN '1' AND '5' `` |
//! | `{"a": ["IN", []]}`                | `(1=2)`                     |
//! | `{"OR": {...}}`                    | `(... OR ...)`              |
//! | `["raw sql"]`                      | `(raw sql)`                 |

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod schema;
pub mod transpiler;
pub mod validator;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::parser::{normalize_joins, parse_condition};
    pub use crate::schema::{ColumnSchema, ColumnType, ForeignKeyRef, Schema, SchemaProvider, TableSchema};
    pub use crate::transpiler::dml::OrderBy;
    pub use crate::transpiler::{
        resolve_column, serialize_value, AnsiQuoter, CompileOptions, Compiler, MysqlQuoter, Quoter,
        ResolvedColumn, SelectQuery,
    };
    pub use crate::validator::validate;
}
