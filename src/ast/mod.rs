pub mod conditions;
pub mod joins;
pub mod operators;
pub mod values;

pub use self::conditions::{ColumnRef, Condition, Predicate};
pub use self::joins::{FieldProjection, NormalizedJoin, OnEntry, ProjectedField};
pub use self::operators::{Glue, JoinKind, SortOrder};
pub use self::values::Value;
