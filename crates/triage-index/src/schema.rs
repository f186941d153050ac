use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// Arrow schema of the disease table. `id` is the dense 0-based index
/// shared with the corpus metadata arrays.
pub fn build_arrow_schema(dim: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("disease", DataType::Utf8, false),
        Field::new("department", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dim as i32,
            ),
            true,
        ),
    ]))
}
