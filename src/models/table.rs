use serde::Serialize;
use serde_json::{Map, Value};

/// Lays rows out column-first: `{column: {"0": v0, "1": v1, ...}}`.
///
/// Every field seen on any row becomes a column; rows lacking it get `null`
/// at their index so all columns share the same index set.
pub fn to_column_map<T: Serialize>(rows: &[T]) -> Result<Map<String, Value>, serde_json::Error> {
    let records = rows
        .iter()
        .map(|row| -> Result<Map<String, Value>, serde_json::Error> {
            match serde_json::to_value(row)? {
                Value::Object(fields) => Ok(fields),
                other => {
                    let mut fields = Map::new();
                    fields.insert("value".to_string(), other);
                    Ok(fields)
                }
            }
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;

    let mut columns: Map<String, Value> = Map::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains_key(key) {
                columns.insert(key.clone(), Value::Object(Map::new()));
            }
        }
    }

    for (column, cells) in columns.iter_mut() {
        if let Value::Object(cells) = cells {
            for (index, record) in records.iter().enumerate() {
                let cell = record.get(column).cloned().unwrap_or(Value::Null);
                cells.insert(index.to_string(), cell);
            }
        }
    }

    Ok(columns)
}
