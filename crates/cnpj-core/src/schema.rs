/// Column layout of the results table.
pub mod results {
    use serde_json::{Map, Value};

    use crate::record::CompanyRecord;

    /// Output columns, in write order.
    pub const COLUMNS: [&str; 4] = ["cnpj", "razao_social", "opcao_pelo_simples", "opcao_pelo_mei"];

    /// A generic row keyed by column name.
    pub type Row = Map<String, Value>;

    /// Project a record into a row with exactly the output columns.
    pub fn row_from_record(record: &CompanyRecord) -> Row {
        match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Row::new(),
        }
    }

    /// Columns from [`COLUMNS`] that `row` lacks.
    pub fn missing_columns(row: &Row) -> Vec<&'static str> {
        COLUMNS
            .iter()
            .copied()
            .filter(|col| !row.contains_key(*col))
            .collect()
    }

    /// Pick the output columns out of `row`, in order.
    ///
    /// Returns `None` if any column is missing.
    pub fn project(row: &Row) -> Option<[&Value; 4]> {
        let mut out = [&Value::Null; 4];
        for (slot, col) in out.iter_mut().zip(COLUMNS) {
            *slot = row.get(col)?;
        }
        Some(out)
    }
}
