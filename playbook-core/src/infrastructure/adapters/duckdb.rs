// playbook-core/src/infrastructure/adapters/duckdb.rs

use duckdb::{Config, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

// Imports Hexagonaux
use crate::domain::dataset::{Cell, Column, Table};
use crate::error::PlaybookError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::dataset_source::DatasetSource;

/// Loads a delimited text, Parquet or Excel file through an in-memory DuckDB.
pub struct DuckDbDatasetSource {
    path: PathBuf,
    conn: Connection,
}

/// Logical cell type derived from the DuckDB column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Bool,
    Int,
    Float,
    Text,
}

impl CellKind {
    fn from_sql_type(sql_type: &str) -> Self {
        let upper = sql_type.to_ascii_uppercase();
        match upper.as_str() {
            "BOOLEAN" => CellKind::Bool,
            "TINYINT" | "SMALLINT" | "INTEGER" | "BIGINT" | "UTINYINT" | "USMALLINT"
            | "UINTEGER" | "UBIGINT" | "HUGEINT" => CellKind::Int,
            "FLOAT" | "REAL" | "DOUBLE" => CellKind::Float,
            t if t.starts_with("DECIMAL") => CellKind::Float,
            _ => CellKind::Text,
        }
    }

    fn parse(self, raw: Option<String>) -> Cell {
        let Some(raw) = raw else {
            return Cell::Missing;
        };
        match self {
            CellKind::Bool => match raw.as_str() {
                "true" => Cell::Bool(true),
                "false" => Cell::Bool(false),
                _ => Cell::Text(raw),
            },
            // Values beyond i64 (UBIGINT, HUGEINT) degrade to floats.
            CellKind::Int => match raw.parse::<i64>() {
                Ok(i) => Cell::Int(i),
                Err(_) => raw.parse::<f64>().map_or(Cell::Text(raw), Cell::from),
            },
            CellKind::Float => raw.parse::<f64>().map_or(Cell::Text(raw), Cell::from),
            CellKind::Text => Cell::Text(raw),
        }
    }
}

impl DuckDbDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, InfrastructureError> {
        let conn = Connection::open_in_memory_with_flags(Config::default())?;
        Ok(Self {
            path: path.into(),
            conn,
        })
    }

    /// Table function reading `path`, chosen by file extension.
    fn scan_expression(&self, path: &Path) -> Result<String, InfrastructureError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let literal = sql_literal(&path.to_string_lossy());

        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(format!("read_csv_auto({})", literal)),
            "parquet" => Ok(format!("read_parquet({})", literal)),
            "xlsx" => {
                // L'extension excel est chargée à la demande.
                self.conn.execute_batch("INSTALL excel; LOAD excel;")?;
                Ok(format!("read_xlsx({})", literal))
            }
            other => Err(InfrastructureError::UnsupportedFormat(other.to_string())),
        }
    }

    fn describe(&self, scan: &str) -> Result<Vec<(String, CellKind)>, InfrastructureError> {
        let mut stmt = self
            .conn
            .prepare(&format!("DESCRIBE SELECT * FROM {}", scan))?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let sql_type: String = row.get(1)?;
            Ok((name, sql_type))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            let (name, sql_type) = row?;
            debug!(column = %name, sql_type = %sql_type, "Column type");
            columns.push((name, CellKind::from_sql_type(&sql_type)));
        }
        Ok(columns)
    }

    fn fetch(&self, scan: &str, schema: &[(String, CellKind)]) -> Result<Table, PlaybookError> {
        if schema.is_empty() {
            return Ok(Table::default());
        }

        let projection = schema
            .iter()
            .map(|(name, _)| format!("CAST({} AS VARCHAR)", sql_identifier(name)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM {}", projection, scan))
            .map_err(InfrastructureError::from)?;

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); schema.len()];
        let mut rows = stmt.query([]).map_err(InfrastructureError::from)?;
        while let Some(row) = rows.next().map_err(InfrastructureError::from)? {
            for (i, (_, kind)) in schema.iter().enumerate() {
                let raw: Option<String> = row.get(i).map_err(InfrastructureError::from)?;
                cells[i].push(kind.parse(raw));
            }
        }

        let columns = schema
            .iter()
            .zip(cells)
            .map(|((name, _), cells)| Column::new(name.clone(), cells))
            .collect();
        Ok(Table::new(columns)?)
    }
}

impl DatasetSource for DuckDbDatasetSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Table, PlaybookError> {
        let path = self.path.as_path();
        if !path.exists() {
            return Err(PlaybookError::Infrastructure(InfrastructureError::Io(
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("dataset not found: {}", path.display()),
                ),
            )));
        }

        let scan = self.scan_expression(path)?;
        let schema = self.describe(&scan)?;
        let table = self.fetch(&scan, &schema)?;

        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "Dataset loaded"
        );
        Ok(table)
    }

    fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn sql_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

fn sql_identifier(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}
