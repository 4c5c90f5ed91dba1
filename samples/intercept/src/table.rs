//! Plain-text coordinate tables.
//!
//! One row per line, values separated by commas and/or whitespace. Blank lines and lines
//! starting with `#` are skipped.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use nalgebra::DMatrix;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("couldn't read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path:?}, line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error(transparent)]
    Write(#[from] io::Error),
}

#[tracing::instrument]
pub fn read_table(path: &Path) -> Result<DMatrix<f64>, TableError> {
    let text = fs::read_to_string(path).map_err(|source| TableError::Read {
        path: path.to_owned(),
        source,
    })?;
    let table = parse_table(&text).map_err(|(line, message)| TableError::Parse {
        path: path.to_owned(),
        line,
        message,
    })?;
    tracing::debug!(rows = table.nrows(), cols = table.ncols(), "read table");
    Ok(table)
}

/// Parse a table, reporting the 1-based line of the first malformed row.
pub fn parse_table(text: &str) -> Result<DMatrix<f64>, (usize, String)> {
    let mut width = None;
    let mut values = Vec::new();
    let mut rows = 0;
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<f64>().map_err(|e| (idx + 1, format!("{v:?}: {e}"))))
            .collect::<Result<Vec<_>, _>>()?;
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                let found = row.len();
                return Err((idx + 1, format!("expected {w} columns, found {found}")));
            }
            Some(_) => {}
        }
        values.extend(row);
        rows += 1;
    }
    Ok(DMatrix::from_row_slice(rows, width.unwrap_or(3), &values))
}

pub fn write_table(out: &mut impl Write, table: &DMatrix<f64>) -> Result<(), TableError> {
    for row in table.row_iter() {
        let line = row
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_separators() {
        let m = parse_table("# x y z\n1,2,3\n\n4 5\t6\n 7, 8, 9 \n").unwrap();
        let want = nalgebra::dmatrix![1.0, 2.0, 3.0; 4.0, 5.0, 6.0; 7.0, 8.0, 9.0];
        assert_eq!(m, want);
    }

    #[test]
    fn reports_bad_rows() {
        assert_eq!(parse_table("1,2,3\n1,2\n").unwrap_err().0, 2);
        assert_eq!(parse_table("1,2,3\n\n1,two,3\n").unwrap_err().0, 3);
    }

    #[test]
    fn empty_tables() {
        assert_eq!(parse_table("# nothing\n").unwrap().shape(), (0, 3));
    }

    #[test]
    fn writes_rows() {
        let mut out = Vec::new();
        write_table(&mut out, &nalgebra::dmatrix![1.0, 0.5; 2.0, 0.25]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1,0.5\n2,0.25\n");
    }
}
