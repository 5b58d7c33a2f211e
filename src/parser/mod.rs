//! Streaming SQL statement reading and dialect detection.
//!
//! Schema files are consumed one statement at a time. Statement boundaries are
//! found by scanning for `;` outside of string literals, so quoted defaults
//! containing semicolons do not split a statement in half.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Classification of a single SQL statement, limited to the statement kinds
/// that carry schema information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Unknown,
    CreateTable,
    AlterTable,
    CreateIndex,
}

static CREATE_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*CREATE\s+TABLE\b").unwrap());

static ALTER_TABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*ALTER\s+TABLE\b").unwrap());

static CREATE_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*CREATE\s+(?:UNIQUE\s+)?INDEX\b").unwrap());

/// Reader that yields SQL statements one at a time from a byte stream.
pub struct StatementReader<R: Read> {
    reader: BufReader<R>,
    stmt_buffer: Vec<u8>,
}

impl<R: Read> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, READ_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, buffer_size: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(buffer_size, reader),
            stmt_buffer: Vec::with_capacity(8 * 1024),
        }
    }

    /// Read the next statement, including its terminating `;`.
    ///
    /// Returns `None` at end of input. The final statement is returned even
    /// when the file is missing its trailing semicolon.
    pub fn read_statement(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        self.stmt_buffer.clear();

        let mut inside_single_quote = false;
        let mut inside_double_quote = false;
        let mut escaped = false;

        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                if self.stmt_buffer.is_empty() {
                    return Ok(None);
                }
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            let mut consumed = 0;
            let mut found_terminator = false;

            for (i, &b) in buf.iter().enumerate() {
                let inside_string = inside_single_quote || inside_double_quote;

                if escaped {
                    escaped = false;
                    continue;
                }

                if b == b'\\' && inside_string {
                    escaped = true;
                    continue;
                }

                if b == b'\'' && !inside_double_quote {
                    inside_single_quote = !inside_single_quote;
                } else if b == b'"' && !inside_single_quote {
                    inside_double_quote = !inside_double_quote;
                } else if b == b';' && !inside_string {
                    self.stmt_buffer.extend_from_slice(&buf[..=i]);
                    consumed = i + 1;
                    found_terminator = true;
                    break;
                }
            }

            if found_terminator {
                self.reader.consume(consumed);
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            self.stmt_buffer.extend_from_slice(buf);
            let len = buf.len();
            self.reader.consume(len);
        }
    }
}

/// Strip leading `--` line comments and `/* */` block comments from a
/// statement. Dump files usually prefix each statement with a comment banner.
pub fn strip_leading_comments(stmt: &str) -> &str {
    let mut rest = stmt;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("--") {
            match after.find('\n') {
                Some(pos) => rest = &after[pos + 1..],
                None => return "",
            }
        } else if let Some(after) = rest.strip_prefix("/*") {
            match after.find("*/") {
                Some(pos) => rest = &after[pos + 2..],
                None => return "",
            }
        } else {
            return rest;
        }
    }
}

/// Classify a statement by its leading keyword, ignoring comment banners.
pub fn classify_statement(stmt: &str) -> StatementType {
    let body = strip_leading_comments(stmt);

    if CREATE_TABLE_RE.is_match(body) {
        StatementType::CreateTable
    } else if ALTER_TABLE_RE.is_match(body) {
        StatementType::AlterTable
    } else if CREATE_INDEX_RE.is_match(body) {
        StatementType::CreateIndex
    } else {
        StatementType::Unknown
    }
}

/// SQL dialect of the schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    MySql,
    Postgres,
    Sqlite,
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
            SqlDialect::Postgres => write!(f, "postgres"),
            SqlDialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(SqlDialect::Postgres),
            "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: mysql, postgres, sqlite",
                s
            )),
        }
    }
}

/// Confidence level of dialect auto-detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectConfidence {
    High,
    Medium,
    Low,
}

/// Result of dialect auto-detection
#[derive(Debug, Clone, Copy)]
pub struct DialectDetection {
    pub dialect: SqlDialect,
    pub confidence: DialectConfidence,
}

const MYSQL_MARKERS: &[&str] = &["ENGINE=", "`", "AUTO_INCREMENT", "/*!", "UNLOCK TABLES"];
const POSTGRES_MARKERS: &[&str] = &[
    "SERIAL",
    "SET SEARCH_PATH",
    "PG_CATALOG",
    "BYTEA",
    "OWNER TO",
    "::",
];
const SQLITE_MARKERS: &[&str] = &["AUTOINCREMENT", "PRAGMA", "SQLITE_SEQUENCE", "WITHOUT ROWID"];

/// Detect the SQL dialect from the first chunk of a schema file.
pub fn detect_dialect(header: &[u8]) -> DialectDetection {
    let text = String::from_utf8_lossy(header).to_uppercase();

    let score = |markers: &[&str]| markers.iter().filter(|m| text.contains(*m)).count();

    let mysql = score(MYSQL_MARKERS);
    let postgres = score(POSTGRES_MARKERS);
    let sqlite = score(SQLITE_MARKERS);

    let best = mysql.max(postgres).max(sqlite);
    let dialect = if best == 0 || best == mysql {
        SqlDialect::MySql
    } else if best == postgres {
        SqlDialect::Postgres
    } else {
        SqlDialect::Sqlite
    };

    let runner_up = match dialect {
        SqlDialect::MySql => postgres.max(sqlite),
        SqlDialect::Postgres => mysql.max(sqlite),
        SqlDialect::Sqlite => mysql.max(postgres),
    };

    let confidence = if best >= 2 && runner_up == 0 {
        DialectConfidence::High
    } else if best > runner_up {
        DialectConfidence::Medium
    } else {
        DialectConfidence::Low
    };

    DialectDetection {
        dialect,
        confidence,
    }
}
