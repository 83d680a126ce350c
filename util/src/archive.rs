//! Struct archiving functionality
//!
//! Records are written as rows of a CSV file inside the session's archive
//! directory. Records must be flat, i.e. contain no nested structs, as the csv
//! writer cannot produce headers for them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session,
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::create(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given file, creating any parent
    /// directories. An existing file is truncated.
    pub fn create<P: AsRef<Path>>(file_path: P) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = file_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(file_path)?;

        let w = WriterBuilder::new().has_headers(true).from_writer(file);

        Ok(Self { writer: Some(w) })
    }

    /// Serialise a record into the archive.
    ///
    /// Serialising into a default (unopened) archiver does nothing.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(ref mut w) = self.writer {
            w.serialize(record)?;
            w.flush()?
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        value: f64,
        flag: bool,
    }

    #[test]
    fn test_archive_rows() {
        let mut path = std::env::temp_dir();
        path.push("util_archive_test");
        path.push("rows.csv");

        let mut arch = Archiver::create(&path).unwrap();
        arch.serialise(Row {
            time_s: 0.0,
            value: 1.5,
            flag: true,
        })
        .unwrap();
        arch.serialise(Row {
            time_s: 0.1,
            value: -2.0,
            flag: false,
        })
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["time_s,value,flag", "0.0,1.5,true", "0.1,-2.0,false"]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_default_archiver_is_noop() {
        let mut arch = Archiver::default();
        assert!(arch
            .serialise(Row {
                time_s: 0.0,
                value: 0.0,
                flag: false
            })
            .is_ok());
    }
}
