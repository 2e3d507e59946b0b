//! Plain path listing for `--list`

use anyhow::Result;
use std::io::Write;

/// Writes one path per line and nothing else, so the output stays pipeable
pub struct PathListWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> PathListWriter<W> {
    /// Create a new path list writer
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Write a single path
    pub fn write_path(&mut self, path: &str) -> Result<()> {
        writeln!(self.writer, "{path}")?;
        self.written += 1;
        Ok(())
    }

    /// Flush and return the number of paths written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_path_per_line() {
        let mut buffer = Vec::new();
        let mut writer = PathListWriter::new(&mut buffer);
        writer.write_path("README.md").unwrap();
        writer.write_path("src/a.py").unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        assert_eq!(String::from_utf8(buffer).unwrap(), "README.md\nsrc/a.py\n");
    }

    #[test]
    fn test_empty_list() {
        let mut buffer = Vec::new();
        let writer = PathListWriter::new(&mut buffer);
        assert_eq!(writer.finish().unwrap(), 0);
        assert!(buffer.is_empty());
    }
}
