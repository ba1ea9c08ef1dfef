use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

const READ_BUF: usize = 256 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Stdin,
    Plain,
    Gzip,
}

pub fn detect_input_kind(path: &Path) -> InputKind {
    if path.as_os_str() == "-" {
        return InputKind::Stdin;
    }
    match path.extension().and_then(|s| s.to_str()) {
        Some("gz") => InputKind::Gzip,
        _ => InputKind::Plain,
    }
}

/// Line source over a file, a gzip stream or stdin. The handle is released on drop.
pub struct Input {
    path: PathBuf,
    kind: InputKind,
    reader: Box<dyn BufRead>,
    raw: Vec<u8>,
    line_no: usize,
}

impl Input {
    pub fn open(path: &Path) -> Result<Self> {
        let kind = detect_input_kind(path);
        let reader: Box<dyn BufRead> = match kind {
            InputKind::Stdin => Box::new(BufReader::with_capacity(READ_BUF, io::stdin())),
            InputKind::Plain => Box::new(BufReader::with_capacity(READ_BUF, open_file(path)?)),
            InputKind::Gzip => open_gzip_reader(path)?,
        };
        Ok(Self::from_reader(path, kind, reader))
    }

    pub fn from_reader(path: &Path, kind: InputKind, reader: Box<dyn BufRead>) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            reader,
            raw: Vec::new(),
            line_no: 0,
        }
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Reads the next line into `buf` without its terminator and returns its
    /// 1-based number, or `None` at end of input. Invalid UTF-8 is replaced
    /// with U+FFFD.
    pub fn next_line(&mut self, buf: &mut String) -> Result<Option<usize>> {
        buf.clear();
        self.raw.clear();
        let n = self.reader.read_until(b'\n', &mut self.raw).with_context(|| {
            format!(
                "failed to read {} after line {}",
                self.path.display(),
                self.line_no
            )
        })?;
        if n == 0 {
            return Ok(None);
        }
        buf.push_str(&String::from_utf8_lossy(&self.raw));
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        self.line_no += 1;
        Ok(Some(self.line_no))
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

pub fn open_gzip_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = open_file(path)?;
    let decoder = MultiGzDecoder::new(BufReader::new(file));
    Ok(Box::new(BufReader::with_capacity(READ_BUF, decoder)))
}
