//! High-performance I/O abstraction layer
//!
//! Provides optimized file reading with configurable buffer sizes,
//! transparent decompression, optional memory mapping for large files, and
//! all-or-nothing output files.

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Large buffer size for high-throughput I/O (1MB)
pub const LARGE_BUFFER_SIZE: usize = 1024 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// I/O strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Use buffered reading with configurable buffer size
    Buffered(usize),
    /// Use memory mapping for the entire file
    MemoryMapped,
    /// Automatically select based on file size
    #[default]
    Auto,
}

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file path and/or content
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    // First check by extension
    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    // Then check by magic bytes
    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    // BZ2 magic: "BZh"
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// A smart reader that selects the optimal strategy for each input
pub enum SmartReader {
    /// Buffered reader for smaller files or streaming
    Buffered(BufReader<File>),
    /// Memory-mapped reader for large files
    Mapped(MappedReader),
    /// Gzip (including bgzip) input
    Gzip(BufReader<MultiGzDecoder<File>>),
    /// Bzip2 input
    Bzip2(BufReader<bzip2::read::BzDecoder<File>>),
}

/// Memory-mapped file reader
pub struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    /// Create a new memory-mapped reader
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

impl SmartReader {
    /// Open a file with the specified I/O strategy
    ///
    /// Compressed inputs are always streamed through a decoder; the strategy
    /// only applies to plain files.
    pub fn open<P: AsRef<Path>>(path: P, strategy: IoStrategy) -> io::Result<Self> {
        let path = path.as_ref();
        let format = detect_compression(path)?;
        let file = File::open(path)?;

        match format {
            CompressionFormat::Gzip => Ok(SmartReader::Gzip(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                MultiGzDecoder::new(file),
            ))),
            CompressionFormat::Bzip2 => Ok(SmartReader::Bzip2(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                bzip2::read::BzDecoder::new(file),
            ))),
            CompressionFormat::Plain => match strategy {
                IoStrategy::Buffered(buf_size) => {
                    Ok(SmartReader::Buffered(BufReader::with_capacity(buf_size, file)))
                }
                IoStrategy::MemoryMapped => Ok(SmartReader::Mapped(MappedReader::new(&file)?)),
                IoStrategy::Auto => {
                    let file_size = file.metadata()?.len();
                    if file_size >= MMAP_THRESHOLD {
                        Ok(SmartReader::Mapped(MappedReader::new(&file)?))
                    } else {
                        let buf_size = if file_size > 10 * 1024 * 1024 {
                            LARGE_BUFFER_SIZE
                        } else {
                            DEFAULT_BUFFER_SIZE
                        };
                        Ok(SmartReader::Buffered(BufReader::with_capacity(buf_size, file)))
                    }
                }
            },
        }
    }

    /// Open with default auto strategy
    pub fn open_auto<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::open(path, IoStrategy::Auto)
    }

    /// Check if using memory mapping
    pub fn is_mapped(&self) -> bool {
        matches!(self, SmartReader::Mapped(_))
    }
}

impl Read for SmartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SmartReader::Buffered(reader) => reader.read(buf),
            SmartReader::Mapped(reader) => reader.read(buf),
            SmartReader::Gzip(reader) => reader.read(buf),
            SmartReader::Bzip2(reader) => reader.read(buf),
        }
    }
}

impl BufRead for SmartReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SmartReader::Buffered(reader) => reader.fill_buf(),
            SmartReader::Mapped(reader) => reader.fill_buf(),
            SmartReader::Gzip(reader) => reader.fill_buf(),
            SmartReader::Bzip2(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SmartReader::Buffered(reader) => reader.consume(amt),
            SmartReader::Mapped(reader) => reader.consume(amt),
            SmartReader::Gzip(reader) => reader.consume(amt),
            SmartReader::Bzip2(reader) => reader.consume(amt),
        }
    }
}

enum SinkWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

/// Output file that only appears at its final path on [`OutputFile::commit`]
///
/// Data goes to a `.partial` sibling first; dropping without committing
/// removes it.
pub struct OutputFile {
    path: PathBuf,
    partial: PathBuf,
    writer: Option<SinkWriter>,
}

impl OutputFile {
    /// Create the partial file; `.gz` paths are gzip-compressed
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut partial = path.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);

        let file = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, File::create(&partial)?);
        let writer = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            SinkWriter::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            SinkWriter::Plain(file)
        };

        Ok(Self {
            path,
            partial,
            writer: Some(writer),
        })
    }

    /// Flush everything and move the file into place
    pub fn commit(mut self) -> io::Result<()> {
        let flushed = match self.writer.take() {
            Some(SinkWriter::Plain(mut w)) => w.flush(),
            Some(SinkWriter::Gzip(w)) => w.finish().and_then(|mut inner| inner.flush()),
            None => Ok(()),
        };
        let result = flushed.and_then(|_| fs::rename(&self.partial, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&self.partial);
        }
        result
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(SinkWriter::Plain(w)) => w.write(buf),
            Some(SinkWriter::Gzip(w)) => w.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "output already committed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(SinkWriter::Plain(w)) => w.flush(),
            Some(SinkWriter::Gzip(w)) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.partial);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_io_strategy_default() {
        assert_eq!(IoStrategy::default(), IoStrategy::Auto);
    }

    #[test]
    fn test_smart_reader_auto_small_file() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "small file content")?;

        let reader = SmartReader::open_auto(temp.path())?;
        assert!(!reader.is_mapped());
        Ok(())
    }

    #[test]
    fn test_smart_reader_mapped() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "line1\nline2")?;
        temp.flush()?;

        let mut reader = SmartReader::open(temp.path(), IoStrategy::MemoryMapped)?;
        assert!(reader.is_mapped());
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        assert_eq!(content, "line1\nline2\n");
        Ok(())
    }

    #[test]
    fn test_smart_reader_gzip() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("input.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"SNP,CHR\n")?;
        encoder.finish()?;

        assert_eq!(detect_compression(&path)?, CompressionFormat::Gzip);
        let mut reader = SmartReader::open_auto(&path)?;
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        assert_eq!(content, "SNP,CHR\n");
        Ok(())
    }

    #[test]
    fn test_detect_gzip_by_magic() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("input_no_ext");
        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"data")?;
        encoder.finish()?;

        assert_eq!(detect_compression(&path)?, CompressionFormat::Gzip);
        Ok(())
    }

    #[test]
    fn test_output_file_commit() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        let mut out = OutputFile::create(&path)?;
        write!(out, "hello")?;
        assert!(!path.exists());
        out.commit()?;
        assert_eq!(fs::read_to_string(&path)?, "hello");
        assert!(!dir.path().join("out.csv.partial").exists());
        Ok(())
    }

    #[test]
    fn test_output_file_dropped_leaves_nothing() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        {
            let mut out = OutputFile::create(&path)?;
            write!(out, "partial")?;
        }
        assert!(!path.exists());
        assert!(!dir.path().join("out.csv.partial").exists());
        Ok(())
    }
}
