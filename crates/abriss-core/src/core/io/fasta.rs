use crate::core::models::FastaEntry;
use flate2::bufread::MultiGzDecoder;
use phf::{Set, phf_set};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;

/// Column width used when re-wrapping sequences on output.
pub const SEQUENCE_LINE_WIDTH: usize = 60;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Characters that are unsafe in filenames derived from FASTA headers.
/// Replaced by underscores when a header does not follow the pipe-delimited
/// UniProt convention and the first whitespace token is used instead.
static UNSAFE_ID_CHARS: Set<char> = phf_set! {
    '|', '=', '&', '*', '@', '#', '`', ':', ';', '$', '?',
};

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Opens a FASTA source for reading, transparently decompressing gzip input.
///
/// Compression is detected from the two-byte magic header of the file itself,
/// never from its extension, so misnamed files are handled correctly. The
/// file is rewound after the probe so the reader sees the full content.
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>, FastaError> {
    let mut file = File::open(path)?;

    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    file.seek(SeekFrom::Start(0))?;

    if filled == magic.len() && magic == GZIP_MAGIC {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(BufReader::new(
            file,
        )))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

struct EntryInProgress {
    identifier: String,
    description: String,
    sequence: String,
}

impl EntryInProgress {
    fn from_header(header: &str) -> Self {
        let pipe_fields: Vec<&str> = header.split('|').collect();
        let identifier = if pipe_fields.len() >= 2 {
            // UniProt convention: >sp|P12345|GENE_HUMAN Description
            pipe_fields[1].to_string()
        } else {
            let token = header.split_whitespace().next().unwrap_or_default();
            let sanitized: String = token
                .chars()
                .map(|c| if UNSAFE_ID_CHARS.contains(&c) { '_' } else { c })
                .collect();
            tracing::warn!(
                "'>{}' is not in UniProt format. Using '{}' as sequence id.",
                header,
                sanitized
            );
            sanitized
        };

        Self {
            identifier,
            description: header.to_string(),
            sequence: String::new(),
        }
    }

    fn finish(self) -> FastaEntry {
        FastaEntry {
            identifier: self.identifier,
            description: self.description,
            sequence: self.sequence,
        }
    }
}

/// A pull-based streaming FASTA parser.
///
/// Yields one [`FastaEntry`] per header, reading the source exactly once and
/// holding at most one entry's bytes in memory. An in-progress entry is
/// flushed as soon as the next header line is seen; end of input flushes the
/// final entry, so a file truncated after its last sequence line still yields
/// that entry. Blank lines are skipped everywhere, and sequence data before
/// the first header is ignored.
pub struct FastaReader<R: BufRead> {
    lines: Lines<R>,
    current: Option<EntryInProgress>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            current: None,
            done: false,
        }
    }
}

impl FastaReader<Box<dyn BufRead>> {
    /// Opens `path` (plain or gzip-compressed) as a streaming reader.
    pub fn from_path(path: &Path) -> Result<Self, FastaError> {
        Ok(Self::new(open_fasta(path)?))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaEntry, FastaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                let finished = self.current.take();
                self.current = Some(EntryInProgress::from_header(header));
                if let Some(entry) = finished {
                    return Some(Ok(entry.finish()));
                }
            } else if let Some(current) = self.current.as_mut() {
                current.sequence.push_str(line);
            }
        }

        self.done = true;
        self.current.take().map(|entry| Ok(entry.finish()))
    }
}

/// Writes one entry, reproducing the original header verbatim and re-wrapping
/// the sequence at [`SEQUENCE_LINE_WIDTH`] characters per line.
pub fn write_entry(entry: &FastaEntry, writer: &mut impl Write) -> Result<(), FastaError> {
    writeln!(writer, ">{}", entry.description)?;
    for chunk in entry.sequence.as_bytes().chunks(SEQUENCE_LINE_WIDTH) {
        writer.write_all(chunk)?;
        writeln!(writer)?;
    }
    Ok(())
}
