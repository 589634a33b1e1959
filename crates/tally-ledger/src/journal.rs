use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::commit::Commit;
use crate::error::{LedgerError, LedgerResult};

/// Flush/sync strategy for the journal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// `fsync` after every commit.
    EveryWrite,
    /// Hand writes to the OS page cache only.
    #[default]
    OsDefault,
}

/// Journal configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub sync_mode: SyncMode,
}

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Outcome of reading a journal front to back.
#[derive(Debug)]
pub struct Recovery {
    pub commits: Vec<Commit>,
    /// Byte length of the readable prefix of the file.
    pub valid_len: u64,
    /// `true` if an incomplete frame was found at the end of the file.
    pub torn_tail: bool,
}

struct JournalWriter {
    file: File,
    offset: u64,
    /// Set when a failed append could not be rolled back.
    failed: bool,
}

/// Durable, append-only log of committed write sets.
///
/// On-disk format, one frame per commit:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized Commit)]
/// ```
///
/// Each frame is written with a single unbuffered write. If that write
/// fails, the file is cut back to where the frame started; if even that
/// fails, the journal refuses further appends until it is reopened.
///
/// A frame cut short at the end of the file is a torn write from a crash
/// and is reported as a torn tail. A complete frame that fails its CRC or
/// cannot be decoded is corruption and stops recovery with an error.
pub struct Journal {
    path: PathBuf,
    writer: Mutex<JournalWriter>,
    config: JournalConfig,
}

impl Journal {
    /// Open (or create) the journal file at `path`.
    pub fn open(path: &Path, config: JournalConfig) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;
        let offset = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(JournalWriter {
                file,
                offset,
                failed: false,
            }),
            config,
        })
    }

    /// Append one commit. Returns the byte offset of its frame.
    ///
    /// On error nothing of the frame remains in the file.
    pub fn append(&self, commit: &Commit) -> LedgerResult<u64> {
        let payload =
            bincode::serialize(commit).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let length = u32::try_from(payload.len())
            .map_err(|_| LedgerError::Serialization("commit exceeds 4 GiB".into()))?;
        let crc = crc32fast::hash(&payload);

        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&length.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut w = self.writer.lock().map_err(|_| LedgerError::Poisoned)?;
        let frame_offset = w.offset;
        if w.failed {
            return Err(LedgerError::JournalFailed {
                offset: frame_offset,
            });
        }

        if let Err(e) = write_frame(&mut w.file, &frame, self.config.sync_mode) {
            if let Err(rollback) = w.file.set_len(frame_offset) {
                error!(offset = frame_offset, error = %rollback, "journal rollback failed");
                w.failed = true;
            } else {
                warn!(offset = frame_offset, error = %e, "journal append rolled back");
            }
            return Err(e.into());
        }

        w.offset += frame.len() as u64;
        debug!(seq = commit.seq, offset = frame_offset, len = payload.len(), "journal append");
        Ok(frame_offset)
    }

    /// Read every complete commit from the start of the file.
    pub fn recover(&self) -> LedgerResult<Recovery> {
        let mut file = BufReader::new(File::open(&self.path)?);
        let file_len = file.get_ref().metadata()?.len();
        let mut commits = Vec::new();
        let mut offset: u64 = 0;
        let mut torn_tail = false;

        while offset < file_len {
            if offset + HEADER_SIZE as u64 > file_len {
                warn!(offset, file_len, "truncated journal header; stopping recovery");
                torn_tail = true;
                break;
            }
            file.seek(SeekFrom::Start(offset))?;

            let mut header = [0u8; HEADER_SIZE];
            file.read_exact(&mut header)?;
            let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            if length == 0 {
                return Err(LedgerError::CorruptJournal {
                    offset,
                    reason: "zero-length frame".into(),
                });
            }
            if offset + HEADER_SIZE as u64 + length as u64 > file_len {
                warn!(offset, length, file_len, "truncated journal entry; stopping recovery");
                torn_tail = true;
                break;
            }

            let mut payload = vec![0u8; length as usize];
            match file.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    torn_tail = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let actual_crc = crc32fast::hash(&payload);
            if actual_crc != expected_crc {
                return Err(LedgerError::CorruptJournal {
                    offset,
                    reason: format!(
                        "CRC mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
                    ),
                });
            }

            let commit: Commit =
                bincode::deserialize(&payload).map_err(|e| LedgerError::CorruptJournal {
                    offset,
                    reason: e.to_string(),
                })?;
            commits.push(commit);

            offset += HEADER_SIZE as u64 + length as u64;
        }

        debug!(recovered = commits.len(), torn_tail, "journal recovery complete");
        Ok(Recovery {
            commits,
            valid_len: offset,
            torn_tail,
        })
    }

    /// Cut the file back to `len` bytes, discarding a torn tail.
    pub fn truncate_to(&self, len: u64) -> LedgerResult<()> {
        let mut w = self.writer.lock().map_err(|_| LedgerError::Poisoned)?;
        w.file.set_len(len)?;
        w.offset = len;
        debug!(len, "journal truncated");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
impl Journal {
    /// Swap the write handle for a read-only one, so appends and their
    /// rollback both fail.
    pub(crate) fn fail_writes(&self) {
        let read_only = File::open(&self.path).unwrap();
        self.writer.lock().unwrap().file = read_only;
    }
}

fn write_frame(file: &mut File, frame: &[u8], sync_mode: SyncMode) -> io::Result<()> {
    file.write_all(frame)?;
    if sync_mode == SyncMode::EveryWrite {
        file.sync_all()?;
    }
    Ok(())
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("path", &self.path)
            .field("sync_mode", &self.config.sync_mode)
            .finish()
    }
}
