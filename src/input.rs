//! Input discovery and loading for the CLI.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use tracing::debug;
use walkdir::WalkDir;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Parse a comma separated extension list such as `"gz, .dat"`.
pub fn parse_extensions(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|x| x.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Expand files and directories into a sorted, de-duplicated file list.
pub fn expand_inputs(inputs: &[PathBuf], allowed_exts: Option<&HashSet<String>>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for p in inputs {
        if p.is_file() {
            if should_include(p, allowed_exts) {
                files.push(p.clone());
            }
        } else if p.is_dir() {
            for entry in WalkDir::new(p).follow_links(false) {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() && should_include(path, allowed_exts) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            return Err(anyhow!("Input path is not a file or directory: {:?}", p));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[inline]
fn should_include(path: &Path, allowed_exts: Option<&HashSet<String>>) -> bool {
    let Some(set) = allowed_exts else { return true; };
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else { return false; };
    set.contains(&ext.to_ascii_lowercase())
}

/// Bytes of one input file: mapped directly, or inflated when gzip-compressed.
pub enum InputBuffer {
    Empty,
    Mapped(Mmap),
    Inflated(Vec<u8>),
}

impl Deref for InputBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            InputBuffer::Empty => &[],
            InputBuffer::Mapped(m) => &m[..],
            InputBuffer::Inflated(v) => v.as_slice(),
        }
    }
}

pub fn load_input(path: &Path) -> Result<InputBuffer> {
    let file = File::open(path).with_context(|| format!("Failed to open input file {:?}", path))?;
    if file.metadata()?.len() == 0 {
        return Ok(InputBuffer::Empty);
    }
    // SAFETY: the map is read-only and input files are not modified while decoding.
    let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("Failed to map input file {:?}", path))?;

    let gz_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
    if !gz_ext && !mmap.starts_with(&GZIP_MAGIC) {
        return Ok(InputBuffer::Mapped(mmap));
    }

    let mut inflated = Vec::with_capacity(mmap.len() * 4);
    MultiGzDecoder::new(&mmap[..])
        .read_to_end(&mut inflated)
        .with_context(|| format!("Failed to decompress {:?}", path))?;
    debug!(path = %path.display(), compressed = mmap.len(), inflated = inflated.len(), "gzip input inflated");
    Ok(InputBuffer::Inflated(inflated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cdr-input-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn extension_filter() {
        let exts = parse_extensions("GZ, .dat,,");
        assert_eq!(exts.len(), 2);
        assert!(should_include(Path::new("a/b.gz"), Some(&exts)));
        assert!(should_include(Path::new("b.DAT"), Some(&exts)));
        assert!(!should_include(Path::new("b.txt"), Some(&exts)));
        assert!(!should_include(Path::new("noext"), Some(&exts)));
        assert!(should_include(Path::new("noext"), None));
    }

    #[test]
    fn gzip_is_inflated_and_plain_is_mapped() {
        let dir = temp_dir("load");
        let payload = b"\xA0\x03\x81\x01\x07".repeat(10);

        let plain = dir.join("plain.dat");
        std::fs::write(&plain, &payload).unwrap();
        assert!(matches!(load_input(&plain).unwrap(), InputBuffer::Mapped(_)));
        assert_eq!(&*load_input(&plain).unwrap(), &payload[..]);

        let packed = dir.join("packed.bin");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&payload).unwrap();
        std::fs::write(&packed, enc.finish().unwrap()).unwrap();
        assert_eq!(&*load_input(&packed).unwrap(), &payload[..]);

        let empty = dir.join("empty.dat");
        std::fs::write(&empty, b"").unwrap();
        assert!(load_input(&empty).unwrap().is_empty());

        let files = expand_inputs(&[dir.clone()], None).unwrap();
        assert_eq!(files.len(), 3);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
