//! File I/O helpers for the commands.
//!
//! - Reading a line of player input
//! - Reading round-record files, `.zst` decompressed transparently
//! - Opening round-record outputs, `.zst` compressed transparently
//! - Finding record files under a directory
//!
//! Errors are returned as `String` so commands can prefix them with the path.

use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Reads one trimmed line. `None` on EOF or a read error.
///
/// ```rust
/// # use besigue_cli::io_utils::read_stdin_line;
/// let mut input = std::io::Cursor::new("m 0\n");
/// assert_eq!(read_stdin_line(&mut input).as_deref(), Some("m 0"));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => {
            let trimmed = line.trim();
            Some(trimmed.to_string())
        }
        Err(_) => None, // Read error
    }
}

/// Reads a whole text file, decompressing it when the name ends in `.zst`.
/// A leading UTF-8 BOM is dropped.
pub fn read_text_auto(path: &str) -> Result<String, String> {
    let mut content = if path.ends_with(".zst") {
        let file = std::fs::File::open(path).map_err(|e| e.to_string())?;
        let dec = zstd::stream::decode_all(file).map_err(|e| e.to_string())?;
        String::from_utf8(dec).map_err(|e| e.to_string())?
    } else {
        std::fs::read_to_string(path).map_err(|e| e.to_string())?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    Ok(())
}

/// Creates (truncating) an output file, zstd-compressed when the name ends in
/// `.zst`. The compressed stream is finished when the writer is dropped.
pub fn create_output(path: &Path) -> Result<Box<dyn Write + Send>, String> {
    ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)
        .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    if path.extension().is_some_and(|ext| ext == "zst") {
        let enc = zstd::stream::write::Encoder::new(file, 3)
            .map_err(|e| format!("Failed to start zstd stream: {}", e))?;
        Ok(Box::new(enc.auto_finish()))
    } else {
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn is_record_file(name: &str) -> bool {
    name.ends_with(".jsonl") || name.ends_with(".jsonl.zst")
}

/// `.jsonl` and `.jsonl.zst` files under `dir`, recursively, sorted by path.
pub fn find_record_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        let Ok(rd) = std::fs::read_dir(&d) else {
            tracing::warn!(dir = %d.display(), "unreadable directory skipped");
            continue;
        };
        for e in rd.filter_map(Result::ok) {
            let p = e.path();
            if p.is_dir() {
                stack.push(p);
            } else if p
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(is_record_file)
            {
                found.push(p);
            }
        }
    }
    found.sort();
    found
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_stdin_line_valid_input() {
        let input = b"hello world\n";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, Some("hello world".to_string()));
    }

    #[test]
    fn test_read_stdin_line_with_whitespace() {
        let input = b"  spaces  \n";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, Some("spaces".to_string()));
    }

    #[test]
    fn test_read_stdin_line_empty_after_trim() {
        let input = b"   \n";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, Some("".to_string()));
    }

    #[test]
    fn test_read_stdin_line_eof() {
        let input = b"";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, None);
    }

    #[test]
    fn test_read_stdin_line_meld_command() {
        let input = b"m 2\r\n";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, Some("m 2".to_string()));
    }

    #[test]
    fn test_strip_utf8_bom() {
        let mut s = "\u{feff}hello".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_strip_utf8_bom_no_bom() {
        let mut s = "hello".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_ensure_parent_dir_creates_directory() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let nested_path = temp_dir.path().join("subdir").join("file.txt");

        let result = ensure_parent_dir(&nested_path);
        assert!(result.is_ok());
        assert!(temp_dir.path().join("subdir").exists());
    }

    #[test]
    fn test_zst_output_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("rounds.jsonl.zst");
        {
            let mut w = create_output(&path).unwrap();
            writeln!(w, "{{\"round\":1}}").unwrap();
        }
        let text = read_text_auto(&path.to_string_lossy()).unwrap();
        assert_eq!(text, "{\"round\":1}\n");
    }

    #[test]
    fn test_find_record_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.jsonl"), "").unwrap();
        std::fs::write(dir.path().join("sub").join("a.jsonl.zst"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let files = find_record_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ensure_parent_dir_no_parent() {
        use std::path::Path;

        // Path with no parent (e.g., root or relative file)
        let path = Path::new("file.txt");
        let result = ensure_parent_dir(path);
        assert!(result.is_ok());
    }
}
