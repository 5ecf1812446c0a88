use std::fs::{self, Permissions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::{Builder, NamedTempFile};

/// Path that stands for standard input or standard output.
pub const STDIO: &str = "-";

/// Reads the whole document as raw bytes; the text encoding is never
/// interpreted.
pub fn read_document(input: &str) -> Result<Vec<u8>> {
    if input == STDIO {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read(input).context(format!("Failed to open input file: '{}'", input))
    }
}

/// Writes the document to `output`. Files are written to a temporary file
/// next to the destination and renamed into place once complete, so a failed
/// run never leaves a half-written file behind.
///
/// A replaced file keeps its permissions; a new one gets the same mode a
/// plain `File::create` would give it.
pub fn write_document(output: &str, text: &[u8]) -> Result<()> {
    if output == STDIO {
        let stdout = io::stdout();
        return write_text(stdout.lock(), text).context("Failed to write to stdout");
    }

    let path = Path::new(output);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = temp_file_in(dir)
        .context(format!("Failed to create output file: '{}'", output))?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .context(format!("Failed to copy permissions of '{}'", output))?;
    }
    write_text(&mut tmp, text).context(format!("Failed to write to output file: '{}'", output))?;
    tmp.persist(path)
        .context(format!("Failed to create output file: '{}'", output))?;
    Ok(())
}

fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".srt-retime");
    if let Some(permissions) = new_file_permissions() {
        // Passed as the creation mode, so the umask still applies.
        builder.permissions(permissions);
    }
    builder.tempfile_in(dir)
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

fn write_text<W: Write>(dst: W, text: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    writer.write_all(text)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn writes_text_verbatim() {
        let mut buf = Cursor::new(vec![]);
        write_text(&mut buf, b"1\r\n00:00:01,000 --> 00:00:02,000\r\n\xC7a\r\n").unwrap();
        assert_eq!(
            buf.into_inner(),
            b"1\r\n00:00:01,000 --> 00:00:02,000\r\n\xC7a\r\n".to_vec()
        );
    }

    #[test]
    fn writes_and_reads_back_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let path = path.to_str().unwrap();

        write_document(path, b"hello\n").unwrap();

        assert_eq!(read_document(path).unwrap(), b"hello\n".to_vec());
    }

    #[test]
    fn reads_non_utf8_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.srt");
        fs::write(&path, b"\xC7a va\n").unwrap();

        assert_eq!(
            read_document(path.to_str().unwrap()).unwrap(),
            b"\xC7a va\n".to_vec()
        );
    }

    #[test]
    fn replaces_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        fs::write(&path, "old contents that are longer").unwrap();

        write_document(path.to_str().unwrap(), b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn new_file_gets_the_usual_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.srt");
        let written = dir.path().join("written.srt");
        fs::write(&plain, "x").unwrap();

        write_document(written.to_str().unwrap(), b"x").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&written), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn replaced_file_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        write_document(path.to_str().unwrap(), b"new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn missing_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.srt");
        let path = path.to_str().unwrap();

        let err = read_document(path).unwrap_err();

        assert!(err.to_string().contains(path));
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.srt");

        assert!(write_document(path.to_str().unwrap(), b"text").is_err());
        assert!(!path.exists());
    }
}
