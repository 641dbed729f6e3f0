use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::{Error, Result};

/// Write `path` through a temporary file in the same directory, then rename
/// it into place. On any failure the temporary file is removed and the
/// target is left untouched.
///
/// A replaced file keeps its permissions; a new one gets the same mode a
/// plain `File::create` would.
pub(crate) fn write_atomically<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = create_temp(dir).map_err(|e| Error::io(path, e))?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| Error::io(path, e))?;
    }
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        render(&mut writer).map_err(|e| Error::io(path, e))?;
        writer.flush().map_err(|e| Error::io(path, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| Error::io(path, e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    Ok(())
}

#[cfg(unix)]
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    // 0666 before the umask, like File::create.
    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}
