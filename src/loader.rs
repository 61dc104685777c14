use crate::{Error, TextSource};
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Reads one file into a [`TextSource`] named after the file stem.
///
/// `.gz` files are decompressed transparently; `report.txt.gz` yields the
/// source name `report`. With `lossy`, invalid UTF-8 sequences are replaced
/// with U+FFFD instead of failing.
pub fn load_file(path: &Path, lossy: bool) -> Result<TextSource, Error> {
    let file = BufReader::new(File::open(path)?);
    let mut bytes = Vec::new();
    if is_gz(path) {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)?;
    }

    let name = source_name(path);
    let text = if lossy {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        String::from_utf8(bytes).map_err(|_| Error::Encoding(name.clone()))?
    };
    Ok(TextSource::new(name, text))
}

/// Loads every regular file in `dir`, sorted by file name.
///
/// With a non-empty `extensions` list only matching files are read (the `.gz`
/// suffix is ignored when matching). Files that are empty after trimming are
/// skipped.
pub fn load_dir(dir: &Path, extensions: &[String], lossy: bool) -> Result<Vec<TextSource>, Error> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if !extensions.is_empty() && !matches_extension(&path, extensions) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let source = load_file(&path, lossy)?;
        if source.text.trim().is_empty() {
            continue;
        }
        sources.push(source);
    }
    Ok(sources)
}

fn is_gz(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"))
}

fn source_name(path: &Path) -> String {
    let path = if is_gz(path) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    };
    path.file_stem()
        .unwrap_or_else(|| path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let path = if is_gz(path) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    };
    path.extension().map_or(false, |ext| {
        extensions
            .iter()
            .any(|e| ext.eq_ignore_ascii_case(e.trim_start_matches('.')))
    })
}
