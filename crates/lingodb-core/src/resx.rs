//! Resx interchange: export resource sets to `.resx` XML files and import
//! them back.
//!
//! One file per (resource set, locale): `Resources.resx` for the invariant
//! locale, `Resources.de.resx` for `de`. Entries are the classic
//! `<data name=".." xml:space="preserve"><value/><comment/></data>` shape.
//! File resources keep their descriptor in `<value>` with a
//! `type="FileResource"` attribute and write the payload to a companion
//! file next to the `.resx`, so a round trip through the filesystem is
//! lossless for text and binary payloads alike.

use crate::error::{LingoError, Result};
use lingodb_commons::models::{FileDescriptor, FileKind, ResourceRow, ResourceType};
use lingodb_commons::{locale, models::ResourceListingFilter};
use lingodb_store::ResourceStore;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const RESX_EXTENSION: &str = "resx";

/// Converts between the resource store and `.resx` files on disk.
pub struct ResxConverter {
    store: Arc<ResourceStore>,
    base_folder: PathBuf,
}

impl ResxConverter {
    pub fn new(store: Arc<ResourceStore>, base_folder: impl Into<PathBuf>) -> Self {
        Self {
            store,
            base_folder: base_folder.into(),
        }
    }

    // ===== Export =====

    /// Exports resource sets to `.resx` files under `output_dir` (the
    /// configured base folder when `None`). Exports every set when `sets`
    /// is `None`. Returns the number of files written.
    pub fn export(&self, output_dir: Option<&Path>, sets: Option<&[String]>) -> Result<usize> {
        let dir = output_dir.unwrap_or(&self.base_folder);
        let sets = match sets {
            Some(sets) => sets.to_vec(),
            None => self.store.list_resource_sets(ResourceListingFilter::All)?,
        };

        let mut written = 0usize;
        for set in &sets {
            for locale_id in self.store.list_locales(set)? {
                let rows = self.store.get_rows_for_set_and_locale(set, &locale_id)?;
                if rows.is_empty() {
                    continue;
                }
                let path = resx_file_path(dir, set, &locale_id);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                self.write_resx_file(&path, &rows)?;
                written += 1;
            }
        }
        log::info!("exported {} resx file(s) to {}", written, dir.display());
        Ok(written)
    }

    fn write_resx_file(&self, path: &Path, rows: &[ResourceRow]) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(resx_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("root")))
            .map_err(resx_err)?;

        for row in rows {
            let mut data = BytesStart::new("data");
            data.push_attribute(("name", row.resource_id.as_str()));
            data.push_attribute(("xml:space", "preserve"));
            if row.resource_type != ResourceType::Text {
                data.push_attribute(("type", row.resource_type.as_str()));
            }
            writer.write_event(Event::Start(data)).map_err(resx_err)?;

            write_text_element(&mut writer, "value", row.value.as_deref().unwrap_or(""))?;
            if let Some(comment) = row.comment.as_deref().filter(|c| !c.is_empty()) {
                write_text_element(&mut writer, "comment", comment)?;
            }

            writer
                .write_event(Event::End(BytesEnd::new("data")))
                .map_err(resx_err)?;

            if row.resource_type == ResourceType::FileResource {
                self.write_companion_file(path, row)?;
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new("root")))
            .map_err(resx_err)?;
        Ok(())
    }

    fn write_companion_file(&self, resx_path: &Path, row: &ResourceRow) -> Result<()> {
        let Some(file_name) = row.file_name.as_deref().filter(|n| !n.is_empty()) else {
            return Ok(());
        };
        let target = resx_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(file_name);
        match (&row.text_file, &row.bin_file) {
            (Some(text), _) => fs::write(target, text)?,
            (None, Some(bytes)) => fs::write(target, bytes)?,
            (None, None) => {}
        }
        Ok(())
    }

    // ===== Import =====

    /// Imports every `.resx` file under `input_dir` (recursively), deriving
    /// the (resource set, locale) from each file's relative path. Returns
    /// the number of files imported.
    pub fn import(&self, input_dir: Option<&Path>) -> Result<usize> {
        let dir = input_dir.unwrap_or(&self.base_folder);
        if !dir.is_dir() {
            return Err(LingoError::Resx(format!(
                "import path is not a directory: {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        collect_resx_files(dir, &mut files)?;
        files.sort();

        for path in &files {
            let relative = path.strip_prefix(dir).unwrap_or(path);
            let (resource_set, locale_id) = parse_resx_file_name(relative)?;
            self.import_file(path, &resource_set, &locale_id)?;
        }
        log::info!("imported {} resx file(s) from {}", files.len(), dir.display());
        Ok(files.len())
    }

    /// Imports one `.resx` file into the given (set, locale), atomically.
    pub fn import_file(&self, path: &Path, resource_set: &str, locale_id: &str) -> Result<()> {
        let entries = read_resx_file(path)?;
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut row = ResourceRow::new_text(
                &entry.name,
                locale_id,
                resource_set,
                &entry.value,
            );
            row.comment = entry.comment;
            row.resource_type = ResourceType::parse(entry.type_tag.as_deref().unwrap_or(""));
            if row.resource_type == ResourceType::FileResource {
                self.attach_companion_payload(path, &mut row)?;
            }
            rows.push(row);
        }
        self.store.batch_upsert(rows)?;
        Ok(())
    }

    fn attach_companion_payload(&self, resx_path: &Path, row: &mut ResourceRow) -> Result<()> {
        let Some(descriptor) = row
            .value
            .as_deref()
            .and_then(|v| FileDescriptor::parse(v).ok())
        else {
            return Ok(());
        };
        row.file_name = Some(descriptor.file_name.clone());
        let companion = resx_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&descriptor.file_name);
        if !companion.is_file() {
            log::warn!(
                "file resource {:?} has no companion file {}",
                row.resource_id,
                companion.display()
            );
            return Ok(());
        }
        match descriptor.kind {
            FileKind::Text => row.text_file = Some(fs::read_to_string(companion)?),
            FileKind::Binary => row.bin_file = Some(fs::read(companion)?),
        }
        Ok(())
    }
}

/// Path of the `.resx` file for a (set, locale): the locale is suffixed
/// before the extension, invariant files carry no suffix. Slashes in the
/// set name become subdirectories.
pub fn resx_file_path(base: &Path, resource_set: &str, locale_id: &str) -> PathBuf {
    let file_name = if locale_id.is_empty() {
        format!("{resource_set}.{RESX_EXTENSION}")
    } else {
        format!("{resource_set}.{locale_id}.{RESX_EXTENSION}")
    };
    base.join(file_name)
}

/// Derives (resource set, locale) from a relative `.resx` path.
///
/// Only short language tags (`de`, `fil`) or regional tags (`de-de`) count
/// as locale suffixes; longer bare tokens stay part of the set name so page
/// sets like `page.aspx.resx` keep their extension.
pub fn parse_resx_file_name(relative: &Path) -> Result<(String, String)> {
    let name = relative
        .to_str()
        .ok_or_else(|| LingoError::Resx(format!("non-UTF-8 path: {}", relative.display())))?
        .replace('\\', "/");
    let stem = name.strip_suffix(".resx").ok_or_else(|| {
        LingoError::Resx(format!("not a .resx file: {}", relative.display()))
    })?;

    if let Some((set, token)) = stem.rsplit_once('.') {
        let token = locale::normalize(token);
        let looks_like_locale =
            locale::is_valid_locale(&token) && (token.len() <= 3 || token.contains('-'));
        if !set.is_empty() && looks_like_locale {
            return Ok((set.to_string(), token));
        }
    }
    Ok((stem.to_string(), String::new()))
}

fn collect_resx_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_resx_files(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RESX_EXTENSION))
        {
            out.push(path);
        }
    }
    Ok(())
}

struct ResxEntry {
    name: String,
    value: String,
    comment: Option<String>,
    type_tag: Option<String>,
}

fn read_resx_file(path: &Path) -> Result<Vec<ResxEntry>> {
    let mut reader = Reader::from_file(path).map_err(resx_err)?;
    let mut buf = Vec::new();

    let mut entries = Vec::new();
    let mut current: Option<ResxEntry> = None;
    let mut in_value = false;
    let mut in_comment = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(resx_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"data" => {
                    let name = attribute(&e, "name")?.unwrap_or_default();
                    let type_tag = attribute(&e, "type")?;
                    current = Some(ResxEntry {
                        name,
                        value: String::new(),
                        comment: None,
                        type_tag,
                    });
                }
                b"value" if current.is_some() => in_value = true,
                b"comment" if current.is_some() => in_comment = true,
                _ => {}
            },
            Event::Text(text) => {
                let decoded = text.decode().map_err(resx_err)?;
                let text = quick_xml::escape::unescape(&decoded).map_err(resx_err)?;
                if let Some(entry) = current.as_mut() {
                    if in_value {
                        entry.value.push_str(&text);
                    } else if in_comment {
                        entry.comment.get_or_insert_with(String::new).push_str(&text);
                    }
                }
            }
            Event::GeneralRef(reference) => {
                let decoded = reference.decode().map_err(resx_err)?;
                let raw = format!("&{decoded};");
                let resolved = quick_xml::escape::unescape(&raw).map_err(resx_err)?;
                if let Some(entry) = current.as_mut() {
                    if in_value {
                        entry.value.push_str(&resolved);
                    } else if in_comment {
                        entry.comment.get_or_insert_with(String::new).push_str(&resolved);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"value" => in_value = false,
                b"comment" => in_comment = false,
                b"data" => {
                    if let Some(entry) = current.take() {
                        if !entry.name.is_empty() {
                            entries.push(entry);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(entries)
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(resx_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(resx_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(resx_err)?;
    Ok(())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attr = element
        .try_get_attribute(name)
        .map_err(resx_err)?;
    match attr {
        Some(attr) => Ok(Some(
            attr.unescape_value().map_err(resx_err)?.into_owned(),
        )),
        None => Ok(None),
    }
}

fn resx_err(err: impl std::fmt::Display) -> LingoError {
    LingoError::Resx(err.to_string())
}
