use anyhow::{Result, anyhow};
use log::trace;
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

/// Page-level capabilities merge and cut need from a PDF library.
pub trait PageEngine {
    type Doc;

    /// Load and parse the document at `path`. Malformed input is an error, never repaired.
    fn open(&self, path: &Path) -> Result<Self::Doc>;

    fn page_count(&self, doc: &Self::Doc) -> usize;

    /// A document without pages, ready to be appended to.
    fn empty(&self) -> Result<Self::Doc>;

    /// Move every page of `source` to the end of `target`, keeping their order.
    /// On error `target` is left as it was.
    fn append(&self, target: &mut Self::Doc, source: Self::Doc) -> Result<()>;

    /// A new document holding copies of the pages of `source` whose zero-based
    /// index lies in `range`.
    fn extract(&self, source: Self::Doc, range: Range<usize>) -> Result<Self::Doc>;

    fn write(&self, doc: &mut Self::Doc, path: &Path) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfEngine;

const OUTPUT_PDF_VERSION: &str = "1.7";
const MAX_DEPTH_PAGE_TREE: usize = 64;
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

impl PageEngine for LopdfEngine {
    type Doc = Document;

    fn open(&self, path: &Path) -> Result<Document> {
        trace!("Load the document '{}'", path.display());
        Ok(Document::load(path)?)
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn empty(&self) -> Result<Document> {
        let mut doc = Document::with_version(OUTPUT_PDF_VERSION);

        let pages_root_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(vec![]),
            "Count" => Object::Integer(0),
        });

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_root_id),
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    /// The page tree of `source` is hung as a whole under the page tree root of `target`,
    /// so attributes inherited from intermediate `Pages` nodes stay in place.
    fn append(&self, target: &mut Document, mut source: Document) -> Result<()> {
        source.renumber_objects_with(target.max_id + 1);

        let source_catalog_id = source.trailer.get(b"Root")?.as_reference()?;
        let source_pages_root_id = source.catalog()?.get(b"Pages")?.as_reference()?;
        let imported_pages_count = source
            .get_dictionary(source_pages_root_id)?
            .get(b"Count")?
            .as_i64()?;

        let target_pages_root_id = target.catalog()?.get(b"Pages")?.as_reference()?;
        let target_pages_root = target.get_dictionary(target_pages_root_id)?;
        let pages_count = target_pages_root.get(b"Count")?.as_i64()? + imported_pages_count;
        target_pages_root.get(b"Kids")?.as_array()?;

        trace!(
            "Append {imported_pages_count} pages, objects renumbered from {}",
            target.max_id + 1
        );

        // Both page tree roots are checked, nothing past this point fails.
        target.max_id = target.max_id.max(source.max_id);

        for (object_id, mut object) in source.objects {
            if object_id == source_catalog_id {
                continue;
            }
            if object_id == source_pages_root_id {
                if let Object::Dictionary(pages_root) = &mut object {
                    pages_root.set("Parent", Object::Reference(target_pages_root_id));
                }
            }
            target.objects.insert(object_id, object);
        }

        if let Ok(target_pages_root) = target.get_dictionary_mut(target_pages_root_id) {
            target_pages_root.set("Count", Object::Integer(pages_count));
            if let Ok(Object::Array(kids)) = target_pages_root.get_mut(b"Kids") {
                kids.push(Object::Reference(source_pages_root_id));
            }
        }

        Ok(())
    }

    /// Only the selected pages and the objects they reference are copied. Attributes the
    /// pages inherit from the source page tree are set on the copies directly.
    fn extract(&self, source: Document, range: Range<usize>) -> Result<Document> {
        let mut cut_doc = self.empty()?;
        let pages_root_id = cut_doc.catalog()?.get(b"Pages")?.as_reference()?;

        let selected_page_ids: Vec<ObjectId> = source
            .get_pages()
            .values()
            .copied()
            .skip(range.start)
            .take(range.len())
            .collect();
        trace!("Copy pages {range:?}, {} in total", selected_page_ids.len());

        let mut imported = BTreeMap::new();
        for &page_id in &selected_page_ids {
            imported.insert(page_id, cut_doc.new_object_id());
        }

        let mut kids = Vec::with_capacity(selected_page_ids.len());
        for page_id in selected_page_ids {
            let page = source.get_dictionary(page_id)?;

            let mut page_copy = Dictionary::new();
            for (key, value) in page.iter() {
                if key.as_slice() != b"Parent" {
                    let value = import_object(&mut cut_doc, &source, value, &mut imported)?;
                    page_copy.set(key.clone(), value);
                }
            }
            for key in INHERITABLE_PAGE_KEYS {
                if page_copy.has(key) {
                    continue;
                }
                if let Some(value) = inherited_attribute(&source, page, key) {
                    let value = import_object(&mut cut_doc, &source, value, &mut imported)?;
                    page_copy.set(key.to_vec(), value);
                }
            }
            page_copy.set("Parent", Object::Reference(pages_root_id));

            let new_page_id = imported[&page_id];
            cut_doc
                .objects
                .insert(new_page_id, Object::Dictionary(page_copy));
            kids.push(Object::Reference(new_page_id));
        }

        let pages_root = cut_doc.get_dictionary_mut(pages_root_id)?;
        pages_root.set("Count", Object::Integer(kids.len() as i64));
        pages_root.set("Kids", Object::Array(kids));

        Ok(cut_doc)
    }

    fn write(&self, doc: &mut Document, path: &Path) -> Result<()> {
        if doc.trailer.get(b"Root").is_err() {
            return Err(anyhow!(
                "The document to write to '{}' has no catalog",
                path.display()
            ));
        }

        doc.prune_objects();
        doc.compress();
        doc.save(path)?;

        Ok(())
    }
}

/// Copy `object` from `source` into `target`, following references. `imported` maps
/// source ids to the ids already given out in `target`. References to pages that were
/// not selected, or to page tree nodes, become `null`.
fn import_object(
    target: &mut Document,
    source: &Document,
    object: &Object,
    imported: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Object> {
    let copy = match object {
        Object::Reference(id) => {
            if let Some(&new_id) = imported.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let Ok(referenced) = source.get_object(*id) else {
                return Ok(Object::Null);
            };
            if matches!(referenced.type_name().unwrap_or(b""), b"Page" | b"Pages") {
                return Ok(Object::Null);
            }

            let new_id = target.new_object_id();
            imported.insert(*id, new_id);
            let referenced_copy = import_object(target, source, referenced, imported)?;
            target.objects.insert(new_id, referenced_copy);
            Object::Reference(new_id)
        }
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| import_object(target, source, item, imported))
                .collect::<Result<_>>()?,
        ),
        Object::Dictionary(dict) => {
            Object::Dictionary(import_dictionary(target, source, dict, imported)?)
        }
        Object::Stream(stream) => {
            let mut stream_copy = stream.clone();
            stream_copy.dict = import_dictionary(target, source, &stream.dict, imported)?;
            Object::Stream(stream_copy)
        }
        other => other.clone(),
    };

    Ok(copy)
}

fn import_dictionary(
    target: &mut Document,
    source: &Document,
    dict: &Dictionary,
    imported: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut copy = Dictionary::new();
    for (key, value) in dict.iter() {
        copy.set(key.clone(), import_object(target, source, value, imported)?);
    }
    Ok(copy)
}

/// Look `key` up on `page`, then on its ancestors in the page tree.
fn inherited_attribute<'a>(source: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_DEPTH_PAGE_TREE {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = source.get_dictionary(parent_id).ok()?;
    }
    None
}
