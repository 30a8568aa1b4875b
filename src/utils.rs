use anyhow::{Result, anyhow};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

/// Get a PDF document with `num_pages` pages. Every page shows `doc_name` as a heading,
/// then `Page i of n`, then a line of random filler, so pages stay recognisable after
/// they have been moved into another document (see [`page_labels`]).
pub fn get_basic_pdf_doc(doc_name: &str, num_pages: u8) -> Result<Document> {
    if doc_name.contains('/') {
        return Err(anyhow!(
            "The document name provided contains a '/', not allowed!"
        ));
    }

    let mut doc = Document::with_version("1.7");

    let pages_root_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let pages_ids: Vec<_> = (1..=num_pages)
        .map(|page_number| append_labelled_page(page_number, num_pages, doc_name, pages_root_id, &mut doc))
        .collect::<Result<_>>()?;

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => pages_ids.iter().map(|&page_id| page_id.into()).collect::<Vec<Object>>(),
        "Count" => num_pages as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };

    doc.objects.insert(pages_root_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_root_id,
    });

    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Write a basic document (see [`get_basic_pdf_doc`]) named after the file at `path`.
pub fn write_basic_pdf(path: impl AsRef<Path>, num_pages: u8) -> Result<()> {
    let path = path.as_ref();
    let doc_name = path
        .file_name()
        .ok_or(anyhow!(
            "The path '{}' does not present a filename",
            path.display()
        ))?
        .to_string_lossy()
        .to_string();

    let mut doc = get_basic_pdf_doc(&doc_name, num_pages)?;
    doc.save(path)?;

    Ok(())
}

fn append_labelled_page(
    page_number: u8,
    total_num_pages: u8,
    doc_name: &str,
    pages_id: ObjectId,
    doc: &mut Document,
) -> Result<ObjectId> {
    let page_title = format!("Page {page_number} of {total_num_pages}");
    let random_text = craft_random_text_of_len(20);

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![50.into(), 600.into()]),
            Operation::new("TL", vec![50.into()]),
            Operation::new("Tf", vec!["F1".into(), 46.into()]),
            Operation::new("Tj", vec![Object::string_literal(doc_name)]),
            Operation::new("Tf", vec!["F1".into(), 36.into()]),
            Operation::new("'", vec![Object::string_literal(page_title)]),
            Operation::new("Tf", vec!["F1".into(), 20.into()]),
            Operation::new("'", vec![Object::string_literal(random_text)]),
            Operation::new("ET", vec![]),
        ],
    };

    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    Ok(page_id)
}

/// Label of every page in document order, as `<doc_name> Page <i> of <n>`.
/// Only meaningful for pages produced by [`get_basic_pdf_doc`].
pub fn page_labels(doc: &Document) -> Result<Vec<String>> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id)?)?;

            let shown_strings: Vec<String> = content
                .operations
                .iter()
                .filter(|operation| operation.operator == "Tj" || operation.operator == "'")
                .filter_map(|operation| match operation.operands.first() {
                    Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).to_string()),
                    _ => None,
                })
                .take(2)
                .collect();

            if shown_strings.len() < 2 {
                return Err(anyhow!("The page {:?} carries no label", page_id));
            }
            Ok(shown_strings.join(" "))
        })
        .collect()
}

pub fn craft_random_text_of_len(char_length: usize) -> String {
    use rand::distr::{Alphanumeric, SampleString};
    Alphanumeric.sample_string(&mut rand::rng(), char_length)
}
