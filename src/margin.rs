//! Left margin for PDF pages.
//!
//! Some receipt and label printers clip the left edge of the page. Each page
//! is redrawn on a blank page of the same size, shifted right by
//! `level * MARGIN_UNIT_PT` points.

use lopdf::{
    dictionary,
    Dictionary,
    Document,
    Object,
    ObjectId,
    Stream,
};
use log::debug;

use crate::config::MarginLevel;

/// Horizontal shift per margin level, in PDF points.
pub const MARGIN_UNIT_PT: f32 = 10.0;

const FORM_NAME: &str = "MarginPage";
/// Bound on `/Parent` hops when looking up inherited page attributes.
const MAX_TREE_DEPTH: usize = 32;

/// Applies the margin, returning `pdf` untouched for level 0.
pub fn apply(pdf: Vec<u8>, level: MarginLevel) -> Result<Vec<u8>, lopdf::Error> {
    if level.is_zero() {
        return Ok(pdf);
    }

    let offset = f32::from(level.get()) * MARGIN_UNIT_PT;
    let mut doc = Document::load_mem(&pdf)?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in &pages {
        shift_page(&mut doc, *page_id, offset)?;
    }
    debug!("Shifted {} PDF pages by {}pt", pages.len(), offset);

    let mut output = Vec::new();
    doc.save_to(&mut output)?;
    Ok(output)
}

/// Turns the page content into a form XObject and paints it translated.
fn shift_page(doc: &mut Document, page_id: ObjectId, offset: f32) -> Result<(), lopdf::Error> {
    let media_box = inherited(doc, page_id, b"MediaBox")
        .unwrap_or_else(|| Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]));
    let resources = inherited(doc, page_id, b"Resources");
    let content = doc.get_page_content(page_id)?;

    let mut form = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => media_box.clone(),
    };
    if let Some(resources) = resources {
        form.set("Resources", resources);
    }
    let form_id = doc.add_object(Stream::new(form, content));

    let overlay = format!("q 1 0 0 1 {} 0 cm /{} Do Q", offset, FORM_NAME);
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay.into_bytes()));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("MediaBox", media_box);
    page.set("Contents", overlay_id);
    page.set(
        "Resources",
        dictionary! {
            "XObject" => dictionary! { FORM_NAME => form_id },
        },
    );
    Ok(())
}

/// Looks up a page attribute, walking up the page tree for inherited values.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(node).ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        node = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}
