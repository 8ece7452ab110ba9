use super::form::{
    FF_READ_ONLY, FieldKind, FormField, Widget, catalog_id, encode_text_string, font_size,
    resolve_dict,
};
use super::page;
use super::{FlattenStrategy, PdfError};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, Stream};
use std::collections::{BTreeMap, HashMap, HashSet};

const FONT_NAME: &str = "Helv";
const PAGE_FONT_NAME: &str = "FDHelv";

/// Writes `values` (keyed by field name) into the form and makes it non-editable.
pub fn flatten(
    doc: &mut Document,
    fields: &[FormField],
    values: &HashMap<String, String>,
    strategy: FlattenStrategy,
) -> Result<(), PdfError> {
    set_values(doc, fields, values)?;
    match strategy {
        FlattenStrategy::ReadOnly => read_only(doc, fields, values),
        FlattenStrategy::BurnIn => burn_in(doc, fields, values),
    }
}

/// Normal-appearance state of a checkbox widget other than `Off`.
fn on_state(doc: &Document, widget_id: ObjectId) -> Option<Vec<u8>> {
    let widget = doc.get_dictionary(widget_id).ok()?;
    let appearance = resolve_dict(doc, widget.get(b"AP").ok()?).ok()?;
    let normal = resolve_dict(doc, appearance.get(b"N").ok()?).ok()?;
    normal
        .iter()
        .map(|(key, _)| key)
        .find(|key| key.as_slice() != b"Off")
        .cloned()
}

fn set_values(
    doc: &mut Document,
    fields: &[FormField],
    values: &HashMap<String, String>,
) -> Result<(), PdfError> {
    for field in fields {
        let Some(value) = values.get(&field.name) else {
            continue;
        };

        let state = match field.kind {
            FieldKind::Button => field.widgets.first().and_then(|w| on_state(doc, w.id)),
            _ => None,
        };

        match state {
            Some(state) => {
                doc.get_dictionary_mut(field.id)?
                    .set("V", Object::Name(state.clone()));
                for widget in &field.widgets {
                    doc.get_dictionary_mut(widget.id)?
                        .set("AS", Object::Name(state.clone()));
                }
            }
            None => {
                doc.get_dictionary_mut(field.id)?.set(
                    "V",
                    Object::String(encode_text_string(value), StringFormat::Literal),
                );
            }
        }
    }
    Ok(())
}

fn appearance_stream(
    field: &FormField,
    widget: &Widget,
    value: &str,
    font_id: ObjectId,
) -> Option<Stream> {
    let rect = widget.rect?;
    let (width, height) = (rect.width(), rect.height());

    let mut fonts = Dictionary::new();
    fonts.set(FONT_NAME, Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Form".to_vec()));
    dict.set(
        "BBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width.ceil() as i64),
            Object::Integer(height.ceil() as i64),
        ]),
    );
    dict.set("Resources", Object::Dictionary(resources));

    let size = field.appearance.as_deref().and_then(font_size);
    let content = format!(
        "/Tx BMC\nq\n{}Q\nEMC\n",
        page::text_ops(FONT_NAME, value, size, 0.0, 0.0, width, height)
    );
    Some(Stream::new(dict, content.into_bytes()))
}

fn read_only(
    doc: &mut Document,
    fields: &[FormField],
    values: &HashMap<String, String>,
) -> Result<(), PdfError> {
    let font_id = page::helvetica(doc);

    for field in fields {
        let has_state = field.kind == FieldKind::Button
            && field.widgets.iter().any(|w| on_state(doc, w.id).is_some());

        if let Some(value) = values.get(&field.name).filter(|_| !has_state) {
            for widget in &field.widgets {
                let Some(stream) = appearance_stream(field, widget, value, font_id) else {
                    continue;
                };
                let stream_id = doc.add_object(stream);
                let mut appearance = Dictionary::new();
                appearance.set("N", Object::Reference(stream_id));
                doc.get_dictionary_mut(widget.id)?
                    .set("AP", Object::Dictionary(appearance));
            }
        }

        doc.get_dictionary_mut(field.id)?
            .set("Ff", Object::Integer(field.flags | FF_READ_ONLY));
    }

    let root = catalog_id(doc)?;
    let form_ref = match doc.get_dictionary(root)?.get(b"AcroForm") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };
    let form = match form_ref {
        Some(id) => doc.get_dictionary_mut(id)?,
        None => doc
            .get_dictionary_mut(root)?
            .get_mut(b"AcroForm")?
            .as_dict_mut()?,
    };
    form.set("NeedAppearances", Object::Boolean(false));
    Ok(())
}

fn burn_in(
    doc: &mut Document,
    fields: &[FormField],
    values: &HashMap<String, String>,
) -> Result<(), PdfError> {
    let fallback_page = page::first_page(doc)?;
    let mut operations: BTreeMap<ObjectId, String> = BTreeMap::new();

    for field in fields {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        let size = field.appearance.as_deref().and_then(font_size);
        for widget in &field.widgets {
            let Some(rect) = widget.rect else {
                continue;
            };
            operations
                .entry(widget.page.unwrap_or(fallback_page))
                .or_default()
                .push_str(&page::text_ops(
                    PAGE_FONT_NAME,
                    value,
                    size,
                    rect.llx,
                    rect.lly,
                    rect.width(),
                    rect.height(),
                ));
        }
    }

    if !operations.is_empty() {
        let font_id = page::helvetica(doc);
        for (page_id, ops) in &operations {
            page::add_resource(doc, *page_id, "Font", PAGE_FONT_NAME, font_id)?;
            page::append_content(doc, *page_id, ops)?;
        }
    }

    let widgets: HashSet<ObjectId> = fields
        .iter()
        .flat_map(|f| f.widgets.iter().map(|w| w.id))
        .collect();
    remove_widget_annotations(doc, &widgets)?;

    let root = catalog_id(doc)?;
    doc.get_dictionary_mut(root)?.remove(b"AcroForm");
    doc.prune_objects();
    Ok(())
}

fn is_widget(doc: &Document, annotation: &Object, known: &HashSet<ObjectId>) -> bool {
    if let Object::Reference(id) = annotation {
        if known.contains(id) {
            return true;
        }
    }
    resolve_dict(doc, annotation)
        .ok()
        .and_then(|dict| dict.get(b"Subtype").ok())
        .is_some_and(|subtype| matches!(subtype, Object::Name(name) if name == b"Widget"))
}

fn remove_widget_annotations(
    doc: &mut Document,
    known: &HashSet<ObjectId>,
) -> Result<(), PdfError> {
    for page_id in doc.get_pages().into_values() {
        let annotations = match doc.get_dictionary(page_id)?.get(b"Annots") {
            Ok(object) => match object {
                Object::Reference(id) => doc.get_object(*id)?.as_array()?.clone(),
                Object::Array(items) => items.clone(),
                _ => continue,
            },
            Err(_) => continue,
        };

        let kept: Vec<Object> = annotations
            .into_iter()
            .filter(|a| !is_widget(doc, a, known))
            .collect();

        let page = doc.get_dictionary_mut(page_id)?;
        if kept.is_empty() {
            page.remove(b"Annots");
        } else {
            page.set("Annots", Object::Array(kept));
        }
    }
    Ok(())
}
