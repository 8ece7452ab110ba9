use super::PdfError;
use super::form::resolve_dict;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Standard 14 font used for everything the pipeline draws itself.
pub fn helvetica(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

/// Escaped PDF literal string in WinAnsi; characters outside Latin-1 become `?`.
pub fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if u32::from(c) < 0x20 => out.push(' '),
            c if u32::from(c) < 0x80 => out.push(c),
            c if u32::from(c) <= 0xFF => out.push_str(&format!("\\{:03o}", u32::from(c))),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

/// Text operators drawing `text` inside a `width` x `height` box whose origin is `(x, y)`.
pub fn text_ops(
    font: &str,
    text: &str,
    size: Option<f64>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> String {
    let chars = text.chars().count().max(1) as f64;
    // Helvetica averages about half an em per glyph
    let fitting = ((width - 4.0) / (0.5 * chars)).max(4.0);
    let size = size.unwrap_or_else(|| (height * 0.7).min(10.0)).min(fitting).max(4.0);
    let baseline = y + ((height - size) / 2.0).max(0.0) + size * 0.2;

    format!(
        "BT /{} {:.2} Tf 0 g {:.2} {:.2} Td {} Tj ET\n",
        font,
        size,
        x + 2.0,
        baseline,
        literal(text)
    )
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary, PdfError> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let node = doc.get_dictionary(id)?;
        if let Ok(resources) = node.get(b"Resources") {
            return Ok(resolve_dict(doc, resources)?.clone());
        }
        current = node.get(b"Parent").ok().and_then(|p| p.as_reference().ok());
    }
    Ok(Dictionary::new())
}

/// Registers `target` as `/category/name` in the page's own resource dictionary.
pub fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    target: ObjectId,
) -> Result<(), PdfError> {
    let mut resources = inherited_resources(doc, page_id)?;
    let mut entries = match resources.get(category.as_bytes()) {
        Ok(object) => resolve_dict(doc, object)?.clone(),
        Err(_) => Dictionary::new(),
    };
    entries.set(name, Object::Reference(target));
    resources.set(category, Object::Dictionary(entries));

    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Appends `operations` after the existing content, isolated from its graphics state.
pub fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: &str,
) -> Result<(), PdfError> {
    let existing: Vec<Object> = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
        Ok(Object::Array(parts)) => parts.clone(),
        _ => Vec::new(),
    };

    let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let close = doc.add_object(Stream::new(
        Dictionary::new(),
        format!("\nQ\n{}", operations).into_bytes(),
    ));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open));
    contents.extend(existing);
    contents.push(Object::Reference(close));

    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// First page of the document.
pub fn first_page(doc: &Document) -> Result<ObjectId, PdfError> {
    doc.get_pages()
        .into_values()
        .next()
        .ok_or_else(|| PdfError::TemplateInvalid("document has no pages".to_string()))
}
