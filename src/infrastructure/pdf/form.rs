use super::PdfError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Field flag bit 1.
pub const FF_READ_ONLY: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            llx: llx.min(urx),
            lly: lly.min(ury),
            urx: llx.max(urx),
            ury: lly.max(ury),
        }
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Largest `(x, y, w, h)` box of the given aspect that fits, centered.
    pub fn fit(&self, width: f64, height: f64) -> (f64, f64, f64, f64) {
        if width <= 0.0 || height <= 0.0 {
            return (self.llx, self.lly, 0.0, 0.0);
        }
        let scale = (self.width() / width).min(self.height() / height);
        let (w, h) = (width * scale, height * scale);
        (
            self.llx + (self.width() - w) / 2.0,
            self.lly + (self.height() - h) / 2.0,
            w,
            h,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl FieldKind {
    fn from_name(name: Option<&[u8]>) -> Self {
        match name {
            Some(b"Tx") => FieldKind::Text,
            Some(b"Btn") => FieldKind::Button,
            Some(b"Ch") => FieldKind::Choice,
            Some(b"Sig") => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub id: ObjectId,
    pub page: Option<ObjectId>,
    pub rect: Option<Rect>,
}

/// A terminal form field with its widget annotations.
#[derive(Debug, Clone)]
pub struct FormField {
    /// Fully qualified name, partial names joined with `.`.
    pub name: String,
    pub id: ObjectId,
    pub kind: FieldKind,
    pub flags: i64,
    /// Default appearance string (`/DA`), inherited if needed.
    pub appearance: Option<String>,
    pub widgets: Vec<Widget>,
}

impl FormField {
    pub fn is_read_only(&self) -> bool {
        self.flags & FF_READ_ONLY != 0
    }
}

pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, PdfError> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

pub fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Dictionary, PdfError> {
    Ok(resolve(doc, object)?.as_dict()?)
}

pub fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn text(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

fn name(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Name(name) => Some(name.as_slice()),
        _ => None,
    }
}

/// UTF-16BE with BOM, otherwise single-byte.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

/// Inverse of [`decode_text_string`]: plain bytes for ASCII, UTF-16BE otherwise.
pub fn encode_text_string(value: &str) -> Vec<u8> {
    if value.chars().all(|c| u32::from(c) < 0x80) {
        return value.as_bytes().to_vec();
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

pub fn rect_of(doc: &Document, dict: &Dictionary) -> Option<Rect> {
    let array = dict.get(b"Rect").ok().and_then(|o| resolve(doc, o).ok())?;
    let values: Vec<f64> = array.as_array().ok()?.iter().filter_map(number).collect();
    match values.as_slice() {
        [llx, lly, urx, ury] => Some(Rect::new(*llx, *lly, *urx, *ury)),
        _ => None,
    }
}

pub fn catalog_id(doc: &Document) -> Result<ObjectId, PdfError> {
    Ok(doc.trailer.get(b"Root")?.as_reference()?)
}

/// The catalog's `/AcroForm` dictionary, if any.
fn acroform(doc: &Document) -> Result<Option<&Dictionary>, PdfError> {
    let catalog = doc.get_dictionary(catalog_id(doc)?)?;
    match catalog.get(b"AcroForm") {
        Ok(object) => Ok(Some(resolve_dict(doc, object)?)),
        Err(_) => Ok(None),
    }
}

fn page_of_widget(doc: &Document, widget_id: ObjectId, widget: &Dictionary) -> Option<ObjectId> {
    if let Ok(Object::Reference(page)) = widget.get(b"P") {
        return Some(*page);
    }
    doc.get_pages().into_values().find(|page_id| {
        doc.get_dictionary(*page_id)
            .ok()
            .and_then(|page| page.get(b"Annots").ok())
            .and_then(|annots| resolve(doc, annots).ok())
            .and_then(|annots| annots.as_array().ok())
            .is_some_and(|annots| {
                annots
                    .iter()
                    .any(|a| matches!(a, Object::Reference(id) if *id == widget_id))
            })
    })
}

#[derive(Clone, Default)]
struct Inherited {
    prefix: String,
    kind: Option<Vec<u8>>,
    flags: Option<i64>,
    appearance: Option<String>,
}

/// Every terminal field of the document's form, in declaration order.
pub fn collect_fields(doc: &Document) -> Result<Vec<FormField>, PdfError> {
    let Some(form) = acroform(doc)? else {
        return Ok(Vec::new());
    };
    let Ok(fields) = form.get(b"Fields") else {
        return Ok(Vec::new());
    };

    let inherited = Inherited {
        appearance: form.get(b"DA").ok().and_then(text),
        ..Inherited::default()
    };
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for field in resolve(doc, fields)?.as_array()? {
        if let Object::Reference(id) = field {
            walk(doc, *id, &inherited, &mut seen, &mut out)?;
        }
    }
    Ok(out)
}

fn walk(
    doc: &Document,
    id: ObjectId,
    parent: &Inherited,
    seen: &mut HashSet<ObjectId>,
    out: &mut Vec<FormField>,
) -> Result<(), PdfError> {
    if !seen.insert(id) {
        return Ok(());
    }
    let dict = doc.get_dictionary(id)?;

    let partial = dict.get(b"T").ok().and_then(text);
    let current = Inherited {
        prefix: match (&partial, parent.prefix.is_empty()) {
            (Some(p), true) => p.clone(),
            (Some(p), false) => format!("{}.{}", parent.prefix, p),
            (None, _) => parent.prefix.clone(),
        },
        kind: dict
            .get(b"FT")
            .ok()
            .and_then(name)
            .map(<[u8]>::to_vec)
            .or_else(|| parent.kind.clone()),
        flags: dict
            .get(b"Ff")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .or(parent.flags),
        appearance: dict
            .get(b"DA")
            .ok()
            .and_then(text)
            .or_else(|| parent.appearance.clone()),
    };

    let kids: Vec<ObjectId> = match dict.get(b"Kids") {
        Ok(kids) => resolve(doc, kids)?
            .as_array()?
            .iter()
            .filter_map(|k| k.as_reference().ok())
            .collect(),
        Err(_) => Vec::new(),
    };
    let child_fields: Vec<ObjectId> = kids
        .iter()
        .copied()
        .filter(|kid| {
            doc.get_dictionary(*kid)
                .map(|d| d.has(b"T"))
                .unwrap_or(false)
        })
        .collect();

    if !child_fields.is_empty() {
        for kid in child_fields {
            walk(doc, kid, &current, seen, out)?;
        }
        return Ok(());
    }

    // terminal: either merged field/widget or a field whose kids are all widgets
    let widget_ids = if kids.is_empty() { vec![id] } else { kids };
    let widgets = widget_ids
        .into_iter()
        .filter_map(|wid| {
            let widget = doc.get_dictionary(wid).ok()?;
            Some(Widget {
                id: wid,
                page: page_of_widget(doc, wid, widget),
                rect: rect_of(doc, widget),
            })
        })
        .collect();

    out.push(FormField {
        name: current.prefix,
        id,
        kind: FieldKind::from_name(current.kind.as_deref()),
        flags: current.flags.unwrap_or(0),
        appearance: current.appearance,
        widgets,
    });
    Ok(())
}

/// Names of fields a viewer would still let the user edit.
pub fn editable_fields(doc: &Document) -> Result<Vec<String>, PdfError> {
    Ok(collect_fields(doc)?
        .into_iter()
        .filter(|f| !f.is_read_only())
        .map(|f| f.name)
        .collect())
}

/// Font size from a `/DA` string such as `/Helv 10 Tf 0 g`; `None` for auto (0).
pub fn font_size(appearance: &str) -> Option<f64> {
    let tokens: Vec<&str> = appearance.split_whitespace().collect();
    let position = tokens.iter().position(|t| *t == "Tf")?;
    let size: f64 = tokens.get(position.checked_sub(1)?)?.parse().ok()?;
    (size > 0.0).then_some(size)
}
