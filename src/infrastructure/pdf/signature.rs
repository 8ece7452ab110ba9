use super::PdfError;
use super::form::Rect;
use super::page;
use crate::domain::signature::decode_signature_uri;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Where the signature goes when the template declares no `firma` field.
pub const DEFAULT_SIGNATURE_RECT: Rect = Rect {
    llx: 85.0,
    lly: 78.0,
    urx: 310.0,
    ury: 148.0,
};

const RESOURCE_NAME: &str = "FDSig";
const JPEG_QUALITY: u8 = 90;

/// Decoded signature, transparency already composited onto white.
#[derive(Debug, Clone)]
pub struct SignatureImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

/// Alpha-composites `rgba` over a white background.
pub fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

impl SignatureImage {
    /// Problems with the submitted image come back as [`PdfError::Signature`];
    /// a failure to re-encode it is an [`PdfError::Image`].
    pub fn from_data_uri(uri: &str) -> Result<Self, PdfError> {
        let data = decode_signature_uri(uri).map_err(|e| PdfError::Signature(e.to_string()))?;
        let decoded = image::load_from_memory(&data.bytes)
            .map_err(|e| PdfError::Signature(format!("undecodable image: {}", e)))?;
        let rgb = flatten_onto_white(&decoded.to_rgba8());

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&rgb)?;

        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            jpeg,
        })
    }

    fn to_xobject(&self) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", Object::Integer(i64::from(self.width)));
        dict.set("Height", Object::Integer(i64::from(self.height)));
        dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        Stream::new(dict, self.jpeg.clone())
    }

    /// Draws the image into `page_id`'s content, scaled to fit `rect` and centered.
    pub fn place(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        rect: Rect,
    ) -> Result<(), PdfError> {
        let (x, y, w, h) = rect.fit(f64::from(self.width), f64::from(self.height));
        let image_id = doc.add_object(self.to_xobject());
        page::add_resource(doc, page_id, "XObject", RESOURCE_NAME, image_id)?;
        page::append_content(
            doc,
            page_id,
            &format!(
                "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /{} Do Q\n",
                w, h, x, y, RESOURCE_NAME
            ),
        )
    }
}
