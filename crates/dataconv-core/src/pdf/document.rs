//! PDF text and scan-image access using lopdf and pdf-extract.

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;

/// A loaded PDF.
pub struct PdfDocument {
    document: Document,
    /// Bytes handed to pdf-extract (decrypted when needed).
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Load a PDF from bytes, removing an empty-password encryption.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document, raw_data })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Text layer of the whole document.
    pub fn text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Decodable images of one page (1-indexed).
    pub fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let pages = self.document.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();
        let Some(resources) = self.resources(*page_id) else {
            return Ok(images);
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            return Ok(images);
        };

        if let Ok((_, Object::Dictionary(xobjects))) = self.document.dereference(xobjects) {
            for (_, reference) in xobjects.iter() {
                if let Ok((_, object)) = self.document.dereference(reference) {
                    if let Some(image) = self.decode_image(object) {
                        images.push(image);
                    }
                }
            }
        }

        trace!("Page {} has {} decodable images", page, images.len());
        Ok(images)
    }

    /// Images of every page in page order. Falls back to scanning all
    /// objects when no page references an image directly.
    pub fn images(&self) -> Vec<DynamicImage> {
        let mut images = Vec::new();
        for page in 1..=self.page_count() {
            match self.page_images(page) {
                Ok(found) => images.extend(found),
                Err(e) => debug!("Skipping images of page {}: {}", page, e),
            }
        }

        if images.is_empty() {
            images = self
                .document
                .objects
                .values()
                .filter_map(|object| self.decode_image(object))
                .collect();
            debug!("Object scan found {} images", images.len());
        }

        images
    }

    /// Page resources, following inheritance up the page tree.
    fn resources(&self, node_id: ObjectId) -> Option<Dictionary> {
        let Ok(Object::Dictionary(node)) = self.document.get_object(node_id) else {
            return None;
        };

        if let Ok(resources) = node.get(b"Resources") {
            if let Ok((_, Object::Dictionary(resources))) = self.document.dereference(resources) {
                return Some(resources.clone());
            }
        }

        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => self.resources(*parent),
            _ => None,
        }
    }

    fn decode_image(&self, object: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = object else {
            return None;
        };
        let dict = &stream.dict;
        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

        let filter = dict.get(b"Filter").ok().and_then(|filter| match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(filters) => filters.first().and_then(|f| f.as_name().ok()),
            _ => None,
        });

        match filter {
            Some(b"DCTDecode") => {
                return image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg).ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported image filter {:?}", filter.map(String::from_utf8_lossy));
                return None;
            }
            _ => {}
        }

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);
        if bits != 8 {
            return None;
        }

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(items) => items.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => self.document.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        raw_image(data, width, height, color_space)
    }
}

fn raw_image(mut data: Vec<u8>, width: u32, height: u32, color_space: &[u8]) -> Option<DynamicImage> {
    let pixels = (width as usize).checked_mul(height as usize)?;

    match color_space {
        b"DeviceRGB" | b"RGB" => {
            data.truncate(pixels.checked_mul(3)?);
            ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" => {
            data.truncate(pixels);
            ImageBuffer::<Luma<u8>, _>::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        _ => {
            trace!("Unsupported color space {}", String::from_utf8_lossy(color_space));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_garbage() {
        let err = PdfDocument::load(b"definitely not a pdf").err().unwrap();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_image_only_pdf() {
        let document = PdfDocument::load(&crate::pdf::image_only_pdf()).unwrap();
        assert_eq!(document.page_count(), 1);
        assert!(document.text().unwrap().trim().is_empty());

        let images = document.page_images(1).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!((images[0].width(), images[0].height()), (2, 2));
        assert_eq!(document.images().len(), 1);
        assert!(matches!(document.page_images(2), Err(PdfError::InvalidPage(2))));
    }

    #[test]
    fn test_raw_gray_image() {
        let image = raw_image(vec![0, 64, 128, 255, 7], 2, 2, b"DeviceGray").unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
    }

    #[test]
    fn test_raw_image_too_short() {
        assert!(raw_image(vec![0; 5], 2, 2, b"DeviceRGB").is_none());
        assert!(raw_image(vec![0; 12], 2, 2, b"Indexed").is_none());
    }
}
