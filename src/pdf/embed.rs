use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;
use crate::model::ImageFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

enum Encoded {
    /// Passed through untouched with DCTDecode.
    Jpeg(Vec<u8>),
    /// Zlib-compressed 8-bit RGB samples plus an optional alpha mask.
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// An image payload checked and converted into something a PDF XObject can hold.
pub(super) struct DecodedImage {
    pixel_width: u32,
    pixel_height: u32,
    color_space: ColorSpace,
    encoded: Encoded,
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// What the first bytes of a payload say about it.
struct Header {
    format: ImageFormat,
    width: u32,
    height: u32,
    /// Colour components per sample; only known for JPEG.
    components: u8,
}

fn be16(data: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes([*data.get(at)?, *data.get(at + 1)?]))
}

fn be32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Walk JPEG segments up to the first start-of-frame marker.
fn jpeg_header(data: &[u8]) -> Option<Header> {
    let mut pos = 2;
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        let marker = *data.get(pos + 1)?;
        match marker {
            // Fill byte before the real marker.
            0xFF => pos += 1,
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => pos += 2,
            0xD9 | 0xDA => return None,
            // SOF0..SOF15 minus DHT, JPG and DAC.
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return Some(Header {
                    format: ImageFormat::Jpeg,
                    height: be16(data, pos + 5)? as u32,
                    width: be16(data, pos + 7)? as u32,
                    components: *data.get(pos + 9)?,
                });
            }
            _ => pos += 2 + be16(data, pos + 2)? as usize,
        }
    }
}

/// Width and height sit in the IHDR chunk right after the signature.
fn png_header(data: &[u8]) -> Option<Header> {
    if data.get(12..16)? != b"IHDR" {
        return None;
    }
    Some(Header {
        format: ImageFormat::Png,
        width: be32(data, 16)?,
        height: be32(data, 20)?,
        components: 0,
    })
}

fn sniff(data: &[u8]) -> Option<Header> {
    match data {
        [0xFF, 0xD8, ..] => jpeg_header(data),
        _ if data.starts_with(PNG_SIGNATURE) => png_header(data),
        _ => None,
    }
}

pub(super) fn decode(data: &[u8]) -> Result<DecodedImage, Error> {
    let header =
        sniff(data).ok_or_else(|| Error::ImageDecode("unrecognized image data".into()))?;
    if header.width == 0 || header.height == 0 {
        return Err(Error::ImageDecode(format!(
            "{:?} image has zero size",
            header.format
        )));
    }

    match header.format {
        ImageFormat::Jpeg => {
            let color_space = match header.components {
                1 => ColorSpace::Gray,
                3 => ColorSpace::Rgb,
                4 => ColorSpace::Cmyk,
                n => {
                    return Err(Error::ImageDecode(format!(
                        "JPEG with {n} color components"
                    )));
                }
            };
            Ok(DecodedImage {
                pixel_width: header.width,
                pixel_height: header.height,
                color_space,
                encoded: Encoded::Jpeg(data.to_vec()),
            })
        }
        ImageFormat::Png => {
            let cursor = std::io::Cursor::new(data);
            let reader = image::ImageReader::with_format(
                std::io::BufReader::new(cursor),
                image::ImageFormat::Png,
            );
            let decoded = reader
                .decode()
                .map_err(|e| Error::ImageDecode(e.to_string()))?;
            let rgba: image::RgbaImage = decoded.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);
            let alpha = has_alpha.then(|| {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
            });

            Ok(DecodedImage {
                pixel_width: w,
                pixel_height: h,
                color_space: ColorSpace::Rgb,
                encoded: Encoded::Flate { rgb, alpha },
            })
        }
    }
}

/// Write the image (and its soft mask, if any) as XObjects; returns the image ref.
pub(super) fn write_xobject(
    pdf: &mut Pdf,
    img: &DecodedImage,
    alloc: &mut impl FnMut() -> Ref,
) -> Ref {
    let xobj_ref = alloc();
    let w = img.pixel_width as i32;
    let h = img.pixel_height as i32;

    match &img.encoded {
        Encoded::Jpeg(data) => {
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w);
            xobj.height(h);
            match img.color_space {
                ColorSpace::Gray => xobj.color_space().device_gray(),
                ColorSpace::Rgb => xobj.color_space().device_rgb(),
                ColorSpace::Cmyk => xobj.color_space().device_cmyk(),
            }
            xobj.bits_per_component(8);
        }
        Encoded::Flate { rgb, alpha } => {
            let smask_ref = alpha.as_ref().map(|alpha| {
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_ref
            });

            let mut xobj = pdf.image_xobject(xobj_ref, rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    xobj_ref
}
