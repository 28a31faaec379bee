use capture_core::{CapturedImage, ImageSource};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::{CaptureError, DecodeError, MediaResource, WorkflowSettings};

const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Grabs the current frame of a live stream and encodes it as a JPEG still.
///
/// Streams that have not reported real dimensions yet are drawn at
/// `settings.default_frame_size`.
pub fn grab_still(
    resource: &mut MediaResource,
    settings: &WorkflowSettings,
) -> Result<CapturedImage, CaptureError> {
    let size = resource
        .video_size()
        .filter(|size| !size.is_empty())
        .unwrap_or(settings.default_frame_size);
    let frame = resource.grab_frame(size)?;
    Ok(encode_jpeg(&frame, settings.jpeg_quality)?)
}

pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<CapturedImage, image::ImageError> {
    let mut payload = Vec::new();
    JpegEncoder::new_with_quality(&mut payload, quality).encode_image(frame)?;
    Ok(CapturedImage::new(
        payload,
        JPEG_CONTENT_TYPE,
        frame.width(),
        frame.height(),
        ImageSource::Camera,
    ))
}

/// Validates a picked file and wraps its original bytes as a captured image.
pub fn decode_file(payload: &[u8]) -> Result<CapturedImage, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    let format = image::guess_format(payload).map_err(DecodeError::Unrecognized)?;
    let decoded = image::load_from_memory_with_format(payload, format)?;
    Ok(CapturedImage::new(
        payload.to_vec(),
        format.to_mime_type(),
        decoded.width(),
        decoded.height(),
        ImageSource::File,
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    use super::{decode_file, encode_jpeg};
    use crate::DecodeError;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(width, height, Rgb([10, 200, 30]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn encoded_frame_is_a_jpeg_of_the_same_size() {
        let frame = RgbImage::from_pixel(64, 48, Rgb([255, 0, 0]));
        let image = encode_jpeg(&frame, 90).unwrap();

        assert_eq!(image.content_type(), "image/jpeg");
        assert_eq!((image.width(), image.height()), (64, 48));
        assert_eq!(&image.payload()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn picked_png_keeps_original_bytes() {
        let bytes = png_bytes(5, 7);
        let image = decode_file(&bytes).unwrap();

        assert_eq!(image.payload(), bytes.as_slice());
        assert_eq!(image.content_type(), "image/png");
        assert_eq!((image.width(), image.height()), (5, 7));
    }

    #[test]
    fn garbage_and_empty_payloads_are_rejected() {
        assert!(matches!(decode_file(&[]), Err(DecodeError::Empty)));
        assert!(decode_file(b"definitely not an image").is_err());
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let bytes = png_bytes(8, 8);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            decode_file(truncated),
            Err(DecodeError::Decode(_))
        ));
    }
}
