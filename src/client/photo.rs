//! GPS position embedded in photo metadata.

use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;

use crate::client::location::{ExifCoordinate, ExifGps};

/// GPS tags of a JPEG, TIFF, PNG, HEIF or WebP image.
///
/// `None` when the file has no EXIF block or the block has no usable position.
pub fn read_exif_gps(bytes: &[u8]) -> Option<ExifGps> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!("No EXIF metadata: {}", e);
            return None;
        }
    };

    let gps = ExifGps {
        latitude: coordinate(&exif, Tag::GPSLatitude),
        latitude_ref: reference(&exif, Tag::GPSLatitudeRef),
        longitude: coordinate(&exif, Tag::GPSLongitude),
        longitude_ref: reference(&exif, Tag::GPSLongitudeRef),
    };
    gps.coordinates().is_some().then_some(gps)
}

fn coordinate(exif: &Exif, tag: Tag) -> Option<ExifCoordinate> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Rational(parts) = &field.value else {
        return None;
    };

    let coordinate = match parts.as_slice() {
        [deg, min, sec] => ExifCoordinate::Dms([deg.to_f64(), min.to_f64(), sec.to_f64()]),
        [decimal] => ExifCoordinate::Decimal(decimal.to_f64()),
        _ => return None,
    };
    // zero denominators decode to NaN or infinity
    coordinate.to_decimal(None, "").is_finite().then_some(coordinate)
}

fn reference(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(parts) = &field.value else {
        return None;
    };
    parts
        .first()
        .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
        .filter(|r| !r.is_empty())
}
