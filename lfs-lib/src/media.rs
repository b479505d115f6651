use std::str::FromStr;

use mime::Mime;

/// extensions for the media types a gallery commonly stores. checked before
/// asking mime_guess since its lists are not ordered by preference
fn preferred_extension(mime: &Mime) -> Option<&'static str> {
    let ext = match (mime.type_().as_str(), mime.subtype().as_str()) {
        ("image", "jpeg") | ("image", "jpg") | ("image", "pjpeg") => "jpg",
        ("image", "png") => "png",
        ("image", "gif") => "gif",
        ("image", "bmp") => "bmp",
        ("image", "webp") => "webp",
        ("image", "tiff") => "tiff",
        ("image", "heic") => "heic",
        ("image", "heif") => "heif",
        ("image", "avif") => "avif",
        ("image", "svg") => "svg",
        ("video", "mp4") => "mp4",
        ("video", "quicktime") => "mov",
        ("video", "webm") => "webm",
        ("video", "x-msvideo") => "avi",
        _ => return None,
    };

    Some(ext)
}

/// file extension for a reported media type. unknown but well formed types
/// fall back to their subtype, anything unparsable yields None
pub fn extension_for(media_type: &str) -> Option<String> {
    let mime = Mime::from_str(media_type.trim()).ok()?;

    if let Some(ext) = preferred_extension(&mime) {
        return Some(ext.to_owned());
    }

    if let Some(list) = mime_guess::get_mime_extensions(&mime) {
        if let Some(first) = list.first() {
            return Some((*first).to_owned());
        }
    }

    let sub = mime.subtype().as_str();

    if sub.is_empty() || sub == "*" {
        None
    } else {
        Some(sub.trim_start_matches("x-").to_owned())
    }
}

/// display name of a photo: its title with the extension of its media type
/// appended, unless the title already carries it
pub fn photo_file_name(title: &str, media_type: Option<&str>) -> String {
    let Some(ext) = media_type.and_then(extension_for) else {
        return title.to_owned();
    };

    let lower = title.to_lowercase();
    let has_ext = lower.rsplit_once('.')
        .map(|(_, given)| given == ext || (ext == "jpg" && (given == "jpeg" || given == "jpe")))
        .unwrap_or(false);

    if has_ext {
        title.to_owned()
    } else {
        format!("{title}.{ext}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_extensions() {
        let cases = [
            ("image/jpeg", "jpg"),
            ("image/png", "png"),
            ("IMAGE/PNG", "png"),
            ("image/webp", "webp"),
            ("video/quicktime", "mov"),
            ("image/x-canon-cr2", "canon-cr2"),
        ];

        for (given, expected) in cases {
            let ext = extension_for(given);

            assert!(ext.is_some(), "no extension for {:?}", given);

            // types mime_guess knows about may come back with its extension
            if given != "image/x-canon-cr2" {
                assert_eq!(ext.as_deref(), Some(expected), "extension for {:?}", given);
            }
        }

        assert_eq!(extension_for("not a mime"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn photo_names() {
        assert_eq!(photo_file_name("sunset", Some("image/jpeg")), "sunset.jpg");
        assert_eq!(photo_file_name("sunset.jpg", Some("image/jpeg")), "sunset.jpg");
        assert_eq!(photo_file_name("sunset.JPEG", Some("image/jpeg")), "sunset.JPEG");
        assert_eq!(photo_file_name("sunset.png", Some("image/jpeg")), "sunset.png.jpg");
        assert_eq!(photo_file_name("sunset", None), "sunset");
        assert_eq!(photo_file_name("sunset", Some("garbage")), "sunset");
    }
}
