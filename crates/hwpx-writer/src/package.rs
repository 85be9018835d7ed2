//! Output package assembly
//!
//! Generated parts replace their counterparts in the source archive in
//! place; picture bytes are added under `BinData/`. Every other entry of a
//! reference document is carried over unchanged.

use log::{debug, warn};

use crate::archive::HwpxArchive;
use crate::image::ImageRef;
use crate::manifest::CONTENT_HPF_PATH;
use crate::section::SECTION_PATH;
use crate::skeleton::HEADER_PATH;

/// The generated XML parts
#[derive(Debug, Clone)]
pub struct PackageParts {
    pub header: String,
    pub section: String,
    pub content_hpf: String,
}

/// A picture whose bytes were read successfully
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub image: ImageRef,
    pub data: Vec<u8>,
}

/// Read the bytes of every resolvable picture
///
/// Pictures that never resolved to a file or cannot be read are left out;
/// their objects stay in the section without binary data.
pub fn load_images(images: &[ImageRef]) -> Vec<EmbeddedImage> {
    let mut embedded = Vec::with_capacity(images.len());
    for image in images {
        let Some(path) = &image.resolved else {
            debug!("Skipping unresolved image {}", image.source);
            continue;
        };
        match std::fs::read(path) {
            Ok(data) => embedded.push(EmbeddedImage {
                image: image.clone(),
                data,
            }),
            Err(e) => warn!("Cannot read image {}: {}", path.display(), e),
        }
    }
    embedded
}

/// Write generated parts and pictures into `archive`
pub fn assemble(
    mut archive: HwpxArchive,
    parts: PackageParts,
    images: Vec<EmbeddedImage>,
) -> HwpxArchive {
    archive.set_string(HEADER_PATH, parts.header);
    archive.set_string(SECTION_PATH, parts.section);
    archive.set_string(CONTENT_HPF_PATH, parts.content_hpf);
    for embedded in images {
        archive.set(embedded.image.archive_path(), embedded.data);
    }
    archive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_reference_package;
    use std::io::Cursor;

    fn image(id: &str, resolved: Option<std::path::PathBuf>) -> ImageRef {
        ImageRef {
            id: id.to_string(),
            source: format!("{}.png", id),
            resolved,
            width: 100,
            height: 100,
            extension: "png",
        }
    }

    #[test]
    fn test_load_images_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.png");
        std::fs::write(&present, b"PNGDATA").unwrap();

        let images = vec![
            image("image1", Some(present)),
            image("image2", None),
            image("image3", Some(dir.path().join("gone.png"))),
        ];
        let embedded = load_images(&images);
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].image.id, "image1");
        assert_eq!(embedded[0].data, b"PNGDATA");
    }

    #[test]
    fn test_assemble_replaces_parts_and_keeps_others() {
        let archive =
            HwpxArchive::from_reader(Cursor::new(create_reference_package())).unwrap();
        let parts = PackageParts {
            header: "<hh:head/>".to_string(),
            section: "<hs:sec/>".to_string(),
            content_hpf: "<opf:package/>".to_string(),
        };
        let images = vec![EmbeddedImage {
            image: image("image1", None),
            data: vec![1, 2, 3],
        }];

        let out = assemble(archive, parts, images);
        assert_eq!(out.get_string(HEADER_PATH).unwrap(), "<hh:head/>");
        assert_eq!(out.get_string(SECTION_PATH).unwrap(), "<hs:sec/>");
        assert_eq!(out.get("BinData/image1.png").unwrap(), &[1, 2, 3]);
        assert_eq!(
            out.get_string("Preview/PrvText.txt").unwrap(),
            "reference preview"
        );
        assert_eq!(out.file_list().next(), Some("mimetype"));
    }
}
