//! In-memory document builders for unit tests.

use std::io::{Cursor, Write};

use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as u32,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// PDF with one text line per page.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let pages: Vec<Option<&str>> = pages.iter().map(|p| Some(*p)).collect();
    build_pdf(&pages)
}

/// PDF whose pages carry no text layer at all.
pub fn blank_pdf(page_count: usize) -> Vec<u8> {
    build_pdf(&vec![None; page_count])
}

/// DOCX with one paragraph per entry.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    buf.into_inner()
}

/// Zip archive from `(member name, bytes)` pairs. Names ending in `/` become
/// directory entries.
pub fn zip(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    write_zip(entries, zip::write::SimpleFileOptions::default())
}

/// Like [`zip`], but members are stored uncompressed so their payload can be
/// located and damaged in place.
pub fn zip_stored(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    write_zip(entries, options)
}

/// Flip the first byte of `payload` inside a stored archive, leaving the
/// recorded CRC untouched.
pub fn corrupt_member(mut archive: Vec<u8>, payload: &[u8]) -> Vec<u8> {
    let offset = archive
        .windows(payload.len())
        .position(|window| window == payload)
        .expect("payload not found in archive");
    archive[offset] ^= 0xFF;
    archive
}

fn write_zip(entries: &[(&str, Vec<u8>)], options: zip::write::SimpleFileOptions) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
