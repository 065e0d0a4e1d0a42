//! Statement PDFs built in memory, for tests in this workspace.
//!
//! Pages use the Courier core font, so no font files are embedded.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use md5::{Digest, Md5};

const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08, 0x2E, 0x2E, 0x00,
    0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];
const FILE_ID: &[u8] = b"tally-statement0";
const PERMISSIONS: i32 = -44;
const TOP: i64 = 780;
const LEADING: i64 = 14;

/// One page per entry; every line is its own text object.
pub fn statement_pdf(pages: &[&[&str]]) -> lopdf::Result<Vec<u8>> {
    let doc = document(pages.iter().map(|lines| line_operations(lines)).collect())?;
    save(doc)
}

/// A single page of `[date, description, amount]` rows. All rows share one
/// text object and each column is placed with a relative `Td` move.
pub fn columnar_statement_pdf(rows: &[[&str; 3]]) -> lopdf::Result<Vec<u8>> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![50.into(), TOP.into()]),
    ];
    for (i, [date, description, amount]) in rows.iter().enumerate() {
        if i > 0 {
            ops.push(Operation::new("Td", vec![(-390).into(), (-LEADING).into()]));
        }
        ops.push(Operation::new("Tj", vec![Object::string_literal(*date)]));
        ops.push(Operation::new("Td", vec![90.into(), 0.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(*description)]));
        ops.push(Operation::new("Td", vec![300.into(), 0.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(*amount)]));
    }
    ops.push(Operation::new("ET", vec![]));
    save(document(vec![ops])?)
}

/// [`statement_pdf`] under 40-bit RC4 standard security (V1, R2).
/// An empty `user_password` gives an owner-password-only document.
pub fn encrypted_statement_pdf(pages: &[&[&str]], user_password: &str, owner_password: &str) -> lopdf::Result<Vec<u8>> {
    let mut doc = document(pages.iter().map(|lines| line_operations(lines)).collect())?;

    let owner_key = Md5::digest(padded(owner_password));
    let owner_entry = rc4(&owner_key[..5], &padded(user_password));

    let mut hasher = Md5::new();
    hasher.update(padded(user_password));
    hasher.update(&owner_entry);
    hasher.update(PERMISSIONS.to_le_bytes());
    hasher.update(FILE_ID);
    let file_key = hasher.finalize()[..5].to_vec();
    let user_entry = rc4(&file_key, &PASSWORD_PAD);

    for (&(number, generation), object) in doc.objects.iter_mut() {
        if let Object::Stream(stream) = object {
            let mut seed = file_key.clone();
            seed.extend_from_slice(&number.to_le_bytes()[..3]);
            seed.extend_from_slice(&generation.to_le_bytes()[..2]);
            let object_key = Md5::digest(&seed);
            let encrypted = rc4(&object_key[..10], &stream.content);
            stream.set_content(encrypted);
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::String(owner_entry, StringFormat::Hexadecimal),
        "U" => Object::String(user_entry, StringFormat::Hexadecimal),
        "P" => PERMISSIONS as i64,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(FILE_ID.to_vec(), StringFormat::Hexadecimal),
            Object::String(FILE_ID.to_vec(), StringFormat::Hexadecimal),
        ],
    );
    save(doc)
}

fn line_operations(lines: &[&str]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        ops.push(Operation::new("Td", vec![50.into(), (TOP - LEADING * i as i64).into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn document(pages: Vec<Vec<Operation>>) -> lopdf::Result<Document> {
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

    let mut kids = Vec::new();
    for operations in pages {
        let content = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}

fn save(mut doc: Document) -> lopdf::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn padded(password: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = password.bytes().take(32).collect();
    bytes.extend_from_slice(&PASSWORD_PAD[..32 - bytes.len()]);
    bytes
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            byte ^ state[state[i as usize].wrapping_add(state[j as usize]) as usize]
        })
        .collect()
}
