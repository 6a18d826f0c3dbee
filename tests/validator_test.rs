use metrika_uploader::common::models::UploadFile;
use metrika_uploader::uploader::validator::{partition, validate};

fn create_test_file(name: &str, mime_type: &str) -> UploadFile {
    UploadFile::new(name, mime_type, b"hello".to_vec())
}

#[test]
fn test_accepts_allowed_mime_types() {
    assert!(validate(&create_test_file("rapor", "application/pdf")));
    assert!(validate(&create_test_file(
        "sunum",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    )));
    assert!(validate(&create_test_file("notlar", "text/plain; charset=utf-8")));
    assert!(validate(&create_test_file("tablo", "Application/Vnd.Ms-Excel")));
}

#[test]
fn test_falls_back_to_extension_when_mime_is_unreliable() {
    assert!(validate(&create_test_file("rapor.PDF", "")));
    assert!(validate(&create_test_file("butce.xlsx", "application/octet-stream")));
    assert!(validate(&create_test_file("arsiv.v2.docx", "")));
}

#[test]
fn test_rejects_unsupported_files() {
    assert!(!validate(&create_test_file("setup.exe", "application/x-msdownload")));
    assert!(!validate(&create_test_file("foto.png", "image/png")));
    assert!(!validate(&create_test_file("README", "")));
    assert!(!validate(&create_test_file(".pdf", "")));
}

#[test]
fn test_partition_keeps_order_and_collects_rejected_names() {
    let files = vec![
        create_test_file("a.pdf", "application/pdf"),
        create_test_file("virus.exe", ""),
        create_test_file("b.txt", "text/plain"),
        create_test_file("c.zip", "application/zip"),
    ];

    let (accepted, rejected) = partition(files);

    let names: Vec<&str> = accepted.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.txt"]);
    assert_eq!(rejected, vec!["virus.exe".to_string(), "c.zip".to_string()]);
}
