//! Knowledge base loading from files on disk.

use std::io::Write;
use std::path::Path;

use helpdesk_bot::knowledge::{KnowledgeBase, KnowledgeSource};
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f
}

#[test]
fn well_formed_file_yields_one_document_per_row() {
    let f = write_csv(
        "category,question,solution\n\
         Email,No mail,Check quota.\n\
         Email,Spam everywhere,Tighten the filter.\n\
         VPN,Cannot connect,Reinstall the client.\n",
    );
    let kb = KnowledgeBase::load(f.path());
    assert_eq!(kb.documents().len(), 3);
    assert_eq!(kb.entries().len(), 3);
    assert_eq!(kb.categories(), vec!["Email", "VPN"]);
    assert_eq!(kb.source(), &KnowledgeSource::File(f.path().to_path_buf()));
}

#[test]
fn shipped_knowledge_base_loads() {
    let kb = KnowledgeBase::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data/helpdesk_knowledge_base.csv"));
    assert!(!kb.is_fallback());
    assert_eq!(kb.documents().len(), 12);
}

#[test]
fn missing_file_yields_fallback() {
    let kb = KnowledgeBase::load(Path::new("/definitely/not/here.csv"));
    assert!(kb.is_fallback());
    assert_eq!(kb.documents().len(), 4);
    assert_eq!(
        kb.documents()[0],
        "How to reset my password? Visit the password reset page and follow the instructions."
    );
}

#[test]
fn malformed_file_yields_fallback() {
    let f = write_csv("category,question,solution\nA,q\n\"unterminated,x,y\n");
    let kb = KnowledgeBase::load(f.path());
    assert!(kb.is_fallback());
    assert_eq!(kb.documents().len(), 4);
}

#[test]
fn missing_required_column_yields_fallback() {
    let f = write_csv("topic,question,answer\nA,q,s\n");
    let kb = KnowledgeBase::load(f.path());
    assert!(kb.is_fallback());
}

#[test]
fn empty_file_yields_fallback() {
    let f = write_csv("");
    let kb = KnowledgeBase::load(f.path());
    assert!(kb.is_fallback());
    assert_eq!(kb.documents().len(), 4);
}

#[test]
fn header_only_file_yields_fallback() {
    for content in ["topic,q,a\n", "category,question,solution\n"] {
        let f = write_csv(content);
        let kb = KnowledgeBase::load(f.path());
        assert!(kb.is_fallback(), "expected fallback for {content:?}");
        assert_eq!(kb.documents().len(), 4);
    }
}
