use std::time::Duration;

use super::client::{DocKind, RemoteStore, doc_url};
use super::types::RemoteError;

#[test]
fn new_rejects_empty_and_schemeless_urls() {
    let timeout = Duration::from_secs(5);
    assert!(matches!(
        RemoteStore::new("", timeout),
        Err(RemoteError::InvalidUrl(_))
    ));
    assert!(matches!(
        RemoteStore::new("not-a-url", timeout),
        Err(RemoteError::InvalidUrl(_))
    ));
    assert!(matches!(
        RemoteStore::new("ftp://example.com", timeout),
        Err(RemoteError::InvalidUrl(_))
    ));

    assert!(RemoteStore::new("http://localhost:8080", timeout).is_ok());
    assert!(RemoteStore::new("https://example.com", timeout).is_ok());
}

#[test]
fn new_strips_a_trailing_slash() {
    let store = match RemoteStore::new("https://example.com/", Duration::from_secs(5)) {
        Ok(s) => s,
        Err(e) => panic!("valid url rejected: {e}"),
    };
    assert_eq!(store.base_url(), "https://example.com");
}

#[test]
fn doc_urls_address_the_per_user_documents() {
    assert_eq!(
        doc_url("http://h:1", "u-42", DocKind::Preferences),
        "http://h:1/api/users/u-42/preferences"
    );
    assert_eq!(
        doc_url("http://h:1", "u-42", DocKind::Playlist),
        "http://h:1/api/users/u-42/playlist"
    );
}
