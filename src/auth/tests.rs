use super::session::*;

#[test]
fn accepts_ordinary_addresses() {
    assert!(validate_email("user@example.com").is_ok());
    assert!(validate_email("first.last@music.example.co").is_ok());
    assert!(validate_email("u+tag@ex.io").is_ok());
    assert!(validate_email("  padded@example.com  ").is_ok());
}

#[test]
fn rejects_malformed_addresses() {
    for bad in [
        "",
        "   ",
        "plainaddress",
        "@example.com",
        "user@",
        "user@@example.com",
        "a@b@c.com",
        "user@nodot",
        "user@.com",
        "user@com.",
        "has space@example.com",
    ] {
        assert_eq!(
            validate_email(bad),
            Err(CredentialError::InvalidEmail),
            "should reject {bad:?}"
        );
    }
}

#[test]
fn password_length_is_counted_in_characters() {
    assert_eq!(
        validate_password("12345"),
        Err(CredentialError::PasswordTooShort)
    );
    assert!(validate_password("123456").is_ok());
    // Six multi-byte characters pass even though the byte count differs.
    assert!(validate_password("señora").is_ok());
}

#[test]
fn combined_check_reports_email_problems_first() {
    assert_eq!(
        validate_credentials("bad", "123"),
        Err(CredentialError::InvalidEmail)
    );
    assert_eq!(
        validate_credentials("ok@example.com", "123"),
        Err(CredentialError::PasswordTooShort)
    );
    assert!(validate_credentials("ok@example.com", "longenough").is_ok());
}
