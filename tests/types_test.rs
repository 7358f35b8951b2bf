use maildir_rank_addr::*;

// --- ContactClass ---

#[test]
fn test_contact_class_ordering() {
    assert!(ContactClass::Primary > ContactClass::Secondary);
    assert!(ContactClass::Secondary > ContactClass::Sender);
    assert_eq!(ContactClass::default(), ContactClass::Sender);
}

#[test]
fn test_contact_class_index_round_trip() {
    for class in ContactClass::DESCENDING {
        assert_eq!(ContactClass::from_index(class.index()), Some(class));
    }
    assert_eq!(ContactClass::from_index(3), None);
    assert!(ContactClass::try_from(7u8).is_err());
}

#[test]
fn test_contact_class_serializes_as_number() {
    assert_eq!(serde_json::to_string(&ContactClass::Secondary).unwrap(), "1");
    assert_eq!(ContactClass::Primary.to_string(), "2");
}

// --- HeaderField ---

#[test]
fn test_header_field_names() {
    assert_eq!(HeaderField::ReplyTo.as_str(), "reply-to");
    assert_eq!(HeaderField::Bcc.to_string(), "bcc");
    assert_eq!(HeaderField::ALL.len(), 6);
}

// --- ListIdentity ---

#[test]
fn test_list_identity_parse() {
    let list = ListIdentity::parse("Rust Users <rust-users.lists.example.com>").unwrap();
    assert_eq!(list.name, "Rust Users");
    assert_eq!(list.id, "rust-users.lists.example.com");
}

#[test]
fn test_list_identity_without_name() {
    let list = ListIdentity::parse("<announce.example.com>").unwrap();
    assert_eq!(list.name, "");
    assert_eq!(list.id, "announce.example.com");
}

#[test]
fn test_list_identity_bare_id() {
    let list = ListIdentity::parse(" users.example.org ").unwrap();
    assert_eq!(list.name, "");
    assert_eq!(list.id, "users.example.org");
    assert!(list.owns("users@example.org"));

    let unterminated = ListIdentity::parse("Users <users.example.org").unwrap();
    assert_eq!(unterminated.id, "Users <users.example.org");
}

#[test]
fn test_list_identity_invalid() {
    assert!(ListIdentity::parse("").is_none());
    assert!(ListIdentity::parse("   ").is_none());
    assert!(ListIdentity::parse("Empty <>").is_none());
}

// --- AddressData ---

#[test]
fn test_observe_keeps_highest_class_and_latest_date() {
    let mut data = AddressData::new("friend@example.com");
    data.observe(ContactClass::Primary, 200, Some("Friend"));
    data.observe(ContactClass::Sender, 300, None);
    data.observe(ContactClass::Primary, 100, Some("Friend"));

    assert_eq!(data.class, ContactClass::Primary);
    assert_eq!(data.class_count, [1, 0, 2]);
    assert_eq!(data.class_date, [300, 0, 200]);
    assert_eq!(data.names, ["Friend", "Friend"]);
    assert_eq!(data.count(), 2);
    assert_eq!(data.last_seen(), 200);
}

#[test]
fn test_absorb_sums_counts_and_maxes_dates() {
    let mut a = AddressData::new("x@example.com");
    a.observe(ContactClass::Secondary, 50, Some("X"));
    let mut b = AddressData::new("x@example.com");
    b.observe(ContactClass::Secondary, 80, Some("Ex"));
    b.observe(ContactClass::Primary, 10, None);

    a.absorb(b);

    assert_eq!(a.class, ContactClass::Primary);
    assert_eq!(a.class_count, [0, 2, 1]);
    assert_eq!(a.class_date, [0, 80, 10]);
    assert_eq!(a.names, ["X", "Ex"]);
}

#[test]
fn test_address_data_display() {
    let mut data = AddressData::new("x@example.com");
    assert_eq!(data.to_string(), "x@example.com");
    data.name = "Ex Ample".into();
    assert_eq!(data.to_string(), "Ex Ample <x@example.com>");
}
