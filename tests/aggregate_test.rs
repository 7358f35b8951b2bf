use maildir_rank_addr::*;

fn mailbox(name: &str, address: &str) -> Mailbox {
    let name = (!name.is_empty()).then(|| name.to_string());
    Mailbox::new(name, address)
}

fn owner_mail(date: i64, to: &[&str], cc: &[&str]) -> MessageHeader {
    MessageHeader {
        date,
        from: vec![mailbox("Me", "Me@Myself.me")],
        to: to.iter().map(|a| mailbox("", a)).collect(),
        cc: cc.iter().map(|a| mailbox("", a)).collect(),
        ..MessageHeader::default()
    }
}

fn owners() -> OwnerPatterns {
    OwnerPatterns::compile(&[r".+@myself\.me"]).unwrap()
}

#[test]
fn test_addresses_are_normalized_and_classified() {
    let owners = owners();
    let filter = AddressFilter::default();
    let mut aggregator = Aggregator::new(&owners, &filter);

    aggregator.process(&owner_mail(100, &["Friend1@Friends.com"], &["friend2@friends.com"]));
    let (map, parsed, rejected) = aggregator.finish();

    assert_eq!((parsed, rejected), (1, 0));
    assert_eq!(map["friend1@friends.com"].class, ContactClass::Primary);
    assert_eq!(map["friend2@friends.com"].class, ContactClass::Secondary);
    assert_eq!(map["me@myself.me"].class, ContactClass::Sender);
    assert!(map.keys().all(|k| k.chars().all(|c| !c.is_uppercase())));
}

#[test]
fn test_class_only_goes_up() {
    let owners = owners();
    let filter = AddressFilter::default();
    let mut aggregator = Aggregator::new(&owners, &filter);

    aggregator.process(&owner_mail(100, &["friend@friends.com"], &[]));
    aggregator.process(&owner_mail(200, &[], &["friend@friends.com"]));
    let (map, _, _) = aggregator.finish();
    let friend = &map["friend@friends.com"];

    assert_eq!(friend.class, ContactClass::Primary);
    assert_eq!(friend.class_count, [0, 1, 1]);
    assert_eq!(friend.class_date, [0, 200, 100]);
}

#[test]
fn test_dates_do_not_depend_on_processing_order() {
    let owners = owners();
    let filter = AddressFilter::default();
    let newer = owner_mail(500, &["friend@friends.com"], &[]);
    let older = owner_mail(100, &["friend@friends.com"], &[]);

    let mut forward = Aggregator::new(&owners, &filter);
    forward.process(&older);
    forward.process(&newer);
    let mut backward = Aggregator::new(&owners, &filter);
    backward.process(&newer);
    backward.process(&older);

    assert_eq!(forward.finish().0, backward.finish().0);
}

#[test]
fn test_names_skip_empty_and_self() {
    let owners = OwnerPatterns::default();
    let filter = AddressFilter::default();
    let mut aggregator = Aggregator::new(&owners, &filter);
    let header = MessageHeader {
        date: 1,
        from: vec![mailbox("sender@example.com", "sender@example.com")],
        to: vec![
            mailbox("Friend", "friend@example.com"),
            mailbox("", "friend@example.com"),
            mailbox("Friend", "friend@example.com"),
        ],
        ..MessageHeader::default()
    };

    aggregator.process(&header);
    let (map, _, _) = aggregator.finish();

    assert!(map["sender@example.com"].names.is_empty());
    assert_eq!(map["friend@example.com"].names, ["Friend", "Friend"]);
    assert_eq!(map["friend@example.com"].class_count, [0, 0, 3]);
}

#[test]
fn test_excluded_addresses_never_enter_the_map() {
    let owners = OwnerPatterns::default();
    let filter = AddressFilter::default();
    let mut aggregator = Aggregator::new(&owners, &filter);
    let header = MessageHeader {
        date: 1,
        from: vec![mailbox("Service", "no-reply@service.com")],
        to: vec![mailbox("", "friend@example.com"), mailbox("", "broken")],
        ..MessageHeader::default()
    };

    aggregator.process(&header);
    let (map, _, _) = aggregator.finish();

    assert_eq!(map.len(), 1);
    assert!(map.contains_key("friend@example.com"));
}

#[test]
fn test_rejected_messages_are_counted() {
    let owners = OwnerPatterns::default();
    let filter = AddressFilter::default();
    let mut aggregator = Aggregator::new(&owners, &filter);

    aggregator.ingest(Err(ParseError::NoDate));
    aggregator.ingest(Ok(owner_mail(1, &["friend@example.com"], &[])));

    assert_eq!(aggregator.messages_parsed(), 1);
    assert_eq!(aggregator.messages_rejected(), 1);
}

#[test]
fn test_list_address_gets_identity() {
    let owners = OwnerPatterns::default();
    let filter = AddressFilter::default();
    let mut aggregator = Aggregator::new(&owners, &filter);
    let mut header = owner_mail(1, &["rust-users@lists.example.com", "friend@example.com"], &[]);
    header.list = ListIdentity::parse("Rust Users <rust-users.lists.example.com>");

    aggregator.process(&header);
    let (map, _, _) = aggregator.finish();

    assert_eq!(
        map["rust-users@lists.example.com"].list.as_ref().unwrap().name,
        "Rust Users"
    );
    assert!(map["friend@example.com"].list.is_none());
}
