//! Every built-in property kind through the writer and reader, in each
//! version the kind exists in.

use chrono::{TimeZone, Utc};

use crate::rfc::vcard::build::VCardWriter;
use crate::rfc::vcard::core::{
    Address, Agent, Binary, ClientPidMap, DateAndOrTime, Gender, GeoUri, Organization, Place,
    Property, PropertyKind, PropertyValue, Related, Sex, StructuredName, Telephone, Timestamp,
    Timezone, VCard, VCardVersion,
};
use crate::rfc::vcard::parse::parse_single;

const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// A representative value for each built-in kind.
fn sample(kind: PropertyKind) -> Property {
    use PropertyKind as K;

    match kind {
        K::Address => Property::address(Address {
            extended: strings(&["Suite 4"]),
            street: strings(&["123 Main St"]),
            locality: strings(&["Springfield"]),
            region: strings(&["IL"]),
            postal_code: strings(&["62701"]),
            ..Address::default()
        }),
        K::Agent => Property::agent(Agent::Url("http://example.com/assistant.vcf".into())),
        K::Anniversary => Property::anniversary(DateAndOrTime::full_date(2009, 8, 8).unwrap()),
        K::Birthday => Property::birthday(DateAndOrTime::full_date(1985, 4, 12).unwrap()),
        K::Birthplace => {
            Property::place(kind, Place::Text("Mount Vernon, Virginia".into())).unwrap()
        }
        K::Deathplace => Property::place(kind, Place::Geo(GeoUri::new(38.7, -77.1))).unwrap(),
        K::Deathdate => {
            Property::new(kind, PropertyValue::DateAndOrTime(DateAndOrTime::text("circa 1800")))
                .unwrap()
        }
        K::CalendarRequestUri => Property::uri(kind, "mailto:calendar@example.com").unwrap(),
        K::CalendarUri => Property::uri(kind, "http://cal.example.com/calA").unwrap(),
        K::FreeBusyUrl => Property::uri(kind, "http://example.com/busy/janedoe").unwrap(),
        K::Impp => Property::uri(kind, "xmpp:alice@example.com").unwrap(),
        K::Member => Property::uri(kind, "urn:uuid:03a0e51f-d1aa-4385-8a53-e29025acd8af").unwrap(),
        K::OrgDirectory => Property::uri(kind, "ldap://ldap.example.com/ou=people").unwrap(),
        K::Source => Property::uri(kind, "http://directory.example.com/addressbooks/jdoe").unwrap(),
        K::Url => Property::url("http://example.org/restaurant.french/~chezchic.html"),
        K::Uid => Property::uid("urn:uuid:f81d4fae-7dec-11d0-a765-00a0c91e6bf6"),
        K::Categories => Property::categories(strings(&["TRAVEL AGENT", "INTERNET"])),
        K::Nickname => Property::nickname(strings(&["Jim", "Jimmie"])),
        K::Classification => Property::text(kind, "CONFIDENTIAL").unwrap(),
        K::ClientPidMap => Property::client_pid_map(ClientPidMap::new(
            1,
            "urn:uuid:3df403f4-5924-4bb7-b077-3c711d9eb34b",
        )),
        K::Email => Property::email("jqpublic@xyz.example.com"),
        K::Expertise => Property::text(kind, "chinese literature").unwrap(),
        K::Hobby => Property::text(kind, "reading").unwrap(),
        K::Interest => Property::text(kind, "rock 'n' roll music").unwrap(),
        K::FormattedName => Property::formatted_name("Mr. John Q. Public, Esq."),
        K::Gender => Property::gender(Gender::full(Sex::Other, "intersex")),
        K::Geo => Property::geo(GeoUri::new(37.386_013, -122.082_932)),
        K::Key => Property::binary(
            kind,
            Binary::data(b"-----BEGIN PGP-----".to_vec(), Some("application/pgp-keys")),
        )
        .unwrap(),
        K::Photo => Property::binary(kind, Binary::data(PNG.to_vec(), Some("image/png"))).unwrap(),
        K::Logo => {
            Property::binary(kind, Binary::url("http://www.example.com/pub/logos/abccorp.jpg"))
                .unwrap()
        }
        K::Sound => Property::binary(kind, Binary::data(b"RIFF".to_vec(), None)).unwrap(),
        K::Kind => Property::text(kind, "individual").unwrap(),
        K::Label => Property::text(kind, "Mr. John Q. Public\n123 Main St").unwrap(),
        K::Language => Property::text(kind, "fr").unwrap(),
        K::Mailer => Property::text(kind, "PigeonMail 2.1").unwrap(),
        K::Note => Property::note("This fax number is operational 0800 to 1715 EST, Mon-Fri."),
        K::Organization => Property::organization(Organization::with_units(
            "ABC, Inc.",
            strings(&["", "Marketing"]),
        )),
        K::ProductId => {
            Property::text(kind, "-//ONLINE DIRECTORY//NONSGML Version 1//EN").unwrap()
        }
        K::Profile => Property::text(kind, "VCARD").unwrap(),
        K::Related => Property::related(Related::Uri(
            "urn:uuid:f81d4fae-7dec-11d0-a765-00a0c91e6bf6".into(),
        )),
        K::Revision => Property::revision(Timestamp::new(
            Utc.with_ymd_and_hms(1995, 10, 31, 22, 27, 10).unwrap(),
        )),
        K::Role => Property::text(kind, "Project Leader").unwrap(),
        K::Title => Property::title("Research Scientist"),
        K::SortString => Property::text(kind, "Harten").unwrap(),
        K::SourceDisplayText => Property::text(kind, "Babs Jensen's Contact Information").unwrap(),
        K::StructuredName => Property::structured_name(StructuredName {
            prefixes: strings(&["Mr."]),
            additional: strings(&["Quinlan"]),
            suffixes: strings(&["Esq."]),
            ..StructuredName::simple("Public", "John")
        }),
        K::Telephone => Property::telephone(Telephone::Text("+1-555-555-0100".into())),
        K::Timezone => Property::timezone(Timezone::Text("America/New_York".into())),
        K::Xml => Property::xml("<a xmlns=\"http://www.w3.org/1999/xhtml\">b</a>"),
        K::Raw | K::Custom(_) => unreachable!("not a built-in kind"),
    }
}

/// Writes a card holding `property` in `version`, reads it back and
/// compares. Returns the written text.
fn round_trip(property: Property, version: VCardVersion) -> Result<String, String> {
    let mut card = VCard::with_version(version);
    card.add_property(property);

    let output = VCardWriter::new()
        .with_product_id(false)
        .write(&card)
        .map_err(|e| format!("{version}: write failed: {e}"))?;
    let reparsed =
        parse_single(&output).map_err(|e| format!("{version}: read failed: {e}\n{output}"))?;

    if reparsed != card {
        return Err(format!(
            "{version}: differs after round trip\n{output}\n{card:#?}\n{reparsed:#?}"
        ));
    }
    Ok(output)
}

fn assert_round_trips(property: &Property, versions: &[VCardVersion]) -> Vec<String> {
    versions
        .iter()
        .map(|version| round_trip(property.clone(), *version))
        .collect::<Result<_, _>>()
        .unwrap_or_else(|err| panic!("{}: {err}", property.name()))
}

#[test]
fn every_builtin_kind_round_trips_in_its_versions() {
    let mut failures = Vec::new();

    for kind in PropertyKind::BUILTIN {
        let property = sample(kind);
        assert_eq!(property.kind(), kind);

        for version in kind.supported_versions().iter() {
            if let Err(err) = round_trip(property.clone(), version) {
                failures.push(format!("{kind} {err}"));
            }
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn inline_binary_with_and_without_media_type() {
    let bare = Property::binary(PropertyKind::Photo, Binary::data(PNG.to_vec(), None)).unwrap();
    let written = assert_round_trips(&bare, &VCardVersion::ALL);
    assert!(written[2].contains("PHOTO:data:;base64,"), "{}", written[2]);

    let jpeg = Binary::data(PNG.to_vec(), Some("image/jpeg"));
    let typed = Property::binary(PropertyKind::Photo, jpeg)
        .unwrap()
        .with_parameter("TYPE", "work");
    let written = assert_round_trips(&typed, &VCardVersion::ALL);
    assert!(written[0].contains(";jpeg;work"), "{}", written[0]);
    assert!(written[0].contains("ENCODING=BASE64"), "{}", written[0]);
    assert!(written[1].contains("TYPE=jpeg,work"), "{}", written[1]);
    assert!(written[2].contains("PHOTO;TYPE=work:data:image/jpeg;base64,"), "{}", written[2]);

    let foreign = Property::binary(
        PropertyKind::Key,
        Binary::data(b"plain key".to_vec(), Some("text/plain")),
    )
    .unwrap();
    assert_round_trips(&foreign, &VCardVersion::ALL);
}

#[test]
fn organization_units_keep_empty_positions() {
    for units in [["", "Dept"], ["Dept", ""]] {
        let org = Property::organization(Organization::with_units("ABC", strings(&units)));
        assert_round_trips(&org, &VCardVersion::ALL);
    }
}

#[test]
fn embedded_agent_block_and_inline_forms() {
    for version in [VCardVersion::V2_1, VCardVersion::V3_0] {
        let mut assistant = VCard::with_version(version);
        assistant.add_property(Property::formatted_name("Fred Friday"));
        assistant.add_property(Property::structured_name(StructuredName::simple("Friday", "Fred")));
        assistant.add_property(Property::telephone(Telephone::Text("+1-555-555-0199".into())));
        let agent = Property::agent(Agent::VCard(Box::new(assistant)));

        let written = assert_round_trips(&agent, &[version]);
        let expected = match version {
            VCardVersion::V2_1 => "\r\nAGENT:\r\nBEGIN:VCARD\r\nVERSION:2.1\r\n",
            _ => "\r\nAGENT:BEGIN:VCARD\\nVERSION:3.0\\n",
        };
        assert!(written[0].contains(expected), "{}", written[0]);
    }
}

#[test]
fn multiline_text_in_2_1_is_quoted_printable() {
    let note = Property::note("Caf\u{e9} hours\nMon-Fri, 9 to 5");
    let written = assert_round_trips(&note, &[VCardVersion::V2_1]);

    assert!(written[0].contains("ENCODING=QUOTED-PRINTABLE"), "{}", written[0]);
    assert!(written[0].contains("CHARSET=UTF-8"), "{}", written[0]);
    assert!(!written[0].contains('\u{e9}'), "{}", written[0]);
}

#[test]
fn tel_uri_round_trips_in_4_0() {
    let tel = Property::telephone(Telephone::Uri("tel:+1-555-555-0100;ext=102".into()));
    assert_round_trips(&tel, &[VCardVersion::V4_0]);
}
