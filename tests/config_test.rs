use maildir_rank_addr::config::{Config, ConfigOverrides, DEFAULT_TEMPLATE, default_output_path};
use maildir_rank_addr::output::{FormatKind, OutputFormat};
use maildir_rank_addr::*;
use std::path::PathBuf;

const FULL_CONFIG: &str = r#"
maildir = ["/var/mail/personal", "/var/mail/work"]
outputpath = "/tmp/addressbook.tsv"
template = "{address}\t{name}\t{normalized_name}"
list-template = "{list_name} (list)"
addr-book-cmd = "khard email --parsable --remove-first-line"
addr-book-add-unmatched = true
addresses = ['.+@myself\.me', 'me@work\.example']
filters = ['@spam\.example$']
format = "template"
workers = 3
"#;

fn minimal() -> Config {
    Config {
        maildir: vec!["/var/mail".into()],
        ..Config::default()
    }
}

#[test]
fn test_parse_full_config() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();

    assert_eq!(config.maildir.len(), 2);
    assert_eq!(config.outputpath.as_deref(), Some("/tmp/addressbook.tsv"));
    assert_eq!(config.list_template.as_deref(), Some("{list_name} (list)"));
    assert!(config.addr_book_add_unmatched);
    assert_eq!(config.addresses, [r".+@myself\.me", r"me@work\.example"]);
    assert_eq!(config.format, FormatKind::Template);
    assert_eq!(config.workers, Some(3));
}

#[test]
fn test_empty_config_uses_defaults() {
    assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
}

#[test]
fn test_unknown_keys_are_rejected() {
    let err = Config::from_toml_str("maildirs = [\"/var/mail\"]").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_missing_explicit_file() {
    let err = Config::load(Some(std::path::Path::new("/nonexistent/config.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.workers, Some(3));
}

#[test]
fn test_overrides_replace_file_values() {
    let mut config = Config::from_toml_str(FULL_CONFIG).unwrap();
    config.apply(ConfigOverrides {
        maildir: vec!["/srv/mail".into()],
        outputpath: Some("/tmp/other.tsv".into()),
        format: Some(FormatKind::Json),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.maildir, ["/srv/mail"]);
    assert_eq!(config.outputpath.as_deref(), Some("/tmp/other.tsv"));
    assert_eq!(config.format, FormatKind::Json);
    // Values not given on the command line stay
    assert_eq!(config.filters, [r"@spam\.example$"]);
    assert!(config.addr_book_add_unmatched);
    assert_eq!(config.workers, Some(3));
}

#[test]
fn test_into_settings() {
    let settings = Config::from_toml_str(FULL_CONFIG)
        .unwrap()
        .into_settings()
        .unwrap();

    assert_eq!(
        settings.maildirs,
        [PathBuf::from("/var/mail/personal"), PathBuf::from("/var/mail/work")]
    );
    assert_eq!(settings.output_path, PathBuf::from("/tmp/addressbook.tsv"));
    assert_eq!(
        settings.format,
        OutputFormat::Template(Template::line("{address}\t{name}\t{normalized_name}").unwrap())
    );
    assert_eq!(
        settings.list_naming,
        ListNaming::Template(Template::parse("{list_name} (list)").unwrap())
    );
    assert_eq!(
        settings.addressbook_command.unwrap(),
        ["khard", "email", "--parsable", "--remove-first-line"]
    );
    assert!(settings.add_unmatched);
    assert_eq!(settings.scan.workers, 3);
    assert!(settings.scan.owners.matches("me@work.example"));
    assert!(settings.scan.filter.is_excluded("bulk@spam.example"));
}

#[test]
fn test_settings_defaults() {
    let settings = minimal().into_settings().unwrap();

    assert_eq!(
        settings.format,
        OutputFormat::Template(Template::line(DEFAULT_TEMPLATE).unwrap())
    );
    assert_eq!(settings.output_path, default_output_path());
    assert_eq!(settings.list_naming, ListNaming::Off);
    assert!(settings.addressbook_command.is_none());
    assert!(settings.scan.owners.is_empty());
    assert!(settings.scan.workers >= 1);
}

#[test]
fn test_json_format_ignores_template() {
    let config = Config {
        format: FormatKind::Json,
        template: Some("{broken".into()),
        ..minimal()
    };
    assert_eq!(config.into_settings().unwrap().format, OutputFormat::Json);
}

#[test]
fn test_disable_list_keyword() {
    let config = Config {
        list_template: Some(DISABLE_LIST_NAMING.into()),
        ..minimal()
    };
    assert_eq!(config.into_settings().unwrap().list_naming, ListNaming::Off);
}

#[test]
fn test_settings_errors() {
    assert!(matches!(
        Config::default().into_settings(),
        Err(ConfigError::NoMaildir)
    ));

    let bad_regex = Config {
        addresses: vec!["(unclosed".into()],
        ..minimal()
    };
    assert!(matches!(
        bad_regex.into_settings(),
        Err(ConfigError::InvalidPattern { .. })
    ));

    let bad_template = Config {
        list_template: Some("{list}".into()),
        ..minimal()
    };
    assert!(matches!(
        bad_template.into_settings(),
        Err(ConfigError::Template { which: "list", .. })
    ));

    let bad_command = Config {
        addr_book_cmd: Some("lookup 'unterminated".into()),
        ..minimal()
    };
    assert!(matches!(
        bad_command.into_settings(),
        Err(ConfigError::AddressBookCommand { .. })
    ));

    let empty_command = Config {
        addr_book_cmd: Some("   ".into()),
        ..minimal()
    };
    assert!(matches!(
        empty_command.into_settings(),
        Err(ConfigError::AddressBookCommand { .. })
    ));
}
