use clonit_fs::{ConfigStore, Error};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    ignore: Vec<String>,
}

fn sample() -> Sample {
    Sample {
        name: "clonit".into(),
        ignore: vec![".git".into(), "node_modules".into()],
    }
}

#[rstest]
#[case("options.toml")]
#[case("options.json")]
#[case("options.yaml")]
#[case("options.YML")]
fn test_save_then_load(#[case] file: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    let store = ConfigStore::new();

    store.save(&path, &sample()).unwrap();
    let loaded: Sample = store.load(&path).unwrap();

    assert_eq!(loaded, sample());
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("options.ini");
    std::fs::write(&path, "name=x").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "ini"));
}

#[test]
fn test_parse_error_names_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("options.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { ref format, .. } if format == "JSON"));
}
