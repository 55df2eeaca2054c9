#![allow(missing_docs)]

use fieldmap::annotation::parse_annotation;
use fieldmap::tag::{self, Param};
use fieldmap::{MapperError, Transform, TransformRegistry};

fn registry() -> TransformRegistry {
    let mut reg = TransformRegistry::new();
    reg.register(Transform::new("negate", |b: &bool| !b));
    reg
}

fn values(v: &[&str]) -> Option<Vec<String>> {
    Some(v.iter().map(|s| s.to_string()).collect())
}

// --- Tokenizer ---

#[test]
fn test_tokenizer_splits_parameters_and_values() -> fieldmap::Result<()> {
    assert_eq!(
        tag::parse("path=a,b;negate")?,
        vec![
            Param {
                key: "path".into(),
                values: values(&["a", "b"]),
            },
            Param {
                key: "negate".into(),
                values: None,
            },
        ]
    );

    // Whitespace and commas both separate values.
    assert_eq!(tag::parse(" path=a b, c ")?[0].values, values(&["a", "b", "c"]));
    assert_eq!(tag::parse("path=")?[0].values, values(&[]));
    assert!(tag::parse("")?.is_empty());
    assert!(tag::parse("   ")?.is_empty());
    Ok(())
}

#[test]
fn test_tokenizer_rejects_malformed_text() {
    for bad in ["a;;b", "a;", "=x", "a b", ";"] {
        let err = tag::parse(bad).unwrap_err();
        assert!(
            matches!(&err, MapperError::Syntax { tag, .. } if tag == bad),
            "{bad}: {err}"
        );
    }
}

// --- Annotation resolver ---

#[test]
fn test_bare_key_is_a_single_segment_path() -> fieldmap::Result<()> {
    let ann = parse_annotation("name", &registry())?.expect("mapped");
    assert_eq!(ann.path, vec!["name".to_string()]);
    assert!(ann.transform.is_none());
    Ok(())
}

#[test]
fn test_path_parameter_and_transform() -> fieldmap::Result<()> {
    let ann = parse_annotation("path=a,b,c;negate", &registry())?.expect("mapped");
    assert_eq!(ann.path, vec!["a", "b", "c"]);
    assert_eq!(ann.transform.as_ref().map(|t| t.name()), Some("negate"));
    Ok(())
}

#[test]
fn test_ignore_forms() -> fieldmap::Result<()> {
    let reg = registry();
    assert!(parse_annotation("", &reg)?.is_none());
    assert!(parse_annotation("-", &reg)?.is_none());
    assert!(parse_annotation("-=whatever", &reg)?.is_none());
    Ok(())
}

#[test]
fn test_resolver_errors() {
    let reg = registry();

    assert_eq!(
        parse_annotation("path=", &reg).unwrap_err(),
        MapperError::EmptyPath {
            tag: "path=".into()
        }
    );
    assert_eq!(
        parse_annotation("dest=a", &reg).unwrap_err(),
        MapperError::UnknownParameter {
            tag: "dest=a".into(),
            key: "dest".into(),
        }
    );
    assert_eq!(
        parse_annotation("a;negate=1", &reg).unwrap_err(),
        MapperError::UnexpectedValue {
            tag: "a;negate=1".into(),
            key: "negate".into(),
        }
    );
    assert_eq!(
        parse_annotation("a;double", &reg).unwrap_err(),
        MapperError::UnknownTransform {
            tag: "a;double".into(),
            name: "double".into(),
        }
    );
    assert_eq!(
        parse_annotation("a;negate;x", &reg).unwrap_err(),
        MapperError::TooManyParameters {
            tag: "a;negate;x".into(),
            count: 3,
        }
    );
}

#[test]
fn test_registry_overwrites_by_name() {
    let mut reg = registry();
    reg.register(Transform::new("negate", |v: &i32| -v));

    assert_eq!(reg.len(), 1);
    let t = reg.get("negate").expect("registered");
    assert_eq!(t.input().name(), "i32");
    assert_eq!(t.output().name(), "i32");
}
