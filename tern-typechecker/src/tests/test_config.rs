//! Configuration loading and the switches it controls

use super::{errors, warnings, Fixture};
use crate::{CheckerConfig, TypecheckError};
use pretty_assertions::assert_eq;
use tern_model::DEFAULT_MAX_SUPERTYPE_DEPTH;

#[test]
fn test_empty_document_is_default() {
    let config = CheckerConfig::from_toml_str("").unwrap();
    assert_eq!(config, CheckerConfig::default());
    assert!(config.report_unsupported);
    assert!(config.check_visibility);
    assert!(config.check_self_references);
    assert_eq!(config.max_supertype_depth, DEFAULT_MAX_SUPERTYPE_DEPTH);
}

#[test]
fn test_fields_are_read() {
    let source = r#"
        report_unsupported = false
        check_self_references = false
        max_supertype_depth = 16
    "#;

    let config = CheckerConfig::from_toml_str(source).unwrap();

    assert_eq!(
        config,
        CheckerConfig {
            report_unsupported: false,
            check_visibility: true,
            check_self_references: false,
            max_supertype_depth: 16,
        }
    );
}

#[test]
fn test_invalid_documents() {
    let unknown = CheckerConfig::from_toml_str("strict = true");
    assert!(matches!(unknown, Err(TypecheckError::InvalidConfig { .. })));

    let mistyped = CheckerConfig::from_toml_str("max_supertype_depth = \"deep\"");
    assert!(matches!(mistyped, Err(TypecheckError::InvalidConfig { .. })));

    let zero = CheckerConfig::from_toml_str("max_supertype_depth = 0");
    match zero {
        Err(TypecheckError::InvalidConfig { message }) => {
            assert_eq!(message, "max_supertype_depth must be at least 1")
        }
        other => panic!("expected an invalid config, got {other:?}"),
    }
}

#[test]
fn test_unsupported_constructs_warn_unless_disabled() {
    let build = |f: &mut Fixture| {
        let one = f.ast.natural(1);
        let type_ = f.ast.simple_type(f.lang.natural);
        let test = f.ast.extends_op(one, type_);
        f.ast.expression_statement(test)
    };

    let mut f = Fixture::new();
    let statement = build(&mut f);
    let analysis = f.check(vec![statement]);
    assert_eq!(warnings(&analysis), vec!["extends operator not yet supported"]);
    assert!(!analysis.has_errors());

    let quiet = CheckerConfig {
        report_unsupported: false,
        ..CheckerConfig::default()
    };
    let statement = build(&mut f);
    let analysis = f.check_with(&quiet, vec![statement]);
    assert_eq!(warnings(&analysis), Vec::<String>::new());
}

#[test]
fn test_visibility_check_can_be_disabled() {
    let mut f = Fixture::new();
    let secret = f.model.add_class(f.package, "Secret").unwrap();
    let exposed = f.model.add_value(f.package, "exposed").unwrap();
    f.model.set_shared(exposed, true).unwrap();

    let build = |f: &mut Fixture| {
        let type_ = f.ast.simple_type(secret);
        f.ast.attribute(exposed, type_, None)
    };

    let statement = build(&mut f);
    let analysis = f.check(vec![statement]);
    assert_eq!(
        errors(&analysis),
        vec!["type of declaration is not visible everywhere declaration is visible: exposed"]
    );

    let lenient = CheckerConfig {
        check_visibility: false,
        ..CheckerConfig::default()
    };
    let statement = build(&mut f);
    let analysis = f.check_with(&lenient, vec![statement]);
    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
}
