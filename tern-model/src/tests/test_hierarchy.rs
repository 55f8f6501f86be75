use super::{create_test_model, simple};
use crate::{InheritanceGraph, ModelError};

#[test]
fn test_language_module_has_no_cycles() {
    let (model, lang, _) = create_test_model();
    let graph = model.validate_hierarchy().unwrap();

    assert!(graph.contains(lang.natural));
    assert!(!graph.contains(lang.null));
}

#[test]
fn test_supertypes_come_first() {
    let (model, lang, _) = create_test_model();
    let order = InheritanceGraph::build(&model).supertypes_first().unwrap();
    let position = |id| order.iter().position(|d| *d == id).unwrap();

    assert!(position(lang.void) < position(lang.object));
    assert!(position(lang.object) < position(lang.natural));
    assert!(position(lang.integral) < position(lang.natural));
    assert!(position(lang.sequence) < position(lang.range));
}

#[test]
fn test_circular_inheritance_is_reported() {
    let (mut model, _, package) = create_test_model();
    let a = model.add_class(package, "A").unwrap();
    let b = model.add_class(package, "B").unwrap();
    model.set_extended_type(a, simple(b)).unwrap();
    model.set_extended_type(b, simple(a)).unwrap();

    match model.validate_hierarchy() {
        Err(ModelError::CircularInheritance { cycle }) => {
            assert_eq!(cycle.len(), 2);
            assert!(cycle.contains(&"A".to_string()));
            assert!(cycle.contains(&"B".to_string()));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn test_self_inheritance_is_a_cycle() {
    let (mut model, _, package) = create_test_model();
    let a = model.add_interface(package, "Loop").unwrap();
    model.add_satisfied_type(a, simple(a)).unwrap();

    assert!(matches!(
        model.validate_hierarchy(),
        Err(ModelError::CircularInheritance { .. })
    ));
}
