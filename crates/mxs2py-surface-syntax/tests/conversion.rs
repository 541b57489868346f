//! End-to-end conversion properties.

use mxs2py_surface_syntax::{
    Classification, ConversionError, IdentifierRegistry, NodeKind, convert, read_maxscript,
};

fn registry() -> IdentifierRegistry {
    let mut registry = IdentifierRegistry::new();
    registry.extend(["print", "format", "append", "box"], Classification::BuiltinFunction);
    registry
}

#[test]
fn if_then_else_renders_two_branches() {
    let out = convert("if x > 0 then y = 1 else y = 2", &registry()).unwrap();
    assert_eq!(out, "if x > 0:\n\ty = 1\nelse:\n\ty = 2");
}

#[test]
fn nested_if_binds_inner_then_to_inner_if() {
    let tree = read_maxscript("if a then (if b then c) else d", &registry()).unwrap();
    let items = tree.block_items(tree.body());
    assert_eq!(items.len(), 1);

    let NodeKind::Conditional {
        consequent,
        alternative,
        ..
    } = tree.kind(items[0].as_node().unwrap())
    else {
        panic!("expected conditional");
    };
    let inner = tree.block_items(*consequent);
    assert_eq!(inner.len(), 1);
    assert!(matches!(
        tree.kind(inner[0].as_node().unwrap()),
        NodeKind::Conditional {
            alternative: None,
            ..
        }
    ));
    let alternative = alternative.expect("outer else");
    assert_eq!(tree.parent(alternative), items[0].as_node());
}

#[test]
fn struct_padding_is_non_decreasing_as_names_shrink() {
    let out = convert("struct S (ccc, bb, a)", &registry()).unwrap();
    let lines: Vec<&str> = out.lines().filter(|l| l.contains("self.")).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("self.ccc"));
    assert!(lines[1].contains("self.bb"));
    assert!(lines[2].contains("self.a"));

    let padding: Vec<usize> = lines
        .iter()
        .map(|l| {
            let name_end = l.find("self.").unwrap() + 5;
            l[name_end..].chars().filter(|c| *c == '\t').count()
        })
        .collect();
    assert!(padding.windows(2).all(|w| w[0] <= w[1]), "{padding:?}");
}

#[test]
fn classification_flips_next_conversion_only() {
    let mut registry = IdentifierRegistry::new();
    let before = convert("foo 1", &registry).unwrap();
    assert_eq!(before, "foo 1");

    registry.classify("foo", Classification::UserFunction);
    let after = convert("foo 1", &registry).unwrap();
    assert_eq!(after, "foo(1)");
    assert_eq!(before, "foo 1");

    registry.classify("foo", Classification::BuiltinFunction);
    assert_eq!(convert("foo 1", &registry).unwrap(), "rt.foo(1)");
}

#[test]
fn conversion_is_repeatable() {
    let source = "fn f a b:2 = (\n  if a > b then print a else print b\n)\nf 1 b:3";
    let registry = registry();
    assert_eq!(
        convert(source, &registry).unwrap(),
        convert(source, &registry).unwrap()
    );
}

#[test]
fn unknown_cast_aborts_conversion() {
    let err = convert("p = pos as point3", &registry()).unwrap_err();
    assert_eq!(
        err,
        ConversionError::UnsupportedCast {
            type_name: "point3".into()
        }
    );
    assert_eq!(err.kind(), "unsupported-cast");
    // a failed conversion leaves nothing behind for the next one
    assert_eq!(convert("x = 1", &registry()).unwrap(), "x = 1");
}

#[test]
fn unbalanced_brackets_still_convert() {
    assert_eq!(convert("x = (a + b", &registry()).unwrap(), "x = (a + b)");
    assert!(convert("print (foo [1", &registry()).is_ok());
}

#[test]
fn comments_and_qualifiers_are_dropped() {
    let source = "local x = 1 -- counter\n/* scratch\n y = 2 */\nglobal z = \"--not a comment\"";
    let out = convert(source, &registry()).unwrap();
    assert_eq!(out, "x = 1\nz = \"--not a comment\"");
}

#[test]
fn builtin_call_on_member_chain() {
    let registry = registry().with("polyop", Classification::BuiltinFunction);
    let out = convert("n = obj.append v", &registry).unwrap();
    assert_eq!(out, "n = rt.obj.append(v)");
    let out = convert("polyop.getVert obj 1", &registry).unwrap();
    assert_eq!(out, "polyop.getVert obj 1");
}

#[test]
fn renamed_variables_are_rewritten() {
    let mut registry = registry();
    registry.add_rename("myCount", "my_count");
    let out = convert("myCount = MYCOUNT + 1", &registry).unwrap();
    assert_eq!(out, "my_count = my_count + 1");
}

#[test]
fn arithmetic_fuses_with_calls_on_the_right() {
    let out = convert("x = 2 * print y", &registry()).unwrap();
    assert_eq!(out, "x = 2 * rt.print(y)");
}

#[test]
fn clause_keywords_work_as_keyword_argument_names() {
    let out = convert("print \"a\" to:listener", &registry()).unwrap();
    assert_eq!(out, "rt.print(\"a\", to=listener)");
}

#[test]
fn bracket_groups_are_whole_call_arguments() {
    let out = convert("b = box pos:[0,0,0] width:10", &registry()).unwrap();
    assert_eq!(out, "b = rt.box(pos=[], width=10)");

    // multi-element brackets keep their empty rendering
    assert_eq!(convert("print [1,2,3]", &registry()).unwrap(), "rt.print([])");
    assert_eq!(convert("print [n]", &registry()).unwrap(), "rt.print([n])");
}

#[test]
fn bracket_default_stays_with_its_parameter() {
    let out = convert("fn f pos:[0,0,0] = (\nprint pos\n)", &registry()).unwrap();
    assert_eq!(out, "def f(pos=[]):\n\trt.print(pos)");
}

#[test]
fn keywords_are_never_indexed() {
    let out = convert("fn f a = (\nreturn [a]\n)", &registry()).unwrap();
    assert_eq!(out, "def f(a):\n\treturn [a]");
}

#[test]
fn collect_loop_is_a_single_node() {
    let tree = read_maxscript("names = for o in objs collect o.name", &registry()).unwrap();
    let items = tree.block_items(tree.body());
    assert_eq!(items.len(), 3);
    assert!(matches!(
        tree.kind(items[2].as_node().unwrap()),
        NodeKind::ForLoop {
            comprehension: true,
            ..
        }
    ));
}
