//! Snapshot tests for whole-program conversion.
//!
//! Output is rendered with four-space indentation to keep the inline
//! snapshots readable. Run `cargo insta review` after intentional changes.

use mxs2py_surface_syntax::{Classification, IdentifierRegistry, RenderOptions, convert_with};

fn convert(source: &str) -> String {
    let mut registry = IdentifierRegistry::new();
    registry.extend(
        ["print", "format", "sqrt", "append"],
        Classification::BuiltinFunction,
    );
    registry.classify("greet", Classification::UserFunction);
    let options = RenderOptions {
        indent: "    ".into(),
    };
    convert_with(source, &registry, &options).expect("conversion failed")
}

#[test]
fn function_with_default_parameter() {
    insta::assert_snapshot!(convert(
        "fn greet name greeting:\"Hello\" = (\n    format \"% %\\n\" greeting name\n)\ngreet \"Bob\""
    ), @r#"
    def greet(name, greeting="Hello"):
        rt.format("% %\n", greeting, name)
    greet("Bob")
    "#);
}

#[test]
fn for_loop_over_array() {
    insta::assert_snapshot!(convert(
        "items = #(1, 2, 3)\nfor i in items do (\n    print (items[i] as string)\n)"
    ), @r"
    items = [1, 2, 3]
    for i in items:
        rt.print(str(items[i]))
    ");
}

#[test]
fn try_catch_blocks() {
    insta::assert_snapshot!(convert(
        "try (\n    x = 1\n    y = 2\n) catch (\n    print \"failed\"\n)"
    ), @r#"
    try:
        x = 1
        y = 2
    except: rt.print("failed")
    "#);
}

#[test]
fn chained_else_if_nests() {
    insta::assert_snapshot!(convert(
        "if a == 1 then x = 1\nelse if a == 2 then x = 2\nelse x = 3"
    ), @r"
    if a == 1:
        x = 1
    else:
        if a == 2:
            x = 2
        else:
            x = 3
    ");
}

#[test]
fn literals_symbols_and_count() {
    insta::assert_snapshot!(convert(
        "n = objs.count\nt = #box\nflag = true\nv = undefined\ntotal += n as float"
    ), @r"
    n = len(objs)
    t = rt.Name('box')
    flag = True
    v = None
    total += float(n)
    ");
}

#[test]
fn collect_loop_is_rendered_verbatim() {
    insta::assert_snapshot!(convert("names = for o in objs collect o.name"), @"names = for o in objs collect o.name");
}

#[test]
fn multi_index_renders_empty() {
    insta::assert_snapshot!(convert("v = grid[i + 1]\nw = grid[j]"), @r"
    v = grid[]
    w = grid[j]
    ");
}

#[test]
fn struct_with_method() {
    let out = convert("struct Point (\n    x = 0,\n    y = 0,\n    fn length = sqrt (x * x + y * y)\n)");
    assert_eq!(
        out,
        "class Point:\n    def __init__(self):\n        self.x\t= 0\n        self.y\t= 0\n    def length():\n        rt.sqrt(x * x + y * y)"
    );
}
