use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mxs2py_surface_syntax::{
    Classification, IdentifierRegistry, PythonWriter, RenderOptions, convert, read_maxscript,
};

const SCRIPT: &str = r#"
struct Vert (pos, normal, weight = 1.0,
    fn scaled factor = (pos * factor)
)

fn collectVerts obj threshold:0.5 = (
    local result = #()
    for i = 1 to obj.numverts do (
        local v = polyop.getVert obj i
        if v.z > threshold then append result (Vert pos:v normal:[0,0,1])
        else if v.z < -threshold then append result (Vert pos:v normal:[0,0,-1])
    )
    result
)

try (
    verts = collectVerts selection threshold:2
    format "found %\n" verts.count
) catch (print "no selection")
"#;

fn registry() -> IdentifierRegistry {
    let mut registry = IdentifierRegistry::new();
    registry.extend(["append", "format", "print"], Classification::BuiltinFunction);
    registry.extend(["collectVerts"], Classification::UserFunction);
    registry
}

fn bench_convert(c: &mut Criterion) {
    let registry = registry();
    let source = SCRIPT.repeat(20);

    c.bench_function("read_maxscript", |b| {
        b.iter(|| {
            let tree = read_maxscript(black_box(&source), &registry).expect("read");
            black_box(tree);
        })
    });

    let tree = read_maxscript(&source, &registry).expect("read");
    let options = RenderOptions::default();
    c.bench_function("render_python", |b| {
        b.iter(|| black_box(PythonWriter::emit(black_box(&tree), &options)))
    });

    c.bench_function("convert_total", |b| {
        b.iter(|| black_box(convert(black_box(&source), &registry).expect("convert")))
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
