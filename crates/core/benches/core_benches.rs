use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use nbt_core::provider::{from_provider_form, to_provider_form};
use nbt_core::{binary, convert, snbt, Compound, JsonOps, List, NbtOps, SizeTracker, Tag};

fn sample_structure(block_count: usize) -> Compound {
    let mut palette = List::new();
    for name in ["minecraft:stone", "minecraft:dirt", "minecraft:oak_log"] {
        let mut state = Compound::new();
        state.put_string("Name", name);
        palette.push(Tag::Compound(state));
    }

    let mut blocks = List::new();
    for idx in 0..block_count {
        let x = (idx % 16) as i32;
        let z = ((idx / 16) % 16) as i32;
        let y = (idx / 256) as i32;
        let mut block = Compound::new();
        block.put("pos", List::from(vec![Tag::Int(x), Tag::Int(y), Tag::Int(z)]));
        block.put_int("state", (idx % 3) as i32);
        blocks.push(Tag::Compound(block));
    }

    let mut root = Compound::new();
    root.put_int("DataVersion", nbt_core::version::CURRENT_DATA_VERSION);
    root.put("size", List::from(vec![Tag::Int(16), Tag::Int(16), Tag::Int(16)]));
    root.put("palette", palette);
    root.put("blocks", blocks);
    root.put("entities", List::new());
    root
}

fn bench_snbt_parse(c: &mut Criterion) {
    let text = snbt::write(&Tag::Compound(sample_structure(1024)));
    c.bench_function("snbt_parse", |b| {
        b.iter(|| snbt::read(&text).expect("parse"))
    });
}

fn bench_snbt_write(c: &mut Criterion) {
    let tag = Tag::Compound(sample_structure(1024));
    let mut group = c.benchmark_group("snbt_write");
    group.bench_function("compact", |b| b.iter(|| snbt::write(&tag)));
    group.bench_function("ordered", |b| b.iter(|| snbt::to_ordered_string(&tag)));
    group.finish();
}

fn bench_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");
    for size in [16usize, 256, 4096] {
        let root = sample_structure(size);
        let bytes = binary::to_bytes(&root).expect("encode");
        group.bench_function(format!("encode_{size}"), |b| {
            b.iter(|| binary::to_bytes(&root).expect("encode"))
        });
        group.bench_function(format!("decode_{size}"), |b| {
            b.iter(|| binary::from_bytes(&bytes, SizeTracker::unlimited()).expect("decode"))
        });
    }
    group.finish();
}

fn bench_provider_form(c: &mut Criterion) {
    let root = sample_structure(1024);
    let provider = to_provider_form(root.clone()).expect("provider form");
    c.bench_function("to_provider_form", |b| {
        b.iter_batched(
            || root.clone(),
            |root| to_provider_form(root).expect("provider form"),
            BatchSize::SmallInput,
        )
    });
    c.bench_function("from_provider_form", |b| {
        b.iter_batched(
            || provider.clone(),
            |provider| from_provider_form(provider).expect("structure form"),
            BatchSize::SmallInput,
        )
    });
}

fn bench_convert_json(c: &mut Criterion) {
    let tag = Tag::Compound(sample_structure(1024));
    let json = convert(&NbtOps, &JsonOps, &tag);
    c.bench_function("convert_nbt_to_json", |b| {
        b.iter(|| convert(&NbtOps, &JsonOps, &tag))
    });
    c.bench_function("convert_json_to_nbt", |b| {
        b.iter(|| convert(&JsonOps, &NbtOps, &json))
    });
}

criterion_group!(
    core_benches,
    bench_snbt_parse,
    bench_snbt_write,
    bench_binary,
    bench_provider_form,
    bench_convert_json
);
criterion_main!(core_benches);
