#![allow(dead_code)]

use nbt_core::{snbt, Compound};

/// Two blocks out of position order, a chest with block entity data and
/// two entities, one without a position.
pub const STRUCTURE: &str = r#"{
    DataVersion: 4671,
    author: "builder",
    size: [1, 1, 2],
    palette: [
        {Name: "minecraft:stone"},
        {Name: "minecraft:chest", Properties: {facing: "north", waterlogged: "false"}}
    ],
    blocks: [
        {pos: [0, 0, 1], state: 1, nbt: {id: "minecraft:chest", Items: []}},
        {pos: [0, 0, 0], state: 0}
    ],
    entities: [
        {pos: [0.5d, 2.0d, 0.5d], blockPos: [0, 2, 0], nbt: {id: "minecraft:bat"}},
        {nbt: {id: "minecraft:marker"}},
        {pos: [0.5d, 1.0d, 0.5d], blockPos: [0, 1, 0], nbt: {id: "minecraft:cow"}}
    ]
}"#;

pub fn compound(src: &str) -> Compound {
    snbt::read_compound(src).expect("fixture should parse")
}

pub fn structure() -> Compound {
    compound(STRUCTURE)
}
