//! Structure files in "provider" form: the shape checked into data
//! generators, where palette entries are flattened into strings and block
//! states refer to them by text instead of by index.
//!
//! `to_provider_form` and `from_provider_form` are inverses for structures
//! whose blocks and entities are already in position order.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::compound::Compound;
use crate::error::{NbtError, NbtResult};
use crate::list::List;
use crate::snbt;
use crate::tag::Tag;

pub const PALETTE_KEY: &str = "palette";
pub const PALETTES_KEY: &str = "palettes";
pub const DATA_KEY: &str = "data";
pub const BLOCKS_KEY: &str = "blocks";
pub const ENTITIES_KEY: &str = "entities";

const POS_KEY: &str = "pos";
const STATE_KEY: &str = "state";
const NAME_KEY: &str = "Name";
const PROPERTIES_KEY: &str = "Properties";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Reorder `entities` by position (Y, X, Z). Off keeps authored order.
    pub sort_entities: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            sort_entities: true,
        }
    }
}

fn provider_error(message: impl Into<String>) -> NbtError {
    NbtError::ProviderForm(message.into())
}

pub fn to_provider_form(compound: Compound) -> NbtResult<Compound> {
    to_provider_form_with(compound, ProviderOptions::default())
}

pub fn to_provider_form_with(mut compound: Compound, options: ProviderOptions) -> NbtResult<Compound> {
    let palettes = compound.get_list(PALETTES_KEY).cloned();
    let source = match &palettes {
        Some(palettes) => palettes.get_list(0).cloned().unwrap_or_default(),
        None => compound.get_list(PALETTE_KEY).cloned().unwrap_or_default(),
    };
    let palette = source
        .compounds()
        .map(to_palette_string)
        .collect::<NbtResult<Vec<_>>>()?;
    compound.put(
        PALETTE_KEY,
        palette.iter().map(|name| Tag::String(name.clone())).collect::<List>(),
    );

    if let Some(palettes) = palettes {
        let mut variants = Vec::with_capacity(palettes.len());
        for variant in palettes.iter().filter_map(Tag::as_list) {
            let mut mapped = Compound::new();
            for (index, entry) in variant.iter().enumerate() {
                let key = palette.get(index).ok_or_else(|| {
                    provider_error(format!(
                        "palette variant has more than {} entries",
                        palette.len()
                    ))
                })?;
                let entry = entry.as_compound().ok_or_else(|| {
                    provider_error(format!("palette variant entry {index} is not a compound"))
                })?;
                mapped.put_string(key.clone(), to_palette_string(entry)?);
            }
            variants.push(Tag::Compound(mapped));
        }
        compound.put(PALETTES_KEY, List::from(variants));
    }

    if options.sort_entities {
        if let Some(entities) = compound.get_list(ENTITIES_KEY) {
            let mut sorted: Vec<Compound> = entities.compounds().cloned().collect();
            sorted.sort_by(|a, b| {
                empties_last(a.get_list(POS_KEY), b.get_list(POS_KEY), entity_pos_order)
            });
            compound.put(ENTITIES_KEY, into_list(sorted));
        }
    }

    let mut blocks: Vec<Compound> = compound
        .get_list(BLOCKS_KEY)
        .map(|blocks| blocks.compounds().cloned().collect())
        .unwrap_or_default();
    blocks.sort_by(|a, b| empties_last(a.get_list(POS_KEY), b.get_list(POS_KEY), block_pos_order));
    for block in &mut blocks {
        let index = block.get_int_or(STATE_KEY, 0);
        let state = usize::try_from(index)
            .ok()
            .and_then(|index| palette.get(index))
            .ok_or_else(|| {
                provider_error(format!(
                    "block state {index} is outside a palette of {}",
                    palette.len()
                ))
            })?;
        block.put_string(STATE_KEY, state.clone());
    }
    compound.put(DATA_KEY, into_list(blocks));
    compound.remove(BLOCKS_KEY);
    Ok(compound)
}

pub fn from_provider_form(mut compound: Compound) -> NbtResult<Compound> {
    let names: Vec<String> = compound
        .get_list(PALETTE_KEY)
        .map(|palette| {
            palette
                .iter()
                .filter_map(Tag::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let mut index = HashMap::with_capacity(names.len());
    for (position, name) in names.iter().enumerate() {
        if index.insert(name.as_str(), position as i32).is_some() {
            return Err(provider_error(format!("duplicate palette entry {name}")));
        }
    }

    if let Some(palettes) = compound.get_list(PALETTES_KEY).cloned() {
        let variants = palettes
            .compounds()
            .map(|variant| {
                names
                    .iter()
                    .map(|name| {
                        variant
                            .get_string(name)
                            .map(|state| Tag::Compound(from_palette_string(state)))
                            .ok_or_else(|| {
                                provider_error(format!("palette variant has no entry for {name}"))
                            })
                    })
                    .collect::<NbtResult<List>>()
                    .map(Tag::List)
            })
            .collect::<NbtResult<List>>()?;
        compound.put(PALETTES_KEY, variants);
        compound.remove(PALETTE_KEY);
    } else {
        let states = names
            .iter()
            .map(|name| Tag::Compound(from_palette_string(name)))
            .collect::<List>();
        compound.put(PALETTE_KEY, states);
    }

    if let Some(data) = compound.get_list(DATA_KEY).cloned() {
        let mut blocks = Vec::with_capacity(data.len());
        for (position, entry) in data.into_iter().enumerate() {
            let Tag::Compound(mut block) = entry else {
                return Err(provider_error(format!("data entry {position} is not a compound")));
            };
            let state = block
                .get_string(STATE_KEY)
                .ok_or_else(|| provider_error(format!("data entry {position} has no state")))?;
            let Some(&id) = index.get(state) else {
                return Err(NbtError::MissingPaletteEntry(state.to_string()));
            };
            block.put_int(STATE_KEY, id);
            blocks.push(Tag::Compound(block));
        }
        compound.put(BLOCKS_KEY, List::from(blocks));
        compound.remove(DATA_KEY);
    }
    Ok(compound)
}

/// Provider form rendered with the ordered formatter.
pub fn to_provider_string(compound: Compound) -> NbtResult<String> {
    let provider = to_provider_form(compound)?;
    Ok(snbt::to_ordered_string(&Tag::Compound(provider)))
}

pub fn from_provider_string(src: &str) -> NbtResult<Compound> {
    from_provider_form(snbt::read_compound(src)?)
}

/// `Name{key:value,...}` with properties in key order; just `Name` when
/// the state has no `Properties`.
pub fn to_palette_string(state: &Compound) -> NbtResult<String> {
    let name = state
        .get_string(NAME_KEY)
        .ok_or_else(|| provider_error("palette entry has no Name"))?;
    let mut out = name.to_string();
    if let Some(properties) = state.get_compound(PROPERTIES_KEY) {
        out.push('{');
        for (index, (key, value)) in properties.iter().enumerate() {
            let value = value.as_str().ok_or_else(|| {
                provider_error(format!("property {key} of {name} is not a string"))
            })?;
            if index != 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push(':');
            out.push_str(value);
        }
        out.push('}');
    }
    Ok(out)
}

/// Inverse of [`to_palette_string`]. Properties without a `:` are logged
/// and dropped; a missing closing brace takes the rest of the text.
pub fn from_palette_string(text: &str) -> Compound {
    let mut state = Compound::new();
    let name = match text.find('{') {
        Some(open) => {
            if open + 2 <= text.len() {
                let body = &text[open + 1..];
                let body = body.find('}').map_or(body, |close| &body[..close]);
                let mut properties = Compound::new();
                for property in body.split(',') {
                    match property.split_once(':') {
                        Some((key, value)) => properties.put_string(key, value),
                        None => tracing::error!(
                            entry = %text,
                            "Something went wrong parsing: '{text}' -- incorrect gamedata!"
                        ),
                    }
                }
                state.put(PROPERTIES_KEY, properties);
            }
            &text[..open]
        }
        None => text,
    };
    state.put_string(NAME_KEY, name);
    state
}

fn into_list(compounds: Vec<Compound>) -> List {
    compounds.into_iter().map(Tag::Compound).collect()
}

fn empties_last(
    a: Option<&List>,
    b: Option<&List>,
    order: fn(&List, &List) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

const AXIS_ORDER: [usize; 3] = [1, 0, 2];

fn block_pos_order(a: &List, b: &List) -> Ordering {
    AXIS_ORDER
        .iter()
        .map(|&axis| a.get_int(axis, 0).cmp(&b.get_int(axis, 0)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn entity_pos_order(a: &List, b: &List) -> Ordering {
    AXIS_ORDER
        .iter()
        .map(|&axis| a.get_double(axis, 0.0).total_cmp(&b.get_double(axis, 0.0)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
