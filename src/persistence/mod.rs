use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::art::{ArtEngine, Params};
use crate::artmap::{ArtMapEngine, MapParams};
use crate::category::Category;
use crate::error::{Error, Result};
use crate::kernel::{CategoryWeight, KernelKind};
use crate::pattern::Pattern;

const MAGIC: &[u8; 4] = b"ARTE";
const FORMAT_VERSION: u16 = 1;

fn io_err(e: std::io::Error) -> Error {
    Error::Internal(Box::new(e))
}

/// Writes a flat big-endian snapshot of one ART engine.
/// The literal byte layout covers only the shared prototype array; this
/// implementation extends each category record with one variant-specific
/// trailing `f32` (hypersphere radius, backprop bias) so a round trip is
/// lossless rather than merely matching the header shape.
pub fn save_art<W: Write>(engine: &ArtEngine, w: &mut W) -> Result<()> {
    w.write_all(MAGIC).map_err(io_err)?;
    w.write_u16::<BigEndian>(FORMAT_VERSION).map_err(io_err)?;
    w.write_u8(engine.params().kernel.variant_code())
        .map_err(io_err)?;

    let categories: Vec<&Category> = engine.categories().collect();
    let dim = categories.first().map(|c| c.weight.dim()).unwrap_or(0) as u32;
    let created_at_counter = categories
        .iter()
        .map(|c| c.created_at + 1)
        .max()
        .unwrap_or(0);

    w.write_u32::<BigEndian>(dim).map_err(io_err)?;
    w.write_u64::<BigEndian>(created_at_counter).map_err(io_err)?;
    w.write_u32::<BigEndian>(categories.len() as u32)
        .map_err(io_err)?;

    for category in &categories {
        write_category(w, category)?;
    }
    Ok(())
}

fn write_category<W: Write>(w: &mut W, category: &Category) -> Result<()> {
    w.write_u32::<BigEndian>(category.id as u32).map_err(io_err)?;
    for &v in category.weight.as_pattern().as_slice() {
        w.write_f32::<BigEndian>(v).map_err(io_err)?;
    }
    w.write_u64::<BigEndian>(category.created_at).map_err(io_err)?;
    w.write_u64::<BigEndian>(category.update_count).map_err(io_err)?;
    w.write_f32::<BigEndian>(category.last_activation)
        .map_err(io_err)?;
    match &category.weight {
        CategoryWeight::Hypersphere { radius, .. } => {
            w.write_f32::<BigEndian>(*radius).map_err(io_err)?;
        }
        CategoryWeight::Backprop(state) => {
            w.write_f32::<BigEndian>(state.bias).map_err(io_err)?;
        }
        CategoryWeight::Fuzzy(_) => {}
    }
    Ok(())
}

/// Restores an `ArtEngine` from a snapshot written by `save_art`. `params`
/// supplies the live tuning (vigilance, learning rate, pool sizing, ...);
/// only the kernel variant is cross-checked against the file's header.
pub fn load_art<R: Read>(r: &mut R, params: Params) -> Result<ArtEngine> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).map_err(io_err)?;
    if &magic != MAGIC {
        return Err(Error::InvalidInput("not an ART engine snapshot".into()));
    }
    let version = r.read_u16::<BigEndian>().map_err(io_err)?;
    if version != FORMAT_VERSION {
        return Err(Error::InvalidInput(format!(
            "unsupported snapshot format version {version}"
        )));
    }
    let variant_code = r.read_u8().map_err(io_err)?;
    if variant_code != params.kernel.variant_code() {
        return Err(Error::InvalidInput(
            "snapshot kernel variant does not match the supplied params".into(),
        ));
    }
    let dim = r.read_u32::<BigEndian>().map_err(io_err)? as usize;
    let _created_at_counter = r.read_u64::<BigEndian>().map_err(io_err)?;
    let count = r.read_u32::<BigEndian>().map_err(io_err)?;

    let mut engine = ArtEngine::new(params)?;
    for _ in 0..count {
        let category = read_category(r, dim, params.kernel)?;
        engine.restore_category(category)?;
    }
    Ok(engine)
}

fn read_category<R: Read>(r: &mut R, dim: usize, kernel: KernelKind) -> Result<Category> {
    let id = r.read_u32::<BigEndian>().map_err(io_err)? as usize;
    let mut values = vec![0.0f32; dim];
    for v in values.iter_mut() {
        *v = r.read_f32::<BigEndian>().map_err(io_err)?;
    }
    let created_at = r.read_u64::<BigEndian>().map_err(io_err)?;
    let update_count = r.read_u64::<BigEndian>().map_err(io_err)?;
    let last_activation = r.read_f32::<BigEndian>().map_err(io_err)?;
    let pattern = Pattern::new(values);
    let weight = match kernel {
        KernelKind::Fuzzy { .. } => CategoryWeight::Fuzzy(pattern),
        KernelKind::Hypersphere { .. } => {
            let radius = r.read_f32::<BigEndian>().map_err(io_err)?;
            CategoryWeight::Hypersphere {
                centroid: pattern,
                radius,
            }
        }
        KernelKind::Backprop => {
            let bias = r.read_f32::<BigEndian>().map_err(io_err)?;
            CategoryWeight::Backprop(crate::kernel::BackpropWeight::new(pattern, bias))
        }
    };
    let mut category = Category::new(id, weight, created_at);
    category.update_count = update_count;
    category.last_activation = last_activation;
    Ok(category)
}

/// Writes both underlying ART engines plus the map-field: a `u32` entry
/// count followed by that many `(u32, u32)` A-category/B-category pairs.
pub fn save_artmap<W: Write>(engine: &ArtMapEngine, w: &mut W) -> Result<()> {
    save_art(engine.art_a(), w)?;
    save_art(engine.art_b(), w)?;
    let entries: Vec<(usize, usize)> = engine.map_field().iter().collect();
    w.write_u32::<BigEndian>(entries.len() as u32)
        .map_err(io_err)?;
    for (a, b) in entries {
        w.write_u32::<BigEndian>(a as u32).map_err(io_err)?;
        w.write_u32::<BigEndian>(b as u32).map_err(io_err)?;
    }
    Ok(())
}

pub fn load_artmap<R: Read>(
    r: &mut R,
    params_a: Params,
    params_b: Params,
    map_params: MapParams,
) -> Result<ArtMapEngine> {
    let art_a = load_art(r, params_a)?;
    let art_b = load_art(r, params_b)?;

    let entry_count = r.read_u32::<BigEndian>().map_err(io_err)?;
    let mut map = crate::artmap::MapField::new();
    for _ in 0..entry_count {
        let a = r.read_u32::<BigEndian>().map_err(io_err)? as usize;
        let b = r.read_u32::<BigEndian>().map_err(io_err)? as usize;
        map.set(a, b);
    }

    ArtMapEngine::from_parts(art_a, art_b, map, map_params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelKind;
    use crate::pattern::Pattern;

    fn fuzzy_params(vigilance: f32) -> Params {
        let mut p = Params::default();
        p.kernel = KernelKind::Fuzzy { alpha: 0.01 };
        p.vigilance = vigilance;
        p
    }

    #[test]
    fn art_engine_round_trips_through_snapshot() {
        let mut engine = ArtEngine::new(fuzzy_params(0.8)).unwrap();
        engine.learn(&Pattern::new(vec![0.8, 0.6, 0.4, 0.2])).unwrap();
        engine.learn(&Pattern::new(vec![0.1, 0.9, 0.1, 0.9])).unwrap();

        let mut buffer = Vec::new();
        save_art(&engine, &mut buffer).unwrap();

        let restored = load_art(&mut buffer.as_slice(), fuzzy_params(0.8)).unwrap();
        assert_eq!(restored.category_count(), engine.category_count());
        for (a, b) in engine.categories().zip(restored.categories()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.weight.as_pattern().as_slice(), b.weight.as_pattern().as_slice());
            assert_eq!(a.created_at, b.created_at);
        }
    }

    #[test]
    fn rejects_mismatched_magic() {
        let result = load_art(&mut &b"NOPE"[..], fuzzy_params(0.8));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_kernel_variant_mismatch() {
        let engine = ArtEngine::new(fuzzy_params(0.8)).unwrap();
        let mut buffer = Vec::new();
        save_art(&engine, &mut buffer).unwrap();

        let mut hypersphere_params = Params::default();
        hypersphere_params.kernel = KernelKind::Hypersphere { r_max: 1.0 };
        let result = load_art(&mut buffer.as_slice(), hypersphere_params);
        assert!(result.is_err());
    }
}
