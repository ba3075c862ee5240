//! Features artifact: a versioned binary container of equal-length f32
//! vectors.
//!
//! ```text
//! [4B magic "FKSG"] [4B version=1] [4B count] [4B dimension]
//! [8B xxh3-64 of the paired names artifact]
//! [count x dimension x 4B float32]
//! ```
//!
//! All multi-byte values are little-endian. The names digest ties the
//! two artifacts of one save together.

use bytemuck::{Pod, Zeroable};

const MAGIC: [u8; 4] = *b"FKSG";
pub(crate) const VERSION: u32 = 1;
const HEADER_LEN: usize = std::mem::size_of::<Header>();

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Header {
    magic: [u8; 4],
    version: u32,
    count: u32,
    dimension: u32,
    names_digest: u64,
}

/// Decoded features artifact.
#[derive(Debug)]
pub(crate) struct Features {
    pub vectors: Vec<Vec<f32>>,
    pub names_digest: u64,
}

/// Digest stored in the header for the names artifact `names`.
pub(crate) fn names_digest(names: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(names)
}

/// Encodes `vectors`, which must all share `dimension` components.
pub(crate) fn encode<'a>(
    vectors: impl ExactSizeIterator<Item = &'a [f32]>,
    dimension: usize,
    names_digest: u64,
) -> Vec<u8> {
    let count = vectors.len();
    let header = Header {
        magic: MAGIC,
        version: VERSION.to_le(),
        count: (count as u32).to_le(),
        dimension: (dimension as u32).to_le(),
        names_digest: names_digest.to_le(),
    };

    let mut out = Vec::with_capacity(HEADER_LEN + count * dimension * 4);
    out.extend_from_slice(bytemuck::bytes_of(&header));
    for vector in vectors {
        debug_assert_eq!(vector.len(), dimension);
        for &v in vector {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Features, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("truncated header ({} bytes)", bytes.len()));
    }
    let header: Header = bytemuck::pod_read_unaligned(&bytes[..HEADER_LEN]);
    if header.magic != MAGIC {
        return Err(format!("invalid magic {:?}", header.magic));
    }
    let version = u32::from_le(header.version);
    if version != VERSION {
        return Err(format!("unsupported version {version} (want {VERSION})"));
    }

    let count = u32::from_le(header.count) as usize;
    let dimension = u32::from_le(header.dimension) as usize;
    let names_digest = u64::from_le(header.names_digest);
    if count > 0 && dimension == 0 {
        return Err("invalid dimension 0".into());
    }

    let body = &bytes[HEADER_LEN..];
    let expected = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| format!("header declares an impossible size ({count} x {dimension})"))?;
    if body.len() != expected {
        return Err(format!(
            "body holds {} bytes, header declares {count} x {dimension} floats",
            body.len()
        ));
    }
    if count == 0 {
        return Ok(Features {
            vectors: Vec::new(),
            names_digest,
        });
    }

    let vectors = body
        .chunks_exact(dimension * 4)
        .map(|chunk| {
            chunk
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        })
        .collect();
    Ok(Features {
        vectors,
        names_digest,
    })
}
