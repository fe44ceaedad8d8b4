//! NPY array file reader and writer
//!
//! Supports the subset of the NPY format this pipeline produces and
//! consumes: little-endian `f4`/`f8` two-dimensional C-order arrays,
//! header versions 1.0 and 2.0.

use crate::error::{FeatureError, Result};
use ndarray::Array2;
use std::fs;
use std::path::Path;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Read a 2-D feature matrix from an NPY file.
///
/// Fails with [`FeatureError::Format`] if the file is not a valid NPY
/// array, is not two-dimensional, or uses an unsupported dtype.
pub fn read_matrix(path: &Path) -> Result<Array2<f64>> {
    let bytes = fs::read(path)?;
    parse_matrix(&bytes)
        .map_err(|e| FeatureError::format(format!("{}: {}", path.display(), e)))
}

fn parse_matrix(bytes: &[u8]) -> std::result::Result<Array2<f64>, String> {
    if bytes.len() < 10 {
        return Err("truncated NPY header".to_string());
    }
    if &bytes[..6] != MAGIC {
        return Err("not an NPY file (bad magic)".to_string());
    }

    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 => {
            if bytes.len() < 12 {
                return Err("truncated NPY header".to_string());
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12)
        }
        v => return Err(format!("unsupported NPY version {v}")),
    };

    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        return Err("truncated NPY header".to_string());
    }
    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .map_err(|_| "NPY header is not valid ASCII".to_string())?;

    let descr = quoted_value(header, "'descr'")?;
    let elem_size = match descr.as_str() {
        "<f8" => 8,
        "<f4" => 4,
        other => return Err(format!("unsupported NPY dtype '{other}'")),
    };
    if fortran_order(header)? {
        return Err("Fortran-order arrays are not supported".to_string());
    }
    let shape = parse_shape(header)?;
    if shape.len() != 2 {
        return Err(format!("expected a 2-D array, got {}-D", shape.len()));
    }
    let (rows, cols) = (shape[0], shape[1]);

    let payload = &bytes[data_start..];
    let needed = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(elem_size))
        .ok_or_else(|| "array shape overflows".to_string())?;
    if payload.len() < needed {
        return Err(format!(
            "truncated NPY payload: need {} bytes, got {}",
            needed,
            payload.len()
        ));
    }

    let mut data = Vec::with_capacity(rows * cols);
    match elem_size {
        8 => {
            for chunk in payload[..needed].chunks_exact(8) {
                data.push(f64::from_le_bytes(chunk.try_into().unwrap()));
            }
        }
        _ => {
            for chunk in payload[..needed].chunks_exact(4) {
                data.push(f32::from_le_bytes(chunk.try_into().unwrap()) as f64);
            }
        }
    }

    Array2::from_shape_vec((rows, cols), data).map_err(|e| e.to_string())
}

/// Write a 2-D matrix as a version 1.0 NPY file (`<f8`, C order).
pub fn write_matrix(path: &Path, matrix: &Array2<f64>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    let mut header = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({rows}, {cols}), }}");
    // Total header size (magic + version + length field + dict) padded to 64
    // bytes, newline terminated, per the NPY format description.
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(unpadded + padding + rows * cols * 8);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for &value in matrix.iter() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    fs::write(path, out)?;
    Ok(())
}

/// Extract the quoted value following `key` in the header dict.
fn quoted_value(header: &str, key: &str) -> std::result::Result<String, String> {
    let pos = header
        .find(key)
        .ok_or_else(|| format!("NPY header missing {key}"))?;
    let rest = &header[pos + key.len()..];
    let open = rest
        .find('\'')
        .ok_or_else(|| format!("NPY header has malformed {key} entry"))?;
    let rest = &rest[open + 1..];
    let close = rest
        .find('\'')
        .ok_or_else(|| format!("NPY header has malformed {key} entry"))?;
    Ok(rest[..close].to_string())
}

fn fortran_order(header: &str) -> std::result::Result<bool, String> {
    let pos = header
        .find("'fortran_order'")
        .ok_or_else(|| "NPY header missing 'fortran_order'".to_string())?;
    let rest = header[pos + "'fortran_order'".len()..]
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    if rest.starts_with("False") {
        Ok(false)
    } else if rest.starts_with("True") {
        Ok(true)
    } else {
        Err("NPY header has malformed 'fortran_order' entry".to_string())
    }
}

fn parse_shape(header: &str) -> std::result::Result<Vec<usize>, String> {
    let open = header
        .find('(')
        .ok_or_else(|| "NPY header missing shape tuple".to_string())?;
    let close = header[open..]
        .find(')')
        .ok_or_else(|| "NPY header missing shape tuple".to_string())?;
    header[open + 1..open + close]
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| format!("invalid shape element '{part}'"))
        })
        .collect()
}
