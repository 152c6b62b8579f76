//! Reader for the IDX binary format used by MNIST.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic: uint8 data, 3 dimensions)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic: uint8 data, 1 dimension)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```

use std::path::Path;

use log::info;

use super::LabeledData;
use crate::error::{NnError, Result};

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;
pub const MNIST_CLASSES: usize = 10;

/// Grayscale images with pixels scaled from `[0, 255]` to `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxImages {
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<Vec<f64>>,
}

fn read_u32_be(bytes: &[u8], offset: usize, what: &str) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| {
            NnError::Dataset(format!("{what} file truncated in header at byte {offset}"))
        })
}

pub fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    let magic = read_u32_be(bytes, 0, "image")?;
    if magic != IMAGE_MAGIC {
        return Err(NnError::Dataset(format!(
            "image file magic number mismatch: expected {IMAGE_MAGIC:#010x}, got {magic:#010x}"
        )));
    }

    let n_items = read_u32_be(bytes, 4, "image")? as usize;
    let rows = read_u32_be(bytes, 8, "image")? as usize;
    let cols = read_u32_be(bytes, 12, "image")? as usize;

    let n_pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| NnError::Dataset(format!("rows * cols overflows ({rows} x {cols})")))?;
    let data_end = n_items
        .checked_mul(n_pixels)
        .and_then(|len| len.checked_add(16))
        .ok_or_else(|| {
            NnError::Dataset(format!("{n_items} images of {n_pixels} pixels overflow"))
        })?;

    let data = bytes.get(16..data_end).ok_or_else(|| {
        NnError::Dataset(format!(
            "image file too short: header declares {n_items} images of {rows}x{cols} pixels, \
             file is {} bytes",
            bytes.len()
        ))
    })?;

    let pixels = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        data.chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
            .collect()
    };

    Ok(IdxImages { rows, cols, pixels })
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    let magic = read_u32_be(bytes, 0, "label")?;
    if magic != LABEL_MAGIC {
        return Err(NnError::Dataset(format!(
            "label file magic number mismatch: expected {LABEL_MAGIC:#010x}, got {magic:#010x}"
        )));
    }

    let n_items = read_u32_be(bytes, 4, "label")? as usize;
    let data = bytes.get(8..8 + n_items).ok_or_else(|| {
        NnError::Dataset(format!(
            "label file too short: header declares {n_items} labels, file is {} bytes",
            bytes.len()
        ))
    })?;

    Ok(data.to_vec())
}

/// Zips an image file and a label file into one-hot labelled examples.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<Vec<LabeledData>> {
    let images = parse_images(image_bytes)?;
    let labels = parse_labels(label_bytes)?;

    if images.pixels.len() != labels.len() {
        return Err(NnError::Dataset(format!(
            "image file declares {} items but label file declares {}",
            images.pixels.len(),
            labels.len()
        )));
    }

    images
        .pixels
        .into_iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (pixels, class))| {
            let class = class as usize;
            if class >= n_classes {
                return Err(NnError::Dataset(format!(
                    "label at index {i}: class {class} out of range for {n_classes} classes"
                )));
            }
            Ok(LabeledData::with_class(pixels, class, n_classes))
        })
        .collect()
}

fn load_pair(folder: &Path, images: &str, labels: &str) -> Result<Vec<LabeledData>> {
    let image_bytes = std::fs::read(folder.join(images))?;
    let label_bytes = std::fs::read(folder.join(labels))?;
    let data = parse_idx_pair(&image_bytes, &label_bytes, MNIST_CLASSES)?;
    info!("loaded {} examples from {}", data.len(), folder.join(images).display());
    Ok(data)
}

/// The 60k MNIST training examples found in `folder`.
pub fn load_mnist_training(folder: impl AsRef<Path>) -> Result<Vec<LabeledData>> {
    load_pair(
        folder.as_ref(),
        "train-images.idx3-ubyte",
        "train-labels.idx1-ubyte",
    )
}

/// The 10k MNIST test examples found in `folder`.
pub fn load_mnist_test(folder: impl AsRef<Path>) -> Result<Vec<LabeledData>> {
    load_pair(
        folder.as_ref(),
        "t10k-images.idx3-ubyte",
        "t10k-labels.idx1-ubyte",
    )
}
