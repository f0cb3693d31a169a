//! Dataset loading utilities for IRIS (delimited text) and MNIST (gzip IDX).
use crate::error::{Error, Result};
use crate::grid::{Attribute, DataGrid};
use byteorder::{BigEndian, ReadBytesExt};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use log::info;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

const LABEL_MAGIC: i32 = 2049;
const IMAGE_MAGIC: i32 = 2051;

/// Load IRIS: no header, 4 numeric columns then the species name.
pub fn load_iris(path: impl AsRef<Path>) -> Result<DataGrid> {
    let grid = load_csv(path, false)?;
    if grid.feature_count() != 4 {
        log::warn!(
            "IRIS file has {} feature columns, expected 4",
            grid.feature_count()
        );
    }
    Ok(grid)
}

/// Load a delimited text file. Every column but the last is numeric, the
/// last one is the class label.
pub fn load_csv(path: impl AsRef<Path>, has_header: bool) -> Result<DataGrid> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = if has_header {
        Some(rdr.headers()?.clone())
    } else {
        None
    };

    let mut grid: Option<DataGrid> = None;
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            return Err(Error::format(format!(
                "{}: record {} has {} fields, need at least 2",
                path.display(),
                line + 1,
                record.len()
            )));
        }
        let n_features = record.len() - 1;
        let grid = grid.get_or_insert_with(|| match &headers {
            Some(h) => {
                let features = h.iter().take(n_features).map(Attribute::numeric).collect();
                let class = Attribute::categorical(h.get(n_features).unwrap_or_default());
                DataGrid::new(features, class)
            }
            None => DataGrid::with_indexed_features(n_features),
        });
        let features = record
            .iter()
            .take(n_features)
            .map(|s| {
                s.parse::<f64>().map_err(|e| {
                    Error::format(format!(
                        "{}: record {}: bad number {:?}: {}",
                        path.display(),
                        line + 1,
                        s,
                        e
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        let label = record[n_features].trim_matches('"');
        grid.push_row(features, label)?;
    }

    let grid = grid.ok_or_else(|| Error::format(format!("{}: no records", path.display())))?;
    info!("loaded {} rows from {}", grid.len(), path.display());
    Ok(grid)
}

/// Decoded IDX file: dimension sizes and raw payload.
#[derive(Debug)]
struct IdxData {
    sizes: Vec<usize>,
    data: Vec<u8>,
}

impl IdxData {
    fn open(path: &Path, expected_magic: i32) -> Result<Self> {
        let file = File::open(path)?;
        let mut gz = GzDecoder::new(file);
        let mut contents = Vec::new();
        gz.read_to_end(&mut contents)?;
        Self::parse(&contents, expected_magic)
            .map_err(|e| Error::format(format!("{}: {}", path.display(), e)))
    }

    fn parse(contents: &[u8], expected_magic: i32) -> std::result::Result<Self, String> {
        let mut r = Cursor::new(contents);
        let magic = r
            .read_i32::<BigEndian>()
            .map_err(|e| format!("read magic: {}", e))?;
        if magic != expected_magic {
            return Err(format!("invalid magic {}, expected {}", magic, expected_magic));
        }
        let dims = match magic {
            LABEL_MAGIC => 1,
            _ => 3,
        };
        let mut sizes = Vec::with_capacity(dims);
        for _ in 0..dims {
            let n = r
                .read_i32::<BigEndian>()
                .map_err(|e| format!("read dimension: {}", e))?;
            if n < 0 {
                return Err(format!("negative dimension {}", n));
            }
            sizes.push(n as usize);
        }
        let mut data = Vec::new();
        r.read_to_end(&mut data)
            .map_err(|e| format!("read data: {}", e))?;
        let expected = sizes
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| format!("dimensions {:?} overflow", sizes))?;
        if data.len() < expected {
            return Err(format!(
                "payload has {} bytes, header declares {}",
                data.len(),
                expected
            ));
        }
        Ok(Self { sizes, data })
    }
}

/// Load the first `max` MNIST images with their labels.
///
/// Features are the raw pixel intensities (0-255); the class column holds the
/// digit as a string. Asking for more rows than the files hold is not an
/// error, the result is capped at the available count.
pub fn load_mnist(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    max: usize,
) -> Result<DataGrid> {
    let images = IdxData::open(image_path.as_ref(), IMAGE_MAGIC)?;
    let labels = IdxData::open(label_path.as_ref(), LABEL_MAGIC)?;

    let n_images = images.sizes[0];
    if labels.sizes[0] != n_images {
        return Err(Error::format(format!(
            "{} images but {} labels",
            n_images, labels.sizes[0]
        )));
    }
    let image_size = images.sizes[1]
        .checked_mul(images.sizes[2])
        .ok_or_else(|| Error::format("MNIST image dimensions overflow"))?;
    let rows = n_images.min(max);

    let mut grid = DataGrid::with_indexed_features(image_size);
    grid.reserve(rows);
    for (pixels, &label) in images
        .data
        .chunks_exact(image_size.max(1))
        .zip(&labels.data)
        .take(rows)
    {
        let features = pixels.iter().map(|&b| b as f64).collect();
        grid.push_row(features, label.to_string())?;
    }
    info!(
        "loaded {} of {} MNIST images ({}x{})",
        grid.len(),
        n_images,
        images.sizes[1],
        images.sizes[2]
    );
    Ok(grid)
}
