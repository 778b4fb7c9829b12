//! Binary codec for the three on-disk formats a construction run touches:
//! the input dataset, the emitted k-NNG, and ground-truth-sample files.
//! Every integer is little-endian `u32`; there is no versioning or magic
//! number, matching `original_source`'s raw `ifstream`/`ofstream` reads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;
use vector::VectorStore;

fn open_read(path: &Path) -> Result<BufReader<File>, Error> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn create_write(path: &Path) -> Result<BufWriter<File>, Error> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn io_err(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the dataset format: a `u32` point count header, followed by that
/// many `dimensions`-length rows of little-endian `f32`.
pub fn read_dataset(path: &Path, dimensions: usize) -> Result<VectorStore, Error> {
    let mut reader = open_read(path)?;

    let n_points = reader
        .read_u32::<LittleEndian>()
        .map_err(|source| io_err(path, source))? as usize;

    let actual_len = std::fs::metadata(path)
        .map_err(|source| io_err(path, source))?
        .len();
    let expected_len = 4u64
        + (n_points as u64)
            .saturating_mul(dimensions as u64)
            .saturating_mul(4);
    if actual_len != expected_len {
        return Err(Error::MalformedDataset {
            path: path.to_path_buf(),
            n_points,
            dimensions,
            expected: expected_len,
            actual: actual_len,
        });
    }

    let mut coordinates = Vec::with_capacity(n_points * dimensions);
    for _ in 0..n_points {
        for _ in 0..dimensions {
            coordinates.push(
                reader
                    .read_f32::<LittleEndian>()
                    .map_err(|source| io_err(path, source))?,
            );
        }
    }

    Ok(VectorStore::new(coordinates, dimensions)?)
}

/// Write the k-NNG output format: no header, just `N` rows of `K` neighbor
/// ids each, farthest-first per row (the heap drain order), as little-endian
/// `u32`.
pub fn write_knng(path: &Path, knng: &[Vec<u32>], k: usize) -> Result<(), Error> {
    let mut writer = create_write(path)?;
    for (id, row) in knng.iter().enumerate() {
        if row.len() != k {
            return Err(Error::NeighborCountMismatch {
                id: id as u32,
                expected: k,
                found: row.len(),
            });
        }
        for &neighbor in row {
            writer
                .write_u32::<LittleEndian>(neighbor)
                .map_err(|source| io_err(path, source))?;
        }
    }
    writer.flush().map_err(|source| io_err(path, source))
}

/// Read a k-NNG output file back, given the known `k`. The point count is
/// derived from the file size, matching the lack of header in the format.
pub fn read_knng(path: &Path, k: usize) -> Result<Vec<Vec<u32>>, Error> {
    let mut reader = open_read(path)?;
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|source| io_err(path, source))?;

    let record_size = k * 4;
    if record_size == 0 || buf.len() % record_size != 0 {
        return Err(Error::TruncatedRecord {
            path: path.to_path_buf(),
            record_size,
            actual: buf.len(),
        });
    }

    let n_points = buf.len() / record_size;
    let mut out = Vec::with_capacity(n_points);
    let mut cursor = &buf[..];
    for _ in 0..n_points {
        let mut row = Vec::with_capacity(k);
        for _ in 0..k {
            row.push(
                cursor
                    .read_u32::<LittleEndian>()
                    .map_err(|source| io_err(path, source))?,
            );
        }
        out.push(row);
    }
    Ok(out)
}

/// Write a ground-truth sample: a `u32` sample count header, then per
/// sampled point a `u32` original id followed by its `k` nearest neighbor
/// ids.
pub fn write_ground_truth(
    path: &Path,
    sample_ids: &[u32],
    knn: &[Vec<u32>],
    k: usize,
) -> Result<(), Error> {
    let mut writer = create_write(path)?;
    writer
        .write_u32::<LittleEndian>(sample_ids.len() as u32)
        .map_err(|source| io_err(path, source))?;

    for (&id, row) in sample_ids.iter().zip(knn) {
        if row.len() != k {
            return Err(Error::NeighborCountMismatch {
                id,
                expected: k,
                found: row.len(),
            });
        }
        writer
            .write_u32::<LittleEndian>(id)
            .map_err(|source| io_err(path, source))?;
        for &neighbor in row {
            writer
                .write_u32::<LittleEndian>(neighbor)
                .map_err(|source| io_err(path, source))?;
        }
    }
    writer.flush().map_err(|source| io_err(path, source))
}

/// Read a ground-truth sample file back. Returns `(sample_ids, knn)` with
/// `sample_ids[i]` the original dataset id of `knn[i]`'s owning point.
pub fn read_ground_truth(path: &Path, k: usize) -> Result<(Vec<u32>, Vec<Vec<u32>>), Error> {
    let mut reader = open_read(path)?;

    let n_samples = reader
        .read_u32::<LittleEndian>()
        .map_err(|source| io_err(path, source))? as usize;

    let mut sample_ids = Vec::with_capacity(n_samples);
    let mut knn = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let id = reader
            .read_u32::<LittleEndian>()
            .map_err(|source| io_err(path, source))?;
        let mut row = Vec::with_capacity(k);
        for _ in 0..k {
            row.push(
                reader
                    .read_u32::<LittleEndian>()
                    .map_err(|source| io_err(path, source))?,
            );
        }
        sample_ids.push(id);
        knn.push(row);
    }

    Ok((sample_ids, knn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn round_trips_dataset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.bin");

        {
            let mut writer = create_write(&path).unwrap();
            writer.write_u32::<LittleEndian>(2).unwrap();
            for v in [0.0_f32, 1.0, 2.0, 3.0] {
                writer.write_f32::<LittleEndian>(v).unwrap();
            }
            writer.flush().unwrap();
        }

        let store = read_dataset(&path, 2).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.point(0), &[0.0, 1.0]);
        assert_eq!(store.point(1), &[2.0, 3.0]);
    }

    #[test]
    fn rejects_dataset_truncated_mid_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.bin");

        {
            let mut writer = create_write(&path).unwrap();
            writer.write_u32::<LittleEndian>(2).unwrap();
            // header promises 2 points x 2 dims (16 bytes of floats), only
            // write 3 of the 4 floats.
            for v in [0.0_f32, 1.0, 2.0] {
                writer.write_f32::<LittleEndian>(v).unwrap();
            }
            writer.flush().unwrap();
        }

        let err = read_dataset(&path, 2).unwrap_err();
        assert!(matches!(err, Error::MalformedDataset { .. }));
        assert!(err.to_string().contains("dataset"));
    }

    #[test]
    fn rejects_dataset_with_trailing_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.bin");

        {
            let mut writer = create_write(&path).unwrap();
            writer.write_u32::<LittleEndian>(1).unwrap();
            for v in [0.0_f32, 1.0] {
                writer.write_f32::<LittleEndian>(v).unwrap();
            }
            // trailing bytes beyond the declared 1 point x 2 dims.
            writer.write_u32::<LittleEndian>(0xdead_beef).unwrap();
            writer.flush().unwrap();
        }

        let err = read_dataset(&path, 2).unwrap_err();
        assert!(matches!(err, Error::MalformedDataset { .. }));
        assert!(err.to_string().contains("dataset"));
    }

    #[test]
    fn round_trips_knng() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("knng.bin");

        let knng = vec![vec![1, 2, 3], vec![0, 2, 3]];
        write_knng(&path, &knng, 3).unwrap();
        let read_back = read_knng(&path, 3).unwrap();
        assert_eq!(read_back, knng);
    }

    #[test]
    fn write_knng_rejects_wrong_row_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("knng.bin");
        let knng = vec![vec![1, 2]];
        let err = write_knng(&path, &knng, 3).unwrap_err();
        assert!(matches!(err, Error::NeighborCountMismatch { .. }));
    }

    #[test]
    fn round_trips_ground_truth() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("truth.bin");

        let ids = vec![5, 9];
        let knn = vec![vec![1, 2], vec![3, 4]];
        write_ground_truth(&path, &ids, &knn, 2).unwrap();

        let (read_ids, read_knn) = read_ground_truth(&path, 2).unwrap();
        assert_eq!(read_ids, ids);
        assert_eq!(read_knn, knn);
    }
}
