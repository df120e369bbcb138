//! Image discovery and the study/test partition.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use recmem_core::{Error, Result};
use tracing::{debug, info};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Lists the image files directly inside `dir`, sorted by path.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DatasetDirectoryMissing(dir.to_path_buf()));
    }
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if is_image && path.is_file() {
            images.push(path);
        }
    }
    if images.is_empty() {
        return Err(Error::EmptyDataset(dir.to_path_buf()));
    }
    images.sort();
    info!(dir = %dir.display(), count = images.len(), "dataset loaded");
    Ok(images)
}

/// The images of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    /// Shown during the study phase, in order. May repeat an image.
    pub study: Vec<T>,
    /// The study list plus as many unstudied images, shuffled.
    pub test: Vec<T>,
}

/// Draws a study list and a test list from `universe`, reproducibly for a seed.
///
/// The study list is drawn with replacement. The complement is drawn with
/// replacement too, rejecting anything already studied, until it holds
/// `count` items.
pub fn partition<T: Clone + PartialEq>(seed: u64, count: usize, universe: &[T]) -> Result<Partition<T>> {
    if count == 0 {
        return Ok(Partition {
            study: Vec::new(),
            test: Vec::new(),
        });
    }
    if universe.is_empty() {
        return Err(Error::InsufficientImages {
            needed: count,
            universe: 0,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let size = universe.len();

    let study: Vec<T> = (0..count)
        .map(|_| universe[rng.random_range(0..size)].clone())
        .collect();

    if universe.iter().all(|item| study.contains(item)) {
        return Err(Error::InsufficientImages {
            needed: count,
            universe: size,
        });
    }

    let mut fresh = Vec::with_capacity(count);
    let mut rejected = 0usize;
    while fresh.len() < count {
        let item = &universe[rng.random_range(0..size)];
        if study.contains(item) {
            rejected += 1;
        } else {
            fresh.push(item.clone());
        }
    }
    debug!(count, rejected, "partition drawn");

    let mut test = study.clone();
    test.extend(fresh);
    test.shuffle(&mut rng);

    Ok(Partition { study, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn universe(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("img_{i:02}.jpg")).collect()
    }

    #[test]
    fn same_seed_same_partition() {
        let u = universe(40);
        let a = partition(1234, 10, &u).unwrap();
        let b = partition(1234, 10, &u).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_list_is_twice_the_study_list() {
        let u = universe(30);
        for seed in 0..20 {
            let p = partition(seed, 8, &u).unwrap();
            assert_eq!(p.study.len(), 8);
            assert_eq!(p.test.len(), 16);
            for item in &p.study {
                assert!(p.test.contains(item));
            }
        }
    }

    #[test]
    fn complement_never_overlaps_study() {
        let u = universe(12);
        for seed in 0..20 {
            let p = partition(seed, 6, &u).unwrap();
            let studied = p.test.iter().filter(|t| p.study.contains(t)).count();
            let fresh = p.test.len() - studied;
            // Duplicates in the study list still count once per draw.
            assert_eq!(studied, p.study.len());
            assert_eq!(fresh, 6);
        }
    }

    #[test]
    fn study_list_may_repeat_images() {
        let u = universe(3);
        let repeated = (0..50).any(|seed| {
            let p = partition(seed, 2, &u).unwrap();
            p.study[0] == p.study[1]
        });
        assert!(repeated);
    }

    #[test]
    fn universe_exhausted_by_study_list() {
        let u = universe(1);
        let err = partition(0, 3, &u).unwrap_err();
        assert!(matches!(err, Error::InsufficientImages { needed: 3, universe: 1 }));
    }

    #[test]
    fn discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.jpg", "a.JPG", "c.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        let found = discover_images(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.jpg", "c.png"]);
    }

    #[test]
    fn missing_directory() {
        let err = discover_images(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, Error::DatasetDirectoryMissing(_)));
    }

    #[test]
    fn directory_without_images() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();
        assert!(matches!(
            discover_images(dir.path()),
            Err(Error::EmptyDataset(_))
        ));
    }
}
