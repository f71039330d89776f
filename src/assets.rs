//! Explicit asset cache: frame art, badges, icons and fonts by logical key.
//!
//! Assets are addressed by [`AssetKey`] / [`FontFace`], never by path. The
//! path convention lives here and nowhere else:
//!
//! | Key | Path under the asset root |
//! |---|---|
//! | frame art for `t` | `poke/<t>.png` |
//! | HP badge `n` | `poke/hp-<n>.png` |
//! | large energy icon `t` | `poke/energy-large-<t>.png` |
//! | small energy icon `t` | `poke/energy-small-<t>.png` |
//! | colorless move icon | `poke/energy-colorless.png` |
//! | placeholder photo | configured (`poke/missingno.png` by default) |
//! | fonts | `fonts/gill-<face>.ttf` |
//!
//! The cache is built once by whoever owns the render loop and handed to the
//! compositor by `&mut`. Loading is lazy and idempotent: a key is read and
//! decoded once, and only a failed load is retried on the next request.

use crate::imaging::{FontdueFace, RasterImage, Typeface};
use crate::types::{EnergyType, HP_OPTIONS};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to read asset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decode asset {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to load font {path}: {reason}")]
    Font { path: String, reason: String },
}

/// One of the four fixed typefaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// Condensed bold, 44px: move names.
    Cb44,
    /// Condensed bold, 48px: card name.
    Cb48,
    /// Regular, 64px: move damage.
    Rp64,
    /// Bold italic, 22px: description line and flavor text.
    Rbi22,
}

impl FontFace {
    pub const ALL: [FontFace; 4] = [
        FontFace::Cb44,
        FontFace::Cb48,
        FontFace::Rp64,
        FontFace::Rbi22,
    ];

    pub fn path(self) -> &'static str {
        match self {
            FontFace::Cb44 => "fonts/gill-cb-44.ttf",
            FontFace::Cb48 => "fonts/gill-cb-48.ttf",
            FontFace::Rp64 => "fonts/gill-rp-64.ttf",
            FontFace::Rbi22 => "fonts/gill-rbi-22.ttf",
        }
    }

    pub fn px(self) -> f32 {
        match self {
            FontFace::Cb44 => 44.0,
            FontFace::Cb48 => 48.0,
            FontFace::Rp64 => 64.0,
            FontFace::Rbi22 => 22.0,
        }
    }
}

/// Logical key of an image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    FrameArt(EnergyType),
    HpBadge(u32),
    EnergyLarge(EnergyType),
    EnergySmall(EnergyType),
    EnergyColorless,
    Placeholder,
}

impl AssetKey {
    /// Path relative to the asset root. `placeholder` is the configured
    /// placeholder path.
    pub fn path(self, placeholder: &str) -> String {
        match self {
            AssetKey::FrameArt(t) => format!("poke/{t}.png"),
            AssetKey::HpBadge(hp) => format!("poke/hp-{hp}.png"),
            AssetKey::EnergyLarge(t) => format!("poke/energy-large-{t}.png"),
            AssetKey::EnergySmall(t) => format!("poke/energy-small-{t}.png"),
            AssetKey::EnergyColorless => "poke/energy-colorless.png".to_string(),
            AssetKey::Placeholder => placeholder.to_string(),
        }
    }

    /// Icons loaded up front by [`AssetCache::preload`].
    pub fn preloaded() -> Vec<AssetKey> {
        let mut keys: Vec<AssetKey> = EnergyType::ALL
            .into_iter()
            .flat_map(|t| [AssetKey::EnergySmall(t), AssetKey::EnergyLarge(t)])
            .collect();
        keys.push(AssetKey::EnergyColorless);
        keys
    }

    /// Every image key a card could ask for.
    pub fn all() -> Vec<AssetKey> {
        let mut keys: Vec<AssetKey> = EnergyType::ALL.into_iter().map(AssetKey::FrameArt).collect();
        keys.extend(HP_OPTIONS.into_iter().map(AssetKey::HpBadge));
        keys.extend(Self::preloaded());
        keys.push(AssetKey::Placeholder);
        keys
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKey::FrameArt(t) => write!(f, "frame art ({t})"),
            AssetKey::HpBadge(hp) => write!(f, "HP badge ({hp})"),
            AssetKey::EnergyLarge(t) => write!(f, "large energy icon ({t})"),
            AssetKey::EnergySmall(t) => write!(f, "small energy icon ({t})"),
            AssetKey::EnergyColorless => f.write_str("colorless move icon"),
            AssetKey::Placeholder => f.write_str("placeholder photo"),
        }
    }
}

/// Where asset bytes come from.
pub trait AssetSource {
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Assets on disk under a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }
}

/// Decoded assets keyed by logical name.
pub struct AssetCache<R> {
    source: Box<dyn AssetSource>,
    placeholder: String,
    images: HashMap<AssetKey, Arc<R>>,
    fonts: HashMap<FontFace, Arc<dyn Typeface>>,
    load_count: usize,
}

impl<R: RasterImage> AssetCache<R> {
    pub fn new(source: impl AssetSource + 'static, placeholder: impl Into<String>) -> Self {
        Self {
            source: Box::new(source),
            placeholder: placeholder.into(),
            images: HashMap::new(),
            fonts: HashMap::new(),
            load_count: 0,
        }
    }

    /// Cache reading from a directory on disk.
    pub fn from_dir(root: impl Into<PathBuf>, placeholder: impl Into<String>) -> Self {
        Self::new(DirSource::new(root), placeholder)
    }

    pub fn placeholder_path(&self) -> &str {
        &self.placeholder
    }

    /// Number of successful loads from the source so far.
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    pub fn is_cached(&self, key: AssetKey) -> bool {
        self.images.contains_key(&key)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.source.read(path).map_err(|source| AssetError::Read {
            path: path.to_string(),
            source,
        })
    }

    /// The image for `key`, loading it on first use.
    pub fn image(&mut self, key: AssetKey) -> Result<Arc<R>, AssetError> {
        if let Some(image) = self.images.get(&key) {
            return Ok(Arc::clone(image));
        }
        let path = key.path(&self.placeholder);
        let loaded = self.read(&path).and_then(|bytes| {
            R::decode(&bytes).map_err(|e| AssetError::Decode {
                path: path.clone(),
                reason: e.to_string(),
            })
        });
        match loaded {
            Ok(image) => {
                tracing::debug!(%key, %path, "asset loaded");
                let image = Arc::new(image);
                self.images.insert(key, Arc::clone(&image));
                self.load_count += 1;
                Ok(image)
            }
            Err(e) => {
                tracing::error!(%key, error = %e, "asset load failed");
                Err(e)
            }
        }
    }

    /// The typeface for `face`, loading it on first use.
    pub fn font(&mut self, face: FontFace) -> Result<Arc<dyn Typeface>, AssetError> {
        if let Some(font) = self.fonts.get(&face) {
            return Ok(Arc::clone(font));
        }
        let path = face.path();
        let loaded = self.read(path).and_then(|bytes| {
            FontdueFace::from_bytes(&bytes, face.px()).map_err(|reason| AssetError::Font {
                path: path.to_string(),
                reason,
            })
        });
        match loaded {
            Ok(font) => {
                tracing::debug!(?face, path, "font loaded");
                let font: Arc<dyn Typeface> = Arc::new(font);
                self.fonts.insert(face, Arc::clone(&font));
                self.load_count += 1;
                Ok(font)
            }
            Err(e) => {
                tracing::error!(?face, error = %e, "font load failed");
                Err(e)
            }
        }
    }

    /// Put an already-decoded image in the cache.
    pub fn insert_image(&mut self, key: AssetKey, image: R) {
        self.images.insert(key, Arc::new(image));
    }

    /// Put an already-built typeface in the cache.
    pub fn insert_font(&mut self, face: FontFace, font: Arc<dyn Typeface>) {
        self.fonts.insert(face, font);
    }

    /// Load the fonts and the energy icons every card uses.
    ///
    /// Stops at the first failure. Returns how many assets were newly loaded.
    #[tracing::instrument(skip(self))]
    pub fn preload(&mut self) -> Result<usize, AssetError> {
        let before = self.load_count;
        for face in FontFace::ALL {
            self.font(face)?;
        }
        for key in AssetKey::preloaded() {
            self.image(key)?;
        }
        let loaded = self.load_count - before;
        tracing::info!(loaded, "assets preloaded");
        Ok(loaded)
    }
}

/// Every asset path a complete asset root provides.
pub fn required_paths(placeholder: &str) -> Vec<String> {
    let mut paths: Vec<String> = FontFace::ALL.iter().map(|f| f.path().to_string()).collect();
    paths.extend(AssetKey::all().into_iter().map(|k| k.path(placeholder)));
    paths
}

/// Result of checking an asset root for completeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    pub root: PathBuf,
    pub present: usize,
    pub missing: Vec<String>,
}

impl AssetReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Walk `root` and list which required assets are absent.
pub fn check_assets(root: &Path, placeholder: &str) -> AssetReport {
    let found: BTreeSet<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        })
        .collect();

    let required = required_paths(placeholder);
    let (present, missing): (Vec<String>, Vec<String>) =
        required.into_iter().partition(|p| found.contains(p));
    AssetReport {
        root: root.to_path_buf(),
        present: present.len(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockRaster;
    use crate::test_helpers::{BlockFace, MemorySource};

    fn cache_with(files: &[(&str, &str)]) -> AssetCache<MockRaster> {
        let mut source = MemorySource::default();
        for (path, body) in files {
            source.insert(path, body.as_bytes());
        }
        AssetCache::new(source, "poke/missingno.png")
    }

    #[test]
    fn key_paths_follow_convention() {
        let ph = "poke/missingno.png";
        assert_eq!(AssetKey::FrameArt(EnergyType::Fire).path(ph), "poke/fire.png");
        assert_eq!(AssetKey::HpBadge(60).path(ph), "poke/hp-60.png");
        assert_eq!(
            AssetKey::EnergyLarge(EnergyType::Water).path(ph),
            "poke/energy-large-water.png"
        );
        assert_eq!(
            AssetKey::EnergySmall(EnergyType::Colorless).path(ph),
            "poke/energy-small-colorless.png"
        );
        assert_eq!(AssetKey::EnergyColorless.path(ph), "poke/energy-colorless.png");
        assert_eq!(AssetKey::Placeholder.path(ph), ph);
    }

    #[test]
    fn image_loads_once() {
        let mut cache = cache_with(&[("poke/fire.png", "fire:726x996")]);
        let a = cache.image(AssetKey::FrameArt(EnergyType::Fire)).unwrap();
        let b = cache.image(AssetKey::FrameArt(EnergyType::Fire)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.load_count(), 1);
        assert_eq!(a.label, "fire");
    }

    #[test]
    fn missing_image_is_read_error_and_not_cached() {
        let mut cache = cache_with(&[]);
        let err = cache.image(AssetKey::HpBadge(70)).unwrap_err();
        assert!(matches!(err, AssetError::Read { ref path, .. } if path == "poke/hp-70.png"));
        assert!(!cache.is_cached(AssetKey::HpBadge(70)));
        assert_eq!(cache.load_count(), 0);
    }

    #[test]
    fn corrupt_image_is_decode_error() {
        let mut cache = cache_with(&[("poke/grass.png", "grass:oops")]);
        let err = cache.image(AssetKey::FrameArt(EnergyType::Grass)).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn corrupt_font_is_font_error() {
        let mut cache = cache_with(&[("fonts/gill-cb-44.ttf", "not a font")]);
        let err = cache.font(FontFace::Cb44).err().unwrap();
        assert!(matches!(err, AssetError::Font { .. }));
    }

    #[test]
    fn preload_loads_icons_and_skips_seeded_fonts() {
        let files: Vec<(String, String)> = AssetKey::preloaded()
            .into_iter()
            .map(|k| {
                let path = k.path("unused");
                (path.clone(), path.trim_end_matches(".png").to_string())
            })
            .collect();
        let refs: Vec<(&str, &str)> = files.iter().map(|(p, b)| (p.as_str(), b.as_str())).collect();
        let mut cache = cache_with(&refs);
        for face in FontFace::ALL {
            cache.insert_font(face, Arc::new(BlockFace::new(face.px())));
        }

        assert_eq!(cache.preload().unwrap(), 15);
        assert!(cache.is_cached(AssetKey::EnergyLarge(EnergyType::Psychic)));
        assert!(cache.is_cached(AssetKey::EnergyColorless));
        // Second preload is a no-op.
        assert_eq!(cache.preload().unwrap(), 0);
    }

    #[test]
    fn preload_fails_without_fonts() {
        let mut cache = cache_with(&[]);
        assert!(matches!(cache.preload(), Err(AssetError::Read { .. })));
    }

    #[test]
    fn required_paths_cover_everything() {
        let paths = required_paths("poke/missingno.png");
        // 4 fonts + 7 frames + 10 HP badges + 14 icons + colorless + placeholder
        assert_eq!(paths.len(), 37);
        assert!(paths.contains(&"poke/hp-120.png".to_string()));
        assert!(paths.contains(&"fonts/gill-rbi-22.ttf".to_string()));
    }

    #[test]
    fn check_assets_reports_missing_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("poke")).unwrap();
        std::fs::write(tmp.path().join("poke/fire.png"), b"x").unwrap();
        std::fs::write(tmp.path().join("poke/hp-30.png"), b"x").unwrap();

        let report = check_assets(tmp.path(), "poke/missingno.png");
        assert_eq!(report.present, 2);
        assert_eq!(report.missing.len(), 35);
        assert!(!report.is_complete());
        assert!(report.missing.contains(&"poke/water.png".to_string()));
    }

    #[test]
    fn dir_source_reads_relative_to_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("poke")).unwrap();
        std::fs::write(tmp.path().join("poke/energy-colorless.png"), b"icon").unwrap();

        let mut cache: AssetCache<MockRaster> =
            AssetCache::from_dir(tmp.path(), "poke/missingno.png");
        let icon = cache.image(AssetKey::EnergyColorless).unwrap();
        assert_eq!(icon.label, "icon");
    }
}
