//! Voxel sampling: packed voxel codes, prefetched boxes and sources.
//!
//! Voxel data arrives as dense `u16` codes addressed `x + y·sx + z·sx·sy`
//! (x fastest, then y, then z). Code `0` is air; any other code `v` is solid
//! material `v - 1`.

use std::convert::Infallible;
use std::future::Future;

use voxtac_core::WorldPos;

use crate::error::BoardError;

/// A single decoded voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Voxel {
    #[default]
    Air,
    Solid(u16),
}

impl Voxel {
    /// Decode a packed voxel code.
    #[inline]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Air,
            v => Self::Solid(v - 1),
        }
    }

    /// Encode as a packed voxel code.
    #[inline]
    pub const fn code(self) -> u16 {
        match self {
            Self::Air => 0,
            Self::Solid(material) => material.saturating_add(1),
        }
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid(_))
    }
}

/// A dense box of voxel codes covering `[min, min + size)` in world space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMapData {
    min: WorldPos,
    size: [usize; 3],
    data: Vec<u16>,
}

impl LocalMapData {
    /// Wrap a code buffer. `data.len()` must equal `size[0] * size[1] * size[2]`.
    pub fn new(min: WorldPos, size: [usize; 3], data: Vec<u16>) -> Result<Self, BoardError> {
        let expected = size[0] * size[1] * size[2];
        if data.len() != expected {
            return Err(BoardError::DataSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { min, size, data })
    }

    /// Build the box `[min, max)` by sampling `f` at every voxel.
    pub fn from_fn(min: WorldPos, max: WorldPos, mut f: impl FnMut(WorldPos) -> Voxel) -> Self {
        let extent = |lo: i32, hi: i32| (hi - lo).max(0) as usize;
        let size = [
            extent(min.x, max.x),
            extent(min.y, max.y),
            extent(min.z, max.z),
        ];
        let mut data = Vec::with_capacity(size[0] * size[1] * size[2]);
        for z in 0..size[2] as i32 {
            for y in 0..size[1] as i32 {
                for x in 0..size[0] as i32 {
                    data.push(f(min.shift(x, y, z)).code());
                }
            }
        }
        Self { min, size, data }
    }

    /// Inclusive lower corner.
    #[inline]
    pub fn min(&self) -> WorldPos {
        self.min
    }

    /// Exclusive upper corner.
    #[inline]
    pub fn max(&self) -> WorldPos {
        self.min
            .shift(self.size[0] as i32, self.size[1] as i32, self.size[2] as i32)
    }

    /// Dimensions along x, y and z.
    #[inline]
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// The raw code buffer.
    #[inline]
    pub fn codes(&self) -> &[u16] {
        &self.data
    }

    fn index(&self, pos: WorldPos) -> Option<usize> {
        let rel = pos - self.min;
        if rel.x < 0 || rel.y < 0 || rel.z < 0 {
            return None;
        }
        let (x, y, z) = (rel.x as usize, rel.y as usize, rel.z as usize);
        let [sx, sy, sz] = self.size;
        if x >= sx || y >= sy || z >= sz {
            return None;
        }
        Some(x + y * sx + z * sx * sy)
    }

    /// The voxel at `pos`, or `None` outside the box.
    #[inline]
    pub fn try_sample(&self, pos: WorldPos) -> Option<Voxel> {
        self.index(pos).map(|i| Voxel::from_code(self.data[i]))
    }

    /// The voxel at `pos`, or [`BoardError::OutOfBounds`] outside the box.
    pub fn sample(&self, pos: WorldPos) -> Result<Voxel, BoardError> {
        self.try_sample(pos).ok_or_else(|| BoardError::OutOfBounds {
            pos,
            min: self.min,
            max: self.max(),
        })
    }
}

/// The voxel-sampling collaborator a board is built from.
///
/// `local_map_data` must return the box `[min, max)`: `min` inclusive, `max`
/// exclusive on every axis.
pub trait VoxelSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn local_map_data(
        &self,
        min: WorldPos,
        max: WorldPos,
    ) -> impl Future<Output = Result<LocalMapData, Self::Error>>;
}

/// A voxel source backed by a sampling closure.
pub struct FnVoxelSource<F>(pub F);

impl<F: Fn(WorldPos) -> Voxel> VoxelSource for FnVoxelSource<F> {
    type Error = Infallible;

    async fn local_map_data(
        &self,
        min: WorldPos,
        max: WorldPos,
    ) -> Result<LocalMapData, Infallible> {
        Ok(LocalMapData::from_fn(min, max, &self.0))
    }
}

/// Dense in-memory voxel volume.
///
/// Stored as a flat code buffer over `[min, min + size)`. Out-of-bounds reads
/// are air and out-of-bounds writes are ignored, so a volume can be sampled
/// with any fetch box.
#[derive(Debug, Clone)]
pub struct VoxelVolume {
    data: LocalMapData,
}

impl VoxelVolume {
    /// An all-air volume covering `[min, min + size)`.
    pub fn new(min: WorldPos, size: [usize; 3]) -> Self {
        let len = size[0] * size[1] * size[2];
        Self {
            data: LocalMapData {
                min,
                size,
                data: vec![0; len],
            },
        }
    }

    #[inline]
    pub fn min(&self) -> WorldPos {
        self.data.min()
    }

    #[inline]
    pub fn max(&self) -> WorldPos {
        self.data.max()
    }

    /// Read a voxel. Air outside the volume.
    #[inline]
    pub fn get(&self, pos: WorldPos) -> Voxel {
        self.data.try_sample(pos).unwrap_or(Voxel::Air)
    }

    /// Write a voxel. No-op outside the volume.
    pub fn set(&mut self, pos: WorldPos, voxel: Voxel) {
        if let Some(i) = self.data.index(pos) {
            self.data.data[i] = voxel.code();
        }
    }

    /// Fill the box `[min, max)` (clipped to the volume).
    pub fn fill_box(&mut self, min: WorldPos, max: WorldPos, voxel: Voxel) {
        for z in min.z..max.z {
            for y in min.y..max.y {
                for x in min.x..max.x {
                    self.set(WorldPos::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Make column (x, z) solid up to and including `top`, air above.
    pub fn set_column(&mut self, x: i32, z: i32, top: i32, material: u16) {
        let lo = self.min().y;
        let hi = self.max().y;
        for y in lo..hi {
            let v = if y <= top {
                Voxel::Solid(material)
            } else {
                Voxel::Air
            };
            self.set(WorldPos::new(x, y, z), v);
        }
    }
}

impl VoxelSource for VoxelVolume {
    type Error = Infallible;

    async fn local_map_data(
        &self,
        min: WorldPos,
        max: WorldPos,
    ) -> Result<LocalMapData, Infallible> {
        Ok(LocalMapData::from_fn(min, max, |p| self.get(p)))
    }
}
