//! Collision models as small sets of boxes, with precomputed full faces.

use std::collections::HashMap;

use tessera_geom::{Aabb, Direction, FaceRect, rects_cover};

use crate::error::RegistryError;
use crate::types::{MAX_MODEL_BOXES, ModelId};

pub const MODEL_FULL: ModelId = 0;
pub const MODEL_EMPTY: ModelId = 1;

#[derive(Clone, Debug)]
pub struct BlockModel {
    pub name: String,
    pub boxes: Vec<Aabb>,
    // Bit `Direction::index()` set when that cube face is fully covered.
    full_faces: u8,
}

impl BlockModel {
    #[inline]
    pub fn full_faces(&self) -> u8 {
        self.full_faces
    }

    #[inline]
    pub fn is_face_full(&self, dir: Direction) -> bool {
        self.full_faces & (1 << dir.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// A face is full when the projections of the boxes touching its plane
/// cover the whole unit square.
pub fn compute_full_faces(boxes: &[Aabb]) -> u8 {
    let mut mask = 0u8;
    let mut rects: Vec<FaceRect> = Vec::with_capacity(boxes.len());
    for dir in Direction::ALL {
        rects.clear();
        rects.extend(boxes.iter().filter_map(|b| b.face_rect(dir)));
        // Flat boxes have no extent to cover anything with.
        rects.retain(|r| r.max_a > r.min_a && r.max_b > r.min_b);
        if rects_cover(&rects, FaceRect::UNIT) {
            mask |= 1 << dir.index();
        }
    }
    mask
}

#[derive(Clone, Debug)]
pub struct ModelTable {
    pub models: Vec<BlockModel>,
    by_name: HashMap<String, ModelId>,
}

impl Default for ModelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTable {
    /// A table holding the canonical `full` and `empty` models.
    pub fn new() -> Self {
        let mut t = Self {
            models: Vec::new(),
            by_name: HashMap::new(),
        };
        t.insert("full", vec![Aabb::UNIT]);
        t.insert("empty", Vec::new());
        t
    }

    fn insert(&mut self, name: &str, boxes: Vec<Aabb>) -> ModelId {
        let id = self.models.len() as ModelId;
        let full_faces = compute_full_faces(&boxes);
        self.models.push(BlockModel {
            name: name.to_string(),
            boxes,
            full_faces,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn register(&mut self, name: &str, boxes: Vec<Aabb>) -> Result<ModelId, RegistryError> {
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateModel(name.to_string()));
        }
        if boxes.len() > MAX_MODEL_BOXES {
            return Err(RegistryError::TooManyBoxes {
                model: name.to_string(),
                count: boxes.len(),
            });
        }
        if !boxes.iter().all(Aabb::is_ordered) {
            return Err(RegistryError::InvertedBox(name.to_string()));
        }
        if self.models.len() > ModelId::MAX as usize {
            return Err(RegistryError::TooManyModels);
        }
        Ok(self.insert(name, boxes))
    }

    #[inline]
    pub fn get(&self, id: ModelId) -> Option<&BlockModel> {
        self.models.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<ModelId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_models() {
        let t = ModelTable::new();
        let full = t.get(MODEL_FULL).unwrap();
        assert_eq!(full.full_faces(), 0b11_1111);
        let empty = t.get(MODEL_EMPTY).unwrap();
        assert_eq!(empty.full_faces(), 0);
        assert!(empty.is_empty());
        assert_eq!(t.id_by_name("empty"), Some(MODEL_EMPTY));
    }

    #[test]
    fn bottom_slab_has_one_full_face() {
        let mut t = ModelTable::new();
        let id = t
            .register("slab", vec![Aabb::from_bounds([0.0, 0.0, 0.0, 1.0, 0.5, 1.0])])
            .unwrap();
        let m = t.get(id).unwrap();
        assert!(m.is_face_full(Direction::Down));
        assert!(!m.is_face_full(Direction::Up));
        assert!(!m.is_face_full(Direction::North));
        assert!(!m.is_face_full(Direction::East));
    }

    #[test]
    fn stacked_halves_fill_the_sides() {
        let mut t = ModelTable::new();
        let id = t
            .register(
                "stack",
                vec![
                    Aabb::from_bounds([0.0, 0.5, 0.0, 1.0, 1.0, 1.0]),
                    Aabb::from_bounds([0.0, 0.0, 0.0, 1.0, 0.5, 1.0]),
                ],
            )
            .unwrap();
        assert_eq!(t.get(id).unwrap().full_faces(), 0b11_1111);
    }

    #[test]
    fn stair_is_full_below_and_behind() {
        let mut t = ModelTable::new();
        let id = t
            .register(
                "stair",
                vec![
                    Aabb::from_bounds([0.0, 0.0, 0.0, 1.0, 0.5, 1.0]),
                    Aabb::from_bounds([0.0, 0.5, 0.5, 1.0, 1.0, 1.0]),
                ],
            )
            .unwrap();
        let m = t.get(id).unwrap();
        assert!(m.is_face_full(Direction::Down));
        assert!(m.is_face_full(Direction::South));
        assert!(!m.is_face_full(Direction::North));
        assert!(!m.is_face_full(Direction::Up));
        assert!(!m.is_face_full(Direction::West));
    }

    #[test]
    fn thin_plate_on_floor_does_not_cover_top() {
        let m = compute_full_faces(&[Aabb::from_bounds([0.0, 0.0, 0.0, 1.0, 0.0625, 1.0])]);
        assert_eq!(m, 1 << Direction::Down.index());
    }

    #[test]
    fn rejects_bad_models() {
        let mut t = ModelTable::new();
        assert!(matches!(
            t.register("full", vec![Aabb::UNIT]),
            Err(RegistryError::DuplicateModel(_))
        ));
        assert!(matches!(
            t.register("many", vec![Aabb::UNIT; MAX_MODEL_BOXES + 1]),
            Err(RegistryError::TooManyBoxes { count: 9, .. })
        ));
        assert!(matches!(
            t.register("inside_out", vec![Aabb::from_bounds([1.0, 0.0, 0.0, 0.0, 1.0, 1.0])]),
            Err(RegistryError::InvertedBox(_))
        ));
    }
}
