use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Eato,
}

impl EnemyKind {
    pub fn class_name(self) -> &'static str {
        match self {
            EnemyKind::Eato => "Eato",
        }
    }

    pub fn default_image_dir(self) -> &'static str {
        match self {
            EnemyKind::Eato => "enemy/eato/brown/",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec2,
    pub image_dir: String,
    /// Created at runtime (by a script) rather than loaded from the level file.
    pub spawned: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        Self { kind, position: Vec2::ZERO, image_dir: kind.default_image_dir().to_string(), spawned: false }
    }
}

/// Owns every enemy in the active level. Handles held by scripts only refer to objects by id.
#[derive(Debug, Default)]
pub struct ObjectManager {
    objects: BTreeMap<ObjectId, Enemy>,
    next_id: u32,
}

pub type SharedObjects = Rc<RefCell<ObjectManager>>;

impl ObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedObjects {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn add(&mut self, enemy: Enemy) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.objects.insert(id, enemy);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Enemy> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Enemy> {
        self.objects.get_mut(&id)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Enemy> {
        self.objects.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Enemy)> + '_ {
        self.objects.iter().map(|(id, enemy)| (*id, enemy))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
