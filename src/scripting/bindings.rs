use std::marker::PhantomData;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use rhai::{Engine, EvalAltResult, ImmutableString, FLOAT};
use thiserror::Error;

use super::objects::{Enemy, EnemyKind, ObjectId, SharedObjects};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("Script class '{0}' is already registered")]
    DuplicateClass(String),
    #[error("Script class '{class}' already exposes '{member}'")]
    DuplicateMethod { class: String, member: String },
    #[error("Object {0} is no longer managed by the level")]
    StaleObject(ObjectId),
}

/// Every class and member exposed to scripts, checked for clashes while registering.
#[derive(Debug, Default)]
pub struct BindingTable {
    classes: IndexMap<String, IndexSet<String>>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `name` and returns a builder for its members.
    pub fn class<'a, T: Clone + 'static>(
        &'a mut self,
        engine: &'a mut Engine,
        name: &str,
    ) -> Result<ClassBinding<'a, T>, BindingError> {
        let members = match self.classes.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(BindingError::DuplicateClass(name.to_string())),
            Entry::Vacant(slot) => slot.insert(IndexSet::new()),
        };
        engine.register_type_with_name::<T>(name);
        Ok(ClassBinding { engine, class: name.to_string(), members, _marker: PhantomData })
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Member signatures of a class in registration order, e.g. `Eato/1` or `get image_dir`.
    pub fn members(&self, class: &str) -> Option<impl Iterator<Item = &str> + '_> {
        self.classes.get(class).map(|members| members.iter().map(String::as_str))
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.keys().map(String::as_str)
    }
}

pub struct ClassBinding<'a, T> {
    engine: &'a mut Engine,
    class: String,
    members: &'a mut IndexSet<String>,
    _marker: PhantomData<T>,
}

impl<T: Clone + 'static> ClassBinding<'_, T> {
    /// Claims a function signature (`name/arity`) and hands out the engine to register it.
    pub fn function(&mut self, name: &str, arity: usize) -> Result<&mut Engine, BindingError> {
        self.claim(format!("{name}/{arity}"))
    }

    pub fn getter(&mut self, name: &str) -> Result<&mut Engine, BindingError> {
        self.claim(format!("get {name}"))
    }

    pub fn setter(&mut self, name: &str) -> Result<&mut Engine, BindingError> {
        self.claim(format!("set {name}"))
    }

    fn claim(&mut self, signature: String) -> Result<&mut Engine, BindingError> {
        if !self.members.insert(signature.clone()) {
            return Err(BindingError::DuplicateMethod { class: self.class.clone(), member: signature });
        }
        Ok(&mut *self.engine)
    }
}

/// Script-side reference to an enemy owned by the [`ObjectManager`](super::ObjectManager).
pub trait EnemyHandle: Clone + 'static {
    fn id(&self) -> ObjectId;
    fn objects(&self) -> &SharedObjects;

    fn read<R>(&self, f: impl FnOnce(&Enemy) -> R) -> Result<R, Box<EvalAltResult>> {
        let objects = self.objects().borrow();
        let enemy = objects.get(self.id()).ok_or_else(|| BindingError::StaleObject(self.id()).to_string())?;
        Ok(f(enemy))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Enemy) -> R) -> Result<R, Box<EvalAltResult>> {
        let mut objects = self.objects().borrow_mut();
        let enemy =
            objects.get_mut(self.id()).ok_or_else(|| BindingError::StaleObject(self.id()).to_string())?;
        Ok(f(enemy))
    }
}

/// Members every enemy class shares: position and the spawned flag.
pub fn register_enemy_members<T: EnemyHandle>(class: &mut ClassBinding<'_, T>) -> Result<(), BindingError> {
    class.getter("x")?.register_get("x", |handle: &mut T| handle.read(|enemy| enemy.position.x as FLOAT));
    class
        .setter("x")?
        .register_set("x", |handle: &mut T, x: FLOAT| handle.write(|enemy| enemy.position.x = x as f32));
    class.getter("y")?.register_get("y", |handle: &mut T| handle.read(|enemy| enemy.position.y as FLOAT));
    class
        .setter("y")?
        .register_set("y", |handle: &mut T, y: FLOAT| handle.write(|enemy| enemy.position.y = y as f32));
    class.getter("spawned")?.register_get("spawned", |handle: &mut T| handle.read(|enemy| enemy.spawned));
    class.function("id", 1)?.register_fn("id", |handle: &mut T| handle.id().raw() as rhai::INT);
    Ok(())
}

#[derive(Debug, Clone)]
pub struct EatoHandle {
    id: ObjectId,
    objects: SharedObjects,
}

impl EatoHandle {
    /// Creates an Eato, flags it as spawned and hands ownership to the object manager.
    pub fn spawn(objects: &SharedObjects, image_dir: Option<&str>) -> Self {
        let mut eato = Enemy::new(EnemyKind::Eato);
        eato.spawned = true;
        if let Some(dir) = image_dir {
            eato.image_dir = dir.to_string();
        }
        let id = objects.borrow_mut().add(eato);
        log::debug!("Script spawned Eato {id}");
        Self { id, objects: objects.clone() }
    }
}

impl EnemyHandle for EatoHandle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn objects(&self) -> &SharedObjects {
        &self.objects
    }
}

pub fn register_eato(
    engine: &mut Engine,
    table: &mut BindingTable,
    objects: &SharedObjects,
) -> Result<(), BindingError> {
    let mut class = table.class::<EatoHandle>(engine, EnemyKind::Eato.class_name())?;

    let shared = objects.clone();
    class.function("Eato", 0)?.register_fn("Eato", move || EatoHandle::spawn(&shared, None));
    let shared = objects.clone();
    class
        .function("Eato", 1)?
        .register_fn("Eato", move |image_dir: &str| EatoHandle::spawn(&shared, Some(image_dir)));

    class.getter("image_dir")?.register_get("image_dir", |handle: &mut EatoHandle| {
        handle.read(|enemy| ImmutableString::from(enemy.image_dir.as_str()))
    });
    class.setter("image_dir")?.register_set(
        "image_dir",
        |handle: &mut EatoHandle, image_dir: ImmutableString| {
            handle.write(|enemy| enemy.image_dir = image_dir.to_string())
        },
    );

    register_enemy_members(&mut class)
}
