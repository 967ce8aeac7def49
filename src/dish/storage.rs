use std::path::{Path, PathBuf};

use sled::IVec;

use crate::dish::errors::DishError;
use crate::dish::types::{DishPatch, PetriDish, DISH_SCHEMA_VERSION};

const TREE_DISHES: &str = "peiyangmin";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct DishStoreBuilder {
    path: PathBuf,
}

impl DishStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<DishStore, DishError> {
        DishStore::open(self.path)
    }
}

/// Sled-backed persistence for per-user petri dish records.
///
/// Writes are read-modify-write with last-writer-wins semantics; there is no
/// version token. Partial updates go through [`DishPatch`] so a write that
/// stages a pending item never rewrites the item list.
pub struct DishStore {
    _db: sled::Db,
    dishes: sled::Tree,
}

impl DishStore {
    /// Open (or create) the dish store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DishError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let dishes = db.open_tree(TREE_DISHES)?;
        Ok(Self { _db: db, dishes })
    }

    fn dish_key(user_id: &str) -> Vec<u8> {
        format!("dishes:{}", user_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, DishError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, DishError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Fetch a dish by user id. Absence is a normal outcome (the dish is
    /// created lazily on first insert), so this returns `Ok(None)` rather
    /// than an error.
    pub fn get_dish(&self, user_id: &str) -> Result<Option<PetriDish>, DishError> {
        let key = Self::dish_key(user_id);
        let Some(bytes) = self.dishes.get(&key)? else {
            return Ok(None);
        };
        let record: PetriDish = Self::deserialize(bytes)?;
        if record.schema_version != DISH_SCHEMA_VERSION {
            return Err(DishError::SchemaMismatch {
                entity: "dish",
                expected: DISH_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(Some(record))
    }

    /// Insert a brand-new dish record. Callers guarantee the key is absent.
    pub fn create_dish(&self, mut dish: PetriDish) -> Result<(), DishError> {
        dish.schema_version = DISH_SCHEMA_VERSION;
        dish.touch();
        let key = Self::dish_key(&dish.user_id);
        let bytes = Self::serialize(&dish)?;
        self.dishes.insert(key, bytes)?;
        self.dishes.flush()?;
        Ok(())
    }

    /// Merge `patch` into the stored record for `user_id`. Fields the patch
    /// leaves unset keep their stored values.
    pub fn set_dish(&self, user_id: &str, patch: DishPatch) -> Result<(), DishError> {
        let mut dish = self
            .get_dish(user_id)?
            .ok_or_else(|| DishError::NotFound(format!("dish: {}", user_id)))?;
        patch.apply(&mut dish);
        dish.touch();
        let key = Self::dish_key(user_id);
        let bytes = Self::serialize(&dish)?;
        self.dishes.insert(key, bytes)?;
        self.dishes.flush()?;
        Ok(())
    }

    /// List all user ids with a stored dish.
    pub fn list_user_ids(&self) -> Result<Vec<String>, DishError> {
        let mut ids = Vec::new();
        for entry in self.dishes.scan_prefix(b"dishes:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(user_id) = text.strip_prefix("dishes:") {
                ids.push(user_id.to_string());
            }
        }
        Ok(ids)
    }
}
