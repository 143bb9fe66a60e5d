use super::repo::RepoError;
use chime_domain::{Entity, ID};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Useful functions for creating inmemory repositories.
/// Every read hands out clones so callers never alias stored values.

fn read<T>(collection: &RwLock<Vec<T>>) -> RwLockReadGuard<'_, Vec<T>> {
    collection.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(collection: &RwLock<Vec<T>>) -> RwLockWriteGuard<'_, Vec<T>> {
    collection.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn insert<T: Clone + Entity>(val: &T, collection: &RwLock<Vec<T>>) -> anyhow::Result<()> {
    let mut collection = write(collection);
    if collection.iter().any(|item| item.id() == val.id()) {
        return Err(RepoError::AlreadyExists(val.id().clone()).into());
    }
    collection.push(val.clone());
    Ok(())
}

pub fn save<T: Clone + Entity>(val: &T, collection: &RwLock<Vec<T>>) -> anyhow::Result<()> {
    let mut collection = write(collection);
    match collection.iter_mut().find(|item| item.id() == val.id()) {
        Some(item) => {
            *item = val.clone();
            Ok(())
        }
        None => Err(RepoError::NotFound(val.id().clone()).into()),
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &RwLock<Vec<T>>) -> Option<T> {
    read(collection)
        .iter()
        .find(|item| item.id() == val_id)
        .cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &RwLock<Vec<T>>, mut compare: F) -> Vec<T> {
    read(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &RwLock<Vec<T>>) -> Option<T> {
    let mut collection = write(collection);
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}

/// Applies `update` to the stored value under the write lock and returns the
/// updated copy. Nothing is written when `update` fails.
pub fn update<T, F>(val_id: &ID, collection: &RwLock<Vec<T>>, update: F) -> anyhow::Result<T>
where
    T: Clone + Entity,
    F: FnOnce(&mut T) -> anyhow::Result<()>,
{
    let mut collection = write(collection);
    let item = collection
        .iter_mut()
        .find(|item| item.id() == val_id)
        .ok_or_else(|| RepoError::NotFound(val_id.clone()))?;
    let mut updated = item.clone();
    update(&mut updated)?;
    *item = updated.clone();
    Ok(updated)
}

pub fn update_many<T, F, U>(collection: &RwLock<Vec<T>>, compare: F, mut update: U) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
    U: FnMut(&mut T) -> bool,
{
    let mut collection = write(collection);
    let mut updated = Vec::new();
    for item in collection.iter_mut() {
        if compare(item) && update(item) {
            updated.push(item.clone());
        }
    }
    updated
}
